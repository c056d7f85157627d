// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modification-tracking capabilities.
//!
//! This module provides the two contracts a stored value may opt into,
//! [`ModificationTracker`] and [`NestedState`], plus [`ModificationCounter`],
//! the owner-side counter that stored properties report changes to.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;

/// A value that reports how many times it has been modified.
///
/// The count is non-negative and never decreases for a given mutable value.
/// Callers only compare readings against earlier readings; the absolute
/// number carries no meaning.
pub trait ModificationTracker {
    /// Returns the current modification count.
    fn modification_count(&self) -> u64;
}

/// A change-tracked state object that can be nested inside a stored property.
///
/// Implementors report whether they are indistinguishable from a freshly
/// constructed instance, so that the owning property can decide if the
/// field needs to be serialized at all.
///
/// # Example
///
/// ```rust
/// use understory_stored::{
///     ModificationCounter, ModificationTracker, NestedState, ScalarProperty, StoredProperty,
/// };
///
/// struct Margins {
///     left: ScalarProperty<u32>,
///     counter: ModificationCounter,
/// }
///
/// impl ModificationTracker for Margins {
///     fn modification_count(&self) -> u64 {
///         self.counter.get()
///     }
/// }
///
/// impl NestedState for Margins {
///     fn is_equal_to_default(&self) -> bool {
///         self.left.is_equal_to_default()
///     }
/// }
///
/// let mut margins = Margins {
///     left: StoredProperty::scalar(0).named("left"),
///     counter: ModificationCounter::new(),
/// };
/// assert!(margins.is_equal_to_default());
///
/// let changed = margins.left.set(4);
/// margins.counter.record(changed);
/// assert!(!margins.is_equal_to_default());
/// assert_eq!(margins.modification_count(), 1);
/// ```
pub trait NestedState: ModificationTracker {
    /// Returns `true` if every field still holds its default value.
    fn is_equal_to_default(&self) -> bool;
}

impl<T: ModificationTracker + ?Sized> ModificationTracker for Box<T> {
    #[inline]
    fn modification_count(&self) -> u64 {
        (**self).modification_count()
    }
}

impl<T: NestedState + ?Sized> NestedState for Box<T> {
    #[inline]
    fn is_equal_to_default(&self) -> bool {
        (**self).is_equal_to_default()
    }
}

impl<T: ModificationTracker + ?Sized> ModificationTracker for Rc<T> {
    #[inline]
    fn modification_count(&self) -> u64 {
        (**self).modification_count()
    }
}

impl<T: NestedState + ?Sized> NestedState for Rc<T> {
    #[inline]
    fn is_equal_to_default(&self) -> bool {
        (**self).is_equal_to_default()
    }
}

impl<T: ModificationTracker + ?Sized> ModificationTracker for Arc<T> {
    #[inline]
    fn modification_count(&self) -> u64 {
        (**self).modification_count()
    }
}

impl<T: NestedState + ?Sized> NestedState for Arc<T> {
    #[inline]
    fn is_equal_to_default(&self) -> bool {
        (**self).is_equal_to_default()
    }
}

/// An owner-level modification counter.
///
/// State objects keep one of these and bump it whenever a stored property
/// reports an effective write. Increments wrap on overflow, which is
/// unreachable in practice.
///
/// # Example
///
/// ```rust
/// use understory_stored::{ModificationCounter, StoredProperty};
///
/// let mut counter = ModificationCounter::new();
/// let mut count = StoredProperty::scalar(0_i32).named("count");
///
/// counter.record(count.set(5));
/// counter.record(count.set(5));
/// assert_eq!(counter.get(), 1);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModificationCounter {
    count: u64,
}

impl ModificationCounter {
    /// Creates a counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Returns the current count.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.count
    }

    /// Records one modification.
    #[inline]
    pub fn increment(&mut self) {
        self.count = self.count.wrapping_add(1);
    }

    /// Records a modification if `changed` is `true`.
    ///
    /// Returns `changed`, so the call can be chained onto a property write.
    #[inline]
    pub fn record(&mut self, changed: bool) -> bool {
        if changed {
            self.increment();
        }
        changed
    }
}

impl ModificationTracker for ModificationCounter {
    #[inline]
    fn modification_count(&self) -> u64 {
        self.count
    }
}
