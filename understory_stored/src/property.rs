// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stored property container.
//!
//! This module provides [`StoredProperty`], which owns one field value of a
//! state object together with the [`Tracking`] strategy that decides what
//! "default" means for it.

use core::fmt;
use core::hash::{Hash, Hasher};

use tracing::{debug, trace};

use crate::parse::ParseValue;
use crate::strategy::{Nested, Scalar, Tracking, ValueKind, as_nested, as_tracker};
use crate::tracking::{ModificationTracker, NestedState};

/// A stored property with a fixed default value.
pub type ScalarProperty<T> = StoredProperty<T, Scalar<T>>;

/// A stored property holding an optional nested state object.
pub type NestedProperty<C> = StoredProperty<Option<C>, Nested>;

/// One change-tracked field of a state object.
///
/// The property owns its value exclusively. Writes go through [`set`] (or
/// [`set_notifying`]), which compare the new value against the held one and
/// only replace it when they differ. The owning state object is told about
/// effective writes either by the returned flag or by a callback, and keeps
/// its own [`ModificationCounter`](crate::ModificationCounter); the property
/// never holds a reference back to its owner.
///
/// Equality and hashing look at the held value only. The name and the
/// strategy are ignored, so two properties holding equal values are
/// interchangeable.
///
/// # Example
///
/// ```rust
/// use understory_stored::{ModificationCounter, StoredProperty};
///
/// let mut counter = ModificationCounter::new();
/// let mut count = StoredProperty::scalar(0_u32).named("count");
/// assert!(count.is_equal_to_default());
/// assert_eq!(count.to_string(), "count = ");
///
/// count.set_notifying(5, || counter.increment());
/// count.set_notifying(5, || counter.increment());
///
/// assert_eq!(counter.get(), 1);
/// assert_eq!(count.get(), &5);
/// assert_eq!(count.to_string(), "count = 5");
/// ```
///
/// [`set`]: StoredProperty::set
/// [`set_notifying`]: StoredProperty::set_notifying
#[derive(Clone, Debug)]
pub struct StoredProperty<T, S> {
    name: &'static str,
    value: T,
    tracking: S,
}

impl<T, S: Tracking<T>> StoredProperty<T, S> {
    /// Creates a property from an initial value and a strategy.
    ///
    /// Prefer [`scalar`](StoredProperty::scalar) and
    /// [`nested`](StoredProperty::nested) for the built-in strategies.
    #[must_use]
    pub fn with_tracking(value: T, tracking: S) -> Self {
        Self {
            name: "",
            value,
            tracking,
        }
    }

    /// Sets the field name, returning the property.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Returns the field name. Empty until the owner assigns one.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sets the field name.
    #[inline]
    pub fn set_name(&mut self, name: &'static str) {
        self.name = name;
    }

    /// Returns the held value.
    #[must_use]
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Consumes the property, returning the held value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns the strategy.
    #[must_use]
    #[inline]
    pub fn tracking(&self) -> &S {
        &self.tracking
    }

    /// Returns `true` if the held value counts as the field's default.
    ///
    /// Default fields can be skipped by a serializer.
    #[must_use]
    pub fn is_equal_to_default(&self) -> bool {
        self.tracking.is_equal_to_default(&self.value)
    }

    /// Returns the modification count contributed by the held value.
    ///
    /// This is `0` for plain values, and the value's own count for tracked
    /// values and nested state, so a change deep inside a child shows up here without any
    /// write to this property.
    #[must_use]
    pub fn modification_count(&self) -> u64 {
        self.tracking.modification_count(&self.value)
    }

    /// Returns the schema classification of the held value.
    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        self.tracking.value_kind()
    }
}

impl<T: PartialEq, S: Tracking<T>> StoredProperty<T, S> {
    /// Replaces the held value if `value` differs from it.
    ///
    /// Returns `true` if the value changed. The owner must record a
    /// modification in that case, and only in that case.
    #[must_use = "the owner must record a modification when this returns `true`"]
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        trace!(property = self.name, "stored value changed");
        self.value = value;
        true
    }

    /// Replaces the held value if it differs, calling `notify` first.
    ///
    /// `notify` runs exactly once for an effective write and never when
    /// `value` equals the held value. Returns whether the value changed.
    pub fn set_notifying(&mut self, value: T, notify: impl FnOnce()) -> bool {
        if self.value == value {
            return false;
        }
        notify();
        trace!(property = self.name, "stored value changed");
        self.value = value;
        true
    }

    /// Best-effort parse of a raw text token into the held value.
    ///
    /// The value is left unchanged when the property has no parser or the
    /// token is malformed. No modification is reported to anyone; returns
    /// whether the value changed so the caller can decide.
    pub fn parse_and_set_value(&mut self, raw: Option<&str>) -> bool {
        let Some(parse) = self.tracking.parser() else {
            debug!(property = self.name, "property does not support parsing");
            return false;
        };
        match parse(raw) {
            Some(value) => self.set(value),
            None => {
                debug!(property = self.name, raw = ?raw, "ignoring malformed value");
                false
            }
        }
    }
}

impl<T: Clone + PartialEq, S: Tracking<T>> StoredProperty<T, S> {
    /// Copies the value held by `other` if it differs from ours.
    ///
    /// Returns whether a copy happened. This is meant for bulk copies between
    /// two instances of the same state object; the caller records the
    /// modification itself if it needs one.
    pub fn set_from(&mut self, other: &Self) -> bool {
        if self.value == other.value {
            return false;
        }
        trace!(property = self.name, "stored value copied");
        self.value.clone_from(&other.value);
        true
    }
}

impl<T: Clone + PartialEq + 'static> StoredProperty<T, Scalar<T>> {
    /// Creates a property whose value starts at `default`.
    ///
    /// The value is default exactly when it equals `default`, and the schema
    /// kind follows the value type. Chain [`parseable`](Self::parseable),
    /// [`tracked`](Self::tracked) or [`nested_state`](Self::nested_state) to
    /// opt into parsing, count reporting or nested-state delegation.
    #[must_use]
    pub fn scalar(default: T) -> Self {
        Self::with_tracking(default.clone(), Scalar::new(default))
    }
}

impl<T: Clone + PartialEq> StoredProperty<T, Scalar<T>> {
    /// Returns the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &T {
        self.tracking.default_value()
    }

    /// Restores the default value.
    ///
    /// Returns `true` if the value changed.
    #[must_use = "the owner must record a modification when this returns `true`"]
    pub fn reset(&mut self) -> bool {
        if self.value == *self.tracking.default_value() {
            return false;
        }
        trace!(property = self.name, "stored value reset");
        self.value.clone_from(self.tracking.default_value());
        true
    }
}

impl<T: ParseValue + Clone + PartialEq> StoredProperty<T, Scalar<T>> {
    /// Enables [`parse_and_set_value`](Self::parse_and_set_value) via
    /// [`ParseValue`], returning the property.
    #[must_use]
    pub fn parseable(mut self) -> Self {
        self.tracking = self.tracking.with_parser(T::parse_value);
        self
    }
}

impl StoredProperty<bool, Scalar<bool>> {
    /// Creates a parseable boolean flag.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understory_stored::{StoredProperty, ValueKind};
    ///
    /// let mut verbose = StoredProperty::flag(false).named("verbose");
    /// assert_eq!(verbose.value_kind(), ValueKind::Boolean);
    ///
    /// assert!(verbose.parse_and_set_value(Some("On")));
    /// assert_eq!(verbose.get(), &true);
    ///
    /// assert!(verbose.parse_and_set_value(None));
    /// assert_eq!(verbose.get(), &false);
    /// ```
    #[must_use]
    pub fn flag(default: bool) -> Self {
        Self::scalar(default).parseable()
    }
}

impl<T: ModificationTracker + Clone + PartialEq> StoredProperty<T, Scalar<T>> {
    /// Declares that the value carries its own modification count,
    /// returning the property.
    ///
    /// The value's count is then contributed to
    /// [`modification_count`](Self::modification_count), so changes made
    /// through [`state_mut`](Self::state_mut) reach the owner's aggregate.
    /// The "is default" rule stays plain equality.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understory_stored::{ModificationTracker, StoredProperty};
    ///
    /// #[derive(Clone, PartialEq)]
    /// struct Document {
    ///     revision: u64,
    /// }
    ///
    /// impl ModificationTracker for Document {
    ///     fn modification_count(&self) -> u64 {
    ///         self.revision
    ///     }
    /// }
    ///
    /// let mut doc = StoredProperty::scalar(Document { revision: 0 }).tracked();
    /// doc.state_mut().revision += 1;
    /// assert_eq!(doc.modification_count(), 1);
    /// assert!(!doc.is_equal_to_default());
    /// ```
    #[must_use]
    pub fn tracked(mut self) -> Self {
        self.tracking = self.tracking.with_tracker(as_tracker::<T>);
        self
    }

    /// Returns the held value for in-place modification.
    ///
    /// Changes made this way are tracked by the value's own counter, which
    /// [`modification_count`](Self::modification_count) reports once
    /// [`tracked`](Self::tracked) or [`nested_state`](Self::nested_state)
    /// was declared.
    #[must_use]
    pub fn state_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: NestedState + Clone + PartialEq> StoredProperty<T, Scalar<T>> {
    /// Declares that the value is itself nested state, returning the property.
    ///
    /// The value then also counts as default when it reports itself as
    /// default, and its own modification count is contributed as with
    /// [`tracked`](Self::tracked).
    #[must_use]
    pub fn nested_state(mut self) -> Self {
        self.tracking = self
            .tracking
            .with_delegate(as_nested::<T>)
            .with_tracker(as_tracker::<T>);
        self
    }
}

impl<C: NestedState> StoredProperty<Option<C>, Nested> {
    /// Creates a property holding an optional child state object.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understory_stored::{
    ///     ModificationTracker, NestedProperty, NestedState, StoredProperty,
    /// };
    ///
    /// #[derive(PartialEq)]
    /// struct Child(u64);
    ///
    /// impl ModificationTracker for Child {
    ///     fn modification_count(&self) -> u64 {
    ///         self.0
    ///     }
    /// }
    ///
    /// impl NestedState for Child {
    ///     fn is_equal_to_default(&self) -> bool {
    ///         self.0 == 0
    ///     }
    /// }
    ///
    /// let mut child: NestedProperty<Child> = StoredProperty::nested(Some(Child(0)));
    /// assert!(child.is_equal_to_default());
    ///
    /// if let Some(inner) = child.child_mut() {
    ///     inner.0 += 1;
    /// }
    /// assert!(!child.is_equal_to_default());
    /// assert_eq!(child.modification_count(), 1);
    /// ```
    #[must_use]
    pub fn nested(initial: Option<C>) -> Self {
        Self::with_tracking(initial, Nested)
    }

    /// Returns the child, if present.
    #[must_use]
    #[inline]
    pub fn child(&self) -> Option<&C> {
        self.value.as_ref()
    }

    /// Returns the child for in-place modification, if present.
    ///
    /// Changes made this way are tracked by the child's own counter.
    #[must_use]
    pub fn child_mut(&mut self) -> Option<&mut C> {
        self.value.as_mut()
    }
}

impl<T: PartialEq, S> PartialEq for StoredProperty<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq, S> Eq for StoredProperty<T, S> {}

impl<T: Hash, S> Hash for StoredProperty<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: fmt::Display + PartialEq> fmt::Display for StoredProperty<T, Scalar<T>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.name)?;
        if self.is_equal_to_default() {
            return Ok(());
        }
        write!(f, "{}", self.value)
    }
}

impl<C: NestedState + fmt::Display> fmt::Display for StoredProperty<Option<C>, Nested> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.name)?;
        match &self.value {
            Some(child) if !child.is_equal_to_default() => write!(f, "{child}"),
            _ => Ok(()),
        }
    }
}
