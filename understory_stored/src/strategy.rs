// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default and modification-count strategies.
//!
//! A [`StoredProperty`](crate::StoredProperty) does not know by itself what
//! "default" means for its value. That is decided by a [`Tracking`] strategy
//! chosen at construction:
//!
//! - [`Scalar`] compares against a fixed default value. It can optionally
//!   report the value's own [`ModificationTracker`] count and delegate to a
//!   value that is itself a [`NestedState`].
//! - [`Nested`] holds an optional child state object and asks the child.

use core::any::TypeId;
use core::fmt;

use crate::tracking::{ModificationTracker, NestedState};

/// Parses an optional text token into a value, or `None` if it can't.
pub type ParseFn<T> = fn(Option<&str>) -> Option<T>;

/// Views a stored value as the nested state object it contains.
pub type DelegateFn<T> = fn(&T) -> &dyn NestedState;

/// Views a stored value as the modification tracker it contains.
pub type TrackerFn<T> = fn(&T) -> &dyn ModificationTracker;

/// Schema classification of a stored value.
///
/// Only consumed by external serializers and schema generators. It never
/// changes how a property behaves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A boolean flag.
    Boolean,
    /// Any other structured or scalar value.
    #[default]
    Object,
}

impl ValueKind {
    /// Classifies values of type `T`.
    ///
    /// `bool` is [`Boolean`](Self::Boolean); every other type is
    /// [`Object`](Self::Object).
    ///
    /// ```rust
    /// use understory_stored::ValueKind;
    ///
    /// assert_eq!(ValueKind::of::<bool>(), ValueKind::Boolean);
    /// assert_eq!(ValueKind::of::<u8>(), ValueKind::Object);
    /// ```
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        if TypeId::of::<T>() == TypeId::of::<bool>() {
            Self::Boolean
        } else {
            Self::Object
        }
    }
}

/// How a stored property answers "is default" and "how modified".
pub trait Tracking<T> {
    /// Returns `true` if `value` counts as the default for this field.
    fn is_equal_to_default(&self, value: &T) -> bool;

    /// Returns the modification count contributed by `value` itself.
    ///
    /// Plain values contribute `0`; their writes are counted by the owner.
    fn modification_count(&self, value: &T) -> u64;

    /// Returns the schema classification of the value.
    fn value_kind(&self) -> ValueKind {
        ValueKind::Object
    }

    /// Returns the text parser for this field, if it has one.
    fn parser(&self) -> Option<ParseFn<T>> {
        None
    }
}

/// Strategy for a scalar or general-purpose value with a fixed default.
///
/// The value is default when it equals the default, or, if the property was
/// declared as holding nested state, when the nested state says so. Its
/// modification count is the value's own count when the value was declared
/// as tracked, and `0` otherwise.
pub struct Scalar<T> {
    default: T,
    kind: ValueKind,
    parser: Option<ParseFn<T>>,
    tracker: Option<TrackerFn<T>>,
    delegate: Option<DelegateFn<T>>,
}

impl<T: 'static> Scalar<T> {
    /// Creates a strategy with the given default and no hooks.
    ///
    /// The schema kind is derived from `T` with [`ValueKind::of`].
    #[must_use]
    pub fn new(default: T) -> Self {
        Self {
            default,
            kind: ValueKind::of::<T>(),
            parser: None,
            tracker: None,
            delegate: None,
        }
    }
}

impl<T> Scalar<T> {
    /// Returns the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Returns whether a text parser is installed.
    #[must_use]
    #[inline]
    pub fn is_parseable(&self) -> bool {
        self.parser.is_some()
    }

    /// Returns whether the value's own modification count is reported.
    #[must_use]
    #[inline]
    pub fn is_tracked(&self) -> bool {
        self.tracker.is_some()
    }

    /// Returns whether the value is consulted as nested state.
    #[must_use]
    #[inline]
    pub fn delegates(&self) -> bool {
        self.delegate.is_some()
    }

    /// Installs a text parser.
    #[must_use]
    pub fn with_parser(mut self, parser: ParseFn<T>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Declares that values carry their own modification count.
    #[must_use]
    pub fn with_tracker(mut self, tracker: TrackerFn<T>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Declares that values should also be consulted as nested state.
    ///
    /// This only affects the "is default" rule; pair it with
    /// [`with_tracker`](Self::with_tracker) to report the count as well.
    #[must_use]
    pub fn with_delegate(mut self, delegate: DelegateFn<T>) -> Self {
        self.delegate = Some(delegate);
        self
    }
}

impl<T: PartialEq> Tracking<T> for Scalar<T> {
    fn is_equal_to_default(&self, value: &T) -> bool {
        *value == self.default
            || self
                .delegate
                .is_some_and(|delegate| delegate(value).is_equal_to_default())
    }

    fn modification_count(&self, value: &T) -> u64 {
        self.tracker
            .map_or(0, |tracker| tracker(value).modification_count())
    }

    #[inline]
    fn value_kind(&self) -> ValueKind {
        self.kind
    }

    #[inline]
    fn parser(&self) -> Option<ParseFn<T>> {
        self.parser
    }
}

impl<T: Clone> Clone for Scalar<T> {
    fn clone(&self) -> Self {
        Self {
            default: self.default.clone(),
            kind: self.kind,
            parser: self.parser,
            tracker: self.tracker,
            delegate: self.delegate,
        }
    }
}

// Manual Debug impl since the hooks aren't meaningfully printable
impl<T: fmt::Debug> fmt::Debug for Scalar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar")
            .field("default", &self.default)
            .field("kind", &self.kind)
            .field("parseable", &self.parser.is_some())
            .field("tracked", &self.tracker.is_some())
            .field("delegates", &self.delegate.is_some())
            .finish()
    }
}

/// Strategy for an optional child state object.
///
/// An absent child is default and contributes nothing. A present child
/// answers both questions itself; there is no default template to compare
/// against.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Nested;

impl<C: NestedState> Tracking<Option<C>> for Nested {
    fn is_equal_to_default(&self, value: &Option<C>) -> bool {
        value
            .as_ref()
            .is_none_or(|child| child.is_equal_to_default())
    }

    fn modification_count(&self, value: &Option<C>) -> u64 {
        value.as_ref().map_or(0, |child| child.modification_count())
    }
}

/// Views `value` as a modification tracker; used as a [`TrackerFn`].
pub(crate) fn as_tracker<T: ModificationTracker>(value: &T) -> &dyn ModificationTracker {
    value
}

/// Views `value` as nested state; used as a [`DelegateFn`].
pub(crate) fn as_nested<T: NestedState>(value: &T) -> &dyn NestedState {
    value
}
