// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased access to stored properties.
//!
//! A state object usually holds many properties of different value types.
//! [`ErasedProperty`] lets it walk all of them uniformly, for instance to
//! compute its aggregate modification count or to find the fields that need
//! to be serialized.

use core::any::{Any, type_name};
use core::fmt;

use crate::property::StoredProperty;
use crate::strategy::{Tracking, ValueKind};

/// A stored property viewed without its value type.
///
/// Implemented for every [`StoredProperty`] with a displayable value.
pub trait ErasedProperty: Any {
    /// Returns the field name.
    fn name(&self) -> &'static str;

    /// Returns the schema classification of the value.
    fn value_kind(&self) -> ValueKind;

    /// Returns the type name of the held value, for diagnostics.
    fn value_type_name(&self) -> &'static str;

    /// Returns `true` if the held value counts as the field's default.
    fn is_equal_to_default(&self) -> bool;

    /// Returns the modification count contributed by the held value.
    fn modification_count(&self) -> u64;

    /// Best-effort parse of a raw text token; returns whether the value changed.
    fn parse_and_set_value(&mut self, raw: Option<&str>) -> bool;

    /// Copies the value of `other` if it differs from ours.
    ///
    /// Returns whether a copy happened, or an error if `other` is a property
    /// of a different kind.
    fn set_from_erased(
        &mut self,
        other: &dyn ErasedProperty,
    ) -> Result<bool, PropertyTypeMismatch>;

    /// Writes the diagnostic `name = value` rendering.
    fn fmt_entry(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Returns `self` as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T, S> ErasedProperty for StoredProperty<T, S>
where
    T: Clone + PartialEq + 'static,
    S: Tracking<T> + 'static,
    Self: fmt::Display,
{
    fn name(&self) -> &'static str {
        Self::name(self)
    }

    fn value_kind(&self) -> ValueKind {
        Self::value_kind(self)
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn is_equal_to_default(&self) -> bool {
        Self::is_equal_to_default(self)
    }

    fn modification_count(&self) -> u64 {
        Self::modification_count(self)
    }

    fn parse_and_set_value(&mut self, raw: Option<&str>) -> bool {
        Self::parse_and_set_value(self, raw)
    }

    fn set_from_erased(
        &mut self,
        other: &dyn ErasedProperty,
    ) -> Result<bool, PropertyTypeMismatch> {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => Ok(self.set_from(other)),
            None => Err(PropertyTypeMismatch {
                property: Self::name(self),
                expected: type_name::<T>(),
                found: other.value_type_name(),
            }),
        }
    }

    fn fmt_entry(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn ErasedProperty {
    /// Attempts to downcast to a concrete [`StoredProperty`].
    #[must_use]
    pub fn downcast_ref<T: 'static, S: 'static>(&self) -> Option<&StoredProperty<T, S>> {
        self.as_any().downcast_ref()
    }
}

impl fmt::Display for dyn ErasedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_entry(f)
    }
}

impl fmt::Debug for dyn ErasedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedProperty")
            .field("name", &self.name())
            .field("value_type", &self.value_type_name())
            .field("is_equal_to_default", &self.is_equal_to_default())
            .finish_non_exhaustive()
    }
}

/// Error returned when copying between properties of different kinds.
///
/// This signals a bug in the owner: the two properties were never meant to
/// be paired.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PropertyTypeMismatch {
    /// The name of the property being written.
    pub property: &'static str,
    /// The value type of the property being written.
    pub expected: &'static str,
    /// The value type of the property that was offered.
    pub found: &'static str,
}

impl fmt::Display for PropertyTypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot copy a `{}` property into `{}` of type `{}`",
            self.found, self.property, self.expected
        )
    }
}

impl core::error::Error for PropertyTypeMismatch {}

/// Sums an owner's own counter with the contributions of its properties.
///
/// Comparing the result against an earlier reading for inequality answers
/// "did anything change", including changes deep inside nested state. It is
/// not monotonic: detaching a nested child drops that child's contribution,
/// so the total can fall even though the owner recorded a modification.
///
/// # Example
///
/// ```rust
/// use understory_stored::{
///     ErasedProperty, ModificationCounter, StoredProperty, aggregate_modification_count,
/// };
///
/// let mut counter = ModificationCounter::new();
/// let mut width = StoredProperty::scalar(0_u32).named("width");
/// let height = StoredProperty::scalar(0_u32).named("height");
///
/// let before = aggregate_modification_count(counter.get(), [
///     &width as &dyn ErasedProperty,
///     &height,
/// ]);
/// counter.record(width.set(640));
/// let after = aggregate_modification_count(counter.get(), [
///     &width as &dyn ErasedProperty,
///     &height,
/// ]);
/// assert_ne!(after, before);
/// ```
#[must_use]
pub fn aggregate_modification_count<'a>(
    own: u64,
    properties: impl IntoIterator<Item = &'a dyn ErasedProperty>,
) -> u64 {
    properties.into_iter().fold(own, |total, property| {
        total.wrapping_add(property.modification_count())
    })
}

/// Yields the properties whose values differ from their defaults.
///
/// These are the fields a serializer has to write out.
pub fn non_default_entries<'a>(
    properties: impl IntoIterator<Item = &'a dyn ErasedProperty>,
) -> impl Iterator<Item = &'a dyn ErasedProperty> {
    properties
        .into_iter()
        .filter(|property| !property.is_equal_to_default())
}
