// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Stored: change-tracking stored properties.
//!
//! This crate provides the per-field building block of an in-memory
//! configuration or state object that is serialized incrementally. A
//! [`StoredProperty`] wraps one field value and answers three questions
//! cheaply, without re-walking the whole object:
//!
//! - **Did this write change anything?** Writes compare the new value with
//!   the held one and report effective changes to the owner.
//! - **Is this field still at its default?** Default fields can be skipped
//!   when serializing.
//! - **Did something inside a nested child change?** Properties holding
//!   nested state expose the child's own modification count.
//!
//! The owning state object (the thing holding many properties, computing an
//! aggregate counter and driving serialization) is not part of this crate.
//! It only needs a [`ModificationCounter`] and, for nested children, the
//! [`NestedState`] capability.
//!
//! ## Variants
//!
//! [`StoredProperty`] is one container parameterized by a [`Tracking`]
//! strategy chosen at construction:
//!
//! | Constructor | Strategy | "Is default" when |
//! |-------------|----------|-------------------|
//! | [`StoredProperty::scalar`] | [`Scalar`] | value equals the default |
//! | [`StoredProperty::flag`] | [`Scalar`] | same, with `true`/`yes`/`on` parsing |
//! | `scalar(..).tracked()` | [`Scalar`] | value equals the default; the value's own count is reported |
//! | `scalar(..).nested_state()` | [`Scalar`] | equals the default, or the value says so |
//! | [`StoredProperty::nested`] | [`Nested`] | child absent, or the child says so |
//!
//! ## Quick Start
//!
//! ```rust
//! use core::fmt;
//! use understory_stored::{
//!     ErasedProperty, ModificationCounter, ModificationTracker, NestedProperty, NestedState,
//!     ScalarProperty, StoredProperty, aggregate_modification_count,
//! };
//!
//! #[derive(Clone, PartialEq)]
//! struct Theme {
//!     dark: ScalarProperty<bool>,
//!     counter: ModificationCounter,
//! }
//!
//! impl ModificationTracker for Theme {
//!     fn modification_count(&self) -> u64 {
//!         self.counter.get()
//!     }
//! }
//!
//! impl NestedState for Theme {
//!     fn is_equal_to_default(&self) -> bool {
//!         self.dark.is_equal_to_default()
//!     }
//! }
//!
//! impl fmt::Display for Theme {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "{{{}}}", self.dark)
//!     }
//! }
//!
//! struct Settings {
//!     font_size: ScalarProperty<u32>,
//!     theme: NestedProperty<Theme>,
//!     counter: ModificationCounter,
//! }
//!
//! impl Settings {
//!     fn modification_count(&self) -> u64 {
//!         aggregate_modification_count(self.counter.get(), [
//!             &self.font_size as &dyn ErasedProperty,
//!             &self.theme,
//!         ])
//!     }
//! }
//!
//! let mut settings = Settings {
//!     font_size: StoredProperty::scalar(12).named("font_size"),
//!     theme: StoredProperty::nested(Some(Theme {
//!         dark: StoredProperty::flag(false).named("dark"),
//!         counter: ModificationCounter::new(),
//!     }))
//!     .named("theme"),
//!     counter: ModificationCounter::new(),
//! };
//!
//! // Writes that change nothing are free.
//! settings.counter.record(settings.font_size.set(12));
//! assert_eq!(settings.modification_count(), 0);
//!
//! settings.counter.record(settings.font_size.set(14));
//! assert_eq!(settings.font_size.to_string(), "font_size = 14");
//!
//! // A change inside the child is visible through the parent's property.
//! let before = settings.modification_count();
//! if let Some(theme) = settings.theme.child_mut() {
//!     let counter = &mut theme.counter;
//!     theme.dark.set_notifying(true, || counter.increment());
//! }
//! assert!(settings.modification_count() > before);
//! assert!(!settings.theme.is_equal_to_default());
//! assert_eq!(settings.theme.to_string(), "theme = {dark = true}");
//! ```
//!
//! ## Notifying the owner
//!
//! A property never holds a reference to its owner. Effective writes are
//! reported either through the `bool` returned by [`StoredProperty::set`],
//! which the owner feeds to [`ModificationCounter::record`], or through the
//! callback given to [`StoredProperty::set_notifying`]. Both fire exactly
//! once per real change and never for a write of an equal value.
//!
//! [`StoredProperty::set_from`] and [`StoredProperty::parse_and_set_value`]
//! don't notify anyone; they return whether the value changed.
//!
//! ## Logging
//!
//! Effective writes are logged at `TRACE` level and rejected text input at
//! `DEBUG` level through [`tracing`], with the property name as a field.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature (enabled by
//! default) only forwards to `tracing`.

#![no_std]

extern crate alloc;

mod erased;
mod parse;
mod property;
mod strategy;
mod tracking;

pub use erased::{
    ErasedProperty, PropertyTypeMismatch, aggregate_modification_count, non_default_entries,
};
pub use parse::{ParseValue, parse_flag};
pub use property::{NestedProperty, ScalarProperty, StoredProperty};
pub use strategy::{DelegateFn, Nested, ParseFn, Scalar, TrackerFn, Tracking, ValueKind};
pub use tracking::{ModificationCounter, ModificationTracker, NestedState};
