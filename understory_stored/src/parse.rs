// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Best-effort conversion from text tokens to stored values.

use alloc::string::String;

/// A value type that can be recovered from a raw text token.
///
/// Parsing is best-effort: returning `None` leaves the stored value
/// untouched. `raw` is `None` when the serialized form had no token at all.
///
/// # Example
///
/// ```rust
/// use understory_stored::ParseValue;
///
/// assert_eq!(bool::parse_value(Some("Yes")), Some(true));
/// assert_eq!(u16::parse_value(Some(" 80 ")), Some(80));
/// assert_eq!(u16::parse_value(Some("eighty")), None);
/// ```
pub trait ParseValue: Sized {
    /// Parses `raw`, or returns `None` if it isn't a valid token.
    fn parse_value(raw: Option<&str>) -> Option<Self>;
}

/// Interprets a flag token.
///
/// `"true"`, `"yes"` and `"on"` (ASCII case-insensitive) mean `true`.
/// Everything else, including a missing token, means `false`.
#[must_use]
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|raw| {
        ["true", "yes", "on"]
            .iter()
            .any(|token| raw.eq_ignore_ascii_case(token))
    })
}

impl ParseValue for bool {
    #[inline]
    fn parse_value(raw: Option<&str>) -> Option<Self> {
        Some(parse_flag(raw))
    }
}

impl ParseValue for String {
    #[inline]
    fn parse_value(raw: Option<&str>) -> Option<Self> {
        raw.map(Self::from)
    }
}

macro_rules! impl_parse_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParseValue for $ty {
                #[inline]
                fn parse_value(raw: Option<&str>) -> Option<Self> {
                    raw?.trim().parse().ok()
                }
            }
        )*
    };
}

impl_parse_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char,
);
