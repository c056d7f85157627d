// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based tests for write detection, copying and hashing.

use std::hash::{DefaultHasher, Hash, Hasher};

use hashbrown::HashSet;
use proptest::prelude::*;
use understory_stored::{ScalarProperty, StoredProperty};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn non_default_write_notifies_once(default in any::<i64>(), value in any::<i64>()) {
        prop_assume!(value != default);
        let mut prop = StoredProperty::scalar(default).named("value");
        let mut calls = 0;

        prop.set_notifying(value, || calls += 1);
        prop_assert_eq!(calls, 1);
        prop_assert!(!prop.is_equal_to_default());
        prop_assert_eq!(prop.get(), &value);
    }

    #[test]
    fn repeated_write_notifies_at_most_once(default in any::<i64>(), value in any::<i64>()) {
        let mut prop = StoredProperty::scalar(default);
        let mut calls = 0;

        prop.set_notifying(value, || calls += 1);
        prop.set_notifying(value, || calls += 1);
        prop_assert!(calls <= 1);
        prop_assert_eq!(calls == 1, value != default);
    }

    #[test]
    fn set_from_copies_iff_different(
        default in ".{0,8}",
        left in ".{0,8}",
        right in ".{0,8}",
    ) {
        let mut dst = StoredProperty::scalar(default.clone());
        let mut src = StoredProperty::scalar(default);
        let _ = dst.set(left.clone());
        let _ = src.set(right.clone());

        let copied = dst.set_from(&src);
        prop_assert_eq!(copied, left != right);
        prop_assert_eq!(&dst, &src);
        prop_assert_eq!(dst.get(), &right);
    }

    #[test]
    fn set_from_into_fresh_property_round_trips(
        default in any::<u16>(),
        fresh_default in any::<u16>(),
        value in any::<u16>(),
    ) {
        let mut source: ScalarProperty<u16> = StoredProperty::scalar(default);
        let _ = source.set(value);

        let mut fresh = StoredProperty::scalar(fresh_default);
        let _ = fresh.set_from(&source);
        prop_assert_eq!(&fresh, &source);
        prop_assert_eq!(fresh.is_equal_to_default(), value == fresh_default);
    }

    #[test]
    fn equal_properties_hash_equal(value in any::<u32>()) {
        let a = StoredProperty::scalar(value).named("a");
        let mut b = StoredProperty::scalar(0_u32).named("b");
        let _ = b.set(value);

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));

        let mut set = HashSet::new();
        set.insert(a);
        prop_assert!(!set.insert(b));
    }

    #[test]
    fn parse_leaves_value_on_garbage(value in any::<i32>(), raw in "[a-z]{1,6}") {
        let mut prop = StoredProperty::scalar(value).parseable();
        prop_assert!(!prop.parse_and_set_value(Some(raw.as_str())));
        prop_assert_eq!(prop.get(), &value);
    }

    #[test]
    fn parse_reads_back_display(default in any::<i32>(), value in any::<i32>()) {
        let mut prop = StoredProperty::scalar(default).parseable();
        let changed = prop.parse_and_set_value(Some(value.to_string().as_str()));
        prop_assert_eq!(changed, value != default);
        prop_assert_eq!(prop.get(), &value);
    }

    #[test]
    fn flag_parse_never_notifies_on_equal(raw in proptest::option::of("[A-Za-z]{0,5}")) {
        let mut flag = StoredProperty::flag(false);
        let expected = understory_stored::parse_flag(raw.as_deref());
        let changed = flag.parse_and_set_value(raw.as_deref());
        prop_assert_eq!(changed, expected);
        prop_assert_eq!(flag.get(), &expected);
        prop_assert!(!flag.parse_and_set_value(raw.as_deref()));
    }
}
