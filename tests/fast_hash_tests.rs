//! Tests for the fast hash feature flags.
//!
//! `fxhash` and `ahash` only change how elements are hashed; every set
//! operation must behave exactly as with the default hasher.

#[cfg(feature = "fxhash")]
mod fxhash {
    use lockset::FxSet;
    use rstest::rstest;

    fn build(values: &[u32]) -> FxSet<u32> {
        values.iter().copied().collect()
    }

    #[rstest]
    fn test_fx_set_basic_operations() {
        let set: FxSet<u32> = FxSet::default();
        set.add([1, 2, 3, 3]);
        assert_eq!(set.size(), 3);
        set.discard([2]);
        assert!(!set.has(&2));
    }

    #[rstest]
    fn test_fx_set_algebra() {
        let set_a = build(&[1, 2, 3]);
        let set_b = build(&[2, 3, 4]);

        assert!(set_a.union(&set_b).equal_to(&build(&[1, 2, 3, 4])));
        assert!(set_a.intersection(&set_b).equal_to(&build(&[2, 3])));
        assert!(set_a.disjoint(&set_b).equal_to(&build(&[1, 4])));
        assert!(set_a.difference(&set_b).equal_to(&build(&[1])));
    }
}

#[cfg(feature = "ahash")]
mod ahash {
    use lockset::AHashSet;
    use rstest::rstest;

    #[rstest]
    fn test_ahash_set_string_keys() {
        let set: AHashSet<String> = ["alpha", "beta", "gamma"]
            .into_iter()
            .map(String::from)
            .collect();

        assert!(set.has("alpha"));
        assert!(!set.has("delta"));
        assert!(set.union(&AHashSet::default()).equal_to(&set));
    }
}

mod default_hasher {
    use lockset::Set;
    use rstest::rstest;

    #[rstest]
    fn test_equal_sets_built_in_different_orders() {
        let forward: Set<String> = ["alpha", "beta", "gamma", "delta"]
            .into_iter()
            .map(String::from)
            .collect();
        let backward: Set<String> = ["delta", "gamma", "beta", "alpha"]
            .into_iter()
            .map(String::from)
            .collect();

        assert!(forward.equal_to(&backward));
    }
}
