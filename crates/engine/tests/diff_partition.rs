// Property tests for registry classification.
//
// For arbitrary source and destination registries, the classification must
// partition the source keys and report exactly the destination-only keys as
// deletable.

use std::collections::BTreeSet;

use compress::Compressor;
use engine::{Registry, diff};
use proptest::prelude::*;
use walk::Timestamp;

fn registry_strategy() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(("[a-e]{1,2}(/[a-e]{1,2})?", 0i64..4), 0..24)
}

fn build(codec: Compressor, entries: &[(String, i64)]) -> Registry {
    Registry::from_entries(
        codec,
        entries
            .iter()
            .map(|(key, seconds)| (key.clone(), Timestamp::from_parts(*seconds, 0))),
    )
}

proptest! {
    #[test]
    fn classification_partitions_source_keys(
        source in registry_strategy(),
        destination in registry_strategy(),
    ) {
        let source = build(Compressor::None, &source);
        let destination = build(Compressor::Gzip, &destination);
        let classification = diff(&source, &destination);

        let new: BTreeSet<_> = classification.new_keys().iter().map(String::as_str).collect();
        let updated: BTreeSet<_> = classification.updated().iter().map(String::as_str).collect();
        let unchanged: BTreeSet<_> = classification.unchanged().iter().map(String::as_str).collect();
        let deletable: BTreeSet<_> = classification.deletable().iter().map(String::as_str).collect();

        prop_assert!(new.is_disjoint(&updated));
        prop_assert!(new.is_disjoint(&unchanged));
        prop_assert!(updated.is_disjoint(&unchanged));

        let union: BTreeSet<_> = new.iter().chain(&updated).chain(&unchanged).copied().collect();
        let source_keys: BTreeSet<_> = source.keys().collect();
        prop_assert_eq!(&union, &source_keys);

        let expected_deletable: BTreeSet<_> =
            destination.keys().filter(|key| !source.contains(key)).collect();
        prop_assert_eq!(deletable, expected_deletable);

        for key in &unchanged {
            prop_assert_eq!(source.get(key), destination.get(key));
        }
        for key in &updated {
            prop_assert_ne!(source.get(key), destination.get(key));
            prop_assert!(destination.contains(key));
        }
    }

    #[test]
    fn diff_against_itself_is_all_unchanged(entries in registry_strategy()) {
        let registry = build(Compressor::Gzip, &entries);
        let classification = diff(&registry, &registry);

        prop_assert_eq!(classification.unchanged().len(), registry.len());
        prop_assert!(classification.new_keys().is_empty());
        prop_assert!(classification.updated().is_empty());
        prop_assert!(classification.deletable().is_empty());
    }
}
