//! Property tests for catalog filtering.

use std::collections::BTreeMap;

use horizon_icons::{IconCatalog, IconEntry};
use proptest::prelude::*;

fn catalog_strategy() -> impl Strategy<Value = IconCatalog> {
    prop::collection::btree_map(
        "[a-z][a-z0-9-]{0,12}",
        prop::collection::vec("[A-Za-z]{1,8}", 0..4),
        0..40,
    )
    .prop_map(|map: BTreeMap<String, Vec<String>>| {
        IconCatalog::from_entries(map.into_iter().map(|(name, tags)| IconEntry::new(name, tags)))
            .expect("generated names are valid")
    })
}

fn composite(entry: &IconEntry) -> String {
    std::iter::once(entry.name.as_str())
        .chain(entry.tags.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

proptest! {
    #[test]
    fn filter_is_an_ordered_subset(catalog in catalog_strategy(), query in "[a-zA-Z -]{0,4}") {
        let names: Vec<&str> = catalog.names().collect();
        let matches = catalog.filter(&query);

        let mut cursor = names.iter();
        for name in &matches {
            prop_assert!(cursor.any(|n| n == name), "{name} out of order or missing");
        }
    }

    #[test]
    fn filter_matches_exactly_the_composite_substrings(
        catalog in catalog_strategy(),
        query in "[a-zA-Z]{1,3}",
    ) {
        let needle = query.trim().to_lowercase();
        let expected: Vec<&str> = catalog
            .entries()
            .iter()
            .filter(|e| composite(e).contains(&needle))
            .map(|e| e.name.as_str())
            .collect();
        prop_assert_eq!(catalog.filter(&query), expected);
    }

    #[test]
    fn blank_query_returns_everything(catalog in catalog_strategy(), spaces in " {0,3}") {
        let names: Vec<&str> = catalog.names().collect();
        prop_assert_eq!(catalog.filter(&spaces), names);
    }
}
