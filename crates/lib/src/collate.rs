use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;
use tracing::debug;

use crate::content::Entry;

/// Case-folding string order, close to what a browser's `localeCompare`
/// gives for the Latin text a portfolio deals in.
///
/// Strings that only differ in case fall back to a raw comparison with
/// lowercase sorting ahead of uppercase.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    let a_folded = a.chars().flat_map(char::to_lowercase);
    let b_folded = b.chars().flat_map(char::to_lowercase);
    a_folded.cmp(b_folded).then_with(|| b.cmp(a))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

fn collate_facets_from_entries<'a, E: Entry + 'a>(
    entries: impl IntoIterator<Item = &'a E>,
) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for facet in entries.into_iter().flat_map(Entry::facets) {
        *counts.entry(facet.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Every distinct facet value across `entries` with the number of entries
/// carrying it, in [`compare`] order.
#[must_use]
pub fn aggregate<'a, E: Entry + 'a>(entries: impl IntoIterator<Item = &'a E>) -> Vec<FacetCount> {
    let mut values = collate_facets_from_entries(entries)
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_owned(),
            count,
        })
        .collect::<Vec<_>>();

    values.sort_by(|a, b| compare(&a.value, &b.value));

    debug!("Collated {} facet values", values.len());

    values
}
