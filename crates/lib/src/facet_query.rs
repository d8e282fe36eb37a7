use serde::Serialize;

use crate::content::Entry;

/// Facet values picked by the visitor, in the order they were picked.
///
/// Values are trimmed on the way in; blanks and repeats are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetSelection(Vec<String>);

impl FacetSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the value was added.
    pub fn insert(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.contains(value) {
            return false;
        }
        self.0.push(value.to_owned());
        true
    }

    pub fn remove(&mut self, value: &str) -> bool {
        let len = self.0.len();
        self.0.retain(|v| v != value.trim());
        self.0.len() != len
    }

    pub fn toggle(&mut self, value: &str) {
        if !self.remove(value) {
            self.insert(value);
        }
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        let value = value.trim();
        self.0.iter().any(|v| v == value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Comma-joined, as carried in a query string.
    #[must_use]
    pub fn join(&self) -> String {
        self.0.join(",")
    }

    /// An empty selection intersects with everything; otherwise at least
    /// one selected value must be among `facets`.
    #[must_use]
    pub fn is_intersect(&self, facets: &[String]) -> bool {
        if self.is_empty() {
            return true;
        }
        self.0.iter().any(|s| facets.contains(s))
    }
}

impl<'a> FromIterator<&'a str> for FacetSelection {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut selection = Self::new();
        for value in iter {
            selection.insert(value);
        }
        selection
    }
}

/// Entries carrying any of the selected facets, in their original order.
#[must_use]
pub fn filter<'a, E: Entry>(entries: &[&'a E], selection: &FacetSelection) -> Vec<&'a E> {
    entries
        .iter()
        .filter(|entry| selection.is_intersect(entry.facets()))
        .copied()
        .collect()
}
