use serde::Serialize;
use tracing::debug;

use crate::{
    content::Entry,
    sort::{self, SortKey},
};

/// A collection's size and its newest few entries, for the landing page.
#[derive(Debug, Serialize)]
pub struct Preview<'a, E> {
    pub count: usize,
    pub recent: Vec<&'a E>,
}

#[must_use]
pub fn preview<'a, E: Entry>(entries: &[&'a E], max: usize) -> Preview<'a, E> {
    let mut recent = sort::sort(entries, SortKey::Newest);
    recent.truncate(max);

    debug!(
        "Previewing {} of {} {} entries",
        recent.len(),
        entries.len(),
        E::SCHEMA.collection
    );

    Preview {
        count: entries.len(),
        recent,
    }
}
