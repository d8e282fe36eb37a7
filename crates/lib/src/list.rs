use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::debug;

use crate::{
    collate::{self, FacetCount},
    content::Entry,
    facet_query,
    query_state::{self, PageLinks, QueryState},
    sort,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: i64,
    pub total_pages: usize,
    /// The requested page doesn't exist; show a not-found state rather
    /// than an empty or clamped page.
    pub out_of_bounds: bool,
}

/// Slices out 1-based page `requested_page`.
///
/// An empty `items` has zero pages, and any positive page of it is an
/// empty, in-bounds page.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page_size: NonZeroUsize, requested_page: i64) -> Page<T> {
    let page_size = page_size.get();
    let total_pages = items.len().div_ceil(page_size);

    let beyond_last = usize::try_from(requested_page).map_or(true, |page| page > total_pages);
    if requested_page < 1 || (total_pages > 0 && beyond_last) {
        return Page {
            items: Vec::new(),
            current_page: requested_page,
            total_pages,
            out_of_bounds: true,
        };
    }

    let offset = usize::try_from(requested_page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(page_size);

    Page {
        items: items.iter().skip(offset).take(page_size).cloned().collect(),
        current_page: requested_page,
        total_pages,
        out_of_bounds: false,
    }
}

#[derive(Debug, Serialize)]
pub struct Listing<'a, E> {
    /// Counted over the whole collection, not just the matches.
    pub facets: Vec<FacetCount>,
    pub state: QueryState,
    pub total_matches: usize,
    #[serde(flatten)]
    pub page: Page<&'a E>,
    pub links: PageLinks,
}

/// Runs a collection through filter, sort and pagination for `state`.
///
/// `current_query` is the raw query string the state was decoded from;
/// the page links keep whatever else it carries.
#[must_use]
pub fn query<'a, E: Entry>(
    entries: &[&'a E],
    state: &QueryState,
    page_size: NonZeroUsize,
    current_query: &str,
) -> Listing<'a, E> {
    debug!("Received list query for {}: {state:?}", E::SCHEMA.collection);

    let filtered = facet_query::filter(entries, &state.facets);
    let sorted = sort::sort(&filtered, state.sort);
    let facets = collate::aggregate(entries.iter().copied());
    let page = paginate(&sorted, page_size, state.page);
    let links = query_state::page_links(&E::SCHEMA, state, current_query, &page);

    debug!(
        "Listing page {} of {} ({} matches, out of bounds: {})",
        page.current_page,
        page.total_pages,
        sorted.len(),
        page.out_of_bounds
    );

    Listing {
        facets,
        state: state.clone(),
        total_matches: sorted.len(),
        page,
        links,
    }
}
