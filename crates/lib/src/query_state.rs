use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use crate::{facet_query::FacetSelection, list::Page, sort::SortKey};

const PAGE_PARAM: &str = "page";
const SORT_PARAM: &str = "sort";

/// How one collection spells its state in a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Route segment, e.g. `blog` for `/blog`.
    pub collection: &'static str,
    pub facet_param: &'static str,
    pub default_sort: SortKey,
    /// Literals accepted for `sort` besides `newest` and `oldest`.
    pub sort_aliases: &'static [(&'static str, SortKey)],
}

impl Schema {
    fn parse_sort(&self, literal: &str) -> Option<SortKey> {
        SortKey::from_literal(literal).or_else(|| {
            self.sort_aliases
                .iter()
                .find(|(alias, _)| *alias == literal)
                .map(|(_, key)| *key)
        })
    }

    /// `/collection`, with `?query` when there is one.
    #[must_use]
    pub fn href(&self, query: &str) -> String {
        if query.is_empty() {
            format!("/{}", self.collection)
        } else {
            format!("/{}?{query}", self.collection)
        }
    }
}

/// Everything a listing request asks for.
///
/// `page` holds the page as requested; whether it exists is up to
/// [`crate::list::paginate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub page: i64,
    pub sort: SortKey,
    pub facets: FacetSelection,
}

impl QueryState {
    #[must_use]
    pub fn new(sort: SortKey) -> Self {
        QueryState {
            page: 1,
            sort,
            facets: FacetSelection::new(),
        }
    }

    #[must_use]
    pub fn with_page(&self, page: i64) -> Self {
        QueryState {
            page,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_sort(&self, sort: SortKey) -> Self {
        QueryState {
            page: 1,
            sort,
            facets: self.facets.clone(),
        }
    }

    #[must_use]
    pub fn with_facets(&self, facets: FacetSelection) -> Self {
        QueryState {
            page: 1,
            sort: self.sort,
            facets,
        }
    }

    #[must_use]
    pub fn toggle_facet(&self, value: &str) -> Self {
        let mut facets = self.facets.clone();
        facets.toggle(value);
        self.with_facets(facets)
    }
}

/// Ordered, multi-valued query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        QueryParams(form_urlencoded::parse(query.as_bytes()).into_owned().collect())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a str> + 'k
    where
        'a: 'k,
    {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Replaces the first `key` in place and drops any later ones, or
    /// appends when `key` is absent.
    pub fn set(&mut self, key: &str, value: String) {
        let mut value = Some(value);
        self.0.retain_mut(|(k, v)| {
            if k.as_str() != key {
                return true;
            }
            match value.take() {
                Some(value) => {
                    *v = value;
                    true
                }
                None => false,
            }
        });
        if let Some(value) = value {
            self.0.push((key.to_owned(), value));
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.0)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub state: QueryState,
    pub canonical_redirect_needed: bool,
    /// The incoming query when it was already acceptable, otherwise the
    /// corrected query to redirect to.
    pub canonical_query: String,
}

/// Integers too large for `i64` saturate, so they still land out of bounds.
fn parse_page(params: &QueryParams) -> i64 {
    let Some(page) = params.get(PAGE_PARAM).map(str::trim) else {
        return 1;
    };
    if let Ok(page) = page.parse() {
        return page;
    }
    let (negative, digits) = match page.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, page.strip_prefix('+').unwrap_or(page)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    if negative {
        i64::MIN
    } else {
        i64::MAX
    }
}

fn parse_facets(params: &QueryParams, facet_param: &str) -> FacetSelection {
    params
        .get_all(facet_param)
        .flat_map(|value| value.split(','))
        .collect()
}

fn segment_key(segment: &str) -> Option<String> {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
}

/// `query` with every `sort` dropped and the default sort appended. The
/// remaining segments are kept byte for byte.
fn with_default_sort(query: &str, default_sort: SortKey) -> String {
    let sort = format!("{SORT_PARAM}={}", default_sort.as_str());
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| segment_key(segment).as_deref() != Some(SORT_PARAM))
        .chain(std::iter::once(sort.as_str()))
        .collect::<Vec<_>>()
        .join("&")
}

#[must_use]
pub fn decode(schema: &Schema, query: &str) -> Decoded {
    let query = query.strip_prefix('?').unwrap_or(query);
    let params = QueryParams::parse(query);

    let page = parse_page(&params);
    let facets = parse_facets(&params, schema.facet_param);
    let (sort, canonical_redirect_needed) = match params.get(SORT_PARAM) {
        None => (schema.default_sort, false),
        Some(literal) => match schema.parse_sort(literal) {
            Some(sort) => (sort, false),
            None => (schema.default_sort, true),
        },
    };

    let canonical_query = if canonical_redirect_needed {
        with_default_sort(query, schema.default_sort)
    } else {
        query.to_owned()
    };

    let decoded = Decoded {
        state: QueryState { page, sort, facets },
        canonical_redirect_needed,
        canonical_query,
    };
    debug!("Decoded {query:?} for {}: {decoded:?}", schema.collection);
    decoded
}

/// Writes `state` over `current`, leaving unrelated parameters alone.
///
/// Page 1 and an empty facet selection are left out. `sort` is written
/// when it isn't the default or `current` already spelled one out.
#[must_use]
pub fn encode(schema: &Schema, state: &QueryState, current: &str) -> String {
    let mut params = QueryParams::parse(current);

    if state.facets.is_empty() {
        params.delete(schema.facet_param);
    } else {
        params.set(schema.facet_param, state.facets.join());
    }

    if state.sort != schema.default_sort || params.contains_key(SORT_PARAM) {
        params.set(SORT_PARAM, state.sort.as_str().to_owned());
    }

    if state.page == 1 {
        params.delete(PAGE_PARAM);
    } else {
        params.set(PAGE_PARAM, state.page.to_string());
    }

    params.to_query_string()
}

#[must_use]
pub fn page_href(schema: &Schema, state: &QueryState, current: &str, page: i64) -> String {
    schema.href(&encode(schema, &state.with_page(page), current))
}

/// One slot of a numbered page strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageItem {
    Page {
        number: i64,
        href: String,
        current: bool,
    },
    Ellipsis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub prev: Option<String>,
    pub next: Option<String>,
    /// First page, the current page with its neighbours, last page, and an
    /// ellipsis wherever pages are skipped. Empty for a single page.
    pub pages: Vec<PageItem>,
}

fn page_strip(total_pages: i64, current_page: i64) -> Vec<Option<i64>> {
    let mut strip = vec![Some(1)];
    if current_page > 3 {
        strip.push(None);
    }
    if current_page > 2 {
        strip.push(Some(current_page - 1));
    }
    if current_page != 1 && current_page != total_pages {
        strip.push(Some(current_page));
    }
    if current_page < total_pages - 1 {
        strip.push(Some(current_page + 1));
    }
    if current_page < total_pages - 2 {
        strip.push(None);
    }
    strip.push(Some(total_pages));
    strip
}

#[must_use]
pub fn page_links<T>(
    schema: &Schema,
    state: &QueryState,
    current: &str,
    page: &Page<T>,
) -> PageLinks {
    if page.out_of_bounds || page.total_pages <= 1 {
        return PageLinks::default();
    }
    let total_pages = i64::try_from(page.total_pages).unwrap_or(i64::MAX);
    let current_page = page.current_page;

    let pages = page_strip(total_pages, current_page)
        .into_iter()
        .map(|slot| match slot {
            Some(number) => PageItem::Page {
                number,
                href: page_href(schema, state, current, number),
                current: number == current_page,
            },
            None => PageItem::Ellipsis,
        })
        .collect();

    PageLinks {
        prev: (current_page > 1).then(|| page_href(schema, state, current, current_page - 1)),
        next: (current_page < total_pages)
            .then(|| page_href(schema, state, current, current_page + 1)),
        pages,
    }
}
