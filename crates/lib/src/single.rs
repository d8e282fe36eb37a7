use serde::Serialize;
use tracing::debug;

use crate::{
    content::Entry,
    related,
    sort::{self, SortKey},
};

fn find_entry_and_index<'a, E: Entry>(entries: &[&'a E], slug: &str) -> Option<(usize, &'a E)> {
    entries
        .iter()
        .enumerate()
        .find(|(_, entry)| entry.slug() == slug)
        .map(|(i, entry)| (i, *entry))
}

fn get_prev_and_next_slugs<'a, E: Entry>(
    entries: &[&'a E],
    i: usize,
) -> (Option<&'a str>, Option<&'a str>) {
    let prev_slug = i
        .checked_sub(1)
        .and_then(|prev| entries.get(prev))
        .map(|entry| entry.slug());
    let next_slug = entries.get(i + 1).map(|entry| entry.slug());
    (prev_slug, next_slug)
}

#[derive(Debug, Serialize)]
pub struct Response<'a, E> {
    pub entry: &'a E,
    pub body: &'a str,
    /// Neighbour on the newer side.
    pub prev_slug: Option<&'a str>,
    /// Neighbour on the older side.
    pub next_slug: Option<&'a str>,
    pub similar: Vec<&'a E>,
}

/// Looks `slug` up in the newest-first order of `entries`.
#[must_use]
pub fn get<'a, E: Entry>(entries: &[&'a E], slug: &str) -> Option<Response<'a, E>> {
    let newest = sort::sort(entries, SortKey::Newest);

    let Some((i, entry)) = find_entry_and_index(&newest, slug) else {
        debug!("No {} entry named {slug:?}", E::SCHEMA.collection);
        return None;
    };

    let (prev_slug, next_slug) = get_prev_and_next_slugs(&newest, i);

    Some(Response {
        entry,
        body: entry.body(),
        prev_slug,
        next_slug,
        similar: related::similar(&newest, slug, related::DEFAULT_MAX),
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::content::{Entry, WorkItem};

    macro_rules! work {
        ($slug:literal, $company:literal, $end:literal) => {
            WorkItem {
                slug: $slug.to_owned(),
                company: $company.to_owned(),
                title: "Engineer".to_owned(),
                start: "2015-01-01".to_owned(),
                end: $end.to_owned(),
                description: String::new(),
                locations: vec![],
                logo_url: None,
                company_url: None,
                tech_stack: None,
                body: format!("All about {}", $slug),
            }
        };
    }

    fn make_test_entries() -> Vec<WorkItem> {
        vec![
            work!("middle", "Acme", "2020-01-01"),
            work!("current", "Initech", "Present"),
            work!("first", "Acme", "2017-06-01"),
        ]
    }

    #[test]
    fn get() {
        let items = make_test_entries();
        let refs = items.iter().collect::<Vec<_>>();

        let response = super::get(&refs, "current").unwrap();
        assert_eq!(None, response.prev_slug);
        assert_eq!(Some("middle"), response.next_slug);
        assert!(response.similar.is_empty());

        let response = super::get(&refs, "middle").unwrap();
        assert_eq!(Some("current"), response.prev_slug);
        assert_eq!(Some("first"), response.next_slug);
        assert_eq!("All about middle", response.body);
        assert_eq!(
            vec!["first"],
            response.similar.iter().map(|e| e.slug()).collect::<Vec<_>>()
        );

        let response = super::get(&refs, "first").unwrap();
        assert_eq!(Some("middle"), response.prev_slug);
        assert_eq!(None, response.next_slug);
    }

    #[test]
    fn unknown_slug() {
        let items = make_test_entries();
        let refs = items.iter().collect::<Vec<_>>();

        assert!(super::get(&refs, "nowhere").is_none());
    }
}
