use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::{
    content::Entry,
    sort::{self, SortKey},
};

pub const DEFAULT_MAX: usize = 3;

/// Other entries sharing at least one facet value with `slug`, in the order
/// given.
#[must_use]
pub fn similar<'a, E: Entry>(entries: &[&'a E], slug: &str, max: usize) -> Vec<&'a E> {
    let Some(current) = entries.iter().find(|entry| entry.slug() == slug) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter(|entry| entry.slug() != slug)
        .filter(|entry| entry.facets().iter().any(|f| current.facets().contains(f)))
        .take(max)
        .copied()
        .collect()
}

fn bigrams(s: &str) -> Vec<(char, char)> {
    let chars = s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Dice similarity of the lowercased character pairs of `a` and `b`,
/// from 0 (nothing shared) to 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let pairs_a = bigrams(a);
    let pairs_b = bigrams(b);
    let total = pairs_a.len() + pairs_b.len();
    if total == 0 {
        return 0.0;
    }
    let set_b = pairs_b.iter().collect::<HashSet<_>>();
    let matches = pairs_a.iter().filter(|pair| set_b.contains(pair)).count();

    (2 * matches) as f64 / total as f64
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion<'a, E> {
    pub entry: &'a E,
    pub score: f64,
    /// The facet value of `entry` closest to the target.
    pub facet: &'a str,
}

/// Entries that don't carry `target`, ranked by how close their nearest
/// facet value is to it.
#[must_use]
pub fn closest<'a, E: Entry>(
    entries: &[&'a E],
    target: &str,
    max: usize,
) -> Vec<Suggestion<'a, E>> {
    let mut suggestions = entries
        .iter()
        .filter(|entry| !entry.facets().iter().any(|f| f == target))
        .filter_map(|&entry| {
            let mut best: Option<Suggestion<'a, E>> = None;
            for facet in entry.facets() {
                let score = dice_coefficient(facet, target);
                if score > best.as_ref().map_or(0.0, |b| b.score) {
                    best = Some(Suggestion {
                        entry,
                        score,
                        facet,
                    });
                }
            }
            best
        })
        .collect::<Vec<_>>();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(max);
    suggestions
}

#[derive(Debug, Serialize)]
pub struct TagPage<'a, E> {
    pub tag: String,
    pub entries: Vec<&'a E>,
    /// Worth showing when `entries` is empty.
    pub suggestions: Vec<Suggestion<'a, E>>,
}

#[must_use]
pub fn tagged<'a, E: Entry>(entries: &[&'a E], tag: &str) -> TagPage<'a, E> {
    let tag = tag.trim();
    let newest = sort::sort(entries, SortKey::Newest);

    let matching = newest
        .iter()
        .filter(|entry| entry.facets().iter().any(|f| f == tag))
        .copied()
        .collect::<Vec<_>>();
    let suggestions = closest(&newest, tag, DEFAULT_MAX);

    debug!(
        "Tag {tag:?} matched {} entries with {} suggestions",
        matching.len(),
        suggestions.len()
    );

    TagPage {
        tag: tag.to_owned(),
        entries: matching,
        suggestions,
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{closest, dice_coefficient, similar, tagged, DEFAULT_MAX};
    use crate::content::{BlogPost, Entry};

    macro_rules! post {
        ($slug:literal, $date:literal, [$($tag:literal),*]) => {
            BlogPost {
                slug: $slug.to_owned(),
                title: $slug.to_uppercase(),
                summary: String::new(),
                date: $date.to_owned(),
                tags: vec![$($tag.to_owned()),*],
                body: String::new(),
            }
        };
    }

    fn slugs<E: Entry>(entries: &[&E]) -> Vec<String> {
        entries.iter().map(|e| e.slug().to_owned()).collect()
    }

    #[test]
    fn dice() {
        assert_eq!(0.0, dice_coefficient("", "rust"));
        assert_eq!(0.0, dice_coefficient("rust", ""));
        assert_eq!(1.0, dice_coefficient("a", "a"));
        assert_eq!(0.0, dice_coefficient("a", "b"));
        assert_eq!(1.0, dice_coefficient("Rust", "rust"));
        assert_eq!(0.0, dice_coefficient("abc", "xyz"));
        // night: ni ig gh ht, nacht: na ac ch ht
        assert_eq!(0.25, dice_coefficient("night", "nacht"));
    }

    #[test]
    fn similar_shares_a_facet() {
        let posts = [
            post!("a", "2024-04-01", ["rust", "web"]),
            post!("b", "2024-03-01", ["go"]),
            post!("c", "2024-02-01", ["web"]),
            post!("d", "2024-01-01", ["rust"]),
            post!("e", "2023-12-01", ["rust"]),
            post!("f", "2023-11-01", ["rust"]),
        ];
        let refs = posts.iter().collect::<Vec<_>>();

        assert_eq!(vec!["c", "d", "e"], slugs(&similar(&refs, "a", DEFAULT_MAX)));
        assert_eq!(vec!["a"], slugs(&similar(&refs, "c", DEFAULT_MAX)));
        assert!(similar(&refs, "b", DEFAULT_MAX).is_empty());
        assert!(similar(&refs, "missing", DEFAULT_MAX).is_empty());
    }

    #[test]
    fn closest_ranks_by_best_facet() {
        let posts = [
            post!("a", "2024-01-01", ["python"]),
            post!("b", "2024-01-01", ["rusty", "zzz"]),
            post!("c", "2024-01-01", ["rust"]),
            post!("d", "2024-01-01", ["trust"]),
        ];
        let refs = posts.iter().collect::<Vec<_>>();

        let suggestions = closest(&refs, "rust", DEFAULT_MAX);
        let ranked = suggestions
            .iter()
            .map(|s| (s.entry.slug(), s.facet))
            .collect::<Vec<_>>();

        // rust: ru us st; rusty adds ty (6/7), trust adds tr (6/7)
        assert_eq!(vec![("b", "rusty"), ("d", "trust")], ranked);
    }

    #[test]
    fn tag_lookup() {
        let posts = [
            post!("old", "2023-01-01", ["rust"]),
            post!("new", "2024-01-01", ["rust", "wasm"]),
            post!("other", "2024-02-01", ["rusty"]),
        ];
        let refs = posts.iter().collect::<Vec<_>>();

        let page = tagged(&refs, "rust");
        assert_eq!(vec!["new", "old"], slugs(&page.entries));
        assert_eq!(1, page.suggestions.len());
    }

    #[test]
    fn tag_lookup_is_exact_with_fuzzy_suggestions() {
        let posts = [post!("a", "2024-01-01", ["Rust"])];
        let refs = posts.iter().collect::<Vec<_>>();

        let page = tagged(&refs, "rust");
        assert!(page.entries.is_empty());
        assert_eq!("Rust", page.suggestions[0].facet);
        assert_eq!(1.0, page.suggestions[0].score);
    }
}
