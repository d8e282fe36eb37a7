use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use super::{clean_facets, deserialize_frontmatter, require, Entry, EntryError};
use crate::{query_state::Schema, sort::SortKey};

#[derive(Debug, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// `YYYY-MM-DD` with every field zero-padded.
fn is_padded_date(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub date: String,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub body: String,
}

impl Entry for BlogPost {
    const SCHEMA: Schema = Schema {
        collection: "blog",
        facet_param: "tags",
        default_sort: SortKey::Newest,
        sort_aliases: &[("desc", SortKey::Newest), ("asc", SortKey::Oldest)],
    };

    fn from_frontmatter(
        slug: String,
        frontmatter: Mapping,
        body: String,
    ) -> Result<Self, EntryError> {
        let fm: Frontmatter = deserialize_frontmatter(&slug, frontmatter)?;

        let date = require(&slug, "date", fm.date)?;
        if !is_padded_date(&date) || NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            return Err(EntryError::DateFormat {
                slug,
                field: "date",
                value: date,
            });
        }

        Ok(BlogPost {
            title: require(&slug, "title", fm.title)?,
            summary: require(&slug, "summary", fm.summary)?,
            date,
            tags: clean_facets(fm.tags),
            body,
            slug,
        })
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn facets(&self) -> &[String] {
        &self.tags
    }

    fn sort_date(&self, _key: SortKey) -> Option<&str> {
        Some(&self.date)
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.body
    }
}
