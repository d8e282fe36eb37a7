pub mod blog;
pub mod project;
pub mod work;

pub use blog::BlogPost;
pub use project::Project;
pub use work::WorkItem;

use serde::{de::DeserializeOwned, Serialize};
use serde_yaml::Mapping;

use crate::{query_state::Schema, sort::SortKey};

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("Invalid frontmatter in {slug}: {source}")]
    Yaml {
        slug: String,
        source: serde_yaml::Error,
    },
    #[error("Invalid frontmatter in {slug}: {field} is missing or empty")]
    MissingField { slug: String, field: &'static str },
    #[error("Invalid frontmatter in {slug}: {field} must be in YYYY-MM-DD format, got {value:?}")]
    DateFormat {
        slug: String,
        field: &'static str,
        value: String,
    },
}

/// One item of a content collection.
///
/// The engines only ever look at an entry through this trait, so blog
/// posts, projects and work items share a single filter, sort and
/// pagination pipeline.
pub trait Entry: Clone + Serialize + Send + Sync + 'static {
    const SCHEMA: Schema;

    fn from_frontmatter(slug: String, frontmatter: Mapping, body: String)
        -> Result<Self, EntryError>;

    fn slug(&self) -> &str;

    /// Values this entry can be filtered by.
    fn facets(&self) -> &[String];

    /// Raw date string ordering this entry under `key`.
    fn sort_date(&self, key: SortKey) -> Option<&str>;

    /// Text breaking ties between entries with equal dates.
    fn label(&self) -> &str;

    fn body(&self) -> &str;
}

fn deserialize_frontmatter<T: DeserializeOwned>(
    slug: &str,
    frontmatter: Mapping,
) -> Result<T, EntryError> {
    serde_yaml::from_value(serde_yaml::Value::Mapping(frontmatter)).map_err(|source| {
        EntryError::Yaml {
            slug: slug.to_owned(),
            source,
        }
    })
}

fn require(slug: &str, field: &'static str, value: String) -> Result<String, EntryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EntryError::MissingField {
            slug: slug.to_owned(),
            field,
        });
    }
    Ok(value.to_owned())
}

/// Trims facet values, dropping blanks and repeats.
fn clean_facets(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() || cleaned.iter().any(|v| v == value) {
            continue;
        }
        cleaned.push(value.to_owned());
    }
    cleaned
}
