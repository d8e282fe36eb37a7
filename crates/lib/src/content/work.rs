use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use super::{clean_facets, deserialize_frontmatter, require, Entry, EntryError};
use crate::{query_state::Schema, sort::SortKey};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    #[serde(default)]
    company: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    locations: Vec<String>,
    logo_url: Option<String>,
    company_url: Option<String>,
    tech_stack: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub slug: String,
    /// Also the only facet a work item is filtered by.
    pub company: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub locations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip)]
    pub body: String,
}

impl Entry for WorkItem {
    const SCHEMA: Schema = Schema {
        collection: "work",
        facet_param: "company",
        default_sort: SortKey::Newest,
        sort_aliases: &[],
    };

    fn from_frontmatter(
        slug: String,
        frontmatter: Mapping,
        body: String,
    ) -> Result<Self, EntryError> {
        let fm: Frontmatter = deserialize_frontmatter(&slug, frontmatter)?;

        Ok(WorkItem {
            company: require(&slug, "company", fm.company)?,
            title: require(&slug, "title", fm.title)?,
            start: require(&slug, "start", fm.start)?,
            end: require(&slug, "end", fm.end)?,
            description: require(&slug, "description", fm.description)?,
            locations: clean_facets(fm.locations),
            logo_url: fm.logo_url,
            company_url: fm.company_url,
            tech_stack: fm.tech_stack.map(clean_facets),
            body,
            slug,
        })
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn facets(&self) -> &[String] {
        std::slice::from_ref(&self.company)
    }

    fn sort_date(&self, key: SortKey) -> Option<&str> {
        match key {
            SortKey::Newest => Some(&self.end),
            SortKey::Oldest => Some(&self.start),
        }
    }

    fn label(&self) -> &str {
        &self.company
    }

    fn body(&self) -> &str {
        &self.body
    }
}
