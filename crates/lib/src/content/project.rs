use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use super::{clean_facets, deserialize_frontmatter, require, Entry, EntryError};
use crate::{query_state::Schema, sort::SortKey};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    #[serde(default)]
    title: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    tech_stack: Vec<String>,
    team_size: Option<u32>,
    role: Option<String>,
    github_url: Option<String>,
    paper_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub image: String,
    pub description: String,
    pub start_date: String,
    /// A date, or an ongoing marker such as `Present`.
    pub end_date: String,
    pub tech_stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_url: Option<String>,
    #[serde(skip)]
    pub body: String,
}

impl Entry for Project {
    const SCHEMA: Schema = Schema {
        collection: "projects",
        facet_param: "tech",
        default_sort: SortKey::Newest,
        sort_aliases: &[],
    };

    fn from_frontmatter(
        slug: String,
        frontmatter: Mapping,
        body: String,
    ) -> Result<Self, EntryError> {
        let fm: Frontmatter = deserialize_frontmatter(&slug, frontmatter)?;

        Ok(Project {
            title: require(&slug, "title", fm.title)?,
            image: require(&slug, "image", fm.image)?,
            description: require(&slug, "description", fm.description)?,
            start_date: require(&slug, "startDate", fm.start_date)?,
            end_date: require(&slug, "endDate", fm.end_date)?,
            tech_stack: clean_facets(fm.tech_stack),
            team_size: fm.team_size,
            role: fm.role,
            github_url: fm.github_url,
            paper_url: fm.paper_url,
            body,
            slug,
        })
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn facets(&self) -> &[String] {
        &self.tech_stack
    }

    fn sort_date(&self, key: SortKey) -> Option<&str> {
        match key {
            SortKey::Newest => Some(&self.end_date),
            SortKey::Oldest => Some(&self.start_date),
        }
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.body
    }
}
