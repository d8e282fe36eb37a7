pub mod keeper;

pub use keeper::Keeper;

use camino::Utf8Path;
use serde_yaml::Mapping;

use crate::content::{Entry, EntryError};

#[derive(Debug, Clone, PartialEq)]
pub struct FrontmatterFile {
    pub frontmatter: Option<Mapping>,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReadFromPathError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse frontmatter of {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("No file stem in {0}")]
    NoFileStem(String),
    #[error("No frontmatter in {0}")]
    MissingFrontmatter(String),
    #[error(transparent)]
    Entry(#[from] EntryError),
}

impl FrontmatterFile {
    pub fn from_string(string: String) -> Result<Self, serde_yaml::Error> {
        if !string.starts_with("---\n") {
            return Ok(FrontmatterFile {
                frontmatter: None,
                body: string,
            });
        }

        let [_, frontmatter, body] = string.splitn(3, "---\n").collect::<Vec<_>>()[..] else {
            return Ok(FrontmatterFile {
                frontmatter: None,
                body: string,
            });
        };

        let frontmatter = if frontmatter.trim().is_empty() {
            Mapping::new()
        } else {
            serde_yaml::from_str(frontmatter)?
        };

        Ok(FrontmatterFile {
            frontmatter: Some(frontmatter),
            body: body.to_owned(),
        })
    }

    pub fn read_from_path(path: &Utf8Path) -> Result<Self, ReadFromPathError> {
        let string = std::fs::read_to_string(path).map_err(|source| ReadFromPathError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_string(string).map_err(|source| ReadFromPathError::Yaml {
            path: path.to_string(),
            source,
        })
    }

    pub fn into_entry<E: Entry>(self, slug: String) -> Result<E, ReadFromPathError> {
        let Some(frontmatter) = self.frontmatter else {
            return Err(ReadFromPathError::MissingFrontmatter(slug));
        };
        Ok(E::from_frontmatter(slug, frontmatter, self.body)?)
    }
}

/// Loads one entry, slugged by the file stem.
pub fn read_entry<E: Entry>(path: &Utf8Path) -> Result<E, ReadFromPathError> {
    let slug = path
        .file_stem()
        .ok_or_else(|| ReadFromPathError::NoFileStem(path.to_string()))?
        .to_owned();
    FrontmatterFile::read_from_path(path)?.into_entry(slug)
}
