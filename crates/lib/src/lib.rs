#![allow(clippy::missing_errors_doc)]

pub mod collate;
pub mod config;
pub mod content;
pub mod facet_query;
pub mod frontmatter_file;
mod fs;
pub mod home;
pub mod list;
pub mod query_state;
pub mod related;
pub mod single;
pub mod sort;
