pub mod entry;
pub mod home;
pub mod listing;
pub mod tag;

use std::{num::NonZeroUsize, sync::MutexGuard};

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    routing, Router,
};
use folio_lib::{
    config::{PageSizes, PreviewSizes},
    content::{BlogPost, Entry, Project, WorkItem},
    frontmatter_file::{keeper::ArcMutex, Keeper},
};
use serde::Serialize;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub blog: ArcMutex<BlogPost>,
    pub projects: ArcMutex<Project>,
    pub work: ArcMutex<WorkItem>,
    pub page_sizes: PageSizes,
    pub preview_sizes: PreviewSizes,
}

/// Where a collection lives in [`AppState`].
pub trait Collection: Entry {
    fn keeper(state: &AppState) -> &ArcMutex<Self>;
    fn page_size(page_sizes: &PageSizes) -> NonZeroUsize;
}

impl Collection for BlogPost {
    fn keeper(state: &AppState) -> &ArcMutex<Self> {
        &state.blog
    }

    fn page_size(page_sizes: &PageSizes) -> NonZeroUsize {
        page_sizes.blog
    }
}

impl Collection for Project {
    fn keeper(state: &AppState) -> &ArcMutex<Self> {
        &state.projects
    }

    fn page_size(page_sizes: &PageSizes) -> NonZeroUsize {
        page_sizes.projects
    }
}

impl Collection for WorkItem {
    fn keeper(state: &AppState) -> &ArcMutex<Self> {
        &state.work
    }

    fn page_size(page_sizes: &PageSizes) -> NonZeroUsize {
        page_sizes.work
    }
}

fn lock_keeper<E: Entry>(keeper: &ArcMutex<E>) -> Result<MutexGuard<'_, Keeper<E>>, StatusCode> {
    keeper.lock().map_err(|err| {
        error!("Failed to lock {} data: {err}", E::SCHEMA.collection);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, StatusCode> {
    serde_json::to_value(value).map_err(|err| {
        error!("Failed to serialize response as JSON: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn length_header(length: usize) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert("x-length", HeaderValue::from(length));

    headers
}

fn with_collection<E: Collection>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/{}", E::SCHEMA.collection);
    router
        .route(&base, routing::get(listing::get::<E>))
        .route(&format!("{base}/:slug"), routing::get(entry::get::<E>))
}

pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", routing::get(home::get))
        .route("/blog/tag/:tag", routing::get(tag::get));
    let router = with_collection::<BlogPost>(router);
    let router = with_collection::<Project>(router);
    let router = with_collection::<WorkItem>(router);
    router.with_state(state)
}
