use axum::{extract::State, http::StatusCode, Json};
use folio_lib::{
    config::PreviewSizes, content::Entry, frontmatter_file::keeper::ArcMutex, home,
};
use serde_json::json;

use super::{lock_keeper, to_json, AppState};

fn section<E: Entry>(files: &ArcMutex<E>, max: usize) -> Result<serde_json::Value, StatusCode> {
    let keeper = &*lock_keeper(files)?;
    let entries = keeper.entries();

    to_json(&home::preview(&entries, max))
}

fn get_inner(state: &AppState, sizes: PreviewSizes) -> Result<serde_json::Value, StatusCode> {
    Ok(json!({
        "blog": section(&state.blog, sizes.blog)?,
        "projects": section(&state.projects, sizes.projects)?,
        "work": section(&state.work, sizes.work)?,
    }))
}

pub async fn get(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    get_inner(&state, state.preview_sizes).map(Json)
}
