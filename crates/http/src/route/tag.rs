use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use folio_lib::{content::BlogPost, frontmatter_file::keeper::ArcMutex, related};

use super::{length_header, lock_keeper, to_json, AppState};

fn get_inner(
    files: &ArcMutex<BlogPost>,
    tag: &str,
) -> Result<(HeaderMap, serde_json::Value), StatusCode> {
    let keeper = &*lock_keeper(files)?;
    let entries = keeper.entries();

    let page = related::tagged(&entries, tag);

    let headers = length_header(page.entries.len());

    Ok((headers, to_json(&page)?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<(HeaderMap, Json<serde_json::Value>), StatusCode> {
    let (headers, body) = get_inner(&state.blog, &tag)?;

    Ok((headers, Json(body)))
}
