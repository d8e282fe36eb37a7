use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    Json,
};
use folio_lib::{frontmatter_file::keeper::ArcMutex, single};
use tracing::error;

use super::{lock_keeper, to_json, AppState, Collection};

fn slug_header_value(slug: &str) -> Result<HeaderValue, StatusCode> {
    slug.parse().map_err(|err| {
        error!("Failed to parse slug header value ({slug:?}): {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn assign_headers(
    prev_slug: Option<&str>,
    next_slug: Option<&str>,
) -> Result<HeaderMap, StatusCode> {
    let mut headers = HeaderMap::new();

    if let Some(prev_slug) = prev_slug {
        headers.insert("x-prev-slug", slug_header_value(prev_slug)?);
    }

    if let Some(next_slug) = next_slug {
        headers.insert("x-next-slug", slug_header_value(next_slug)?);
    }

    Ok(headers)
}

fn get_inner<E: Collection>(
    files: &ArcMutex<E>,
    slug: &str,
) -> Result<(HeaderMap, serde_json::Value), StatusCode> {
    let keeper = &*lock_keeper(files)?;
    let entries = keeper.entries();

    let response = single::get(&entries, slug).ok_or(StatusCode::NOT_FOUND)?;

    let headers = assign_headers(response.prev_slug, response.next_slug)?;

    Ok((headers, to_json(&response)?))
}

pub async fn get<E: Collection>(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<(HeaderMap, Json<serde_json::Value>), StatusCode> {
    let (headers, body) = get_inner(E::keeper(&state), &slug)?;

    Ok((headers, Json(body)))
}
