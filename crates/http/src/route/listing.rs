use std::num::NonZeroUsize;

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use folio_lib::{frontmatter_file::keeper::ArcMutex, list, query_state};
use serde_json::json;
use tracing::debug;

use super::{length_header, lock_keeper, to_json, AppState, Collection};

#[derive(Debug)]
pub enum ListingResponse {
    /// Location of the canonical URL.
    Redirect(String),
    NotFound(serde_json::Value),
    Found {
        headers: HeaderMap,
        body: serde_json::Value,
    },
}

impl IntoResponse for ListingResponse {
    fn into_response(self) -> Response {
        match self {
            ListingResponse::Redirect(location) => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
            ListingResponse::NotFound(body) => (StatusCode::NOT_FOUND, Json(body)).into_response(),
            ListingResponse::Found { headers, body } => (headers, Json(body)).into_response(),
        }
    }
}

fn get_inner<E: Collection>(
    files: &ArcMutex<E>,
    page_size: NonZeroUsize,
    query: Option<&str>,
) -> Result<ListingResponse, StatusCode> {
    let query = query.unwrap_or_default();
    let decoded = query_state::decode(&E::SCHEMA, query);

    if decoded.canonical_redirect_needed {
        let location = E::SCHEMA.href(&decoded.canonical_query);
        debug!("Redirecting {query:?} to {location}");
        return Ok(ListingResponse::Redirect(location));
    }

    let keeper = &*lock_keeper(files)?;
    let entries = keeper.entries();

    let listing = list::query(&entries, &decoded.state, page_size, &decoded.canonical_query);

    if listing.page.out_of_bounds {
        return Ok(ListingResponse::NotFound(json!({
            "error": "not found",
            "collection": E::SCHEMA.collection,
            "current_page": listing.page.current_page,
            "total_pages": listing.page.total_pages,
            "home": E::SCHEMA.href(""),
        })));
    }

    Ok(ListingResponse::Found {
        headers: length_header(listing.total_matches),
        body: to_json(&listing)?,
    })
}

pub async fn get<E: Collection>(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<ListingResponse, StatusCode> {
    get_inner(
        E::keeper(&state),
        E::page_size(&state.page_sizes),
        query.as_deref(),
    )
}
