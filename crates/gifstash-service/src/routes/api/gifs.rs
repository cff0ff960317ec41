use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::errors::ApiError;
use crate::giphy::SearchPage;
use crate::validation;
use crate::{AppState, giphy::GifProvider};

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TrendingQuery {
    limit: Option<u32>,
    offset: Option<u32>,
}

#[instrument(skip_all, fields(limit = query.limit, offset = query.offset))]
async fn search_gifs<S: AppState>(
    State(state): State<S>,
    Query(query): Query<SearchQuery>,
) -> Result<ResponseJson<SearchPage>, ApiError> {
    debug!("Processing GIF search request");

    let term = validation::validate_search_term(query.q.as_deref().unwrap_or(""))?;
    let page = validation::validate_page(query.limit, query.offset)?;

    let result = state.gif_provider().search(term, page).await?;

    info!(
        term,
        returned_count = result.items.len(),
        total = result.total_count,
        "GIF search complete"
    );

    Ok(ResponseJson(result))
}

#[instrument(skip_all, fields(limit = query.limit, offset = query.offset))]
async fn trending_gifs<S: AppState>(
    State(state): State<S>,
    Query(query): Query<TrendingQuery>,
) -> Result<ResponseJson<SearchPage>, ApiError> {
    debug!("Processing trending GIFs request");

    let page = validation::validate_page(query.limit, query.offset)?;
    let result = state.gif_provider().trending(page).await?;

    info!(
        returned_count = result.items.len(),
        total = result.total_count,
        "Trending fetch complete"
    );

    Ok(ResponseJson(result))
}

pub fn create_gifs_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/search", get(search_gifs::<S>))
        .route("/trending", get(trending_gifs::<S>))
}
