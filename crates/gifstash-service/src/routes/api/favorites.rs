use axum::{
    Router,
    extract::{Json, Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::ApiError;
use crate::favorites::FavoritesService;
use crate::identity::IdentityResolver;
use crate::models::{Favorite, NewFavorite};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddFavoriteRequest {
    gif_id: String,
    gif_url: String,
    #[serde(default)]
    gif_title: Option<String>,
    thumbnail_url: String,
}

#[derive(Debug, Serialize)]
struct FavoriteEnvelope {
    favorite: Favorite,
}

#[derive(Debug, Serialize)]
struct FavoritesEnvelope {
    favorites: Vec<Favorite>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckResponse {
    is_favorite: bool,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[instrument(skip_all)]
async fn list_favorites<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<FavoritesEnvelope>, ApiError> {
    let user = state.identity().current_user().await?;
    let favorites = FavoritesService::new(state.favorite_repo())
        .get_all(user.id)
        .await?;

    info!(count = favorites.len(), "Listed favorites");
    Ok(ResponseJson(FavoritesEnvelope { favorites }))
}

#[instrument(skip_all, fields(gif_id = %payload.gif_id, has_title = payload.gif_title.is_some()))]
async fn add_favorite<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<AddFavoriteRequest>,
) -> Result<(StatusCode, ResponseJson<FavoriteEnvelope>), ApiError> {
    debug!("Processing add favorite request");

    let user = state.identity().current_user().await?;
    let new_favorite = NewFavorite::new(
        user.id,
        payload.gif_id,
        payload.gif_url,
        payload.gif_title,
        payload.thumbnail_url,
    )?;

    let favorite = FavoritesService::new(state.favorite_repo())
        .add(new_favorite)
        .await?;

    info!(id = favorite.id, gif_id = %favorite.gif_id, "Favorite saved");
    Ok((
        StatusCode::CREATED,
        ResponseJson(FavoriteEnvelope { favorite }),
    ))
}

#[instrument(skip_all, fields(gif_id = %gif_id))]
async fn remove_favorite<S: AppState>(
    State(state): State<S>,
    Path(gif_id): Path<String>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let user = state.identity().current_user().await?;
    let removed = FavoritesService::new(state.favorite_repo())
        .remove(user.id, &gif_id)
        .await?;

    if !removed {
        debug!("Favorite not found");
        return Err(ApiError::NotFound);
    }

    info!("Favorite removed");
    Ok(ResponseJson(MessageResponse {
        message: "Favorite removed".to_string(),
    }))
}

#[instrument(skip_all, fields(gif_id = %gif_id))]
async fn check_favorite<S: AppState>(
    State(state): State<S>,
    Path(gif_id): Path<String>,
) -> Result<ResponseJson<CheckResponse>, ApiError> {
    let user = state.identity().current_user().await?;
    let is_favorite = FavoritesService::new(state.favorite_repo())
        .is_favorite(user.id, &gif_id)
        .await?;

    Ok(ResponseJson(CheckResponse { is_favorite }))
}

pub fn create_favorites_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/", get(list_favorites::<S>).post(add_favorite::<S>))
        .route("/{gifId}", delete(remove_favorite::<S>))
        .route("/check/{gifId}", get(check_favorite::<S>))
}
