use crate::AppState;
use axum::Router;

pub mod favorites;
pub mod gifs;

pub fn create_api_router<S: AppState>() -> Router<S> {
    Router::new()
        .nest("/gifs", gifs::create_gifs_router())
        .nest("/favorites", favorites::create_favorites_router())
}
