use axum::Router;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

pub mod errors;
pub mod favorites;
pub mod giphy;
pub mod identity;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod shutdown;
pub mod validation;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use giphy::GifProvider;
use identity::{DemoIdentity, IdentityResolver};
use repositories::{FavoriteRepository, SqliteFavoriteRepository, SqliteUserRepository};

/// Accessors handlers need from shared application state.
pub trait AppState: Clone + Send + Sync + 'static {
    type Favorites: FavoriteRepository;
    type Identity: IdentityResolver;

    fn favorite_repo(&self) -> Self::Favorites;
    fn identity(&self) -> Self::Identity;
    fn gif_provider(&self) -> Arc<dyn GifProvider>;
}

#[derive(Clone)]
pub struct DefaultAppState {
    db: Arc<Mutex<SqliteConnection>>,
    gifs: Arc<dyn GifProvider>,
}

impl DefaultAppState {
    pub fn new(db: Arc<Mutex<SqliteConnection>>, gifs: Arc<dyn GifProvider>) -> Self {
        Self { db, gifs }
    }
}

impl AppState for DefaultAppState {
    type Favorites = SqliteFavoriteRepository;
    type Identity = DemoIdentity<SqliteUserRepository>;

    fn favorite_repo(&self) -> Self::Favorites {
        SqliteFavoriteRepository::new(self.db.clone())
    }

    fn identity(&self) -> Self::Identity {
        DemoIdentity::new(SqliteUserRepository::new(self.db.clone()))
    }

    fn gif_provider(&self) -> Arc<dyn GifProvider> {
        self.gifs.clone()
    }
}

pub fn create_app(state: DefaultAppState) -> Router {
    routes::create_router().with_state(state)
}
