use crate::errors::ApiError;
use crate::models::{Favorite, NewFavorite, NewUser, User};
use async_trait::async_trait;

/// Durable, user-scoped store of saved GIF references.
///
/// Uniqueness of `(user_id, gif_id)` and cascade deletion with the owning
/// user are enforced by the schema, not by callers.
#[async_trait]
pub trait FavoriteRepository: Clone + Send + Sync + 'static {
    /// All favorites for a user, oldest first.
    async fn list(&self, user_id: i32) -> Result<Vec<Favorite>, ApiError>;
    async fn find(&self, user_id: i32, gif_id: &str) -> Result<Option<Favorite>, ApiError>;
    /// Inserts a new row; a duplicate `(user_id, gif_id)` surfaces as a
    /// database error that the service layer resolves to the existing row.
    async fn create(&self, favorite: &NewFavorite) -> Result<Favorite, ApiError>;
    /// Returns whether a row was actually removed.
    async fn delete(&self, user_id: i32, gif_id: &str) -> Result<bool, ApiError>;
}

#[async_trait]
pub trait UserRepository: Clone + Send + Sync + 'static {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
}
