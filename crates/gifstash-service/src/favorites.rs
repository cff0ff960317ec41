use crate::errors::ApiError;
use crate::models::{Favorite, NewFavorite};
use crate::repositories::FavoriteRepository;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, info};

/// Application-level favorites operations on top of the store.
///
/// `add` is idempotent and `remove` reports absence as a value; the unique
/// constraint underneath closes the check-then-insert race.
#[derive(Clone)]
pub struct FavoritesService<R: FavoriteRepository> {
    repo: R,
}

impl<R: FavoriteRepository> FavoritesService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self, user_id: i32) -> Result<Vec<Favorite>, ApiError> {
        self.repo.list(user_id).await
    }

    /// Saves a favorite, returning the existing row unchanged when the user
    /// has already favorited this GIF.
    pub async fn add(&self, favorite: NewFavorite) -> Result<Favorite, ApiError> {
        if let Some(existing) = self.repo.find(favorite.user_id, &favorite.gif_id).await? {
            debug!(gif_id = %favorite.gif_id, "Favorite already exists, returning existing row");
            return Ok(existing);
        }

        match self.repo.create(&favorite).await {
            Ok(created) => {
                info!(id = created.id, gif_id = %created.gif_id, "Favorite created");
                Ok(created)
            }
            Err(err) => {
                // A concurrent add can win between the check and the insert;
                // the constraint violation then means "already exists".
                if is_unique_violation(&err) {
                    if let Some(existing) =
                        self.repo.find(favorite.user_id, &favorite.gif_id).await?
                    {
                        return Ok(existing);
                    }
                }
                Err(err)
            }
        }
    }

    /// Returns whether a favorite was actually removed; removing a GIF that
    /// was never favorited is not an error.
    pub async fn remove(&self, user_id: i32, gif_id: &str) -> Result<bool, ApiError> {
        self.repo.delete(user_id, gif_id).await
    }

    pub async fn is_favorite(&self, user_id: i32, gif_id: &str) -> Result<bool, ApiError> {
        Ok(self.repo.find(user_id, gif_id).await?.is_some())
    }
}

fn is_unique_violation(err: &ApiError) -> bool {
    matches!(
        err,
        ApiError::Database(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _
        ))
    )
}
