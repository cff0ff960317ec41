use super::traits::FavoriteRepository;
use crate::errors::ApiError;
use crate::models::{Favorite, NewFavorite};
use crate::schema::favorites;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SqliteFavoriteRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteFavoriteRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepository for SqliteFavoriteRepository {
    async fn list(&self, user_id: i32) -> Result<Vec<Favorite>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .order((favorites::created_at.asc(), favorites::id.asc()))
            .load::<Favorite>(&mut *conn)?;
        Ok(result)
    }

    async fn find(&self, user_id: i32, gif_id: &str) -> Result<Option<Favorite>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::gif_id.eq(gif_id))
            .first::<Favorite>(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn create(&self, favorite: &NewFavorite) -> Result<Favorite, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::insert_into(favorites::table)
            .values(favorite)
            .returning(favorites::all_columns)
            .get_result::<Favorite>(&mut *conn)?;
        Ok(result)
    }

    async fn delete(&self, user_id: i32, gif_id: &str) -> Result<bool, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let removed = diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::gif_id.eq(gif_id)),
        )
        .execute(&mut *conn)?;
        Ok(removed > 0)
    }
}
