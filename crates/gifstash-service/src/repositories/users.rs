use super::traits::UserRepository;
use crate::errors::ApiError;
use crate::models::{NewUser, User};
use crate::schema::users;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SqliteUserRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = users::table
            .filter(users::username.eq(username))
            .first::<User>(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut conn = self.db.lock().unwrap();
        let result = diesel::insert_into(users::table)
            .values(user)
            .returning(users::all_columns)
            .get_result::<User>(&mut *conn)?;
        Ok(result)
    }
}
