use crate::errors::ApiError;
use crate::models::{NewUser, User};
use crate::repositories::UserRepository;
use async_trait::async_trait;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::info;

pub const DEMO_USERNAME: &str = "demo";

/// Resolves the identity behind a request.
///
/// Favorites operations take their `user_id` from here and never from the
/// request payload, so cross-user access is structurally impossible. Real
/// session auth slots in behind this trait without touching the favorites
/// contract.
#[async_trait]
pub trait IdentityResolver: Clone + Send + Sync + 'static {
    async fn current_user(&self) -> Result<User, ApiError>;
}

/// Single implicit demo identity, auto-provisioned on first use.
#[derive(Clone)]
pub struct DemoIdentity<U: UserRepository> {
    users: U,
}

impl<U: UserRepository> DemoIdentity<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U: UserRepository> IdentityResolver for DemoIdentity<U> {
    async fn current_user(&self) -> Result<User, ApiError> {
        if let Some(user) = self.users.find_by_username(DEMO_USERNAME).await? {
            return Ok(user);
        }

        let new_user = NewUser {
            username: DEMO_USERNAME.to_string(),
            password: DEMO_USERNAME.to_string(),
        };

        match self.users.create(&new_user).await {
            Ok(user) => {
                info!(user_id = user.id, "Provisioned demo user");
                Ok(user)
            }
            // Two requests may race to provision; the loser re-reads the row.
            Err(ApiError::Database(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            ))) => {
                let user = self.users.find_by_username(DEMO_USERNAME).await?;
                user.ok_or(ApiError::NotFound)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::SqliteUserRepository;
    use crate::test_helpers::establish_test_connection;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_demo_user_is_provisioned_once() {
        let db = Arc::new(Mutex::new(establish_test_connection()));
        let identity = DemoIdentity::new(SqliteUserRepository::new(db));

        let first = identity.current_user().await.unwrap();
        let second = identity.current_user().await.unwrap();

        assert_eq!(first.username, DEMO_USERNAME);
        assert_eq!(first.id, second.id);
    }
}
