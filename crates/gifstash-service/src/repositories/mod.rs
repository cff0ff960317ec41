pub mod favorites;
pub mod traits;
pub mod users;

pub use favorites::SqliteFavoriteRepository;
pub use traits::{FavoriteRepository, UserRepository};
pub use users::SqliteUserRepository;
