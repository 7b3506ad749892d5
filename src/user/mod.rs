pub mod auth;
mod schema;
mod sqlite_user_store;
mod user_manager;
pub mod user_models;
mod user_store;

pub use auth::{AuthError, AuthToken, HashedPassword, SessionClaims, TokenIssuer};
pub use sqlite_user_store::SqliteUserStore;
pub use user_manager::UserManager;
pub use user_models::{NewUser, User};
pub use user_store::{UserStore, UserStoreError};
