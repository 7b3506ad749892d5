use super::auth::HashedPassword;
use super::user_models::{NewUser, User, UsernamePasswordCredentials};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserStoreError {
    /// Holds the name of the unique field that clashed.
    #[error("A user with this {0} already exists")]
    Duplicate(&'static str),

    #[error("User store error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type UserStoreResult<T> = Result<T, UserStoreError>;

pub trait UserStore: Send + Sync {
    /// Creates the user and its password credentials atomically.
    fn create_user(&self, user: &NewUser, password: &HashedPassword) -> UserStoreResult<User>;

    fn get_user(&self, user_id: i64) -> UserStoreResult<Option<User>>;

    fn get_user_by_username(&self, username: &str) -> UserStoreResult<Option<User>>;

    fn get_password_credentials(
        &self,
        user_id: i64,
    ) -> UserStoreResult<Option<UsernamePasswordCredentials>>;

    fn mark_credentials_used(&self, user_id: i64) -> UserStoreResult<()>;
}
