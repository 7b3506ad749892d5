use super::auth::{AuthError, AuthToken, HashedPassword, SessionClaims, TokenIssuer};
use super::user_models::{NewUser, User};
use super::user_store::UserStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Signup, signin and token verification on top of a `UserStore`.
pub struct UserManager {
    user_store: Arc<dyn UserStore>,
    token_issuer: TokenIssuer,
}

impl UserManager {
    pub fn new(user_store: Arc<dyn UserStore>, token_issuer: TokenIssuer) -> Self {
        Self {
            user_store,
            token_issuer,
        }
    }

    pub fn signup(
        &self,
        username: &str,
        password: &str,
        email: &str,
        warehouse_id: i64,
    ) -> Result<User, AuthError> {
        let hashed = HashedPassword::new(password)?;
        let user = self.user_store.create_user(
            &NewUser {
                username: username.to_string(),
                email: email.to_string(),
                warehouse_id,
            },
            &hashed,
        )?;
        Ok(user)
    }

    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    pub fn signin(&self, username: &str, password: &str) -> Result<AuthToken, AuthError> {
        let user = match self.user_store.get_user_by_username(username)? {
            Some(user) => user,
            None => {
                debug!("Signin attempt for unknown user {}", username);
                return Err(AuthError::InvalidCredentials);
            }
        };
        let credentials = self
            .user_store
            .get_password_credentials(user.id)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !credentials
            .hasher
            .verify(password, credentials.hash.as_str())?
        {
            debug!("Wrong password for user {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        self.user_store.mark_credentials_used(user.id)?;
        let token = self.token_issuer.issue(user.id, user.warehouse_id)?;
        info!("User {} signed in", user.username);
        Ok(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.token_issuer.verify(token)
    }
}
