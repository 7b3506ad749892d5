use super::api_error::ApiError;
use super::metrics::record_signin_attempt;
use super::state::GuardedUserManager;
use super::validation::{
    is_valid_email, is_valid_password, is_valid_username, ValidationErrors, PASSWORD_MIN_LEN,
    USERNAME_MAX_LEN, USERNAME_MIN_LEN,
};
use crate::user::AuthError;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupBody {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub warehouse_id: Option<i64>,
}

struct ValidSignup {
    username: String,
    password: String,
    email: String,
    warehouse_id: i64,
}

impl SignupBody {
    fn validate(self) -> Result<ValidSignup, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let username = errors.require(self.username.map(|u| u.trim().to_string()), "username");
        let password = errors.require(self.password, "password");
        let email = errors.require(self.email.map(|e| e.trim().to_string()), "email");
        let warehouse_id = errors.require(self.warehouse_id, "warehouseId");

        if let Some(username) = &username {
            errors.check(
                is_valid_username(username),
                "username",
                format!(
                    "must be between {} and {} characters",
                    USERNAME_MIN_LEN, USERNAME_MAX_LEN
                ),
            );
        }
        if let Some(password) = &password {
            errors.check(
                is_valid_password(password),
                "password",
                format!("must be at least {} characters", PASSWORD_MIN_LEN),
            );
        }
        if let Some(email) = &email {
            errors.check(is_valid_email(email), "email", "must be a valid email");
        }

        match (username, password, email, warehouse_id) {
            (Some(username), Some(password), Some(email), Some(warehouse_id))
                if errors.is_empty() =>
            {
                Ok(ValidSignup {
                    username,
                    password,
                    email,
                    warehouse_id,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SigninBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
struct SigninSuccessResponse {
    token: String,
}

pub async fn signup(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse, ApiError> {
    let signup = body.validate()?;
    let user = user_manager.signup(
        &signup.username,
        &signup.password,
        &signup.email,
        signup.warehouse_id,
    )?;
    info!("Signed up user {} (id {})", user.username, user.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

pub async fn signin(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<SigninBody>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = ValidationErrors::new();
    let username = errors.require(body.username.filter(|u| !u.trim().is_empty()), "username");
    let password = errors.require(body.password.filter(|p| !p.is_empty()), "password");
    let (Some(username), Some(password)) = (username, password) else {
        return Err(errors.into());
    };

    match user_manager.signin(username.trim(), &password) {
        Ok(token) => {
            record_signin_attempt("success");
            Ok((
                StatusCode::CREATED,
                Json(SigninSuccessResponse { token: token.value }),
            ))
        }
        Err(err) => {
            if matches!(err, AuthError::InvalidCredentials) {
                debug!("Rejected signin for {}", username);
                record_signin_attempt("failure");
            }
            Err(err.into())
        }
    }
}
