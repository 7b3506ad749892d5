use chrono::{DateTime, Utc};
use serde::Serialize;

use super::auth::CredentialsHasher;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub warehouse_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub warehouse_id: i64,
}

#[derive(Clone, Debug)]
pub struct UsernamePasswordCredentials {
    pub user_id: i64,
    pub salt: String,
    pub hash: String,
    pub hasher: CredentialsHasher,

    pub created: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}
