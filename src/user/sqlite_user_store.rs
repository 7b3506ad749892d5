use super::auth::{CredentialsHasher, HashedPassword};
use super::schema::USER_VERSIONED_SCHEMAS;
use super::user_models::{NewUser, User, UsernamePasswordCredentials};
use super::user_store::{UserStore, UserStoreError, UserStoreResult};
use crate::sqlite_persistence::{open_in_memory, open_versioned};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

const USER_COLUMNS: &str = "id, username, email, warehouse_id, created";

pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned(db_path, USER_VERSIONED_SCHEMAS)?;
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = open_in_memory(USER_VERSIONED_SCHEMAS)?;
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn from_unix_seconds(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        warehouse_id: row.get(3)?,
        created_at: from_unix_seconds(row.get(4)?),
    })
}

/// Maps a UNIQUE violation on the user table to the offending field.
fn as_duplicate_error(err: rusqlite::Error) -> UserStoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, message)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            let field = match message.as_deref() {
                Some(m) if m.contains("user.email") => "email",
                _ => "username",
            };
            UserStoreError::Duplicate(field)
        }
        _ => UserStoreError::Storage(err),
    }
}

impl UserStore for SqliteUserStore {
    fn create_user(&self, user: &NewUser, password: &HashedPassword) -> UserStoreResult<User> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO user (username, email, warehouse_id) VALUES (?1, ?2, ?3)",
            params![user.username, user.email, user.warehouse_id],
        )
        .map_err(as_duplicate_error)?;
        let user_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO user_password_credentials (user_id, salt, hash, hasher) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, password.salt, password.hash, password.hasher.as_str()],
        )?;
        let created = tx.query_row(
            &format!("SELECT {} FROM user WHERE id = ?1", USER_COLUMNS),
            params![user_id],
            user_from_row,
        )?;
        tx.commit()?;
        info!("Created user {} with id {}", created.username, created.id);
        Ok(created)
    }

    fn get_user(&self, user_id: i64) -> UserStoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!("SELECT {} FROM user WHERE id = ?1", USER_COLUMNS),
                params![user_id],
                user_from_row,
            )
            .optional()?)
    }

    fn get_user_by_username(&self, username: &str) -> UserStoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!("SELECT {} FROM user WHERE username = ?1", USER_COLUMNS),
                params![username],
                user_from_row,
            )
            .optional()?)
    }

    fn get_password_credentials(
        &self,
        user_id: i64,
    ) -> UserStoreResult<Option<UsernamePasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT user_id, salt, hash, hasher, created, last_used FROM user_password_credentials WHERE user_id = ?1",
                params![user_id],
                |row| {
                    let hasher = row
                        .get::<_, String>(3)?
                        .parse::<CredentialsHasher>()
                        .map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
                        })?;
                    Ok(UsernamePasswordCredentials {
                        user_id: row.get(0)?,
                        salt: row.get(1)?,
                        hash: row.get(2)?,
                        hasher,
                        created: from_unix_seconds(row.get(4)?),
                        last_used: row.get::<_, Option<i64>>(5)?.map(from_unix_seconds),
                    })
                },
            )
            .optional()?)
    }

    fn mark_credentials_used(&self, user_id: i64) -> UserStoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE user_password_credentials SET last_used = ?1 WHERE user_id = ?2",
            params![Utc::now().timestamp(), user_id],
        )?;
        Ok(())
    }
}
