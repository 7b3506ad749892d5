//! Request body validation.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 10;
pub const PASSWORD_MIN_LEN: usize = 6;

/// Field name to reason, for every field that failed.
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `reason` for `field` unless `valid`. The first reason per field wins.
    pub fn check(&mut self, valid: bool, field: &'static str, reason: impl Into<String>) {
        if !valid {
            self.0.entry(field).or_insert_with(|| reason.into());
        }
    }

    /// Unwraps a required field, recording it as missing when absent.
    pub fn require<T>(&mut self, value: Option<T>, field: &'static str) -> Option<T> {
        self.check(value.is_some(), field, "is required");
        value
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LEN
}
