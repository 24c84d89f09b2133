//! User Model

use serde::{Deserialize, Serialize};

/// User entity
///
/// The password hash stays server-side and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    pub is_active: bool,

    /// Role names (junction table)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Save (upsert) user payload
///
/// `password` is only applied when present; roles are given by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSave {
    pub id: Option<i64>,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub roles: Vec<String>,
}
