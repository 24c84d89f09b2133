//! Account API DTOs shared between server and admin console

use serde::{Deserialize, Serialize};

use crate::models::User;

/// Login request (`POST /api/account/login`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// POS quick login (`POST /api/account/login/{userId}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickLoginRequest {
    pub password: String,
}

/// Set password (`POST /api/account/passw/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
