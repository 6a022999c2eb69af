use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::User;

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub gender: String,
    pub mobile_no: String,
    pub signup_type: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub user_id: i64,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoggedInUser {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub token: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub signup_type: String,
    pub gender: String,
    pub mobile_no: String,
    pub is_mobile_verified: bool,
    pub is_email_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            signup_type: u.signup_type,
            gender: u.gender,
            mobile_no: u.mobile_no,
            is_mobile_verified: u.is_mobile_verified,
            is_email_verified: u.is_email_verified,
            created_at: u.created_at,
        }
    }
}
