//! Unified error handling for request handlers.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::error::{AuthError, RejectReason};
use crate::db::StoreError;

/// Per-field validation messages, keyed by request field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// Media host upload failed.
    #[error("storage error: {0}")]
    Storage(anyhow::Error),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => Self::Auth(AuthError::DuplicateIdentity(field)),
            StoreError::Database(e) => Self::Database(e),
        }
    }
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        Self::Auth(AuthError::Rejected(reason))
    }
}

// Extractor details stay in the logs; clients get a fixed message.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "json body rejected");
        Self::BadRequest("Invalid request body".into())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "path parameter rejected");
        Self::BadRequest("Invalid path parameter".into())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "query string rejected");
        Self::BadRequest("Invalid query parameters".into())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::DuplicateIdentity(_)) => StatusCode::CONFLICT,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Token rejection kinds are logged by the authenticator and collapse to one message here.
    fn public_message(&self) -> String {
        match self {
            Self::Auth(AuthError::Unauthenticated) => {
                "Authentication credentials were not provided".into()
            }
            Self::Auth(AuthError::InvalidCredential) => "Invalid credentials".into(),
            Self::Auth(AuthError::Rejected(_)) => "Authentication failed".into(),
            Self::Auth(AuthError::DuplicateIdentity(field)) => {
                format!("A user with this {field} already exists")
            }
            Self::Validation(_) => "Validation failed".into(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Storage(_) => "Upload failed".into(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        }

        let body = ErrorBody {
            success: false,
            message: self.public_message(),
            errors: match self {
                Self::Validation(errors) => Some(errors),
                _ => None,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn auth_failures_are_unauthorized() {
        assert_eq!(status_of(AuthError::Unauthenticated.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::InvalidCredential.into()), StatusCode::UNAUTHORIZED);
        for reason in [
            RejectReason::ExpiredToken,
            RejectReason::MalformedToken,
            RejectReason::UnknownSubject,
            RejectReason::DecodingFailure,
        ] {
            assert_eq!(status_of(reason.into()), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn every_rejection_reason_reads_the_same_to_clients() {
        let messages: Vec<String> = [
            RejectReason::ExpiredToken,
            RejectReason::MalformedToken,
            RejectReason::UnknownSubject,
            RejectReason::DecodingFailure,
        ]
        .into_iter()
        .map(|r| AppError::from(r).public_message())
        .collect();
        assert!(messages.iter().all(|m| m == "Authentication failed"));
    }

    #[test]
    fn unauthorized_responses_advertise_bearer() {
        let res = AppError::from(AuthError::Unauthenticated).into_response();
        assert_eq!(
            res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn duplicate_store_error_becomes_conflict() {
        let err = AppError::from(StoreError::Duplicate("email"));
        assert_eq!(err.public_message(), "A user with this email already exists");
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = AppError::Internal(anyhow::anyhow!("connection refused at 10.0.0.3"));
        assert_eq!(err.public_message(), "Internal server error");
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(status_of(AppError::Storage(anyhow::anyhow!("s3 down"))), StatusCode::BAD_GATEWAY);
    }
}
