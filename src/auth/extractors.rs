use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::{
    error::{AuthError, RejectReason},
    jwt::{AuthOutcome, Authenticator},
    repo_types::User,
};
use crate::error::AppError;

/// Authenticated caller; anonymous requests are refused.
pub struct CurrentUser(pub User);

/// Caller if a token was supplied. A bad token is still refused.
pub struct MaybeUser(pub Option<User>);

async fn resolve(parts: &Parts, auth: &Authenticator) -> Result<AuthOutcome, AppError> {
    let header = match parts.headers.get(AUTHORIZATION).map(|v| v.to_str()) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => {
            warn!(reason = ?RejectReason::MalformedToken, "non-ascii Authorization header");
            return Ok(AuthOutcome::Rejected(RejectReason::MalformedToken));
        }
    };
    Ok(auth.authenticate(header).await?)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<Authenticator>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = Arc::<Authenticator>::from_ref(state);
        match resolve(parts, &auth).await? {
            AuthOutcome::Authenticated(user) => Ok(Self(user)),
            AuthOutcome::Anonymous => Err(AuthError::Unauthenticated.into()),
            AuthOutcome::Rejected(reason) => Err(reason.into()),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    Arc<Authenticator>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = Arc::<Authenticator>::from_ref(state);
        match resolve(parts, &auth).await? {
            AuthOutcome::Authenticated(user) => Ok(Self(Some(user))),
            AuthOutcome::Anonymous => Ok(Self(None)),
            AuthOutcome::Rejected(reason) => Err(reason.into()),
        }
    }
}
