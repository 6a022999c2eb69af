use std::sync::Arc;

use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{claims::Claims, error::RejectReason, repo::UserStore, repo_types::User};
use crate::{config::JwtConfig, db::StoreError};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Result of checking one request's `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No credential supplied. Whether that is acceptable is up to the endpoint.
    Anonymous,
    Authenticated(User),
    Rejected(RejectReason),
}

/// Holds JWT signing and verification keys with the token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::days(cfg.ttl_days),
        }
    }
}

/// Issues bearer tokens and resolves presented ones to users.
pub struct Authenticator {
    keys: JwtKeys,
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(cfg: &JwtConfig, users: Arc<dyn UserStore>) -> Self {
        Self {
            keys: JwtKeys::new(cfg),
            users,
        }
    }

    pub fn issue(&self, user: &User) -> anyhow::Result<String> {
        self.issue_at(user, OffsetDateTime::now_utc())
    }

    fn issue_at(&self, user: &User, now: OffsetDateTime) -> anyhow::Result<String> {
        let exp = now + self.keys.ttl;
        let claims = Claims {
            user_id: user.id,
            email: user.email.clone(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.keys.encoding)?;
        debug!(user_id = user.id, "jwt signed");
        Ok(token)
    }

    /// Checks signature, algorithm and expiry, in that order.
    pub fn verify(&self, token: &str) -> Result<Claims, RejectReason> {
        let header = decode_header(token).map_err(|_| RejectReason::MalformedToken)?;
        if header.alg != ALGORITHM {
            return Err(RejectReason::MalformedToken);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| reject_reason(e.kind()))
    }

    /// Resolves a raw `Authorization` header value.
    ///
    /// An absent or empty header is [`AuthOutcome::Anonymous`]. Only a store
    /// failure during the user lookup is an `Err`.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<AuthOutcome, StoreError> {
        let Some(token) = header.and_then(token_from_header) else {
            return Ok(AuthOutcome::Anonymous);
        };

        let claims = match self.verify(token) {
            Ok(c) => c,
            Err(reason) => {
                warn!(?reason, "bearer token rejected");
                return Ok(AuthOutcome::Rejected(reason));
            }
        };

        match self.users.find_by_id(claims.user_id).await? {
            Some(user) => {
                debug!(user_id = user.id, "jwt verified");
                Ok(AuthOutcome::Authenticated(user))
            }
            None => {
                warn!(
                    user_id = claims.user_id,
                    reason = ?RejectReason::UnknownSubject,
                    "bearer token rejected"
                );
                Ok(AuthOutcome::Rejected(RejectReason::UnknownSubject))
            }
        }
    }
}

/// Splits once at the first space; a value without a space is the bare token.
fn token_from_header(raw: &str) -> Option<&str> {
    if raw.is_empty() {
        return None;
    }
    Some(raw.split_once(' ').map_or(raw, |(_, token)| token))
}

fn reject_reason(kind: &ErrorKind) -> RejectReason {
    match kind {
        ErrorKind::ExpiredSignature => RejectReason::ExpiredToken,
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::Base64(_) => RejectReason::MalformedToken,
        _ => RejectReason::DecodingFailure,
    }
}
