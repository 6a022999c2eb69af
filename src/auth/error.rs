use thiserror::Error;

/// Why a presented bearer token was refused.
///
/// Every variant produces the same response to the client; the kind only
/// shows up in logs and tests.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("token has expired")]
    ExpiredToken,
    /// Bad signature, bad structure, or an algorithm other than HS256.
    #[error("malformed token or invalid signature")]
    MalformedToken,
    /// Signature and expiry are fine but the user no longer exists.
    #[error("token subject does not exist")]
    UnknownSubject,
    /// Signed claims that could not be decoded into the expected shape.
    #[error("token claims could not be decoded")]
    DecodingFailure,
}

/// Authentication failures surfaced to request handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential on an endpoint that requires one.
    #[error("authentication credentials were not provided")]
    Unauthenticated,
    /// Login email/password mismatch. Unknown email and wrong password both land here.
    #[error("invalid credentials")]
    InvalidCredential,
    #[error("token rejected: {0}")]
    Rejected(#[from] RejectReason),
    #[error("{0} already registered")]
    DuplicateIdentity(&'static str),
}
