use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

lazy_static! {
    // Verified against when the login email is unknown so both paths cost one Argon2 run.
    static ref PLACEHOLDER_HASH: String =
        hash_password("placeholder-password-never-matches")
            .expect("argon2 must hash the placeholder password");
}

/// Computes the placeholder hash now instead of on the first unknown-email login.
pub fn warm_up() {
    lazy_static::initialize(&PLACEHOLDER_HASH);
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Checks `plain` against a stored PHC string. Unparsable hashes never match.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "argon2 parse hash error");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task")?
}

/// Runs verification on the blocking pool. With no stored hash the placeholder
/// is checked instead and the result is always `false`.
pub async fn verify_password_blocking(plain: String, stored: Option<String>) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || match stored {
        Some(hash) => verify_password(&plain, &hash),
        None => {
            verify_password(&plain, &PLACEHOLDER_HASH);
            false
        }
    })
    .await
    .context("password verification task")
}
