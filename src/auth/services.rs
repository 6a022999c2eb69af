use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        error::AuthError,
        jwt::Authenticator,
        password::{hash_password_blocking, verify_password_blocking},
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    error::{AppError, FieldErrors},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(req: RegisterRequest) -> Result<(NewUser, String), AppError> {
    let mut errors = FieldErrors::new();

    let email = normalize_email(&req.email);
    if !is_valid_email(&email) || email.len() > 255 {
        errors.insert("email", "Enter a valid email address.".into());
    }
    if req.password.chars().count() < 8 {
        errors.insert("password", "Password must be at least 8 characters.".into());
    }

    let full_name = req.full_name.trim().to_string();
    if full_name.is_empty() || full_name.chars().count() > 255 {
        errors.insert("full_name", "Full name is required (max 255 characters).".into());
    }

    let gender = req.gender.trim().to_lowercase();
    if !matches!(gender.as_str(), "m" | "f" | "o") {
        errors.insert("gender", "Gender must be one of 'm', 'f', 'o'.".into());
    }

    let mobile_no = req.mobile_no.trim().to_string();
    if mobile_no.is_empty() || mobile_no.chars().count() > 20 {
        errors.insert("mobile_no", "Mobile number is required (max 20 characters).".into());
    }

    let signup_type = req
        .signup_type
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "e".into());
    if signup_type.chars().count() != 1 {
        errors.insert("signup_type", "Signup type must be a single character.".into());
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = NewUser {
        email,
        password_hash: String::new(),
        full_name,
        signup_type,
        gender,
        mobile_no,
    };
    Ok((user, req.password))
}

/// Creates the user and issues their first token.
pub async fn register_user(
    users: &dyn UserStore,
    auth: &Authenticator,
    req: RegisterRequest,
) -> Result<(User, String), AppError> {
    let (mut new_user, password) = validate_registration(req)?;
    new_user.password_hash = hash_password_blocking(password).await?;

    let user = users.insert(new_user).await.map_err(|e| {
        warn!(error = %e, "user insert failed");
        AppError::from(e)
    })?;
    let token = auth.issue(&user)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((user, token))
}

/// Email/password login. An unknown email and a wrong password are the
/// same [`AuthError::InvalidCredential`] to the caller.
pub async fn login_user(
    users: &dyn UserStore,
    auth: &Authenticator,
    req: LoginRequest,
) -> Result<(User, String), AppError> {
    let email = normalize_email(&req.email);
    let mut errors = FieldErrors::new();
    if !is_valid_email(&email) {
        errors.insert("email", "Enter a valid email address.".into());
    }
    if req.password.is_empty() {
        errors.insert("password", "This field is required.".into());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = users.find_by_email(&email).await?;
    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let ok = verify_password_blocking(req.password, stored).await?;

    match user {
        Some(user) if ok => {
            let token = auth.issue(&user)?;
            info!(user_id = user.id, "user logged in");
            Ok((user, token))
        }
        Some(user) => {
            warn!(user_id = user.id, "login invalid password");
            Err(AuthError::InvalidCredential.into())
        }
        None => {
            warn!("login unknown email");
            Err(AuthError::InvalidCredential.into())
        }
    }
}
