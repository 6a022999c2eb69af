use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoggedInUser, LoginRequest, PublicUser, RegisterRequest, RegisteredUser},
        extractors::CurrentUser,
        services::{login_user, register_user},
    },
    error::AppError,
    extract::ApiJson,
    response::ApiResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify-mobile", post(verify_mobile))
        .route("/auth/verify-email", get(verify_email))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisteredUser>>), AppError> {
    let (user, token) = register_user(state.users.as_ref(), &state.auth, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User registered successfully. Please verify mobile OTP.",
            RegisteredUser {
                user_id: user.id,
                email: user.email,
                token,
            },
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoggedInUser>>, AppError> {
    let (user, token) = login_user(state.users.as_ref(), &state.auth, payload).await?;
    Ok(Json(ApiResponse::with_message(
        "Login successful",
        LoggedInUser {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            token,
        },
    )))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<PublicUser>> {
    Json(ApiResponse::data(PublicUser::from(user)))
}

// OTP delivery is not wired up yet; verification flags stay untouched.
pub async fn verify_mobile() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(
        "Mobile verification endpoint ready. SMS OTP integration pending.",
    ))
}

pub async fn verify_email() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(
        "Email verification endpoint ready. Email link integration pending.",
    ))
}
