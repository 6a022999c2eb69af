use std::collections::BTreeMap;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::{CurrentUser, MaybeUser},
    company::{
        dto::{Pagination, UpdateCompanyRequest},
        repo_types::{CompanyFields, CompanyProfile, CompanyWithOwner, ImageSlot},
        services::{self, UploadItem},
    },
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    response::ApiResponse,
    state::AppState,
};

const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/company/register", post(register_company))
        .route("/company/profile", get(get_profile))
        .route("/company/profile/update", put(update_profile))
}

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/company/upload-logo", post(upload_logo))
        .route("/company/upload-banner", post(upload_banner))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
}

pub fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies))
        .route("/companies/:id", get(get_company))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn register_company(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<CompanyFields>,
) -> Result<(StatusCode, Json<ApiResponse<CompanyProfile>>), AppError> {
    let company = services::register_company(&state, &user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Company registered successfully",
            company,
        )),
    ))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<CompanyProfile>>, AppError> {
    let company = services::latest_profile(&state, user.id, "Company profile not found").await?;
    Ok(Json(ApiResponse::data(company)))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<UpdateCompanyRequest>,
) -> Result<Json<ApiResponse<CompanyProfile>>, AppError> {
    let company = services::update_company(&state, &user, payload).await?;
    Ok(Json(ApiResponse::with_message(
        "Company profile updated successfully",
        company,
    )))
}

pub async fn upload_logo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mp: Multipart,
) -> Result<Json<ApiResponse<BTreeMap<&'static str, String>>>, AppError> {
    upload_image(&state, user.id, mp, ImageSlot::Logo).await
}

pub async fn upload_banner(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mp: Multipart,
) -> Result<Json<ApiResponse<BTreeMap<&'static str, String>>>, AppError> {
    upload_image(&state, user.id, mp, ImageSlot::Banner).await
}

#[instrument(skip(state, mp))]
async fn upload_image(
    state: &AppState,
    user_id: i64,
    mp: Multipart,
    slot: ImageSlot,
) -> Result<Json<ApiResponse<BTreeMap<&'static str, String>>>, AppError> {
    let company = services::latest_profile(
        state,
        user_id,
        "Company profile not found. Please register company first.",
    )
    .await?;
    let image = read_file_field(mp, slot).await?;
    let url = services::store_company_image(state, &company, slot, image).await?;

    Ok(Json(ApiResponse::with_message(
        format!("{} uploaded successfully", slot.label()),
        BTreeMap::from([(slot.response_key(), url)]),
    )))
}

async fn read_file_field(mut mp: Multipart, slot: ImageSlot) -> Result<UploadItem, AppError> {
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text())))?
    {
        if field.name() != Some(slot.field_name()) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text())))?;
        return Ok(UploadItem { body, content_type });
    }
    Err(AppError::BadRequest(format!(
        "No {} file provided",
        slot.field_name()
    )))
}

#[instrument(skip(state, viewer))]
pub async fn list_companies(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<ApiResponse<Vec<CompanyWithOwner>>>, AppError> {
    let (limit, offset) = p.clamped();
    let companies = state.companies.list(limit, offset).await?;
    info!(
        viewer = ?viewer.as_ref().map(|u| u.id),
        count = companies.len(),
        "companies listed"
    );
    Ok(Json(ApiResponse::data(companies)))
}

#[instrument(skip(state, viewer))]
pub async fn get_company(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<CompanyWithOwner>>, AppError> {
    let company = state
        .companies
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".into()))?;
    info!(viewer = ?viewer.as_ref().map(|u| u.id), company_id = id, "company viewed");
    Ok(Json(ApiResponse::data(company)))
}
