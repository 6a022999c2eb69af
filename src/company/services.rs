use anyhow::Context;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{repo_types::User, services::is_valid_email},
    company::{
        dto::UpdateCompanyRequest,
        repo_types::{CompanyFields, CompanyProfile, ImageSlot},
    },
    error::{AppError, FieldErrors},
    state::AppState,
};

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

pub async fn register_company(
    st: &AppState,
    owner: &User,
    mut fields: CompanyFields,
) -> Result<CompanyProfile, AppError> {
    validate_fields(&mut fields)?;
    let company = st.companies.create(owner.id, &fields).await?;
    info!(company_id = company.id, owner_id = owner.id, "company registered");
    Ok(company)
}

/// The owner's most recently created profile, or a 404 carrying `missing`.
pub async fn latest_profile(
    st: &AppState,
    owner_id: i64,
    missing: &str,
) -> Result<CompanyProfile, AppError> {
    st.companies
        .latest_for_owner(owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound(missing.to_string()))
}

pub async fn update_company(
    st: &AppState,
    owner: &User,
    patch: UpdateCompanyRequest,
) -> Result<CompanyProfile, AppError> {
    let current = latest_profile(st, owner.id, "Company profile not found").await?;
    let mut fields = current.fields.clone();
    patch.apply(&mut fields);
    validate_fields(&mut fields)?;

    let updated = st.companies.update(current.id, &fields).await?;
    info!(company_id = updated.id, owner_id = owner.id, "company updated");
    Ok(updated)
}

/// Pushes an image to the media host and records its URL on the profile.
pub async fn store_company_image(
    st: &AppState,
    company: &CompanyProfile,
    slot: ImageSlot,
    image: UploadItem,
) -> Result<String, AppError> {
    if image.body.is_empty() {
        return Err(AppError::BadRequest(format!("{} file is empty", slot.label())));
    }
    if !image.content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!("{} must be an image", slot.label())));
    }

    let ext = ext_from_mime(&image.content_type).unwrap_or("bin");
    let key = format!("{}/{}-{}.{}", slot.folder(), company.owner_id, Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, image.body, &image.content_type)
        .await
        .with_context(|| format!("put_object {}", key))
        .map_err(AppError::Storage)?;

    let url = st.storage.public_url(&key);
    st.companies.set_image_url(company.id, slot, &url).await?;
    info!(company_id = company.id, %key, ?slot, "company image stored");
    Ok(url)
}

fn validate_fields(f: &mut CompanyFields) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();

    f.company_name = f.company_name.trim().to_string();
    if f.company_name.is_empty() {
        errors.insert("company_name", "This field is required.".into());
    } else if f.company_name.chars().count() > 255 {
        errors.insert("company_name", "Ensure this field has no more than 255 characters.".into());
    }

    for (name, value, max) in [
        ("organizations_type", &f.organizations_type, 100),
        ("industry_type", &f.industry_type, 100),
        ("team_size", &f.team_size, 50),
        ("headquarter_phone_no", &f.headquarter_phone_no, 20),
        ("headquarter_mail_id", &f.headquarter_mail_id, 255),
    ] {
        if value.as_deref().is_some_and(|v| v.chars().count() > max) {
            errors.insert(name, format!("Ensure this field has no more than {max} characters."));
        }
    }

    if let Some(mail) = f.headquarter_mail_id.as_deref() {
        if !mail.is_empty() && !is_valid_email(mail) {
            errors.insert("headquarter_mail_id", "Enter a valid email address.".into());
        }
    }

    if f.social_links.as_ref().is_some_and(|links| !links.0.is_object()) {
        errors.insert("social_links", "Expected an object of links.".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
