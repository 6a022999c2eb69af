use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};

/// Editable company columns, as accepted at registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct CompanyFields {
    pub company_name: String,
    pub about_company: Option<String>,
    pub organizations_type: Option<String>,
    pub industry_type: Option<String>,
    pub team_size: Option<String>,
    #[serde(serialize_with = "ymd::serialize", deserialize_with = "ymd::deserialize")]
    pub year_of_establishment: Option<Date>,
    pub company_website: Option<String>,
    pub company_app_link: Option<String>,
    pub company_vision: Option<String>,
    pub company_logo_url: Option<String>,
    pub company_banner_url: Option<String>,
    pub headquarter_phone_no: Option<String>,
    pub headquarter_mail_id: Option<String>,
    pub social_links: Option<Json<Value>>,
    pub map_location_url: Option<String>,
    pub careers_link: Option<String>,
}

/// Company profile record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompanyProfile {
    pub id: i64,
    pub owner_id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: CompanyFields,
    pub is_claimed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Profile joined with its owner's public details, for browsing.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompanyWithOwner {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub profile: CompanyProfile,
    pub owner_email: String,
    pub owner_name: String,
}

/// Which image URL column an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Logo,
    Banner,
}

impl ImageSlot {
    /// Multipart field carrying the file.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Banner => "banner",
        }
    }

    /// Folder on the media host.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Logo => "company_logos",
            Self::Banner => "company_banners",
        }
    }

    pub fn response_key(self) -> &'static str {
        match self {
            Self::Logo => "logo_url",
            Self::Banner => "banner_url",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Logo => "Logo",
            Self::Banner => "Banner",
        }
    }
}

/// `YYYY-MM-DD` dates; `null` and `""` both read as no date.
pub mod ymd {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Date};

    const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => {
                let text = d.format(FORMAT).map_err(serde::ser::Error::custom)?;
                s.serialize_some(&text)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        parse(raw.as_deref()).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: Option<&str>) -> Result<Option<Date>, time::error::Parse> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => Date::parse(s, FORMAT).map(Some),
        }
    }
}
