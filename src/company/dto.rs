use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sqlx::types::Json;
use time::Date;

use crate::company::repo_types::{ymd, CompanyFields};

/// Partial update; a key that is present (even as `null`) overwrites the column.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCompanyRequest {
    pub company_name: Option<String>,
    #[serde(deserialize_with = "present")]
    pub about_company: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub organizations_type: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub industry_type: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub team_size: Option<Option<String>>,
    #[serde(deserialize_with = "present_date")]
    pub year_of_establishment: Option<Option<Date>>,
    #[serde(deserialize_with = "present")]
    pub company_website: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub company_app_link: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub company_vision: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub company_logo_url: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub company_banner_url: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub headquarter_phone_no: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub headquarter_mail_id: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub social_links: Option<Option<Json<Value>>>,
    #[serde(deserialize_with = "present")]
    pub map_location_url: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub careers_link: Option<Option<String>>,
}

impl UpdateCompanyRequest {
    pub fn apply(self, f: &mut CompanyFields) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut f.company_name, self.company_name);
        set(&mut f.about_company, self.about_company);
        set(&mut f.organizations_type, self.organizations_type);
        set(&mut f.industry_type, self.industry_type);
        set(&mut f.team_size, self.team_size);
        set(&mut f.year_of_establishment, self.year_of_establishment);
        set(&mut f.company_website, self.company_website);
        set(&mut f.company_app_link, self.company_app_link);
        set(&mut f.company_vision, self.company_vision);
        set(&mut f.company_logo_url, self.company_logo_url);
        set(&mut f.company_banner_url, self.company_banner_url);
        set(&mut f.headquarter_phone_no, self.headquarter_phone_no);
        set(&mut f.headquarter_mail_id, self.headquarter_mail_id);
        set(&mut f.social_links, self.social_links);
        set(&mut f.map_location_url, self.map_location_url);
        set(&mut f.careers_link, self.careers_link);
    }
}

fn present<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

fn present_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<Date>>, D::Error> {
    ymd::deserialize(d).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

impl Pagination {
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}
