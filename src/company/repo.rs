use async_trait::async_trait;
use sqlx::PgPool;

use crate::company::repo_types::{CompanyFields, CompanyProfile, CompanyWithOwner, ImageSlot};
use crate::db::{classify, StoreError};

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn create(&self, owner_id: i64, fields: &CompanyFields) -> Result<CompanyProfile, StoreError>;
    /// Most recently created profile owned by the user.
    async fn latest_for_owner(&self, owner_id: i64) -> Result<Option<CompanyProfile>, StoreError>;
    async fn update(&self, id: i64, fields: &CompanyFields) -> Result<CompanyProfile, StoreError>;
    async fn set_image_url(&self, id: i64, slot: ImageSlot, url: &str) -> Result<(), StoreError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CompanyWithOwner>, StoreError>;
    async fn get(&self, id: i64) -> Result<Option<CompanyWithOwner>, StoreError>;
}

#[derive(Clone)]
pub struct PgCompanyStore {
    db: PgPool,
}

impl PgCompanyStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    async fn create(&self, owner_id: i64, f: &CompanyFields) -> Result<CompanyProfile, StoreError> {
        sqlx::query_as::<_, CompanyProfile>(
            r#"
            INSERT INTO company_profile (
                owner_id, company_name, about_company, organizations_type, industry_type,
                team_size, year_of_establishment, company_website, company_app_link,
                company_vision, company_logo_url, company_banner_url, headquarter_phone_no,
                headquarter_mail_id, social_links, map_location_url, careers_link
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id, owner_id, company_name, about_company, organizations_type, industry_type,
                      team_size, year_of_establishment, company_website, company_app_link,
                      company_vision, company_logo_url, company_banner_url, headquarter_phone_no,
                      headquarter_mail_id, social_links, map_location_url, careers_link,
                      is_claimed, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&f.company_name)
        .bind(&f.about_company)
        .bind(&f.organizations_type)
        .bind(&f.industry_type)
        .bind(&f.team_size)
        .bind(f.year_of_establishment)
        .bind(&f.company_website)
        .bind(&f.company_app_link)
        .bind(&f.company_vision)
        .bind(&f.company_logo_url)
        .bind(&f.company_banner_url)
        .bind(&f.headquarter_phone_no)
        .bind(&f.headquarter_mail_id)
        .bind(&f.social_links)
        .bind(&f.map_location_url)
        .bind(&f.careers_link)
        .fetch_one(&self.db)
        .await
        .map_err(classify)
    }

    async fn latest_for_owner(&self, owner_id: i64) -> Result<Option<CompanyProfile>, StoreError> {
        let row = sqlx::query_as::<_, CompanyProfile>(
            r#"
            SELECT id, owner_id, company_name, about_company, organizations_type, industry_type,
                   team_size, year_of_establishment, company_website, company_app_link,
                   company_vision, company_logo_url, company_banner_url, headquarter_phone_no,
                   headquarter_mail_id, social_links, map_location_url, careers_link,
                   is_claimed, created_at, updated_at
              FROM company_profile
             WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, f: &CompanyFields) -> Result<CompanyProfile, StoreError> {
        sqlx::query_as::<_, CompanyProfile>(
            r#"
            UPDATE company_profile
               SET company_name = $2, about_company = $3, organizations_type = $4,
                   industry_type = $5, team_size = $6, year_of_establishment = $7,
                   company_website = $8, company_app_link = $9, company_vision = $10,
                   company_logo_url = $11, company_banner_url = $12, headquarter_phone_no = $13,
                   headquarter_mail_id = $14, social_links = $15, map_location_url = $16,
                   careers_link = $17, updated_at = now()
             WHERE id = $1
            RETURNING id, owner_id, company_name, about_company, organizations_type, industry_type,
                      team_size, year_of_establishment, company_website, company_app_link,
                      company_vision, company_logo_url, company_banner_url, headquarter_phone_no,
                      headquarter_mail_id, social_links, map_location_url, careers_link,
                      is_claimed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&f.company_name)
        .bind(&f.about_company)
        .bind(&f.organizations_type)
        .bind(&f.industry_type)
        .bind(&f.team_size)
        .bind(f.year_of_establishment)
        .bind(&f.company_website)
        .bind(&f.company_app_link)
        .bind(&f.company_vision)
        .bind(&f.company_logo_url)
        .bind(&f.company_banner_url)
        .bind(&f.headquarter_phone_no)
        .bind(&f.headquarter_mail_id)
        .bind(&f.social_links)
        .bind(&f.map_location_url)
        .bind(&f.careers_link)
        .fetch_one(&self.db)
        .await
        .map_err(classify)
    }

    async fn set_image_url(&self, id: i64, slot: ImageSlot, url: &str) -> Result<(), StoreError> {
        let sql = match slot {
            ImageSlot::Logo => {
                "UPDATE company_profile SET company_logo_url = $2, updated_at = now() WHERE id = $1"
            }
            ImageSlot::Banner => {
                "UPDATE company_profile SET company_banner_url = $2, updated_at = now() WHERE id = $1"
            }
        };
        sqlx::query(sql).bind(id).bind(url).execute(&self.db).await?;
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CompanyWithOwner>, StoreError> {
        let rows = sqlx::query_as::<_, CompanyWithOwner>(
            r#"
            SELECT c.id, c.owner_id, c.company_name, c.about_company, c.organizations_type,
                   c.industry_type, c.team_size, c.year_of_establishment, c.company_website,
                   c.company_app_link, c.company_vision, c.company_logo_url, c.company_banner_url,
                   c.headquarter_phone_no, c.headquarter_mail_id, c.social_links,
                   c.map_location_url, c.careers_link, c.is_claimed, c.created_at, c.updated_at,
                   u.email AS owner_email, u.full_name AS owner_name
              FROM company_profile c
              JOIN users u ON u.id = c.owner_id
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<CompanyWithOwner>, StoreError> {
        let row = sqlx::query_as::<_, CompanyWithOwner>(
            r#"
            SELECT c.id, c.owner_id, c.company_name, c.about_company, c.organizations_type,
                   c.industry_type, c.team_size, c.year_of_establishment, c.company_website,
                   c.company_app_link, c.company_vision, c.company_logo_url, c.company_banner_url,
                   c.headquarter_phone_no, c.headquarter_mail_id, c.social_links,
                   c.map_location_url, c.careers_link, c.is_claimed, c.created_at, c.updated_at,
                   u.email AS owner_email, u.full_name AS owner_name
              FROM company_profile c
              JOIN users u ON u.id = c.owner_id
             WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
