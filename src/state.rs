use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::{
    jwt::Authenticator,
    repo::{PgUserStore, UserStore},
};
use crate::company::repo::{CompanyStore, PgCompanyStore};
use crate::config::{AppConfig, JwtConfig};
use crate::storage::{Storage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub storage: Arc<dyn StorageClient>,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub async fn init(config: &AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let storage = Arc::new(Storage::new(&config.media).await?) as Arc<dyn StorageClient>;
        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let companies = Arc::new(PgCompanyStore::new(db)) as Arc<dyn CompanyStore>;
        Ok(Self::from_parts(&config.jwt, users, companies, storage))
    }

    pub fn from_parts(
        jwt: &JwtConfig,
        users: Arc<dyn UserStore>,
        companies: Arc<dyn CompanyStore>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        let auth = Arc::new(Authenticator::new(jwt, users.clone()));
        Self {
            users,
            companies,
            storage,
            auth,
        }
    }
}

impl FromRef<AppState> for Arc<Authenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
