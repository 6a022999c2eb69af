//! In-memory stores and a router harness for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::{
    app::build_app,
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    company::{
        repo::CompanyStore,
        repo_types::{CompanyFields, CompanyProfile, CompanyWithOwner, ImageSlot},
    },
    config::JwtConfig,
    db::StoreError,
    state::AppState,
    storage::StorageClient,
};

const BOUNDARY: &str = "companyhub-test-boundary";

/// Unsaved user with a hash no password matches.
pub fn sample_user(email: &str, mobile: &str) -> User {
    let now = OffsetDateTime::now_utc();
    User {
        id: 424242,
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA".into(),
        full_name: "Test User".into(),
        signup_type: "e".into(),
        gender: "o".into(),
        mobile_no: mobile.to_string(),
        is_mobile_verified: false,
        is_email_verified: false,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    /// Stores the user under the next free id and returns the stored copy.
    pub fn seed(&self, mut user: User) -> User {
        let mut rows = self.rows.lock().unwrap();
        user.id = rows.len() as i64 + 1;
        rows.push(user.clone());
        user
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        {
            let rows = self.rows.lock().unwrap();
            if rows.iter().any(|u| u.email == new.email) {
                return Err(StoreError::Duplicate("email"));
            }
            if rows.iter().any(|u| u.mobile_no == new.mobile_no) {
                return Err(StoreError::Duplicate("mobile_no"));
            }
        }
        let now = OffsetDateTime::now_utc();
        Ok(self.seed(User {
            id: 0,
            email: new.email,
            password_hash: new.password_hash,
            full_name: new.full_name,
            signup_type: new.signup_type,
            gender: new.gender,
            mobile_no: new.mobile_no,
            is_mobile_verified: false,
            is_email_verified: false,
            created_at: now,
            updated_at: now,
        }))
    }
}

pub struct MemoryCompanyStore {
    users: Arc<MemoryUserStore>,
    rows: Mutex<Vec<CompanyProfile>>,
}

impl MemoryCompanyStore {
    pub fn new(users: Arc<MemoryUserStore>) -> Self {
        Self {
            users,
            rows: Mutex::new(Vec::new()),
        }
    }

    fn with_owner(&self, profile: CompanyProfile) -> CompanyWithOwner {
        let owner = self.users.get(profile.owner_id);
        CompanyWithOwner {
            owner_email: owner.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
            owner_name: owner.map(|u| u.full_name).unwrap_or_default(),
            profile,
        }
    }

    fn newest_first(&self) -> Vec<CompanyProfile> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    async fn create(&self, owner_id: i64, fields: &CompanyFields) -> Result<CompanyProfile, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let profile = CompanyProfile {
            id: rows.len() as i64 + 1,
            owner_id,
            fields: fields.clone(),
            is_claimed: false,
            created_at: now,
            updated_at: now,
        };
        rows.push(profile.clone());
        Ok(profile)
    }

    async fn latest_for_owner(&self, owner_id: i64) -> Result<Option<CompanyProfile>, StoreError> {
        Ok(self
            .newest_first()
            .into_iter()
            .find(|p| p.owner_id == owner_id))
    }

    async fn update(&self, id: i64, fields: &CompanyFields) -> Result<CompanyProfile, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        row.fields = fields.clone();
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn set_image_url(&self, id: i64, slot: ImageSlot, url: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|p| p.id == id) {
            match slot {
                ImageSlot::Logo => row.fields.company_logo_url = Some(url.to_string()),
                ImageSlot::Banner => row.fields.company_banner_url = Some(url.to_string()),
            }
            row.updated_at = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CompanyWithOwner>, StoreError> {
        Ok(self
            .newest_first()
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|p| self.with_owner(p))
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<CompanyWithOwner>, StoreError> {
        let row = self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned();
        Ok(row.map(|p| self.with_owner(p)))
    }
}

/// Media host that remembers keys instead of uploading.
#[derive(Default)]
pub struct FakeStorage {
    keys: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeStorage {
    pub fn failing() -> Self {
        Self {
            keys: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[axum::async_trait]
impl StorageClient for FakeStorage {
    async fn put_object(&self, key: &str, _body: Bytes, _content_type: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("media host unreachable");
        }
        self.keys.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://media.test/{key}")
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub users: Arc<MemoryUserStore>,
    pub storage: Arc<FakeStorage>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_storage(FakeStorage::default())
    }

    pub fn with_failing_storage() -> Self {
        Self::with_storage(FakeStorage::failing())
    }

    fn with_storage(storage: FakeStorage) -> Self {
        let users = Arc::new(MemoryUserStore::default());
        let companies = Arc::new(MemoryCompanyStore::new(users.clone()));
        let storage = Arc::new(storage);
        let jwt = JwtConfig {
            secret: "test-secret".into(),
            ttl_days: 90,
        };
        let state = AppState::from_parts(&jwt, users.clone(), companies.clone(), storage.clone());
        Self {
            router: build_app(state.clone()),
            state,
            users,
            storage,
        }
    }

    pub fn seed_user(&self, email: &str, mobile: &str) -> User {
        self.users.seed(sample_user(email, mobile))
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.auth.issue(user).expect("issue token")
    }

    /// Runs the request through the router; non-JSON bodies come back as a string value.
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.expect("router");
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        self.send(req.body(body).expect("request")).await
    }
}

/// Single-file `multipart/form-data` request with a bearer token.
pub fn multipart_request(
    uri: &str,
    token: &str,
    field: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("multipart request")
}
