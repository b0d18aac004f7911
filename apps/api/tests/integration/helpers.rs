use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use gallery_api::{
    config::Config,
    domain::{
        settings::{entity::AppSettings, repository::SettingsRepository},
        shared::{errors::DomainError, pagination::PageCursor},
        submission::{
            entity::{NewSubmission, Submission, SubmissionStatus},
            repository::SubmissionRepository,
        },
    },
    infrastructure::{
        auth::{AdminClaims, AdminDirectory, JwtAdminResolver},
        security::rate_limiter::{Limiter, RateLimiterGate},
        storage::traits::StorageService,
    },
    presentation::http::{routes::create_router, state::AppState},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::de::DeserializeOwned;
use std::{
    collections::{HashMap, HashSet},
    io::Cursor,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-jwt-secret";
pub const ADMIN_ID: &str = "admin-1";
pub const PHOTOS_BUCKET: &str = "test-photos";
pub const THUMBS_BUCKET: &str = "test-thumbs";

// === Record store double ===

#[derive(Default)]
pub struct InMemorySubmissions {
    rows: Mutex<Vec<Submission>>,
    pub fail_inserts: AtomicBool,
}

impl InMemorySubmissions {
    pub fn all(&self) -> Vec<Submission> {
        self.rows.lock().unwrap().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Submission> {
        self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }

    /// Inserts a row directly, bypassing the pipeline.
    pub fn seed(&self, status: SubmissionStatus, created_at: DateTime<Utc>, caption: &str) -> Submission {
        let id = Uuid::now_v7();
        let mut row = Submission::pending(
            NewSubmission {
                id,
                caption: caption.to_string(),
                image_path: format!("uploads/{}.jpg", id),
                thumb_path: format!("thumbs/{}.jpg", id),
                mime: "image/jpeg".into(),
                size_bytes: 1024,
                width: 640,
                height: 480,
                ip_hash: "seeded".into(),
                device_id: "seed-device".into(),
                fingerprint_hash: "seeded".into(),
                user_agent: "seed".into(),
            },
            created_at,
        );
        row.status = status;
        if status == SubmissionStatus::Approved {
            row.approved_at = Some(created_at);
            row.approved_by = Some(ADMIN_ID.into());
        }
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    fn update<F>(&self, id: Uuid, guard: impl Fn(&Submission) -> bool, apply: F) -> Option<Submission>
    where
        F: FnOnce(&mut Submission),
    {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|s| s.id == id && guard(s))?;
        apply(row);
        row.updated_at = Utc::now();
        Some(row.clone())
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissions {
    async fn create(&self, new: &NewSubmission) -> Result<Submission, DomainError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::InfrastructureError("insert failed".into()));
        }
        let row = Submission::pending(new.clone(), Utc::now());
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, DomainError> {
        Ok(self.get(id))
    }

    async fn list_page(
        &self,
        status: SubmissionStatus,
        after: Option<PageCursor>,
        limit: i64,
    ) -> Result<Vec<Submission>, DomainError> {
        let mut rows: Vec<_> = self
            .all()
            .into_iter()
            .filter(|s| s.status == status)
            .filter(|s| after.is_none_or(|cursor| cursor.precedes(&s.sort_key())))
            .collect();
        rows.sort_by_key(|s| std::cmp::Reverse(s.sort_key()));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn list_for_export(&self) -> Result<Vec<Submission>, DomainError> {
        let mut rows: Vec<_> = self
            .all()
            .into_iter()
            .filter(|s| s.status != SubmissionStatus::Deleted)
            .collect();
        rows.sort_by_key(|s| std::cmp::Reverse(s.sort_key()));
        Ok(rows)
    }

    async fn approve(&self, id: Uuid, admin_id: &str) -> Result<Option<Submission>, DomainError> {
        Ok(self.update(
            id,
            |s| s.status != SubmissionStatus::Deleted,
            |s| {
                s.status = SubmissionStatus::Approved;
                s.approved_at.get_or_insert_with(Utc::now);
                s.approved_by.get_or_insert_with(|| admin_id.to_string());
            },
        ))
    }

    async fn reject_if_pending(&self, id: Uuid, admin_id: &str) -> Result<bool, DomainError> {
        Ok(self
            .update(
                id,
                |s| s.status == SubmissionStatus::Pending,
                |s| {
                    s.status = SubmissionStatus::Rejected;
                    s.rejected_at = Some(Utc::now());
                    s.rejected_by = Some(admin_id.to_string());
                },
            )
            .is_some())
    }

    async fn mark_deleted(&self, id: Uuid, admin_id: &str) -> Result<Option<Submission>, DomainError> {
        Ok(self.update(
            id,
            |s| s.status != SubmissionStatus::Deleted,
            |s| {
                s.status = SubmissionStatus::Deleted;
                s.deleted_at = Some(Utc::now());
                s.deleted_by = Some(admin_id.to_string());
            },
        ))
    }

    async fn update_caption(&self, id: Uuid, caption: &str) -> Result<Option<Submission>, DomainError> {
        Ok(self.update(
            id,
            |s| s.status != SubmissionStatus::Deleted,
            |s| s.caption = caption.to_string(),
        ))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

// === Settings double ===

#[derive(Default)]
pub struct InMemorySettings {
    stored: Mutex<Option<serde_json::Value>>,
}

impl InMemorySettings {
    pub fn set_raw(&self, value: serde_json::Value) {
        *self.stored.lock().unwrap() = Some(value);
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettings {
    async fn get(&self) -> Result<AppSettings, DomainError> {
        Ok(AppSettings::from_stored(self.stored.lock().unwrap().as_ref()))
    }

    async fn save(&self, settings: AppSettings) -> Result<(), DomainError> {
        self.set_raw(settings.to_stored());
        Ok(())
    }
}

// === Object store double ===

#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    fail_bucket: Mutex<Option<String>>,
    pub puts: AtomicUsize,
}

impl InMemoryStorage {
    pub fn fail_puts_to(&self, bucket: &str) {
        *self.fail_bucket.lock().unwrap() = Some(bucket.to_string());
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn insert(&self, bucket: &str, path: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), path.to_string()), vec![0xff, 0xd8]);
    }
}

#[async_trait]
impl StorageService for InMemoryStorage {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> anyhow::Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_bucket.lock().unwrap().as_deref() == Some(bucket) {
            anyhow::bail!("simulated outage writing to {}", bucket);
        }
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), path.to_string()), data);
        Ok(())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> anyhow::Result<()> {
        let mut objects = self.objects.lock().unwrap();
        for path in paths {
            objects.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }

    async fn sign(&self, bucket: &str, path: &str, ttl: Duration) -> Option<String> {
        Some(format!(
            "https://storage.test/{}/{}?expires={}",
            bucket,
            path,
            ttl.as_secs()
        ))
    }
}

// === Limiter and identity doubles ===

/// Counts admissions per key; never expires within a test.
#[derive(Default)]
pub struct CountingLimiter {
    counts: Mutex<HashMap<String, u32>>,
}

#[async_trait]
impl Limiter for CountingLimiter {
    async fn admit(&self, key: &str, limit: u32, _window: Duration) -> anyhow::Result<bool> {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(key.to_string()).or_default();
        if *count < limit {
            *count += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

struct StaticAdmins(HashSet<String>);

#[async_trait]
impl AdminDirectory for StaticAdmins {
    async fn is_admin(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.0.contains(id))
    }
}

pub fn token_for(sub: &str) -> String {
    let claims = AdminClaims {
        sub: sub.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to sign token")
}

// === App ===

pub struct TestApp {
    pub app: Router,
    pub submissions: Arc<InMemorySubmissions>,
    pub settings: Arc<InMemorySettings>,
    pub storage: Arc<InMemoryStorage>,
    pub admin_token: String,
}

pub fn build_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        redis_url: None,
        r2_access_key_id: "test".to_string(),
        r2_secret_access_key: "test".to_string(),
        r2_endpoint: "https://test.r2.cloudflarestorage.com".to_string(),
        r2_region: "auto".to_string(),
        r2_force_path_style: false,
        r2_bucket_photos: PHOTOS_BUCKET.to_string(),
        r2_bucket_thumbs: THUMBS_BUCKET.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: JWT_SECRET.to_string(),
        ip_hash_salt: "ip-salt".to_string(),
        fingerprint_hash_salt: "fp-salt".to_string(),
        submissions_enabled: true,
        submit_rate_limit: 3,
        admin_rate_limit: 30,
        rate_limit_window_seconds: 60,
        max_upload_bytes: 6 * 1024 * 1024,
        allowed_origins: vec![],
        ignore_missing_migrations: true,
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(build_config(), None)
}

pub fn spawn_app_with(config: Config, limiter: Option<Arc<dyn Limiter>>) -> TestApp {
    let submissions = Arc::new(InMemorySubmissions::default());
    let settings = Arc::new(InMemorySettings::default());
    let storage = Arc::new(InMemoryStorage::default());
    let admins = StaticAdmins([ADMIN_ID.to_string()].into_iter().collect());

    let state = AppState {
        gate: Arc::new(RateLimiterGate::new(
            limiter,
            config.submit_policy(),
            config.admin_policy(),
        )),
        identity: Arc::new(JwtAdminResolver::new(&config.jwt_secret, Arc::new(admins))),
        submissions: submissions.clone(),
        settings: settings.clone(),
        storage: storage.clone(),
        config,
    };

    TestApp {
        app: create_router(state),
        submissions,
        settings,
        storage,
        admin_token: token_for(ADMIN_ID),
    }
}

// === Requests ===

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn admin_request(method: &str, uri: &str, token: &str, json: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    match json {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build admin request")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();
    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

// === Payloads ===

pub fn encoded_image(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x / 16 % 256) as u8, (y / 16 % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("failed to encode image");
    bytes
}

pub fn tiny_png_bytes() -> Vec<u8> {
    encoded_image(8, 6, image::ImageFormat::Png)
}

pub struct Upload<'a> {
    pub caption: &'a str,
    pub device_id: &'a str,
    pub fingerprint: &'a str,
    pub photo: Option<(&'a [u8], &'a str)>,
}

impl Default for Upload<'_> {
    fn default() -> Self {
        Self {
            caption: "Cutting the cake",
            device_id: "device-abc",
            fingerprint: "fingerprint-xyz",
            photo: None,
        }
    }
}

pub fn multipart_upload_body(upload: &Upload<'_>) -> (String, Vec<u8>) {
    let boundary = format!("----gallery-boundary-{}", Uuid::now_v7());
    let mut body = Vec::new();

    let mut push_text = |name: &str, value: &str| {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    };

    push_text("caption", upload.caption);
    push_text("device_id", upload.device_id);
    push_text("fingerprint", upload.fingerprint);

    if let Some((bytes, content_type)) = upload.photo {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"photo\"; filename=\"photo\"\r\n",
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    (boundary, body)
}

pub fn submit_request(upload: &Upload<'_>, client_ip: &str) -> Request<Body> {
    let (boundary, body) = multipart_upload_body(upload);
    Request::builder()
        .method("POST")
        .uri("/api/v1/submissions")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header("x-forwarded-for", client_ip)
        .header(header::USER_AGENT, "integration-test")
        .body(Body::from(body))
        .expect("failed to build upload request")
}
