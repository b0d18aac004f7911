use gallery_api::{
    config::Config,
    infrastructure::{
        auth::JwtAdminResolver,
        database::pool::{create_pool, run_migrations},
        repositories::{SqlxAdminDirectory, SqlxSettingsRepository, SqlxSubmissionRepository},
        security::rate_limiter::{Limiter, RateLimiterGate, RedisSlidingWindowLimiter},
        storage::R2StorageService,
    },
    presentation::http::{routes::create_router, state::AppState},
};
use http::{HeaderValue, Method, header};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG wins; otherwise verbose for our crate and tower_http
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new("info,gallery_api=debug,tower_http=debug")
        })
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;
    let db = create_pool(&config.database_url, config.database_max_connections).await?;
    run_migrations(&db, config.ignore_missing_migrations).await?;

    let limiter: Option<Arc<dyn Limiter>> = match &config.redis_url {
        Some(url) => Some(Arc::new(RedisSlidingWindowLimiter::new(
            redis::Client::open(url.as_str())?,
        ))),
        None => None,
    };
    let gate = Arc::new(RateLimiterGate::new(
        limiter,
        config.submit_policy(),
        config.admin_policy(),
    ));

    let storage = Arc::new(R2StorageService::new(
        config.r2_access_key_id.clone(),
        config.r2_secret_access_key.clone(),
        config.r2_endpoint.clone(),
        config.r2_region.clone(),
        config.r2_force_path_style,
    ));

    let identity = Arc::new(JwtAdminResolver::new(
        &config.jwt_secret,
        Arc::new(SqlxAdminDirectory::new(db.clone())),
    ));

    let state = AppState {
        config: config.clone(),
        submissions: Arc::new(SqlxSubmissionRepository::new(db.clone())),
        settings: Arc::new(SqlxSettingsRepository::new(db)),
        storage,
        identity,
        gate,
    };

    let allowed_origin = if config.allowed_origins.is_empty() {
        tracing::warn!("ALLOWED_ORIGINS not set; accepting any origin");
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(config.allowed_origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| tracing::warn!("Ignoring invalid origin {:?}", origin))
                .ok()
        }))
    };

    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .expose_headers([header::CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(3600));

    let app = create_router(state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gallery API listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
