use crate::presentation::http::{
    errors::AppError, middleware::client_ip::extract_client_ip, state::AppState,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Resolves the bearer token to an admin, then applies the admin limiter.
///
/// On success the [`AdminIdentity`](crate::infrastructure::auth::AdminIdentity)
/// is stored in the request extensions for handlers.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let admin = state
        .identity
        .resolve(token)
        .await
        .ok_or(AppError::Unauthorized)?;

    let ip = extract_client_ip(req.headers());
    if !state.gate.admit_admin(&admin.id, &ip).await {
        return Err(AppError::RateLimited);
    }

    req.extensions_mut().insert(admin);
    Ok(next.run(req).await)
}
