use axum::http::HeaderMap;

const UNKNOWN_CLIENT_IP: &str = "0.0.0.0";

/// First `x-forwarded-for` hop, else `x-real-ip`, else `0.0.0.0`.
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or(UNKNOWN_CLIENT_IP)
        .to_string()
}
