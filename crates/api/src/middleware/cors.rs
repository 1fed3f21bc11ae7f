use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer. Locked to the site origin when one is configured,
/// otherwise any origin (local development).
pub fn cors_layer(site_url: Option<&str>) -> CorsLayer {
    let origin = site_url
        .map(|url| url.trim_end_matches('/'))
        .and_then(|url| HeaderValue::from_str(url).ok())
        .map_or_else(|| AllowOrigin::from(Any), AllowOrigin::exact);

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
