use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use practice_cms_core::page::render::{
    build_navigation, render_public_page, render_snapshot, Navigation, PublicPage,
};
use practice_cms_core::page::templates::{system_page, HOME_SLUG, STATIC_PATHS};
use practice_cms_core::site::{build_robots_txt, build_sitemap};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Unauthenticated routes used by the public website.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/public/home", get(home))
        .route("/api/public/pages/{slug}", get(page_by_slug))
        .route("/api/public/navigation", get(navigation))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
}

/// A published CMS page wins; legal and home pages fall back to their
/// built-in template. Anything else that is not published is a 404.
async fn render_slug(state: &AppState, slug: &str) -> ApiResult<PublicPage> {
    let base = state.config().site_url();
    if let Some(page) = state.pages().find_published(slug).await? {
        return Ok(render_public_page(&page, base));
    }
    match system_page(slug) {
        Some(def) if def.static_fallback => {
            Ok(render_snapshot(def.slug, def.path, &(def.template)(), base))
        }
        _ => Err(ApiError::NotFound(format!("page not found: {slug}"))),
    }
}

async fn home(State(state): State<AppState>) -> ApiResult<Json<PublicPage>> {
    Ok(Json(render_slug(&state, HOME_SLUG).await?))
}

async fn page_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PublicPage>> {
    Ok(Json(render_slug(&state, &slug).await?))
}

async fn navigation(State(state): State<AppState>) -> ApiResult<Json<Navigation>> {
    let pages = state.pages().list_published().await?;
    Ok(Json(build_navigation(&pages)))
}

async fn sitemap(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let pages = state.pages().list_published().await?;
    let xml = build_sitemap(state.config().site_url(), STATIC_PATHS, &pages);
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        build_robots_txt(state.config().site_url()),
    )
}
