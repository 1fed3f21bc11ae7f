pub mod admin_pages;
pub mod health;
pub mod public;
pub mod upload;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let config = state.config();
    let mut router = Router::new()
        .merge(health::routes())
        .merge(admin_pages::routes())
        .merge(upload::routes())
        .merge(public::routes());

    // Serve local uploads only when they are published under a local path.
    let base = config.upload_public_base.trim_end_matches('/');
    if base.starts_with('/') && base.len() > 1 {
        router = router.nest_service(base, ServeDir::new(&config.upload_dir));
    }

    router.with_state(state)
}
