use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use practice_cms_core::page::{Page, PageFilter, PageSummary};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AdminCaller;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Page management routes. Every handler requires an active admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/pages", get(list_pages).post(create_page))
        .route(
            "/api/admin/pages/{id}",
            get(get_page).patch(update_page).delete(delete_page),
        )
        .route("/api/admin/pages/{id}/publish", post(publish_page))
        .route("/api/admin/pages/{id}/unpublish", post(unpublish_page))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatePageBody {
    title: String,
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatePageBody {
    title: String,
    slug: String,
    draft: Value,
}

fn parse_filter(query: &ListQuery) -> ApiResult<PageFilter> {
    fn parse<T: std::str::FromStr>(raw: Option<&str>) -> ApiResult<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ApiError::BadRequest(e.to_string())),
        }
    }

    Ok(PageFilter {
        status: parse(query.status.as_deref())?,
        kind: parse(query.kind.as_deref())?,
    })
}

/// Unparseable ids cannot name a page, so they are reported as missing.
fn parse_page_id(raw: &str) -> ApiResult<Uuid> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("page not found: {raw}")))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn list_pages(
    _admin: AdminCaller,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<PageSummary>>> {
    let filter = parse_filter(&query)?;
    Ok(Json(state.pages().list_pages(filter).await?))
}

async fn create_page(
    admin: AdminCaller,
    State(state): State<AppState>,
    payload: Result<Json<CreatePageBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Page>)> {
    let body = json_body(payload)?;
    let page = state
        .pages()
        .create_custom_page(&admin.uid, &body.title, body.slug.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn get_page(
    _admin: AdminCaller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Page>> {
    let id = parse_page_id(&id)?;
    Ok(Json(state.pages().get_page(id).await?))
}

async fn update_page(
    admin: AdminCaller,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePageBody>, JsonRejection>,
) -> ApiResult<Json<Page>> {
    let id = parse_page_id(&id)?;
    let body = json_body(payload)?;
    let page = state
        .pages()
        .update_page_draft(&admin.uid, id, &body.title, &body.slug, &body.draft)
        .await?;
    Ok(Json(page))
}

async fn delete_page(
    admin: AdminCaller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_page_id(&id)?;
    state.pages().delete_page(id).await?;
    tracing::info!(
        page_id = %id,
        actor = %admin.uid,
        email = admin.email.as_deref().unwrap_or("-"),
        "page deleted via admin API"
    );
    Ok(Json(json!({ "ok": true })))
}

async fn publish_page(
    admin: AdminCaller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Page>> {
    let id = parse_page_id(&id)?;
    Ok(Json(state.pages().publish_page(&admin.uid, id).await?))
}

async fn unpublish_page(
    admin: AdminCaller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Page>> {
    let id = parse_page_id(&id)?;
    Ok(Json(state.pages().unpublish_page(&admin.uid, id).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn requires_bearer_token() {
        let app = TestApp::new().await;
        let (status, body) = app
            .request(Method::GET, "/api/admin/pages", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication required");

        let (status, _) = app
            .request(Method::GET, "/api/admin/pages", Some("not-a-jwt"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_inactive_and_unknown_admins() {
        let app = TestApp::new().await;
        for token in [app.inactive_token(), app.stranger_token()] {
            let (status, body) = app
                .request(Method::GET, "/api/admin/pages", Some(&token), None)
                .await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["type"], "forbidden");
        }
    }

    #[tokio::test]
    async fn create_publish_and_delete_flow() {
        let app = TestApp::new().await;
        let token = app.admin_token();

        let (status, page) = app
            .request(
                Method::POST,
                "/api/admin/pages",
                Some(&token),
                Some(json!({"title": "Insurance FAQ"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(page["slug"], "insurance-faq");
        assert_eq!(page["path"], "/insurance-faq");
        assert_eq!(page["status"], "draft");
        assert_eq!(page["createdBy"], "admin-1");
        let id = page["id"].as_str().unwrap().to_string();

        let (status, page) = app
            .request(
                Method::PATCH,
                &format!("/api/admin/pages/{id}"),
                Some(&token),
                Some(json!({
                    "title": "Insurance FAQ",
                    "slug": "insurance-faq",
                    "draft": {
                        "blocks": [{
                            "id": "faq",
                            "type": "faq",
                            "data": {"emitSchema": true, "items": [{"question": "In network?", "answer": "Yes"}]}
                        }]
                    }
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["draft"]["blocks"][0]["type"], "faq");

        let (status, page) = app
            .request(
                Method::POST,
                &format!("/api/admin/pages/{id}/publish"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["status"], "published");

        let (status, body) = app
            .request(Method::DELETE, &format!("/api/admin/pages/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "state");

        let (status, _) = app
            .request(
                Method::POST,
                &format!("/api/admin/pages/{id}/unpublish"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .request(Method::DELETE, &format!("/api/admin/pages/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));

        let (status, _) = app
            .request(Method::GET, &format!("/api/admin/pages/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reserved_slug_is_a_bad_request() {
        let app = TestApp::new().await;
        let (status, body) = app
            .request(
                Method::POST,
                "/api/admin/pages",
                Some(&app.admin_token()),
                Some(json!({"title": "Admin", "slug": "admin"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "conflict");
        assert_eq!(body["statusCode"], 400);
    }

    #[tokio::test]
    async fn invalid_draft_reports_field_path() {
        let app = TestApp::new().await;
        let token = app.admin_token();
        let (_, page) = app
            .request(
                Method::POST,
                "/api/admin/pages",
                Some(&token),
                Some(json!({"title": "About the Team"})),
            )
            .await;
        let id = page["id"].as_str().unwrap();

        let (status, body) = app
            .request(
                Method::PATCH,
                &format!("/api/admin/pages/{id}"),
                Some(&token),
                Some(json!({
                    "title": "About the Team",
                    "slug": "about-the-team",
                    "draft": {"seo": {"canonicalPath": "about"}}
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("seo.canonicalPath"));
    }

    #[tokio::test]
    async fn list_filters_and_rejects_unknown_status() {
        let app = TestApp::new().await;
        let token = app.admin_token();
        app.request(
            Method::POST,
            "/api/admin/pages",
            Some(&token),
            Some(json!({"title": "Groups"})),
        )
        .await;

        let (status, body) = app
            .request(Method::GET, "/api/admin/pages?status=draft&kind=custom", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["slug"], "groups");

        let (status, body) = app
            .request(Method::GET, "/api/admin/pages?status=&kind=", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = app
            .request(Method::GET, "/api/admin/pages?status=archived", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mutations_on_unknown_ids_are_not_found() {
        let app = TestApp::new().await;
        let token = app.admin_token();
        for path in [
            "/api/admin/pages/not-a-uuid/publish".to_string(),
            format!("/api/admin/pages/{}/unpublish", uuid::Uuid::now_v7()),
        ] {
            let (status, _) = app.request(Method::POST, &path, Some(&token), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        }
    }
}
