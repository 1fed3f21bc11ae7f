use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AdminRecord, AdminStore, PageStore};
use crate::error::{CmsError, CmsResult};
use crate::page::model::UnknownVariant;
use crate::page::{Page, PageFilter, PageSnapshot};

const PAGE_COLUMNS: &str = "id, kind, status, slug, path, title, created_at, created_by, \
     updated_at, updated_by, published_at, published_by, draft, published";

/// Pages stored one row per document in `cms_pages`, snapshots as JSONB.
#[derive(Debug, Clone)]
pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a page.
#[derive(Debug, sqlx::FromRow)]
struct PageRow {
    id: Uuid,
    kind: String,
    status: String,
    slug: String,
    path: String,
    title: String,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
    published_at: Option<DateTime<Utc>>,
    published_by: Option<String>,
    draft: Json<PageSnapshot>,
    published: Option<Json<PageSnapshot>>,
}

impl TryFrom<PageRow> for Page {
    type Error = CmsError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |e: UnknownVariant| CmsError::Corrupt(format!("page {id}: {e}"));
        Ok(Page {
            id: row.id,
            kind: row.kind.parse().map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            slug: row.slug,
            path: row.path,
            title: row.title,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
            published_at: row.published_at,
            published_by: row.published_by,
            draft: row.draft.0,
            published: row.published.map(|json| json.0),
        })
    }
}

fn map_write_error(err: sqlx::Error, slug: &str) -> CmsError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            CmsError::SlugTaken(slug.to_string())
        }
        _ => CmsError::Database(err),
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn ping(&self) -> CmsResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CmsResult<Option<Page>> {
        let row: Option<PageRow> =
            sqlx::query_as(&format!("SELECT {PAGE_COLUMNS} FROM cms_pages WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Page::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> CmsResult<Option<Page>> {
        let row: Option<PageRow> =
            sqlx::query_as(&format!("SELECT {PAGE_COLUMNS} FROM cms_pages WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Page::try_from).transpose()
    }

    async fn slug_in_use(&self, slug: &str, exclude: Option<Uuid>) -> CmsResult<bool> {
        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM cms_pages WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(in_use)
    }

    async fn list(&self, filter: &PageFilter) -> CmsResult<Vec<Page>> {
        let rows: Vec<PageRow> = sqlx::query_as(&format!(
            "SELECT {PAGE_COLUMNS} FROM cms_pages \
             WHERE ($1::text IS NULL OR status = $1) AND ($2::text IS NULL OR kind = $2) \
             ORDER BY updated_at DESC, slug"
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.kind.map(|k| k.as_str()))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Page::try_from).collect()
    }

    async fn insert(&self, page: &Page) -> CmsResult<()> {
        sqlx::query(&format!(
            "INSERT INTO cms_pages ({PAGE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        ))
        .bind(page.id)
        .bind(page.kind.as_str())
        .bind(page.status.as_str())
        .bind(&page.slug)
        .bind(&page.path)
        .bind(&page.title)
        .bind(page.created_at)
        .bind(&page.created_by)
        .bind(page.updated_at)
        .bind(&page.updated_by)
        .bind(page.published_at)
        .bind(&page.published_by)
        .bind(Json(&page.draft))
        .bind(page.published.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &page.slug))?;
        Ok(())
    }

    async fn save(&self, page: &Page) -> CmsResult<()> {
        let result = sqlx::query(
            "UPDATE cms_pages SET kind = $2, status = $3, slug = $4, path = $5, title = $6, \
             updated_at = $7, updated_by = $8, published_at = $9, published_by = $10, \
             draft = $11, published = $12 \
             WHERE id = $1",
        )
        .bind(page.id)
        .bind(page.kind.as_str())
        .bind(page.status.as_str())
        .bind(&page.slug)
        .bind(&page.path)
        .bind(&page.title)
        .bind(page.updated_at)
        .bind(&page.updated_by)
        .bind(page.published_at)
        .bind(&page.published_by)
        .bind(Json(&page.draft))
        .bind(page.published.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &page.slug))?;

        if result.rows_affected() == 0 {
            return Err(CmsError::NotFound(page.id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> CmsResult<bool> {
        let result = sqlx::query("DELETE FROM cms_pages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn find_admin(&self, uid: &str) -> CmsResult<Option<AdminRecord>> {
        let record = sqlx::query_as::<_, AdminRecord>(
            "SELECT uid, email, active FROM cms_admins WHERE uid = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}
