//! Storage seams. The repository talks to a [`PageStore`]; the API's auth
//! layer talks to an [`AdminStore`]. Both are object safe so the server can
//! hold them behind `Arc<dyn _>` and tests can swap in the memory versions.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CmsResult;
use crate::page::{Page, PageFilter};

pub use memory::{MemoryAdminStore, MemoryPageStore};
pub use postgres::{PgAdminStore, PgPageStore};

/// Document-level persistence for pages.
///
/// Every write replaces the whole document. There is no revision check, so
/// concurrent writers resolve as last-writer-wins.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Cheap connectivity check for health endpoints.
    async fn ping(&self) -> CmsResult<()>;

    async fn get(&self, id: Uuid) -> CmsResult<Option<Page>>;

    async fn find_by_slug(&self, slug: &str) -> CmsResult<Option<Page>>;

    /// Whether any page other than `exclude` already uses `slug`.
    async fn slug_in_use(&self, slug: &str, exclude: Option<Uuid>) -> CmsResult<bool>;

    /// Pages matching `filter`, most recently updated first.
    async fn list(&self, filter: &PageFilter) -> CmsResult<Vec<Page>>;

    /// Insert a new page. Fails with `SlugTaken` if the slug is in use.
    async fn insert(&self, page: &Page) -> CmsResult<()>;

    /// Overwrite an existing page. Fails with `NotFound` if it is gone.
    async fn save(&self, page: &Page) -> CmsResult<()>;

    /// Remove a page. Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> CmsResult<bool>;
}

/// A row in the admin allow-list. Only `active` admins may call the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminRecord {
    pub uid: String,
    pub email: Option<String>,
    pub active: bool,
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_admin(&self, uid: &str) -> CmsResult<Option<AdminRecord>>;
}
