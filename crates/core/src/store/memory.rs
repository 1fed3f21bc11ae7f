use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AdminRecord, AdminStore, PageStore};
use crate::error::{CmsError, CmsResult};
use crate::page::{Page, PageFilter};

/// In-process page store. Used by tests and local tooling.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: RwLock<HashMap<Uuid, Page>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn ping(&self) -> CmsResult<()> {
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CmsResult<Option<Page>> {
        Ok(self.pages.read().await.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> CmsResult<Option<Page>> {
        let pages = self.pages.read().await;
        Ok(pages.values().find(|page| page.slug == slug).cloned())
    }

    async fn slug_in_use(&self, slug: &str, exclude: Option<Uuid>) -> CmsResult<bool> {
        let pages = self.pages.read().await;
        Ok(pages
            .values()
            .any(|page| page.slug == slug && Some(page.id) != exclude))
    }

    async fn list(&self, filter: &PageFilter) -> CmsResult<Vec<Page>> {
        let pages = self.pages.read().await;
        let mut matching: Vec<Page> = pages
            .values()
            .filter(|page| filter.matches(page))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.slug.cmp(&b.slug)));
        Ok(matching)
    }

    async fn insert(&self, page: &Page) -> CmsResult<()> {
        let mut pages = self.pages.write().await;
        if pages.values().any(|existing| existing.slug == page.slug) {
            return Err(CmsError::SlugTaken(page.slug.clone()));
        }
        pages.insert(page.id, page.clone());
        Ok(())
    }

    async fn save(&self, page: &Page) -> CmsResult<()> {
        let mut pages = self.pages.write().await;
        if pages
            .values()
            .any(|existing| existing.slug == page.slug && existing.id != page.id)
        {
            return Err(CmsError::SlugTaken(page.slug.clone()));
        }
        match pages.get_mut(&page.id) {
            Some(existing) => {
                *existing = page.clone();
                Ok(())
            }
            None => Err(CmsError::NotFound(page.id.to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> CmsResult<bool> {
        Ok(self.pages.write().await.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct MemoryAdminStore {
    admins: RwLock<HashMap<String, AdminRecord>>,
}

impl MemoryAdminStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, record: AdminRecord) {
        self.admins.write().await.insert(record.uid.clone(), record);
    }
}

#[async_trait]
impl AdminStore for MemoryAdminStore {
    async fn find_admin(&self, uid: &str) -> CmsResult<Option<AdminRecord>> {
        Ok(self.admins.read().await.get(uid).cloned())
    }
}
