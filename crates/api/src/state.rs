use std::sync::Arc;

use practice_cms_core::page::PageRepository;
use practice_cms_core::store::AdminStore;

use crate::config::AppConfig;
use crate::storage::ObjectStore;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    pages: PageRepository,
    admins: Arc<dyn AdminStore>,
    objects: Arc<dyn ObjectStore>,
    config: AppConfig,
}

impl AppState {
    pub fn new(
        pages: PageRepository,
        admins: Arc<dyn AdminStore>,
        objects: Arc<dyn ObjectStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            inner: Arc::new(InnerState {
                pages,
                admins,
                objects,
                config,
            }),
        }
    }

    pub fn pages(&self) -> &PageRepository {
        &self.inner.pages
    }

    pub fn admins(&self) -> &dyn AdminStore {
        self.inner.admins.as_ref()
    }

    pub fn objects(&self) -> &dyn ObjectStore {
        self.inner.objects.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }
}
