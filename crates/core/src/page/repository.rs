use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::model::{Page, PageFilter, PageKind, PageStatus, PageSummary};
use super::slug::{build_path_from_slug, resolve_create_slug, validate_custom_slug};
use super::snapshot::PageSnapshot;
use super::templates::SYSTEM_PAGES;
use super::validate::{parse_snapshot, validate_snapshot, validate_title};
use crate::error::{CmsError, CmsResult};
use crate::store::PageStore;

/// Page lifecycle operations on top of a [`PageStore`].
///
/// Each mutation reads the current document, applies the change in memory and
/// writes the whole document back once. Concurrent edits are last-writer-wins.
#[derive(Clone)]
pub struct PageRepository {
    store: Arc<dyn PageStore>,
}

impl PageRepository {
    pub fn new(store: Arc<dyn PageStore>) -> Self {
        Self { store }
    }

    pub async fn ping(&self) -> CmsResult<()> {
        self.store.ping().await
    }

    pub async fn get_page(&self, id: Uuid) -> CmsResult<Page> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CmsError::NotFound(id.to_string()))
    }

    pub async fn list_pages(&self, filter: PageFilter) -> CmsResult<Vec<PageSummary>> {
        let pages = self.store.list(&filter).await?;
        Ok(pages.iter().map(Page::summary).collect())
    }

    /// The page at `slug`, but only while it is published.
    pub async fn find_published(&self, slug: &str) -> CmsResult<Option<Page>> {
        let page = self.store.find_by_slug(slug).await?;
        Ok(page.filter(Page::is_published))
    }

    pub async fn list_published(&self) -> CmsResult<Vec<Page>> {
        let filter = PageFilter {
            status: Some(PageStatus::Published),
            kind: None,
        };
        self.store.list(&filter).await
    }

    /// Create a custom page in `draft` status with an empty snapshot.
    pub async fn create_custom_page(
        &self,
        actor: &str,
        title: &str,
        slug: Option<&str>,
    ) -> CmsResult<Page> {
        let title = validate_title(title)?;
        let slug = resolve_create_slug(&title, slug)?;
        validate_custom_slug(&slug)?;
        if self.store.slug_in_use(&slug, None).await? {
            return Err(CmsError::SlugTaken(slug));
        }

        let now = Utc::now();
        let page = Page {
            id: Uuid::now_v7(),
            kind: PageKind::Custom,
            status: PageStatus::Draft,
            path: build_path_from_slug(&slug),
            slug,
            title: title.clone(),
            created_at: now,
            created_by: actor.to_string(),
            updated_at: now,
            updated_by: actor.to_string(),
            published_at: None,
            published_by: None,
            draft: PageSnapshot::empty(title),
            published: None,
        };
        self.store.insert(&page).await?;

        tracing::info!(page_id = %page.id, slug = %page.slug, actor, "created custom page");
        Ok(page)
    }

    /// Replace the draft snapshot and optionally move a custom page to a new
    /// slug. `title` overrides whatever title the payload carries.
    pub async fn update_page_draft(
        &self,
        actor: &str,
        id: Uuid,
        title: &str,
        slug: &str,
        draft: &Value,
    ) -> CmsResult<Page> {
        let mut page = self.get_page(id).await?;
        let title = validate_title(title)?;

        let requested_slug = slug.trim();
        if requested_slug != page.slug {
            // Slugs lock at first publish for now; unlocking needs redirects.
            if page.is_published() {
                return Err(CmsError::SlugLockedWhilePublished);
            }
            if page.kind == PageKind::System {
                return Err(CmsError::SlugImmutable);
            }
            validate_custom_slug(requested_slug)?;
            if self.store.slug_in_use(requested_slug, Some(id)).await? {
                return Err(CmsError::SlugTaken(requested_slug.to_string()));
            }
            page.slug = requested_slug.to_string();
        }

        let mut payload = draft.clone();
        if let Value::Object(fields) = &mut payload {
            fields.insert("title".into(), Value::String(title));
        }
        let snapshot = parse_snapshot(&payload)?;

        if page.kind == PageKind::Custom {
            page.path = build_path_from_slug(&page.slug);
        }
        page.draft = snapshot;
        page.updated_at = Utc::now();
        page.updated_by = actor.to_string();
        self.store.save(&page).await?;

        tracing::info!(page_id = %page.id, slug = %page.slug, actor, "updated page draft");
        Ok(page)
    }

    /// Make the current draft live.
    pub async fn publish_page(&self, actor: &str, id: Uuid) -> CmsResult<Page> {
        let mut page = self.get_page(id).await?;
        validate_snapshot(&page.draft)?;

        let now = Utc::now();
        page.title = page.draft.title.clone();
        page.published = Some(page.draft.clone());
        page.status = PageStatus::Published;
        page.published_at = Some(now);
        page.published_by = Some(actor.to_string());
        page.updated_at = now;
        page.updated_by = actor.to_string();
        self.store.save(&page).await?;

        tracing::info!(page_id = %page.id, slug = %page.slug, actor, "published page");
        Ok(page)
    }

    /// Take a page offline. The last published snapshot, if any, is kept.
    /// Always lands in `unpublished`, whatever the starting status.
    pub async fn unpublish_page(&self, actor: &str, id: Uuid) -> CmsResult<Page> {
        let mut page = self.get_page(id).await?;

        page.status = PageStatus::Unpublished;
        page.updated_at = Utc::now();
        page.updated_by = actor.to_string();
        self.store.save(&page).await?;

        tracing::info!(page_id = %page.id, slug = %page.slug, status = %page.status, actor, "unpublished page");
        Ok(page)
    }

    pub async fn delete_page(&self, id: Uuid) -> CmsResult<()> {
        let page = self.get_page(id).await?;
        if page.is_published() {
            return Err(CmsError::CannotDeletePublished);
        }
        if !self.store.delete(id).await? {
            return Err(CmsError::NotFound(id.to_string()));
        }

        tracing::info!(page_id = %id, slug = %page.slug, "deleted page");
        Ok(())
    }

    /// Insert any system page that does not exist yet, in `draft` status with
    /// its template content. Existing pages are never touched.
    pub async fn seed_system_pages(&self, actor: &str) -> CmsResult<Vec<Page>> {
        let mut seeded = Vec::new();
        for def in SYSTEM_PAGES {
            if self.store.find_by_slug(def.slug).await?.is_some() {
                continue;
            }
            let now = Utc::now();
            let page = Page {
                id: Uuid::now_v7(),
                kind: PageKind::System,
                status: PageStatus::Draft,
                slug: def.slug.to_string(),
                path: def.path.to_string(),
                title: def.title.to_string(),
                created_at: now,
                created_by: actor.to_string(),
                updated_at: now,
                updated_by: actor.to_string(),
                published_at: None,
                published_by: None,
                draft: (def.template)(),
                published: None,
            };
            self.store.insert(&page).await?;
            tracing::info!(slug = def.slug, "seeded system page");
            seeded.push(page);
        }
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::render::get_public_snapshot;
    use crate::store::MemoryPageStore;
    use serde_json::json;

    const ADMIN: &str = "admin-1";

    fn repo() -> PageRepository {
        PageRepository::new(Arc::new(MemoryPageStore::new()))
    }

    #[tokio::test]
    async fn create_derives_slug_from_title() {
        let repo = repo();
        let page = repo
            .create_custom_page(ADMIN, "Insurance FAQ", None)
            .await
            .unwrap();

        assert_eq!(page.slug, "insurance-faq");
        assert_eq!(page.path, "/insurance-faq");
        assert_eq!(page.status, PageStatus::Draft);
        assert_eq!(page.kind, PageKind::Custom);
        assert_eq!(page.draft.title, "Insurance FAQ");
        assert!(page.draft.blocks.is_empty());
        assert!(page.published.is_none());
        assert_eq!(page.created_by, ADMIN);
    }

    #[tokio::test]
    async fn create_with_reserved_slug_fails() {
        let repo = repo();
        let err = repo
            .create_custom_page(ADMIN, "Admin", Some("admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::ReservedSlug(_)));
        assert!(repo.list_pages(PageFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_with_taken_slug_fails() {
        let repo = repo();
        repo.create_custom_page(ADMIN, "Insurance FAQ", None)
            .await
            .unwrap();
        let err = repo
            .create_custom_page(ADMIN, "Another", Some("insurance-faq"))
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::SlugTaken(_)));
    }

    #[tokio::test]
    async fn update_replaces_draft_and_moves_slug() {
        let repo = repo();
        let page = repo.create_custom_page(ADMIN, "Rates", None).await.unwrap();

        let updated = repo
            .update_page_draft(
                "admin-2",
                page.id,
                "Rates and Insurance",
                "rates-and-insurance",
                &json!({
                    "blocks": [{"id": "b1", "type": "rich_text", "data": {"body": "Our fees"}}],
                    "nav": {"showInFooter": true}
                }),
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "rates-and-insurance");
        assert_eq!(updated.path, "/rates-and-insurance");
        assert_eq!(updated.draft.title, "Rates and Insurance");
        assert_eq!(updated.draft.blocks.len(), 1);
        assert_eq!(updated.updated_by, "admin-2");
        assert_eq!(repo.get_page(page.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_rejects_slug_of_another_page() {
        let repo = repo();
        repo.create_custom_page(ADMIN, "Rates", None).await.unwrap();
        let page = repo.create_custom_page(ADMIN, "Fees", None).await.unwrap();

        let err = repo
            .update_page_draft(ADMIN, page.id, "Fees", "rates", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::SlugTaken(_)));
    }

    #[tokio::test]
    async fn update_unknown_page_is_not_found() {
        let err = repo()
            .update_page_draft(ADMIN, Uuid::now_v7(), "T", "t", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_draft_is_not_persisted() {
        let repo = repo();
        let page = repo.create_custom_page(ADMIN, "About", Some("about-us")).await.unwrap();

        let err = repo
            .update_page_draft(
                ADMIN,
                page.id,
                "About",
                "about-us",
                &json!({"seo": {"canonicalPath": "about"}}),
            )
            .await
            .unwrap_err();
        match err {
            CmsError::InvalidSnapshot(field) => assert_eq!(field.path, "seo.canonicalPath"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(repo.get_page(page.id).await.unwrap(), page);
    }

    #[tokio::test]
    async fn system_page_slug_is_immutable() {
        let repo = repo();
        let seeded = repo.seed_system_pages("seed").await.unwrap();
        let privacy = seeded.iter().find(|p| p.slug == "privacy-policy").unwrap();

        let err = repo
            .update_page_draft(ADMIN, privacy.id, "Privacy", "privacy", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::SlugImmutable));

        let updated = repo
            .update_page_draft(ADMIN, privacy.id, "Privacy", "privacy-policy", &json!({}))
            .await
            .unwrap();
        assert_eq!(updated.path, "/privacy-policy");
    }

    #[tokio::test]
    async fn published_slug_is_locked() {
        let repo = repo();
        let page = repo.create_custom_page(ADMIN, "Insurance FAQ", None).await.unwrap();
        repo.publish_page(ADMIN, page.id).await.unwrap();

        let err = repo
            .update_page_draft(ADMIN, page.id, "Insurance FAQ", "faq", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::SlugLockedWhilePublished));

        let updated = repo
            .update_page_draft(ADMIN, page.id, "Insurance Questions", "insurance-faq", &json!({}))
            .await
            .unwrap();
        assert_eq!(updated.slug, "insurance-faq");
        assert_eq!(updated.path, "/insurance-faq");
        assert_eq!(updated.status, PageStatus::Published);
        // The live title only changes on the next publish.
        assert_eq!(updated.title, "Insurance FAQ");
    }

    #[tokio::test]
    async fn publish_snapshot_survives_unpublish() {
        let repo = repo();
        let page = repo.create_custom_page(ADMIN, "Groups", None).await.unwrap();
        let draft = json!({
            "blocks": [{"id": "intro", "type": "rich_text", "data": {"body": "Weekly groups"}}]
        });
        repo.update_page_draft(ADMIN, page.id, "Groups", "groups", &draft)
            .await
            .unwrap();

        let published = repo.publish_page("publisher", page.id).await.unwrap();
        let live = published.draft.clone();
        assert_eq!(published.status, PageStatus::Published);
        assert_eq!(published.published.as_ref(), Some(&live));
        assert_eq!(published.published_by.as_deref(), Some("publisher"));
        assert!(published.published_at.is_some());

        repo.update_page_draft(ADMIN, page.id, "Groups (new)", "groups", &json!({}))
            .await
            .unwrap();
        let unpublished = repo.unpublish_page(ADMIN, page.id).await.unwrap();

        assert_eq!(unpublished.status, PageStatus::Unpublished);
        assert_eq!(get_public_snapshot(&unpublished), &live);
        assert!(repo.find_published("groups").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unpublish_is_idempotent() {
        let repo = repo();
        let page = repo.create_custom_page(ADMIN, "Groups", None).await.unwrap();
        repo.publish_page(ADMIN, page.id).await.unwrap();

        let first = repo.unpublish_page(ADMIN, page.id).await.unwrap();
        let second = repo.unpublish_page("admin-2", page.id).await.unwrap();

        assert_eq!(first.status, PageStatus::Unpublished);
        assert_eq!(second.status, PageStatus::Unpublished);
        assert_eq!(second.published, first.published);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(second.updated_by, "admin-2");
    }

    #[tokio::test]
    async fn unpublish_moves_draft_to_unpublished() {
        let repo = repo();
        let page = repo.create_custom_page(ADMIN, "Groups", None).await.unwrap();
        let after = repo.unpublish_page(ADMIN, page.id).await.unwrap();

        assert_eq!(after.status, PageStatus::Unpublished);
        assert!(after.published.is_none());
        assert!(repo.find_published("groups").await.unwrap().is_none());
        repo.delete_page(page.id).await.unwrap();
    }

    #[tokio::test]
    async fn publish_revalidates_stored_draft() {
        let store = Arc::new(MemoryPageStore::new());
        let repo = PageRepository::new(store.clone());
        let mut page = repo.create_custom_page(ADMIN, "About", Some("about-us")).await.unwrap();

        page.draft.seo.canonical_path = Some("about".into());
        store.save(&page).await.unwrap();

        let err = repo.publish_page(ADMIN, page.id).await.unwrap_err();
        assert!(matches!(err, CmsError::InvalidSnapshot(_)));
        let stored = repo.get_page(page.id).await.unwrap();
        assert_eq!(stored.status, PageStatus::Draft);
        assert!(stored.published.is_none());
    }

    #[tokio::test]
    async fn published_page_cannot_be_deleted() {
        let repo = repo();
        let page = repo.create_custom_page(ADMIN, "Groups", None).await.unwrap();
        repo.publish_page(ADMIN, page.id).await.unwrap();

        assert!(matches!(
            repo.delete_page(page.id).await,
            Err(CmsError::CannotDeletePublished)
        ));

        repo.unpublish_page(ADMIN, page.id).await.unwrap();
        repo.delete_page(page.id).await.unwrap();
        assert!(matches!(
            repo.get_page(page.id).await,
            Err(CmsError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete_page(page.id).await,
            Err(CmsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_status_and_kind() {
        let repo = repo();
        repo.seed_system_pages("seed").await.unwrap();
        let page = repo.create_custom_page(ADMIN, "Groups", None).await.unwrap();
        repo.publish_page(ADMIN, page.id).await.unwrap();

        let custom = repo
            .list_pages(PageFilter {
                status: None,
                kind: Some(PageKind::Custom),
            })
            .await
            .unwrap();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].slug, "groups");

        let published = repo.list_published().await.unwrap();
        assert_eq!(published.len(), 1);

        let drafts = repo
            .list_pages(PageFilter {
                status: Some(PageStatus::Draft),
                kind: Some(PageKind::System),
            })
            .await
            .unwrap();
        assert_eq!(drafts.len(), SYSTEM_PAGES.len());
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let repo = repo();
        let first = repo.seed_system_pages("seed").await.unwrap();
        assert_eq!(first.len(), SYSTEM_PAGES.len());
        let home = first.iter().find(|p| p.slug == "home").unwrap();
        assert_eq!(home.path, "/");
        assert!(repo.seed_system_pages("seed").await.unwrap().is_empty());
    }
}
