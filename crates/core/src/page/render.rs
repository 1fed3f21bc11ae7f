//! Public output: which snapshot a page shows, plus the SEO metadata and
//! JSON-LD derived from it.

use serde::Serialize;
use serde_json::{json, Value};

use super::model::Page;
use super::snapshot::{Block, BlockBody, FaqBlock, PageSnapshot};

/// Origin used when no site URL is configured.
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// The snapshot to display: the published one when present, otherwise the
/// draft. Public routes must check `status == Published` before calling this;
/// the draft fallback is for admin previews.
pub fn get_public_snapshot(page: &Page) -> &PageSnapshot {
    page.published.as_ref().unwrap_or(&page.draft)
}

/// Resolve a site-relative path against the configured origin.
pub fn build_site_url(base: Option<&str>, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_SITE_URL)
        .trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// JSON-LD objects for the page's public snapshot.
pub fn build_json_ld_schemas(page: &Page) -> Vec<Value> {
    snapshot_schemas(get_public_snapshot(page))
}

fn snapshot_schemas(snapshot: &PageSnapshot) -> Vec<Value> {
    let mut schemas = Vec::new();

    if let Some(raw) = &snapshot.seo.schema_json {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => schemas.push(Value::Object(object)),
            Ok(Value::Array(items)) => schemas.extend(items),
            Ok(_) => {}
            Err(e) => tracing::debug!("ignoring unparsable schema JSON: {e}"),
        }
    }

    for block in snapshot.blocks.iter().filter(|b| b.visible) {
        if let BlockBody::Faq(faq) = &block.body {
            if let Some(schema) = faq_schema(faq) {
                schemas.push(schema);
            }
        }
    }

    schemas
}

fn faq_schema(faq: &FaqBlock) -> Option<Value> {
    if !faq.emit_schema {
        return None;
    }
    let entities: Vec<Value> = faq
        .valid_items()
        .map(|item| {
            json!({
                "@type": "Question",
                "name": item.question.trim(),
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": item.answer.trim(),
                },
            })
        })
        .collect();
    if entities.is_empty() {
        return None;
    }
    Some(json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": entities,
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: Option<String>,
    pub canonical_url: String,
    pub robots: String,
    pub open_graph: OpenGraph,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Derive head metadata, falling back to the snapshot title and page path
/// where SEO fields are unset.
pub fn build_page_metadata(page: &Page, base: Option<&str>) -> PageMetadata {
    snapshot_metadata(&page.path, get_public_snapshot(page), base)
}

fn snapshot_metadata(path: &str, snapshot: &PageSnapshot, base: Option<&str>) -> PageMetadata {
    let seo = &snapshot.seo;
    let title = seo
        .meta_title
        .clone()
        .unwrap_or_else(|| snapshot.title.clone());
    let canonical_url = build_site_url(base, seo.canonical_path.as_deref().unwrap_or(path));
    let robots = format!(
        "{}, {}",
        if seo.no_index { "noindex" } else { "index" },
        if seo.no_follow { "nofollow" } else { "follow" },
    );

    PageMetadata {
        open_graph: OpenGraph {
            title: seo.og_title.clone().unwrap_or_else(|| title.clone()),
            description: seo
                .og_description
                .clone()
                .or_else(|| seo.meta_description.clone()),
            url: canonical_url.clone(),
            image: seo.og_image.as_deref().map(|image| build_site_url(base, image)),
            kind: "website",
        },
        title,
        description: seo.meta_description.clone(),
        canonical_url,
        robots,
    }
}

/// Everything a public route needs to render one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPage {
    pub slug: String,
    pub path: String,
    pub title: String,
    pub blocks: Vec<Block>,
    pub metadata: PageMetadata,
    pub schemas: Vec<Value>,
}

pub fn render_public_page(page: &Page, base: Option<&str>) -> PublicPage {
    render_snapshot(&page.slug, &page.path, get_public_snapshot(page), base)
}

/// Render a snapshot that is not (or not yet) backed by a stored page, such
/// as a system page template.
pub fn render_snapshot(
    slug: &str,
    path: &str,
    snapshot: &PageSnapshot,
    base: Option<&str>,
) -> PublicPage {
    PublicPage {
        slug: slug.to_string(),
        path: path.to_string(),
        title: snapshot.title.clone(),
        blocks: snapshot.blocks.iter().filter_map(renderable_block).collect(),
        metadata: snapshot_metadata(path, snapshot, base),
        schemas: snapshot_schemas(snapshot),
    }
}

/// Hidden blocks are dropped and FAQ blocks lose incomplete items.
fn renderable_block(block: &Block) -> Option<Block> {
    if !block.visible {
        return None;
    }
    let body = match &block.body {
        BlockBody::Faq(faq) => BlockBody::Faq(FaqBlock {
            title: faq.title.clone(),
            items: faq.valid_items().cloned().collect(),
            emit_schema: faq.emit_schema,
        }),
        body @ (BlockBody::Hero(_)
        | BlockBody::RichText(_)
        | BlockBody::ImageText(_)
        | BlockBody::CtaBand(_)
        | BlockBody::CmsLinks(_)
        | BlockBody::ImageCarousel(_)
        | BlockBody::TrustBar(_)
        | BlockBody::ProcessSteps(_)
        | BlockBody::InsuranceStrip(_)
        | BlockBody::Testimonials(_)
        | BlockBody::PricingCards(_)
        | BlockBody::VideoEmbed(_)
        | BlockBody::TeamGrid(_)) => body.clone(),
    };
    Some(Block {
        id: block.id.clone(),
        visible: true,
        body,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Navigation {
    pub header: Vec<NavLink>,
    pub footer: Vec<NavLink>,
}

/// Header and footer links from the published snapshots of `pages`,
/// ordered by nav order then label. Unpublished pages are skipped.
pub fn build_navigation(pages: &[Page]) -> Navigation {
    let mut nav = Navigation::default();
    for page in pages.iter().filter(|p| p.is_published()) {
        let Some(snapshot) = &page.published else {
            continue;
        };
        let link = NavLink {
            label: snapshot
                .nav
                .nav_label
                .clone()
                .unwrap_or_else(|| snapshot.title.clone()),
            href: page.path.clone(),
            order: snapshot.nav.nav_order,
        };
        if snapshot.nav.show_in_header {
            nav.header.push(link.clone());
        }
        if snapshot.nav.show_in_footer {
            nav.footer.push(link);
        }
    }
    for links in [&mut nav.header, &mut nav.footer] {
        links.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.label.cmp(&b.label)));
    }
    nav
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::model::{PageKind, PageStatus};
    use crate::page::snapshot::{FaqItem, RichTextBlock};
    use chrono::Utc;
    use uuid::Uuid;

    fn page_with(snapshot: PageSnapshot, status: PageStatus) -> Page {
        let now = Utc::now();
        Page {
            id: Uuid::now_v7(),
            kind: PageKind::Custom,
            status,
            slug: "insurance-faq".into(),
            path: "/insurance-faq".into(),
            title: snapshot.title.clone(),
            created_at: now,
            created_by: "a".into(),
            updated_at: now,
            updated_by: "a".into(),
            published_at: None,
            published_by: None,
            published: (status == PageStatus::Published).then(|| snapshot.clone()),
            draft: snapshot,
        }
    }

    fn faq_block(id: &str, items: &[(&str, &str)], emit_schema: bool) -> Block {
        Block::new(
            id,
            BlockBody::Faq(FaqBlock {
                title: None,
                items: items
                    .iter()
                    .map(|(q, a)| FaqItem {
                        question: q.to_string(),
                        answer: a.to_string(),
                    })
                    .collect(),
                emit_schema,
            }),
        )
    }

    #[test]
    fn public_snapshot_prefers_published() {
        let mut page = page_with(PageSnapshot::empty("Live"), PageStatus::Published);
        page.draft = PageSnapshot::empty("Work in progress");
        assert_eq!(get_public_snapshot(&page).title, "Live");

        page.published = None;
        assert_eq!(get_public_snapshot(&page).title, "Work in progress");
    }

    #[test]
    fn site_url_joins_paths() {
        assert_eq!(build_site_url(None, "/about"), "http://localhost:3000/about");
        assert_eq!(
            build_site_url(Some("https://example.com/"), "about"),
            "https://example.com/about"
        );
        assert_eq!(build_site_url(Some("  "), "/"), "http://localhost:3000/");
        assert_eq!(
            build_site_url(Some("https://example.com"), "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn faq_with_only_incomplete_items_emits_no_schema() {
        let mut snapshot = PageSnapshot::empty("FAQ");
        snapshot.blocks = vec![faq_block("faq", &[("", "x")], true)];
        let page = page_with(snapshot, PageStatus::Published);

        assert!(build_json_ld_schemas(&page).is_empty());
        let rendered = render_public_page(&page, None);
        match &rendered.blocks[0].body {
            BlockBody::Faq(faq) => assert!(faq.items.is_empty()),
            other => panic!("expected faq, got {}", other.type_name()),
        }
    }

    #[test]
    fn faq_schema_lists_only_complete_items() {
        let mut snapshot = PageSnapshot::empty("FAQ");
        snapshot.blocks = vec![
            faq_block("faq", &[("", "x"), ("Do you offer telehealth?", "Yes.")], true),
            faq_block("quiet", &[("Q", "A")], false),
        ];
        let mut hidden = faq_block("hidden", &[("Q", "A")], true);
        hidden.visible = false;
        snapshot.blocks.push(hidden);
        let page = page_with(snapshot, PageStatus::Published);

        let schemas = build_json_ld_schemas(&page);
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0]["@type"], "FAQPage");
        let entities = schemas[0]["mainEntity"].as_array().unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0]["name"], "Do you offer telehealth?");
        assert_eq!(entities[0]["acceptedAnswer"]["text"], "Yes.");
    }

    #[test]
    fn custom_schema_is_merged_and_invalid_ignored() {
        let mut snapshot = PageSnapshot::empty("About");
        snapshot.seo.schema_json =
            Some(r#"[{"@type":"Organization"},{"@type":"WebSite"}]"#.into());
        let page = page_with(snapshot.clone(), PageStatus::Published);
        assert_eq!(build_json_ld_schemas(&page).len(), 2);

        snapshot.seo.schema_json = Some(r#"{"@type":"LocalBusiness"}"#.into());
        let page = page_with(snapshot.clone(), PageStatus::Published);
        assert_eq!(build_json_ld_schemas(&page)[0]["@type"], "LocalBusiness");

        snapshot.seo.schema_json = Some("{broken".into());
        let page = page_with(snapshot, PageStatus::Published);
        assert!(build_json_ld_schemas(&page).is_empty());
    }

    #[test]
    fn metadata_falls_back_to_title_and_path() {
        let page = page_with(PageSnapshot::empty("Insurance FAQ"), PageStatus::Published);
        let meta = build_page_metadata(&page, Some("https://practice.example"));
        assert_eq!(meta.title, "Insurance FAQ");
        assert_eq!(meta.canonical_url, "https://practice.example/insurance-faq");
        assert_eq!(meta.robots, "index, follow");
        assert_eq!(meta.open_graph.title, "Insurance FAQ");
        assert_eq!(meta.open_graph.image, None);
    }

    #[test]
    fn metadata_uses_seo_overrides() {
        let mut snapshot = PageSnapshot::empty("Insurance FAQ");
        snapshot.seo.meta_title = Some("Insurance | Practice".into());
        snapshot.seo.meta_description = Some("Coverage questions".into());
        snapshot.seo.canonical_path = Some("/faq".into());
        snapshot.seo.og_image = Some("/images/og.png".into());
        snapshot.seo.no_index = true;
        let page = page_with(snapshot, PageStatus::Published);

        let meta = build_page_metadata(&page, None);
        assert_eq!(meta.title, "Insurance | Practice");
        assert_eq!(meta.canonical_url, "http://localhost:3000/faq");
        assert_eq!(meta.robots, "noindex, follow");
        assert_eq!(meta.open_graph.description.as_deref(), Some("Coverage questions"));
        assert_eq!(
            meta.open_graph.image.as_deref(),
            Some("http://localhost:3000/images/og.png")
        );
    }

    #[test]
    fn hidden_blocks_are_not_rendered() {
        let mut snapshot = PageSnapshot::empty("About");
        let mut hidden = Block::new(
            "draft-note",
            BlockBody::RichText(RichTextBlock {
                title: None,
                body: "internal".into(),
            }),
        );
        hidden.visible = false;
        snapshot.blocks = vec![hidden];
        let page = page_with(snapshot, PageStatus::Published);
        assert!(render_public_page(&page, None).blocks.is_empty());
    }

    #[test]
    fn navigation_orders_published_links() {
        let mut a = PageSnapshot::empty("Groups");
        a.nav.show_in_header = true;
        a.nav.nav_order = 2;
        let mut b = PageSnapshot::empty("Insurance FAQ");
        b.nav.show_in_header = true;
        b.nav.show_in_footer = true;
        b.nav.nav_label = Some("FAQ".into());
        b.nav.nav_order = 1;
        let mut c = PageSnapshot::empty("Hidden");
        c.nav.show_in_header = true;

        let mut first = page_with(a, PageStatus::Published);
        first.path = "/groups".into();
        let second = page_with(b, PageStatus::Published);
        let draft = page_with(c, PageStatus::Draft);

        let nav = build_navigation(&[first, second, draft]);
        let header: Vec<_> = nav.header.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(header, ["FAQ", "Groups"]);
        assert_eq!(nav.footer.len(), 1);
        assert_eq!(nav.footer[0].href, "/insurance-faq");
    }
}
