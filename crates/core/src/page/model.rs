use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snapshot::PageSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Tied to a fixed route and seeded out-of-band. Slug and path never change.
    System,
    /// Created from the admin panel.
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Draft,
    Published,
    Unpublished,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::System => "system",
            PageKind::Custom => "custom",
        }
    }
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Unpublished => "unpublished",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value: {value}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl FromStr for PageKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(PageKind::System),
            "custom" => Ok(PageKind::Custom),
            other => Err(UnknownVariant {
                field: "kind",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for PageStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PageStatus::Draft),
            "published" => Ok(PageStatus::Published),
            "unpublished" => Ok(PageStatus::Unpublished),
            other => Err(UnknownVariant {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// One routable page with its working draft and last published snapshot.
///
/// `published` is always present while `status` is `Published`. After an
/// unpublish it is kept so the last live content can be inspected or
/// published again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: Uuid,
    pub kind: PageKind,
    pub status: PageStatus,
    pub slug: String,
    pub path: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    pub published_at: Option<DateTime<Utc>>,
    pub published_by: Option<String>,
    pub draft: PageSnapshot,
    pub published: Option<PageSnapshot>,
}

impl Page {
    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.id,
            kind: self.kind,
            status: self.status,
            slug: self.slug.clone(),
            path: self.path.clone(),
            title: self.title.clone(),
            updated_at: self.updated_at,
            published_at: self.published_at,
            show_in_header: self.draft.nav.show_in_header,
            show_in_footer: self.draft.nav.show_in_footer,
        }
    }
}

/// Lightweight row for admin list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: Uuid,
    pub kind: PageKind,
    pub status: PageStatus,
    pub slug: String,
    pub path: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub show_in_header: bool,
    pub show_in_footer: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageFilter {
    pub status: Option<PageStatus>,
    pub kind: Option<PageKind>,
}

impl PageFilter {
    pub fn matches(&self, page: &Page) -> bool {
        self.status.map_or(true, |s| s == page.status)
            && self.kind.map_or(true, |k| k == page.kind)
    }
}
