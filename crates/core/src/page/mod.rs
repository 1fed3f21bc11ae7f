pub mod model;
pub mod render;
pub mod repository;
pub mod slug;
pub mod snapshot;
pub mod templates;
pub mod validate;

pub use model::{Page, PageFilter, PageKind, PageStatus, PageSummary};
pub use repository::PageRepository;
pub use snapshot::{Block, BlockBody, NavFields, PageSnapshot, SeoFields};
