//! Domain core for the practice website CMS: pages, snapshots, validation,
//! rendering and the storage seams the API server plugs into.

pub mod error;
pub mod page;
pub mod site;
pub mod store;

pub use error::{CmsError, CmsResult, ErrorKind};
