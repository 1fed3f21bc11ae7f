use std::fmt;

use thiserror::Error;

/// Broad category of a [`CmsError`]. The HTTP layer maps this to a status
/// code; callers never inspect the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    State,
    Upstream,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "notFound",
            ErrorKind::Conflict => "conflict",
            ErrorKind::State => "state",
            ErrorKind::Upstream => "upstream",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single snapshot violation, located by its JSON path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("invalid slug: {0}")]
    InvalidSlug(String),

    #[error("slug is reserved: {0}")]
    ReservedSlug(String),

    #[error("slug is already taken: {0}")]
    SlugTaken(String),

    #[error("system page slugs cannot be changed")]
    SlugImmutable,

    #[error("slug cannot be changed while the page is published")]
    SlugLockedWhilePublished,

    #[error("invalid title: {0}")]
    InvalidTitle(String),

    #[error("invalid snapshot at {0}")]
    InvalidSnapshot(#[from] FieldError),

    #[error("page not found: {0}")]
    NotFound(String),

    #[error("published pages cannot be deleted; unpublish first")]
    CannotDeletePublished,

    #[error("stored page is corrupt: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CmsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CmsError::InvalidSlug(_) | CmsError::InvalidTitle(_) | CmsError::InvalidSnapshot(_) => {
                ErrorKind::Validation
            }
            CmsError::ReservedSlug(_)
            | CmsError::SlugTaken(_)
            | CmsError::SlugImmutable
            | CmsError::SlugLockedWhilePublished => ErrorKind::Conflict,
            CmsError::NotFound(_) => ErrorKind::NotFound,
            CmsError::CannotDeletePublished => ErrorKind::State,
            CmsError::Corrupt(_) | CmsError::Database(_) => ErrorKind::Upstream,
        }
    }
}

pub type CmsResult<T> = Result<T, CmsError>;
