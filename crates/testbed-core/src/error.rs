use crate::types::EntityId;

/// Core error type for the testbed system.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("entity not found: {0}")]
    NotFound(EntityId),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short, stable name of the error variant, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Database(_) => "database",
            Self::Internal(_) => "internal",
        }
    }
}
