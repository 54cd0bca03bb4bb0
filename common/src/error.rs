//! Error types returned by catalog clients.

/// Errors a [`crate::client::CatalogClient`] can report for a single call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The requested entity does not exist in the catalog.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up (e.g. `service`, `repository`).
        kind: &'static str,
        /// Alias or id used for the lookup.
        key: String,
    },

    /// The entity already exists and cannot be created again.
    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: &'static str, key: String },

    /// The catalog refused the request.
    #[error("request rejected: {message}")]
    Rejected { message: String },

    /// The request never reached the catalog or the response was unusable.
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl CatalogError {
    #[must_use]
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn already_exists(kind: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
