use thiserror::Error;

use crate::backend::AnyStoreError;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Firestore project not configured. Set MENUBIBLE_PROJECT_ID or configure ~/.config/menubible/config.toml")]
    ProjectNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seed file error: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] AnyStoreError),

    #[error("{0}")]
    Form(#[from] menubible_core::FormError),

    #[error("Incorrect passcode")]
    Denied,

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

impl From<menubible_core::SubmitError<AnyStoreError>> for ToolError {
    fn from(e: menubible_core::SubmitError<AnyStoreError>) -> Self {
        match e {
            menubible_core::SubmitError::Invalid(e) => ToolError::Form(e),
            menubible_core::SubmitError::Store(e) => ToolError::Store(e),
        }
    }
}
