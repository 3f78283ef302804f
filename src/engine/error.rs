use thiserror::Error;

use crate::services::ServiceError;

/// Errors that abort a synchronization run
#[derive(Error, Debug)]
pub enum CoreError {
    /// The source file contains no keys
    #[error("The source mapping is empty; nothing to translate")]
    EmptySource,
    /// The translation service failed
    #[error("Translation service failed: {0}")]
    Service(#[from] ServiceError),
}
