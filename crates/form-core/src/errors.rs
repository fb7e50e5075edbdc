//! Errores específicos del motor de formularios.

use form_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormEngineError {
    #[error("form not initialized")] NotInitialized,
    #[error("form already initialized")] AlreadyInitialized,
    #[error("no form profile configured")] MissingProfile,
    #[error(transparent)] Domain(#[from] DomainError),
    #[error("internal: {0}")] Internal(String),
}
