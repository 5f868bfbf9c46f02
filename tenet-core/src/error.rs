// tenet-core/src/error.rs

use crate::domain::error::{DomainError, ErrorBag};
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TenetError {
    // --- ERREURS DU DOMAINE (recipe rules, unknown names, business outcomes) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, parsing, templating, registries) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- KEYED FAILURES collected across a fan-out (loads, writes, workers) ---
    #[error(transparent)]
    Aggregate(#[from] ErrorBag),
}

// Manual implementations to keep `?` ergonomics without duplicate variants
impl From<std::io::Error> for TenetError {
    fn from(err: std::io::Error) -> Self {
        TenetError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<serde_json::Error> for TenetError {
    fn from(err: serde_json::Error) -> Self {
        TenetError::Infrastructure(InfrastructureError::Json(err))
    }
}

impl TenetError {
    /// Rendering used by error sinks and the CLI: keyed aggregates print as
    /// pretty JSON, everything else as its message.
    pub fn to_report(&self) -> String {
        match self {
            TenetError::Aggregate(bag) => bag.json_pretty(),
            other => other.to_string(),
        }
    }
}
