// tenet-core/src/ports/mod.rs

//! Contracts between the pipeline core and its pluggable parts. Factories
//! are resolved by name through the registries at pipeline construction.

use crate::domain::model::{Data, Severity};
use crate::domain::snippet::Snippet;
use crate::error::TenetError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Filter applied to candidate paths during exploration and dir reads.
pub type PathFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Reads one document, or every matching document under a root.
pub trait Reader: Send + Sync {
    fn read_one(&self) -> Result<Data, TenetError>;
    fn read_all(&self) -> Result<Vec<Data>, TenetError>;
}

/// Writes one document. Instances are shared across workers and must
/// serialize internally.
pub trait Writer: Send + Sync {
    fn write(&self, data: &Data) -> Result<(), TenetError>;
}

/// Progress reporting for one resource run.
pub trait Progress: Send + Sync {
    fn advance(&self, n: u64);
    fn finish(&self);
}

/// The entire contract with the scripting runtime. Implementations must be
/// safe for concurrent `evaluate` calls.
pub trait SnippetEngine: Send + Sync {
    fn evaluate(&self, name: &str, snippet: &Snippet) -> Result<String, TenetError>;
}

pub type ReaderFactory =
    Arc<dyn Fn(PathBuf, Option<PathFilter>) -> Box<dyn Reader> + Send + Sync>;

pub type WriterFactory = Arc<dyn Fn(Severity) -> Arc<dyn Writer> + Send + Sync>;

/// Re-encodes content from one format to another.
pub type Formatter = Arc<dyn Fn(&[u8]) -> Result<Vec<u8>, TenetError> + Send + Sync>;

pub type ExplorerFn =
    Arc<dyn Fn(&Path, Option<PathFilter>) -> Result<Vec<PathBuf>, TenetError> + Send + Sync>;

pub type ProgressFactory = Arc<dyn Fn(&str, u64) -> Box<dyn Progress> + Send + Sync>;

/// Decodes raw recipe bytes into a JSON value.
pub type DecodeFn =
    Arc<dyn Fn(&[u8]) -> Result<serde_json::Value, TenetError> + Send + Sync>;
