// tenet-core/src/domain/error.rs

use miette::Diagnostic;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("resource recipe [{0}] is not found")]
    #[diagnostic(code(tenet::domain::resource_not_found))]
    ResourceNotFound(String),

    #[error("Recipe Error: {0}")]
    #[diagnostic(
        code(tenet::domain::recipe),
        help("Check the recipe file against the documented grammar.")
    )]
    RecipeError(String),

    #[error("Schema Error: {0}")]
    #[diagnostic(code(tenet::domain::schema))]
    SchemaError(String),
}

/// Keyed error aggregate. One entry per failing unit (document path, framework
/// name, output target); values are plain messages or nested aggregates.
/// Insertion is mutex-guarded so workers can share one bag across a fan-out.
#[derive(Debug, Default)]
pub struct ErrorBag {
    entries: Mutex<BTreeMap<String, ErrorEntry>>,
}

#[derive(Debug)]
pub enum ErrorEntry {
    Message(String),
    Nested(ErrorBag),
}

impl From<String> for ErrorEntry {
    fn from(message: String) -> Self {
        ErrorEntry::Message(message)
    }
}

impl From<&str> for ErrorEntry {
    fn from(message: &str) -> Self {
        ErrorEntry::Message(message.to_string())
    }
}

impl From<ErrorBag> for ErrorEntry {
    fn from(bag: ErrorBag) -> Self {
        ErrorEntry::Nested(bag)
    }
}

impl From<crate::error::TenetError> for ErrorEntry {
    fn from(err: crate::error::TenetError) -> Self {
        match err {
            crate::error::TenetError::Aggregate(bag) => ErrorEntry::Nested(bag),
            other => ErrorEntry::Message(other.to_string()),
        }
    }
}

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-entry bag, the `BuildError` shorthand.
    pub fn with(key: impl Into<String>, value: impl Into<ErrorEntry>) -> Self {
        let bag = Self::new();
        bag.add(key, value);
        bag
    }

    pub fn add(&self, key: impl Into<String>, value: impl Into<ErrorEntry>) {
        let mut entries = self.lock();
        entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drains the entries into an owned bag, leaving this one empty.
    pub fn take(&self) -> ErrorBag {
        let mut entries = self.lock();
        ErrorBag {
            entries: Mutex::new(std::mem::take(&mut *entries)),
        }
    }

    /// Union of several bags. Later entries win on key collision.
    pub fn combine(bags: impl IntoIterator<Item = ErrorBag>) -> ErrorBag {
        let output = ErrorBag::new();
        {
            let mut entries = output.lock();
            for bag in bags {
                entries.append(&mut bag.lock());
            }
        }
        output
    }

    /// Recursive JSON form; keys come out sorted for determinism.
    pub fn to_value(&self) -> Value {
        let entries = self.lock();
        let mut map = serde_json::Map::new();
        for (key, entry) in entries.iter() {
            let value = match entry {
                ErrorEntry::Message(message) => Value::String(message.clone()),
                ErrorEntry::Nested(bag) => bag.to_value(),
            };
            map.insert(key.clone(), value);
        }
        Value::Object(map)
    }

    pub fn json_pretty(&self) -> String {
        let value = self.to_value();
        serde_json::to_string_pretty(&value).unwrap_or_else(|err| err.to_string())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, ErrorEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.lock();
        if let Some(key) = entries.keys().next() {
            write!(f, "error with key [{}]", key)?;
            if entries.len() > 1 {
                write!(f, " and {} others", entries.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ErrorBag {}
