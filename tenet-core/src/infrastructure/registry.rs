// tenet-core/src/infrastructure/registry.rs

//! Name→factory registries, one per plugin category. These are plain values
//! wired at construction time; tests build private instances to avoid any
//! cross-test pollution.

use crate::infrastructure::error::InfrastructureError;
use crate::ports::Formatter;
use std::collections::HashMap;
use std::fmt;

/// Case-insensitive name→factory map for one plugin category.
pub struct Registry<T> {
    category: &'static str,
    entries: HashMap<String, T>,
}

impl<T> Registry<T> {
    pub fn new(category: &'static str) -> Self {
        Self {
            category,
            entries: HashMap::new(),
        }
    }

    /// First registration wins; a second registration under the same
    /// (case-folded) name is rejected.
    pub fn register(&mut self, name: &str, factory: T) -> Result<(), InfrastructureError> {
        let key = name.to_lowercase();
        if self.entries.contains_key(&key) {
            return Err(InfrastructureError::AlreadyRegistered {
                category: self.category,
                name: key,
            });
        }
        self.entries.insert(key, factory);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&T, InfrastructureError> {
        let key = name.to_lowercase();
        self.entries
            .get(&key)
            .ok_or(InfrastructureError::NotRegistered {
                category: self.category,
                name: key,
            })
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("category", &self.category)
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Formatters are keyed by a (source, target) format pair.
pub struct FormatterRegistry {
    entries: HashMap<(String, String), Formatter>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        source: &str,
        target: &str,
        formatter: Formatter,
    ) -> Result<(), InfrastructureError> {
        let key = (source.to_lowercase(), target.to_lowercase());
        if self.entries.contains_key(&key) {
            return Err(InfrastructureError::AlreadyRegistered {
                category: "formatter",
                name: format!("source: {} | target: {}", key.0, key.1),
            });
        }
        self.entries.insert(key, formatter);
        Ok(())
    }

    pub fn get(&self, source: &str, target: &str) -> Result<&Formatter, InfrastructureError> {
        let key = (source.to_lowercase(), target.to_lowercase());
        self.entries
            .get(&key)
            .ok_or_else(|| InfrastructureError::NotRegistered {
                category: "formatter",
                name: format!("source: {} | target: {}", key.0, key.1),
            })
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("pairs", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
