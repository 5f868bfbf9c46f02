// tenet-core/src/infrastructure/plugins.rs

//! Explicit wiring of the stock plugins. This is where dependency injection
//! happens: the pipeline receives one `Plugins` value instead of reaching
//! into process-wide registries.

use crate::domain::model::Severity;
use crate::error::TenetError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::io::dir::{DirReader, DirWriter};
use crate::infrastructure::io::file::FileReader;
use crate::infrastructure::io::stdio::StdWriter;
use crate::infrastructure::progress::{BarProgress, LineProgress};
use crate::infrastructure::registry::{FormatterRegistry, Registry};
use crate::infrastructure::{explorer, formatter};
use crate::ports::{
    DecodeFn, ExplorerFn, PathFilter, Progress, ProgressFactory, Reader, ReaderFactory, Writer,
    WriterFactory,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct Plugins {
    pub readers: Registry<ReaderFactory>,
    pub writers: Registry<WriterFactory>,
    pub formatters: FormatterRegistry,
    pub explorers: Registry<ExplorerFn>,
    pub progress: Registry<ProgressFactory>,
    pub codecs: Registry<DecodeFn>,
}

impl Plugins {
    /// Registries with nothing wired; used by tests that bring their own
    /// fakes.
    pub fn empty() -> Self {
        Self {
            readers: Registry::new("reader"),
            writers: Registry::new("writer"),
            formatters: FormatterRegistry::new(),
            explorers: Registry::new("explorer"),
            progress: Registry::new("progress"),
            codecs: Registry::new("codec"),
        }
    }

    /// The stock wiring used by the CLI.
    pub fn builtin() -> Result<Self, TenetError> {
        let mut plugins = Self::empty();

        // readers
        let file_reader: ReaderFactory = Arc::new(|path: PathBuf, _filter: Option<PathFilter>| {
            Box::new(FileReader::new(path)) as Box<dyn Reader>
        });
        plugins.readers.register("file", file_reader)?;
        let dir_reader: ReaderFactory = Arc::new(|path: PathBuf, filter: Option<PathFilter>| {
            Box::new(DirReader::new(path, filter)) as Box<dyn Reader>
        });
        plugins.readers.register("dir", dir_reader)?;

        // writers
        let dir_writer: WriterFactory =
            Arc::new(|_severity: Severity| Arc::new(DirWriter) as Arc<dyn Writer>);
        plugins.writers.register("dir", dir_writer)?;
        let std_writer: WriterFactory =
            Arc::new(|severity: Severity| Arc::new(StdWriter::new(severity)) as Arc<dyn Writer>);
        plugins.writers.register("std", std_writer)?;

        // formatters
        plugins
            .formatters
            .register("json", "json", Arc::new(formatter::json_to_json))?;
        plugins
            .formatters
            .register("yaml", "json", Arc::new(formatter::yaml_to_json))?;
        plugins
            .formatters
            .register("json", "yaml", Arc::new(formatter::json_to_yaml))?;

        // explorers; the same walker serves both source kinds
        let walk: ExplorerFn = Arc::new(explorer::walk_paths);
        plugins.explorers.register("file", walk.clone())?;
        plugins.explorers.register("dir", walk)?;

        // progress reporters; each pair shares an implementation
        let line: ProgressFactory = Arc::new(|name: &str, total: u64| {
            Box::new(LineProgress::new(name, total)) as Box<dyn Progress>
        });
        plugins.progress.register("simple", line.clone())?;
        plugins.progress.register("iterative", line)?;
        let bar: ProgressFactory = Arc::new(|name: &str, total: u64| {
            Box::new(BarProgress::new(name, total)) as Box<dyn Progress>
        });
        plugins.progress.register("progressive", bar.clone())?;
        plugins.progress.register("verbose", bar)?;

        // recipe codecs
        let yaml_codec: DecodeFn = Arc::new(|content: &[u8]| {
            let value: serde_json::Value =
                serde_yaml::from_slice(content).map_err(InfrastructureError::Yaml)?;
            Ok(value)
        });
        plugins.codecs.register("yaml", yaml_codec)?;
        let json_codec: DecodeFn = Arc::new(|content: &[u8]| {
            let value: serde_json::Value =
                serde_json::from_slice(content).map_err(InfrastructureError::Json)?;
            Ok(value)
        });
        plugins.codecs.register("json", json_codec)?;

        Ok(plugins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_builtin_wiring_is_complete() -> Result<()> {
        let plugins = Plugins::builtin()?;
        assert!(plugins.readers.get("file").is_ok());
        assert!(plugins.readers.get("dir").is_ok());
        assert!(plugins.writers.get("dir").is_ok());
        assert!(plugins.writers.get("std").is_ok());
        assert!(plugins.formatters.get("yaml", "json").is_ok());
        assert!(plugins.formatters.get("json", "yaml").is_ok());
        assert!(plugins.explorers.get("dir").is_ok());
        for progress in ["simple", "iterative", "progressive", "verbose"] {
            assert!(plugins.progress.get(progress).is_ok());
        }
        assert!(plugins.codecs.get("yaml").is_ok());
        assert!(plugins.codecs.get("json").is_ok());
        Ok(())
    }

    #[test]
    fn test_empty_wiring_has_nothing() {
        let plugins = Plugins::empty();
        assert!(plugins.readers.get("file").is_err());
        assert!(plugins.writers.get("std").is_err());
    }
}
