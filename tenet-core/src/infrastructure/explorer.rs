// tenet-core/src/infrastructure/explorer.rs

//! Path exploration for resources: suffix filter on the declared format,
//! optional regex filter, deterministic lexicographic depth-first order.

use crate::domain::model::{DocFormat, SourceKind};
use crate::error::TenetError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::plugins::Plugins;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Enumerate candidate document paths under a root.
pub fn explore(
    plugins: &Plugins,
    root: &Path,
    kind: SourceKind,
    format: DocFormat,
    pattern: Option<&str>,
) -> Result<Vec<PathBuf>, TenetError> {
    let explorer = plugins.explorers.get(kind.as_str())?;
    let filter = suffix_and_regex_filter(format, pattern)?;
    explorer(root, Some(filter))
}

/// Filter matching the `.{format}` suffix and, when non-empty, the regex.
pub fn suffix_and_regex_filter(
    format: DocFormat,
    pattern: Option<&str>,
) -> Result<crate::ports::PathFilter, TenetError> {
    let suffix = format!(".{}", format.as_str());
    let regex = match pattern {
        Some(p) if !p.is_empty() => Some(Regex::new(p).map_err(InfrastructureError::Regex)?),
        _ => None,
    };
    Ok(Arc::new(move |path: &Path| {
        let text = path.to_string_lossy();
        text.ends_with(&suffix) && regex.as_ref().map_or(true, |re| re.is_match(&text))
    }))
}

/// Stock explorer: walks the root and keeps matching files only. A root that
/// is itself a file yields that single file.
pub fn walk_paths(
    root: &Path,
    filter: Option<crate::ports::PathFilter>,
) -> Result<Vec<PathBuf>, TenetError> {
    let mut output = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| InfrastructureError::Io(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if filter.as_ref().map_or(true, |f| f(entry.path())) {
            output.push(entry.into_path());
        }
    }
    Ok(output)
}
