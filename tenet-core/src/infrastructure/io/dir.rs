// tenet-core/src/infrastructure/io/dir.rs

use crate::domain::model::Data;
use crate::error::TenetError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::{PathFilter, Reader, Writer};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads every matching document under a root, lexicographic DFS order.
pub struct DirReader {
    root: PathBuf,
    filter: Option<PathFilter>,
}

impl DirReader {
    pub fn new(root: PathBuf, filter: Option<PathFilter>) -> Self {
        Self { root, filter }
    }

    fn matching_paths(&self) -> Result<Vec<PathBuf>, TenetError> {
        let mut output = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|err| InfrastructureError::Io(err.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if self.filter.as_ref().map_or(true, |f| f(entry.path())) {
                output.push(entry.into_path());
            }
        }
        if output.is_empty() {
            return Err(InfrastructureError::NoMatchingPath(
                self.root.to_string_lossy().into_owned(),
            )
            .into());
        }
        Ok(output)
    }

    fn read_path(path: &Path) -> Result<Data, TenetError> {
        let content = fs::read(path)?;
        Ok(Data {
            kind: "dir".to_string(),
            path: path.to_string_lossy().into_owned(),
            content,
        })
    }
}

impl Reader for DirReader {
    fn read_one(&self) -> Result<Data, TenetError> {
        let paths = self.matching_paths()?;
        Self::read_path(&paths[0])
    }

    fn read_all(&self) -> Result<Vec<Data>, TenetError> {
        let mut output = Vec::new();
        for path in self.matching_paths()? {
            output.push(Self::read_path(&path)?);
        }
        Ok(output)
    }
}

/// Writes a document under its path, creating intermediate directories.
pub struct DirWriter;

impl Writer for DirWriter {
    fn write(&self, data: &Data) -> Result<(), TenetError> {
        let path = Path::new(&data.path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        atomic_write(path, &data.content)?;
        Ok(())
    }
}

/// Write through a temporary file in the target directory so the target is
/// either fully written or not written at all.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), InfrastructureError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;
    temp_file
        .write_all(content)
        .map_err(InfrastructureError::Io)?;
    temp_file
        .persist(path)
        .map_err(|err| InfrastructureError::Io(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_read_all_is_filtered_and_sorted() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("sub"))?;
        fs::write(dir.path().join("b.json"), b"{}")?;
        fs::write(dir.path().join("a.json"), b"{}")?;
        fs::write(dir.path().join("sub/c.json"), b"{}")?;
        fs::write(dir.path().join("skip.yaml"), b"x: 1")?;

        let filter: PathFilter = Arc::new(|path| path.to_string_lossy().ends_with(".json"));
        let reader = DirReader::new(dir.path().to_path_buf(), Some(filter));
        let data = reader.read_all()?;

        let names: Vec<_> = data
            .iter()
            .map(|d| {
                Path::new(&d.path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect();
        assert_eq!(names, vec!["a.json", "b.json", "c.json"]);
        Ok(())
    }

    #[test]
    fn test_read_with_no_match_fails() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("skip.yaml"), b"x: 1")?;

        let filter: PathFilter = Arc::new(|path| path.to_string_lossy().ends_with(".json"));
        let reader = DirReader::new(dir.path().to_path_buf(), Some(filter));
        let err = reader.read_all().expect_err("nothing matches");
        assert!(err.to_string().contains("no file path is found"));
        Ok(())
    }

    #[test]
    fn test_writer_creates_intermediate_dirs() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("out/nested/result.json");
        let writer = DirWriter;

        writer.write(&Data {
            kind: "dir".to_string(),
            path: target.to_string_lossy().into_owned(),
            content: b"{\"ok\":true}".to_vec(),
        })?;

        assert_eq!(fs::read(&target)?, b"{\"ok\":true}");
        Ok(())
    }

    #[test]
    fn test_writer_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("result.json");
        fs::write(&target, b"old")?;

        let writer = DirWriter;
        writer.write(&Data {
            kind: "dir".to_string(),
            path: target.to_string_lossy().into_owned(),
            content: b"new".to_vec(),
        })?;

        assert_eq!(fs::read(&target)?, b"new");
        Ok(())
    }
}
