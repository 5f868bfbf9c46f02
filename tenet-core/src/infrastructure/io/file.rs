// tenet-core/src/infrastructure/io/file.rs

use crate::domain::model::Data;
use crate::error::TenetError;
use crate::ports::Reader;
use std::fs;
use std::path::PathBuf;

/// Reads exactly one document from a path.
pub struct FileReader {
    path: PathBuf,
}

impl FileReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Reader for FileReader {
    fn read_one(&self) -> Result<Data, TenetError> {
        let content = fs::read(&self.path)?;
        Ok(Data {
            kind: "file".to_string(),
            path: self.path.to_string_lossy().into_owned(),
            content,
        })
    }

    fn read_all(&self) -> Result<Vec<Data>, TenetError> {
        Ok(vec![self.read_one()?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_read_one_returns_content_and_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("doc.json");
        std::fs::write(&path, b"{\"a\":1}")?;

        let reader = FileReader::new(path.clone());
        let data = reader.read_one()?;

        assert_eq!(data.content, b"{\"a\":1}");
        assert_eq!(data.path, path.to_string_lossy());
        assert_eq!(data.kind, "file");
        Ok(())
    }

    #[test]
    fn test_read_missing_file_fails() {
        let reader = FileReader::new(PathBuf::from("/definitely/not/here.json"));
        assert!(reader.read_one().is_err());
    }

    #[test]
    fn test_read_all_wraps_single_document() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("doc.json");
        std::fs::write(&path, b"{}")?;

        let reader = FileReader::new(path);
        assert_eq!(reader.read_all()?.len(), 1);
        Ok(())
    }
}
