// tenet-core/src/domain/model.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a written result is treated: `error` demotes an otherwise successful
/// write to a business failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where document data is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Dir,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::File => "file",
            SourceKind::Dir => "dir",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "dir" => Ok(SourceKind::Dir),
            other => Err(format!("unknown source type [{}]", other)),
        }
    }
}

/// Where an output target writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Dir,
    Std,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Dir => "dir",
            TargetKind::Std => "std",
        }
    }
}

/// Declared on-disk format of a document. `jinja` sources are engine
/// templates and skip JSON normalization on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    Json,
    Yaml,
    Jinja,
}

impl DocFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocFormat::Json => "json",
            DocFormat::Yaml => "yaml",
            DocFormat::Jinja => "jinja",
        }
    }

    /// Formats whose content is already engine-ready.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, DocFormat::Json | DocFormat::Jinja)
    }
}

impl fmt::Display for DocFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "json" => Ok(DocFormat::Json),
            "yaml" => Ok(DocFormat::Yaml),
            "jinja" => Ok(DocFormat::Jinja),
            other => Err(format!("unknown format [{}]", other)),
        }
    }
}

/// A single document: provenance tag, path, and raw content.
/// After loading, `content` is always JSON bytes (templates excepted).
#[derive(Debug, Clone)]
pub struct Data {
    pub kind: String,
    pub path: String,
    pub content: Vec<u8>,
}

/// A named JSON value (optionally constructed by a user function) made
/// available to procedures.
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    pub list_of_data: Vec<Data>,
    pub function_data: Option<Data>,
}

#[derive(Debug, Clone)]
pub struct Schema {
    pub name: String,
    pub data: Data,
    pub output: Option<OutputSpec>,
}

#[derive(Debug, Clone)]
pub struct Procedure {
    pub name: String,
    pub data: Data,
    pub output: Option<OutputSpec>,
}

/// Severity plus target list attached to a schema or procedure.
#[derive(Debug, Clone)]
pub struct OutputSpec {
    pub treat_as: Severity,
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub format: DocFormat,
    pub kind: TargetKind,
    pub path: String,
}

/// A loaded framework; list order is recipe order and is observable.
#[derive(Debug, Clone)]
pub struct Framework {
    pub name: String,
    pub definitions: Vec<Definition>,
    pub schemas: Vec<Schema>,
    pub procedures: Vec<Procedure>,
}

/// Outcome of one validation or evaluation step that did not fail in the
/// engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Pass,
    BusinessFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip_lowercase() {
        let severity: Severity = serde_json::from_str("\"warning\"").expect("decode severity");
        assert_eq!(severity, Severity::Warning);
        assert_eq!(serde_json::to_string(&severity).expect("encode"), "\"warning\"");

        let kind: SourceKind = serde_json::from_str("\"dir\"").expect("decode kind");
        assert_eq!(kind, SourceKind::Dir);
    }

    #[test]
    fn test_format_parse_is_case_insensitive() {
        assert_eq!("YAML".parse::<DocFormat>().expect("parse"), DocFormat::Yaml);
        assert!("toml".parse::<DocFormat>().is_err());
    }

    #[test]
    fn test_passthrough_formats() {
        assert!(DocFormat::Json.is_passthrough());
        assert!(DocFormat::Jinja.is_passthrough());
        assert!(!DocFormat::Yaml.is_passthrough());
    }
}
