// tenet-core/src/infrastructure/config/recipe.rs

//! The recipe: a declarative description of resources and frameworks.
//! Closed enums reject invalid `format`/`type`/`treat_as` values at decode
//! time; `validator` derives cover the structural rules; duplicate names
//! are rejected by an explicit pass.

use crate::domain::error::DomainError;
use crate::domain::model::{DocFormat, OutputSpec, Severity, SourceKind, Target, TargetKind};
use crate::error::TenetError;
use crate::infrastructure::plugins::Plugins;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Recipe {
    #[validate(length(min = 1), nested)]
    pub resources: Vec<ResourceRecipe>,
    #[validate(length(min = 1), nested)]
    pub frameworks: Vec<FrameworkRecipe>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ResourceRecipe {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(custom(function = "data_format"))]
    pub format: DocFormat,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[validate(length(min = 1))]
    pub path: String,
    #[serde(default)]
    pub regex_pattern: Option<String>,
    #[serde(default)]
    pub batch_size: usize,
    #[validate(length(min = 1))]
    pub framework_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct FrameworkRecipe {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub definitions: Vec<DefinitionRecipe>,
    #[serde(default)]
    #[validate(nested)]
    pub schemas: Vec<SchemaRecipe>,
    #[serde(default)]
    #[validate(nested)]
    pub procedures: Vec<ProcedureRecipe>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct DefinitionRecipe {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(custom(function = "data_format"))]
    pub format: DocFormat,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[validate(length(min = 1))]
    pub path: String,
    #[serde(default)]
    pub regex_pattern: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub function: Option<FunctionRecipe>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct FunctionRecipe {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[validate(length(min = 1))]
    pub path: String,
    #[serde(default = "template_format")]
    pub format: DocFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SchemaRecipe {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[validate(length(min = 1))]
    pub path: String,
    #[serde(default = "json_format")]
    pub format: DocFormat,
    #[serde(default)]
    #[validate(nested)]
    pub output: Option<OutputRecipe>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ProcedureRecipe {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[validate(length(min = 1))]
    pub path: String,
    #[serde(default = "template_format")]
    pub format: DocFormat,
    #[serde(default)]
    #[validate(nested)]
    pub output: Option<OutputRecipe>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct OutputRecipe {
    pub treat_as: Severity,
    #[validate(length(min = 1), nested)]
    pub targets: Vec<TargetRecipe>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct TargetRecipe {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(custom(function = "data_format"))]
    pub format: DocFormat,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    #[serde(default)]
    pub path: String,
}

fn json_format() -> DocFormat {
    DocFormat::Json
}

fn template_format() -> DocFormat {
    DocFormat::Jinja
}

/// Data sites only carry json or yaml; templates are declared through the
/// schema/procedure defaults.
fn data_format(format: &DocFormat) -> Result<(), ValidationError> {
    if matches!(format, DocFormat::Jinja) {
        return Err(ValidationError::new("format"));
    }
    Ok(())
}

impl OutputRecipe {
    pub fn to_spec(&self) -> OutputSpec {
        OutputSpec {
            treat_as: self.treat_as,
            targets: self
                .targets
                .iter()
                .map(|t| Target {
                    name: t.name.clone(),
                    format: t.format,
                    kind: t.kind,
                    path: t.path.clone(),
                })
                .collect(),
        }
    }
}

impl Recipe {
    /// Load a recipe file, picking the codec from the file extension
    /// (`.json` decodes as JSON, everything else as YAML).
    pub fn load(path: &Path, plugins: &Plugins) -> Result<Recipe, TenetError> {
        let content = fs::read(path)?;
        if content.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(DomainError::RecipeError(format!(
                "recipe [{}] is empty",
                path.display()
            ))
            .into());
        }
        let codec_name = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => "json",
            _ => "yaml",
        };
        let decode = plugins.codecs.get(codec_name)?;
        let value = decode(&content)?;
        let recipe: Recipe = serde_json::from_value(value)
            .map_err(|err| DomainError::RecipeError(err.to_string()))?;
        Ok(recipe)
    }

    /// Structural rules plus duplicate-name detection.
    pub fn check(&self) -> Result<(), TenetError> {
        self.validate()
            .map_err(|err| DomainError::RecipeError(err.to_string()))?;
        check_duplicates(
            self.resources.iter().map(|r| r.name.as_str()),
            "resource",
        )?;
        check_duplicates(
            self.frameworks.iter().map(|f| f.name.as_str()),
            "framework",
        )?;
        Ok(())
    }

    /// Keep only the named resource, with optional field overrides; used by
    /// `execute resource`.
    pub fn restrict_to_resource(
        &mut self,
        name: &str,
        format: Option<DocFormat>,
        kind: Option<SourceKind>,
        path: Option<String>,
    ) -> Result<(), TenetError> {
        let Some(mut resource) = self
            .resources
            .iter()
            .find(|r| r.name == name)
            .cloned()
        else {
            return Err(DomainError::ResourceNotFound(name.to_string()).into());
        };
        if let Some(format) = format {
            resource.format = format;
        }
        if let Some(kind) = kind {
            resource.kind = kind;
        }
        if let Some(path) = path {
            resource.path = path;
        }
        self.resources = vec![resource];
        Ok(())
    }
}

fn check_duplicates<'a>(
    names: impl Iterator<Item = &'a str>,
    label: &str,
) -> Result<(), TenetError> {
    let mut encountered: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *encountered.entry(name).or_default() += 1;
    }
    let mut duplicates: Vec<&str> = encountered
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();
    if duplicates.is_empty() {
        return Ok(());
    }
    duplicates.sort_unstable();
    Err(DomainError::RecipeError(format!(
        "duplicate {} recipe [{}]",
        label,
        duplicates.join(", ")
    ))
    .into())
}
