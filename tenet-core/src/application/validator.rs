// tenet-core/src/application/validator.rs

//! Per-framework JSON-schema validation. Schemas compile once at
//! construction; rule violations become a field→messages map dispatched
//! through output treatment with the schema's configured sink.

use crate::application::output;
use crate::domain::error::DomainError;
use crate::domain::model::{Data, Framework, OutputSpec, StepOutcome};
use crate::error::TenetError;
use crate::infrastructure::plugins::Plugins;
use jsonschema::JSONSchema;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug)]
struct CompiledSchema {
    name: String,
    schema: JSONSchema,
    output: Option<OutputSpec>,
}

#[derive(Debug)]
pub struct Validator {
    schemas: Vec<CompiledSchema>,
    plugins: Arc<Plugins>,
}

impl Validator {
    pub fn new(framework: &Framework, plugins: Arc<Plugins>) -> Result<Self, TenetError> {
        let mut schemas = Vec::with_capacity(framework.schemas.len());
        for schema in &framework.schemas {
            let value: serde_json::Value = serde_json::from_slice(&schema.data.content)?;
            let compiled = JSONSchema::options().compile(&value).map_err(|err| {
                DomainError::SchemaError(format!(
                    "schema [{}] failed to compile: {}",
                    schema.name, err
                ))
            })?;
            schemas.push(CompiledSchema {
                name: schema.name.clone(),
                schema: compiled,
                output: schema.output.clone(),
            });
        }
        Ok(Self { schemas, plugins })
    }

    /// Validate one document against every schema in framework order. Rule
    /// violations stop the chain only when the schema's output demotes them
    /// to a business failure or the write itself fails.
    pub fn validate(&self, doc: &Data) -> Result<StepOutcome, TenetError> {
        let instance: serde_json::Value = serde_json::from_slice(&doc.content)?;
        for compiled in &self.schemas {
            let violations = match compiled.schema.validate(&instance) {
                Ok(()) => continue,
                Err(errors) => collect_violations(errors),
            };
            tracing::debug!(
                schema = %compiled.name,
                path = %doc.path,
                fields = violations.len(),
                "schema violations"
            );
            let content = serde_json::to_vec_pretty(&violations)?;
            let report = Data {
                kind: doc.kind.clone(),
                path: doc.path.clone(),
                content,
            };
            match output::treat(&self.plugins, &report, compiled.output.as_ref())? {
                StepOutcome::BusinessFailure => return Ok(StepOutcome::BusinessFailure),
                StepOutcome::Pass => {}
            }
        }
        Ok(StepOutcome::Pass)
    }
}

fn collect_violations<'a>(
    errors: impl Iterator<Item = jsonschema::ValidationError<'a>>,
) -> BTreeMap<String, Vec<String>> {
    let mut output = BTreeMap::new();
    for error in errors {
        let field = {
            let path = error.instance_path.to_string();
            if path.is_empty() {
                "(root)".to_string()
            } else {
                path
            }
        };
        output
            .entry(field)
            .or_insert_with(Vec::new)
            .push(error.to_string());
    }
    output
}
