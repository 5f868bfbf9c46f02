// tenet-core/src/infrastructure/engine.rs

//! minijinja adapter behind the `SnippetEngine` port. The snippet's three
//! JSON literals become template variables; the body must render a JSON
//! value. The environment is immutable after construction, so concurrent
//! `evaluate` calls are safe.

use crate::domain::snippet::{Snippet, SKIP_NULL};
use crate::error::TenetError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::SnippetEngine;
use minijinja::{context, Environment};
use serde_json::Value;

pub struct JinjaEngine {
    env: Environment<'static>,
}

impl JinjaEngine {
    pub fn new() -> Self {
        let env = Environment::new();
        Self { env }
    }
}

impl Default for JinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetEngine for JinjaEngine {
    fn evaluate(&self, name: &str, snippet: &Snippet) -> Result<String, TenetError> {
        let resource = parse_json_text(&snippet.resource)?;
        let definition = parse_json_text(&snippet.definition)?;
        let previous_output = parse_json_text(&snippet.previous_output)?;

        let rendered = self
            .env
            .render_str(
                &snippet.body,
                context! {
                    resource => resource,
                    definition => definition,
                    previousOutput => previous_output,
                },
            )
            .map_err(|err| InfrastructureError::Template {
                name: name.to_string(),
                source: err,
            })?;

        // The scripting contract marks "" and "null\n" as skip; normalize a
        // bare or whitespace-wrapped null rendering to the sentinel.
        let trimmed = rendered.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(SKIP_NULL.to_string());
        }
        Ok(rendered)
    }
}

fn parse_json_text(text: &str) -> Result<Value, TenetError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value = serde_json::from_str(text)?;
    Ok(value)
}
