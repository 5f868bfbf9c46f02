// tenet-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(tenet::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("no file path is found based on filter under [{0}]")]
    #[diagnostic(code(tenet::infra::io::empty))]
    NoMatchingPath(String),

    // --- DECODING ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(tenet::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON Parsing Error: {0}")]
    #[diagnostic(code(tenet::infra::json))]
    Json(#[from] serde_json::Error),

    // --- TEMPLATING ---
    #[error("Template [{name}] Error: {source}")]
    #[diagnostic(
        code(tenet::infra::template),
        help("Check the template syntax ({{ ... }}) of the procedure or function.")
    )]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    // --- FILTERS ---
    #[error("Invalid Regex Pattern: {0}")]
    #[diagnostic(code(tenet::infra::regex))]
    Regex(#[from] regex::Error),

    // --- REGISTRIES ---
    #[error("[{name}] is not registered as {category}")]
    #[diagnostic(code(tenet::infra::registry::missing))]
    NotRegistered { category: &'static str, name: String },

    #[error("[{name}] is already registered as {category}")]
    #[diagnostic(code(tenet::infra::registry::duplicate))]
    AlreadyRegistered { category: &'static str, name: String },
}
