// tenet-core/src/infrastructure/formatter.rs

//! Content re-encoding between document formats. Everything goes through
//! `serde_json::Value`, which makes the JSON rendering canonical: loading
//! the same YAML twice yields the same bytes.

use crate::error::TenetError;
use crate::infrastructure::error::InfrastructureError;

/// json → json, a passthrough.
pub fn json_to_json(input: &[u8]) -> Result<Vec<u8>, TenetError> {
    Ok(input.to_vec())
}

pub fn yaml_to_json(input: &[u8]) -> Result<Vec<u8>, TenetError> {
    let value: serde_json::Value =
        serde_yaml::from_slice(input).map_err(InfrastructureError::Yaml)?;
    let output = serde_json::to_vec_pretty(&value).map_err(InfrastructureError::Json)?;
    Ok(output)
}

pub fn json_to_yaml(input: &[u8]) -> Result<Vec<u8>, TenetError> {
    let value: serde_json::Value = serde_json::from_slice(input)?;
    let output = serde_yaml::to_string(&value).map_err(InfrastructureError::Yaml)?;
    Ok(output.into_bytes())
}
