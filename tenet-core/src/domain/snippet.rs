// tenet-core/src/domain/snippet.rs

//! Snippet composition for the scripting engine. The engine always sees
//! textual JSON literals for `resource`, `definition` and `previousOutput`
//! plus the user's template body; the struct keeps them as named holes
//! instead of one concatenated string.

use crate::domain::model::Data;
use serde_json::Value;

/// Empty result, not considered a value.
pub const SKIP_EMPTY: &str = "";
/// Null result, not considered a value.
pub const SKIP_NULL: &str = "null\n";

/// Skip results bypass output treatment entirely.
pub fn is_skip(result: &str) -> bool {
    result == SKIP_EMPTY || result == SKIP_NULL
}

/// One unit of work for the scripting engine.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub resource: String,
    pub definition: String,
    pub previous_output: String,
    pub body: String,
}

impl Snippet {
    /// Snippet for one procedure step of the evaluation chain.
    pub fn for_procedure(
        resource: &str,
        definition: &str,
        previous_output: &str,
        body: &str,
    ) -> Self {
        Self {
            resource: resource.to_string(),
            definition: definition.to_string(),
            previous_output: previous_output.to_string(),
            body: body.to_string(),
        }
    }

    /// Snippet that constructs a definition from its raw array literal.
    pub fn for_constructor(definition: &str, body: &str) -> Self {
        Self {
            resource: "null".to_string(),
            definition: definition.to_string(),
            previous_output: SKIP_NULL.to_string(),
            body: body.to_string(),
        }
    }
}

/// Concatenate a definition's documents into one JSON array literal.
pub fn definition_array(list: &[Data]) -> String {
    let items: Vec<String> = list
        .iter()
        .map(|data| String::from_utf8_lossy(&data.content).trim().to_string())
        .collect();
    format!("[{}]", items.join(","))
}

/// Assemble named definition snippets into one JSON object literal, in the
/// given (recipe) order.
pub fn assemble_definitions(entries: &[(String, String)]) -> String {
    let fields: Vec<String> = entries
        .iter()
        .map(|(name, value)| format!("{}: {}", Value::String(name.clone()), value.trim()))
        .collect();
    format!("{{{}}}", fields.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(content: &str) -> Data {
        Data {
            kind: "file".to_string(),
            path: "test.json".to_string(),
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_skip_detection() {
        assert!(is_skip(""));
        assert!(is_skip("null\n"));
        assert!(!is_skip("null"));
        assert!(!is_skip("{}"));
    }

    #[test]
    fn test_definition_array_literal() {
        let list = vec![data("{\"a\":1}"), data("{\"b\":2}\n")];
        assert_eq!(definition_array(&list), "[{\"a\":1},{\"b\":2}]");
        assert_eq!(definition_array(&[]), "[]");
    }

    #[test]
    fn test_assemble_definitions_is_valid_json() {
        let entries = vec![
            ("members".to_string(), "[1,2]".to_string()),
            ("tiers".to_string(), "{\"gold\":true}".to_string()),
        ];
        let assembled = assemble_definitions(&entries);
        let value: serde_json::Value =
            serde_json::from_str(&assembled).expect("assembled snippet is JSON");
        assert_eq!(value["members"][1], 2);
        assert_eq!(value["tiers"]["gold"], true);
    }

    #[test]
    fn test_constructor_snippet_defaults() {
        let snip = Snippet::for_constructor("[1]", "{{ definition }}");
        assert_eq!(snip.resource, "null");
        assert_eq!(snip.previous_output, SKIP_NULL);
    }
}
