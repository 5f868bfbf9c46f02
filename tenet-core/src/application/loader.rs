// tenet-core/src/application/loader.rs

//! Materializes framework artifacts and documents from recipe metadata.
//! Framework sub-items load concurrently; a failing item never aborts its
//! siblings and the full failure map comes back once every task finished.

use crate::domain::error::ErrorBag;
use crate::domain::model::{Data, Definition, DocFormat, Framework, Procedure, Schema, SourceKind};
use crate::error::TenetError;
use crate::infrastructure::config::{DefinitionRecipe, FrameworkRecipe, ProcedureRecipe, SchemaRecipe};
use crate::infrastructure::explorer;
use crate::infrastructure::plugins::Plugins;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct Loader {
    plugins: Arc<Plugins>,
}

enum Loaded {
    Definition(usize, Definition),
    Schema(usize, Schema),
    Procedure(usize, Procedure),
}

impl Loader {
    pub fn new(plugins: Arc<Plugins>) -> Self {
        Self { plugins }
    }

    /// Load one document and normalize its content to JSON.
    pub fn load_data(
        &self,
        path: &str,
        kind: SourceKind,
        format: DocFormat,
    ) -> Result<Data, TenetError> {
        let factory = self.plugins.readers.get(kind.as_str())?;
        let reader = factory(PathBuf::from(path), None);
        let mut data = reader.read_one()?;
        data.content = self.normalize(format, data.content)?;
        Ok(data)
    }

    fn normalize(&self, format: DocFormat, content: Vec<u8>) -> Result<Vec<u8>, TenetError> {
        if format.is_passthrough() {
            return Ok(content);
        }
        let formatter = self
            .plugins
            .formatters
            .get(format.as_str(), DocFormat::Json.as_str())?;
        formatter(&content)
    }

    /// Load a framework: one task per sub-item across all three lists,
    /// positions preserved in recipe order.
    pub async fn load_framework(&self, rcp: &FrameworkRecipe) -> Result<Framework, TenetError> {
        tracing::debug!(framework = %rcp.name, "loading framework artifacts");
        let mut tasks = Vec::with_capacity(
            rcp.definitions.len() + rcp.schemas.len() + rcp.procedures.len(),
        );

        for (index, item) in rcp.definitions.iter().enumerate() {
            let loader = self.clone();
            let item = item.clone();
            tasks.push(tokio::spawn(async move {
                let result = loader
                    .load_definition(&item)
                    .map(|definition| Loaded::Definition(index, definition));
                (item.name, result)
            }));
        }
        for (index, item) in rcp.schemas.iter().enumerate() {
            let loader = self.clone();
            let item = item.clone();
            tasks.push(tokio::spawn(async move {
                let result = loader
                    .load_schema(&item)
                    .map(|schema| Loaded::Schema(index, schema));
                (item.name, result)
            }));
        }
        for (index, item) in rcp.procedures.iter().enumerate() {
            let loader = self.clone();
            let item = item.clone();
            tasks.push(tokio::spawn(async move {
                let result = loader
                    .load_procedure(&item)
                    .map(|procedure| Loaded::Procedure(index, procedure));
                (item.name, result)
            }));
        }

        let mut definitions: Vec<Option<Definition>> =
            (0..rcp.definitions.len()).map(|_| None).collect();
        let mut schemas: Vec<Option<Schema>> = (0..rcp.schemas.len()).map(|_| None).collect();
        let mut procedures: Vec<Option<Procedure>> =
            (0..rcp.procedures.len()).map(|_| None).collect();
        let errors = ErrorBag::new();

        for joined in futures::future::join_all(tasks).await {
            match joined {
                Ok((_, Ok(Loaded::Definition(index, definition)))) => {
                    definitions[index] = Some(definition);
                }
                Ok((_, Ok(Loaded::Schema(index, schema)))) => schemas[index] = Some(schema),
                Ok((_, Ok(Loaded::Procedure(index, procedure)))) => {
                    procedures[index] = Some(procedure);
                }
                Ok((name, Err(err))) => errors.add(name, err),
                Err(join_err) => errors.add("task", join_err.to_string()),
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok(Framework {
            name: rcp.name.clone(),
            definitions: definitions.into_iter().flatten().collect(),
            schemas: schemas.into_iter().flatten().collect(),
            procedures: procedures.into_iter().flatten().collect(),
        })
    }

    /// A definition reads every matching document under its path; the
    /// optional constructor function reads one.
    fn load_definition(&self, rcp: &DefinitionRecipe) -> Result<Definition, TenetError> {
        let factory = self.plugins.readers.get(rcp.kind.as_str())?;
        let filter =
            explorer::suffix_and_regex_filter(rcp.format, rcp.regex_pattern.as_deref())?;
        let reader = factory(PathBuf::from(&rcp.path), Some(filter));
        let mut list_of_data = reader.read_all()?;
        for data in &mut list_of_data {
            data.content = self.normalize(rcp.format, std::mem::take(&mut data.content))?;
        }
        let function_data = match &rcp.function {
            Some(function) => {
                Some(self.load_data(&function.path, function.kind, function.format)?)
            }
            None => None,
        };
        Ok(Definition {
            name: rcp.name.clone(),
            list_of_data,
            function_data,
        })
    }

    fn load_schema(&self, rcp: &SchemaRecipe) -> Result<Schema, TenetError> {
        let data = self.load_data(&rcp.path, rcp.kind, rcp.format)?;
        Ok(Schema {
            name: rcp.name.clone(),
            data,
            output: rcp.output.as_ref().map(|o| o.to_spec()),
        })
    }

    fn load_procedure(&self, rcp: &ProcedureRecipe) -> Result<Procedure, TenetError> {
        let data = self.load_data(&rcp.path, rcp.kind, rcp.format)?;
        Ok(Procedure {
            name: rcp.name.clone(),
            data,
            output: rcp.output.as_ref().map(|o| o.to_spec()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn loader() -> Result<Loader> {
        Ok(Loader::new(Arc::new(Plugins::builtin()?)))
    }

    fn framework_recipe(
        definitions: Vec<DefinitionRecipe>,
        schemas: Vec<SchemaRecipe>,
        procedures: Vec<ProcedureRecipe>,
    ) -> FrameworkRecipe {
        FrameworkRecipe {
            name: "user-check".to_string(),
            definitions,
            schemas,
            procedures,
        }
    }

    #[test]
    fn test_load_data_reformats_yaml_to_json() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("doc.yaml");
        fs::write(&path, b"email: a@b\n")?;

        let loader = loader()?;
        let data = loader.load_data(
            &path.to_string_lossy(),
            SourceKind::File,
            DocFormat::Yaml,
        )?;

        let value: serde_json::Value = serde_json::from_slice(&data.content)?;
        assert_eq!(value["email"], "a@b");
        Ok(())
    }

    #[test]
    fn test_load_data_twice_yields_same_bytes() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("doc.yaml");
        fs::write(&path, b"b: 2\na: 1\n")?;

        let loader = loader()?;
        let text = path.to_string_lossy();
        let first = loader.load_data(&text, SourceKind::File, DocFormat::Yaml)?;
        let second = loader.load_data(&text, SourceKind::File, DocFormat::Yaml)?;
        assert_eq!(first.content, second.content);
        Ok(())
    }

    #[test]
    fn test_load_data_passes_json_through() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("doc.json");
        fs::write(&path, b"{\"a\": 1}")?;

        let loader = loader()?;
        let data = loader.load_data(&path.to_string_lossy(), SourceKind::File, DocFormat::Json)?;
        assert_eq!(data.content, b"{\"a\": 1}");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_framework_preserves_positions() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("defs"))?;
        fs::write(dir.path().join("defs/members.json"), b"{\"id\":1}")?;
        fs::write(dir.path().join("schema.json"), b"{\"type\":\"object\"}")?;
        fs::write(dir.path().join("first.jinja"), b"null")?;
        fs::write(dir.path().join("second.jinja"), b"{{ resource }}")?;

        let rcp = framework_recipe(
            vec![DefinitionRecipe {
                name: "members".to_string(),
                format: DocFormat::Json,
                kind: SourceKind::Dir,
                path: dir.path().join("defs").to_string_lossy().into_owned(),
                regex_pattern: None,
                function: None,
            }],
            vec![SchemaRecipe {
                name: "shape".to_string(),
                kind: SourceKind::File,
                path: dir.path().join("schema.json").to_string_lossy().into_owned(),
                format: DocFormat::Json,
                output: None,
            }],
            vec![
                ProcedureRecipe {
                    name: "first".to_string(),
                    kind: SourceKind::File,
                    path: dir.path().join("first.jinja").to_string_lossy().into_owned(),
                    format: DocFormat::Jinja,
                    output: None,
                },
                ProcedureRecipe {
                    name: "second".to_string(),
                    kind: SourceKind::File,
                    path: dir
                        .path()
                        .join("second.jinja")
                        .to_string_lossy()
                        .into_owned(),
                    format: DocFormat::Jinja,
                    output: None,
                },
            ],
        );

        let framework = loader()?.load_framework(&rcp).await?;
        assert_eq!(framework.definitions.len(), 1);
        assert_eq!(framework.schemas.len(), 1);
        assert_eq!(framework.procedures.len(), 2);
        // recipe order survives the concurrent load
        assert_eq!(framework.procedures[0].name, "first");
        assert_eq!(framework.procedures[1].name, "second");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_framework_aggregates_all_failures() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("ok.jinja"), b"null")?;

        let rcp = framework_recipe(
            vec![],
            vec![
                SchemaRecipe {
                    name: "missing-one".to_string(),
                    kind: SourceKind::File,
                    path: dir.path().join("ghost1.json").to_string_lossy().into_owned(),
                    format: DocFormat::Json,
                    output: None,
                },
                SchemaRecipe {
                    name: "missing-two".to_string(),
                    kind: SourceKind::File,
                    path: dir.path().join("ghost2.json").to_string_lossy().into_owned(),
                    format: DocFormat::Json,
                    output: None,
                },
            ],
            vec![ProcedureRecipe {
                name: "ok".to_string(),
                kind: SourceKind::File,
                path: dir.path().join("ok.jinja").to_string_lossy().into_owned(),
                format: DocFormat::Jinja,
                output: None,
            }],
        );

        let err = loader()?
            .load_framework(&rcp)
            .await
            .expect_err("missing schemas must fail");
        match err {
            TenetError::Aggregate(bag) => {
                // both failures show up, the healthy sibling does not
                let value = bag.to_value();
                assert!(value.get("missing-one").is_some());
                assert!(value.get("missing-two").is_some());
                assert!(value.get("ok").is_none());
            }
            other => panic!("expected aggregate, got {other}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_definition_regex_filters_documents() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("defs"))?;
        fs::write(dir.path().join("defs/user_a.json"), b"{\"a\":1}")?;
        fs::write(dir.path().join("defs/order_b.json"), b"{\"b\":2}")?;

        let rcp = framework_recipe(
            vec![DefinitionRecipe {
                name: "users".to_string(),
                format: DocFormat::Json,
                kind: SourceKind::Dir,
                path: dir.path().join("defs").to_string_lossy().into_owned(),
                regex_pattern: Some("user_".to_string()),
                function: None,
            }],
            vec![],
            vec![],
        );

        let framework = loader()?.load_framework(&rcp).await?;
        assert_eq!(framework.definitions[0].list_of_data.len(), 1);
        Ok(())
    }
}
