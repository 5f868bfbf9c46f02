// tenet-core/src/application/evaluator.rs

//! Chained procedure evaluation. The combined definition snippet is built
//! once per framework; each document then runs the procedure chain with
//! `previousOutput` threading and skip semantics.

use crate::application::output;
use crate::domain::model::{Data, Framework, Procedure, StepOutcome};
use crate::domain::snippet::{self, Snippet, SKIP_NULL};
use crate::error::TenetError;
use crate::infrastructure::plugins::Plugins;
use crate::ports::SnippetEngine;
use std::sync::Arc;

pub struct Evaluator {
    definition_snippet: String,
    procedures: Vec<Procedure>,
    engine: Arc<dyn SnippetEngine>,
    plugins: Arc<Plugins>,
}

impl Evaluator {
    /// Construction pre-builds the combined definition snippet, invoking the
    /// engine for definitions that declare a constructor function. This is
    /// the expensive step and runs once per framework, not per document.
    pub fn new(
        framework: &Framework,
        engine: Arc<dyn SnippetEngine>,
        plugins: Arc<Plugins>,
    ) -> Result<Self, TenetError> {
        let mut entries = Vec::with_capacity(framework.definitions.len());
        for definition in &framework.definitions {
            let array = snippet::definition_array(&definition.list_of_data);
            let value = match &definition.function_data {
                Some(function) => {
                    let body = String::from_utf8_lossy(&function.content);
                    engine.evaluate(
                        &definition.name,
                        &Snippet::for_constructor(&array, &body),
                    )?
                }
                None => array,
            };
            entries.push((definition.name.clone(), value));
        }
        Ok(Self {
            definition_snippet: snippet::assemble_definitions(&entries),
            procedures: framework.procedures.clone(),
            engine,
            plugins,
        })
    }

    /// Run the procedure chain for one document. Safe for concurrent calls:
    /// all state is immutable after construction.
    pub fn evaluate(&self, doc: &Data) -> Result<StepOutcome, TenetError> {
        let resource = String::from_utf8_lossy(&doc.content).into_owned();
        let mut previous_output = SKIP_NULL.to_string();

        for procedure in &self.procedures {
            let body = String::from_utf8_lossy(&procedure.data.content);
            let snip = Snippet::for_procedure(
                &resource,
                &self.definition_snippet,
                &previous_output,
                &body,
            );
            let result = self.engine.evaluate(&procedure.name, &snip)?;

            if snippet::is_skip(&result) {
                previous_output = SKIP_NULL.to_string();
                continue;
            }

            let report = Data {
                kind: doc.kind.clone(),
                path: doc.path.clone(),
                content: result.clone().into_bytes(),
            };
            match output::treat(&self.plugins, &report, procedure.output.as_ref())? {
                StepOutcome::BusinessFailure => return Ok(StepOutcome::BusinessFailure),
                StepOutcome::Pass => {}
            }
            // the next procedure sees the raw snippet result
            previous_output = result;
        }
        Ok(StepOutcome::Pass)
    }
}
