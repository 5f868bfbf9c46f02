// tenet-core/src/application/pipeline.rs

//! The pipeline orchestrator. Resources run strictly in recipe order; the
//! first failing resource stops the run. Within a resource, documents are
//! processed in bounded concurrent batches with a join barrier between
//! rounds.

use crate::application::evaluator::Evaluator;
use crate::application::loader::Loader;
use crate::application::validator::Validator;
use crate::domain::error::ErrorBag;
use crate::domain::model::{Data, DocFormat, Framework, Severity, SourceKind, StepOutcome};
use crate::error::TenetError;
use crate::infrastructure::config::{FrameworkRecipe, Recipe, ResourceRecipe};
use crate::infrastructure::explorer;
use crate::infrastructure::plugins::Plugins;
use crate::ports::{ProgressFactory, SnippetEngine, Writer};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Safety ceiling for `batch_size: 0` so an unbounded round cannot exhaust
/// file descriptors.
const MAX_BATCH: usize = 1024;

const ERROR_SINK: &str = "std";

pub struct Pipeline {
    recipe: Recipe,
    engine: Arc<dyn SnippetEngine>,
    plugins: Arc<Plugins>,
    loader: Loader,
    progress_factory: ProgressFactory,
    error_sink: Arc<dyn Writer>,
    name_to_framework_recipe: HashMap<String, FrameworkRecipe>,
}

/// Everything one worker needs, cloned per spawned task.
#[derive(Clone)]
struct WorkerContext {
    loader: Loader,
    kind: SourceKind,
    format: DocFormat,
    framework_names: Arc<Vec<String>>,
    validators: Arc<HashMap<String, Arc<Validator>>>,
    evaluators: Arc<HashMap<String, Arc<Evaluator>>>,
    error_sink: Arc<dyn Writer>,
    errors: Arc<ErrorBag>,
}

impl Pipeline {
    pub fn new(
        recipe: Recipe,
        engine: Arc<dyn SnippetEngine>,
        plugins: Arc<Plugins>,
        progress_factory: ProgressFactory,
    ) -> Result<Self, TenetError> {
        recipe.check()?;
        let error_sink = (plugins.writers.get(ERROR_SINK)?)(Severity::Error);
        let name_to_framework_recipe = recipe
            .frameworks
            .iter()
            .map(|framework| (framework.name.clone(), framework.clone()))
            .collect();
        Ok(Self {
            loader: Loader::new(plugins.clone()),
            recipe,
            engine,
            plugins,
            progress_factory,
            error_sink,
            name_to_framework_recipe,
        })
    }

    pub async fn execute(&self) -> Result<(), TenetError> {
        for resource in &self.recipe.resources {
            tracing::debug!(resource = %resource.name, "processing resource");
            self.validate_framework_names(resource)?;
            let frameworks = self.load_frameworks(resource).await?;
            let validators = self.build_validators(&frameworks)?;
            let evaluators = self.build_evaluators(&frameworks).await?;
            self.execute_resource(resource, validators, evaluators)
                .await?;
        }
        Ok(())
    }

    /// Every referenced framework name must be declared; all missing names
    /// are reported together and nothing is loaded.
    fn validate_framework_names(&self, resource: &ResourceRecipe) -> Result<(), TenetError> {
        let errors = ErrorBag::new();
        for name in &resource.framework_names {
            if !self.name_to_framework_recipe.contains_key(name) {
                errors.add(
                    name.clone(),
                    format!("not found for resource [{}]", resource.name),
                );
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }

    async fn load_frameworks(
        &self,
        resource: &ResourceRecipe,
    ) -> Result<HashMap<String, Arc<Framework>>, TenetError> {
        let mut tasks = Vec::with_capacity(resource.framework_names.len());
        for name in &resource.framework_names {
            let Some(rcp) = self.name_to_framework_recipe.get(name) else {
                continue; // unreachable after name validation
            };
            let rcp = rcp.clone();
            let loader = self.loader.clone();
            tasks.push(tokio::spawn(async move {
                let framework = loader.load_framework(&rcp).await;
                (rcp.name.clone(), framework)
            }));
        }

        let mut output = HashMap::new();
        let errors = ErrorBag::new();
        for joined in futures::future::join_all(tasks).await {
            match joined {
                Ok((name, Ok(framework))) => {
                    output.insert(name, Arc::new(framework));
                }
                Ok((name, Err(err))) => errors.add(name, err),
                Err(join_err) => errors.add("task", join_err.to_string()),
            }
        }
        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors.into())
        }
    }

    fn build_validators(
        &self,
        frameworks: &HashMap<String, Arc<Framework>>,
    ) -> Result<Arc<HashMap<String, Arc<Validator>>>, TenetError> {
        let mut output = HashMap::new();
        let errors = ErrorBag::new();
        for (name, framework) in frameworks {
            match Validator::new(framework, self.plugins.clone()) {
                Ok(validator) => {
                    output.insert(name.clone(), Arc::new(validator));
                }
                Err(err) => errors.add(name.clone(), err),
            }
        }
        if errors.is_empty() {
            Ok(Arc::new(output))
        } else {
            Err(errors.into())
        }
    }

    /// Evaluator construction may call the scripting engine (definition
    /// constructors), so frameworks build concurrently.
    async fn build_evaluators(
        &self,
        frameworks: &HashMap<String, Arc<Framework>>,
    ) -> Result<Arc<HashMap<String, Arc<Evaluator>>>, TenetError> {
        let mut tasks = Vec::with_capacity(frameworks.len());
        for (name, framework) in frameworks {
            let name = name.clone();
            let framework = framework.clone();
            let engine = self.engine.clone();
            let plugins = self.plugins.clone();
            tasks.push(tokio::spawn(async move {
                let evaluator = Evaluator::new(&framework, engine, plugins);
                (name, evaluator)
            }));
        }

        let mut output = HashMap::new();
        let errors = ErrorBag::new();
        for joined in futures::future::join_all(tasks).await {
            match joined {
                Ok((name, Ok(evaluator))) => {
                    output.insert(name, Arc::new(evaluator));
                }
                Ok((name, Err(err))) => errors.add(name, err),
                Err(join_err) => errors.add("task", join_err.to_string()),
            }
        }
        if errors.is_empty() {
            Ok(Arc::new(output))
        } else {
            Err(errors.into())
        }
    }

    async fn execute_resource(
        &self,
        resource: &ResourceRecipe,
        validators: Arc<HashMap<String, Arc<Validator>>>,
        evaluators: Arc<HashMap<String, Arc<Evaluator>>>,
    ) -> Result<(), TenetError> {
        let paths = explorer::explore(
            &self.plugins,
            Path::new(&resource.path),
            resource.kind,
            resource.format,
            resource.regex_pattern.as_deref(),
        )?;
        let progress = (self.progress_factory)(&resource.name, paths.len() as u64);
        let errors = Arc::new(ErrorBag::new());
        let framework_names = Arc::new(resource.framework_names.clone());
        let batch = effective_batch(resource.batch_size, paths.len());

        for round in paths.chunks(batch) {
            let mut workers = Vec::with_capacity(round.len());
            for path in round {
                let context = WorkerContext {
                    loader: self.loader.clone(),
                    kind: resource.kind,
                    format: resource.format,
                    framework_names: framework_names.clone(),
                    validators: validators.clone(),
                    evaluators: evaluators.clone(),
                    error_sink: self.error_sink.clone(),
                    errors: errors.clone(),
                };
                let path = path.to_string_lossy().into_owned();
                workers.push(tokio::spawn(async move {
                    process_document(&context, &path);
                }));
            }
            // round barrier: every worker finishes before the next round
            for joined in futures::future::join_all(workers).await {
                if let Err(join_err) = joined {
                    errors.add("task", join_err.to_string());
                }
            }
            progress.advance(round.len() as u64);
        }
        progress.finish();

        let bag = errors.take();
        if bag.is_empty() {
            Ok(())
        } else {
            Err(bag.into())
        }
    }
}

/// `batch_size: 0` means all remaining paths, capped at the internal
/// ceiling.
fn effective_batch(batch_size: usize, total: usize) -> usize {
    let batch = if batch_size == 0 {
        total.min(MAX_BATCH)
    } else {
        batch_size.min(total)
    };
    batch.max(1)
}

/// One worker: load the document, then run every framework's validator and
/// evaluator in resource order. The first failure stops this document's
/// chain; other workers continue.
fn process_document(context: &WorkerContext, path: &str) {
    let data = match context.loader.load_data(path, context.kind, context.format) {
        Ok(data) => data,
        Err(err) => {
            context.errors.add(path, err);
            return;
        }
    };

    for framework_name in context.framework_names.iter() {
        if let Some(validator) = context.validators.get(framework_name) {
            if !handle_step(context, path, validator.validate(&data)) {
                return;
            }
        }
        if let Some(evaluator) = context.evaluators.get(framework_name) {
            if !handle_step(context, path, evaluator.evaluate(&data)) {
                return;
            }
        }
    }
}

/// Interpret one step result: execution errors go to the error sink and the
/// aggregate; business failures go to the aggregate only (their own sink
/// already received the payload).
fn handle_step(
    context: &WorkerContext,
    path: &str,
    result: Result<StepOutcome, TenetError>,
) -> bool {
    match result {
        Ok(StepOutcome::Pass) => true,
        Ok(StepOutcome::BusinessFailure) => {
            context.errors.add(path, "business error encountered");
            false
        }
        Err(err) => {
            let note = Data {
                kind: ERROR_SINK.to_string(),
                path: path.to_string(),
                content: err.to_report().into_bytes(),
            };
            if let Err(write_err) = context.error_sink.write(&note) {
                tracing::debug!(error = %write_err, "error sink write failed");
            }
            context.errors.add(path, err);
            false
        }
    }
}
