// tenet/src/commands/execute.rs

use crate::cli::{ExecuteArgs, ExecuteScope};
use std::path::Path;
use std::sync::Arc;
use tenet_core::application::pipeline::Pipeline;
use tenet_core::infrastructure::config::Recipe;
use tenet_core::infrastructure::engine::JinjaEngine;
use tenet_core::infrastructure::plugins::Plugins;
use tenet_core::ports::SnippetEngine;

pub async fn run(args: ExecuteArgs) -> anyhow::Result<()> {
    let plugins = Arc::new(Plugins::builtin()?);

    let mut recipe = Recipe::load(Path::new(&args.recipe_path), &plugins)?;
    if let Some(ExecuteScope::Resource(resource)) = &args.scope {
        recipe.restrict_to_resource(
            &resource.name,
            resource.format,
            resource.kind,
            resource.path.clone(),
        )?;
    }

    let progress_factory = plugins.progress.get(&args.progress_type)?.clone();
    let engine: Arc<dyn SnippetEngine> = Arc::new(JinjaEngine::new());

    let pipeline = Pipeline::new(recipe, engine, plugins.clone(), progress_factory)?;
    if let Err(err) = pipeline.execute().await {
        eprintln!("{}", err.to_report());
        std::process::exit(1);
    }
    Ok(())
}
