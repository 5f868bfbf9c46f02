// tenet/src/commands/profile.rs

use crate::cli::ProfileArgs;
use comfy_table::Table;
use std::path::Path;
use tenet_core::infrastructure::config::Recipe;
use tenet_core::infrastructure::plugins::Plugins;

pub fn run(args: ProfileArgs) -> anyhow::Result<()> {
    let plugins = Plugins::builtin()?;
    let recipe = Recipe::load(Path::new(&args.recipe_path), &plugins)?;
    recipe.check()?;

    println!("RESOURCE:");
    println!("{}", resource_table(&recipe));
    println!();
    println!("FRAMEWORK:");
    println!("{}", framework_table(&recipe));
    Ok(())
}

fn resource_table(recipe: &Recipe) -> Table {
    let mut table = Table::new();
    table.set_header(["Name", "Format", "Type", "Path", "Batch Size", "Framework"]);
    for resource in &recipe.resources {
        for framework_name in &resource.framework_names {
            table.add_row(vec![
                resource.name.clone(),
                resource.format.to_string(),
                resource.kind.to_string(),
                resource.path.clone(),
                resource.batch_size.to_string(),
                framework_name.clone(),
            ]);
        }
    }
    table
}

fn framework_table(recipe: &Recipe) -> Table {
    let mut table = Table::new();
    table.set_header(["Framework", "Type", "Name"]);
    for framework in &recipe.frameworks {
        for definition in &framework.definitions {
            table.add_row([framework.name.as_str(), "definition", definition.name.as_str()]);
        }
        for schema in &framework.schemas {
            table.add_row([framework.name.as_str(), "schema", schema.name.as_str()]);
        }
        for procedure in &framework.procedures {
            table.add_row([framework.name.as_str(), "procedure", procedure.name.as_str()]);
        }
        for procedure in &framework.procedures {
            if let Some(output) = &procedure.output {
                for target in &output.targets {
                    table.add_row([framework.name.as_str(), "output", target.path.as_str()]);
                }
            }
        }
    }
    table
}
