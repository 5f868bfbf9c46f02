// tenet/src/cli.rs

use clap::{Args, Parser, Subcommand};
use tenet_core::domain::model::{DocFormat, SourceKind};

#[derive(Parser)]
#[command(name = "tenet")]
#[command(about = "Recipe-driven validation and transformation engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute the pipeline described by the recipe
    Execute(ExecuteArgs),

    /// Print a tabular summary of the recipe
    Profile(ProfileArgs),
}

#[derive(Args)]
pub struct ExecuteArgs {
    /// Path of the recipe file
    #[arg(short = 'R', long, default_value = "./tenet.yaml")]
    pub recipe_path: String,

    /// Progress reporter (simple, iterative, progressive, verbose)
    #[arg(short = 'P', long, default_value = "progressive")]
    pub progress_type: String,

    #[command(subcommand)]
    pub scope: Option<ExecuteScope>,
}

#[derive(Subcommand)]
pub enum ExecuteScope {
    /// Execute the pipeline for a single resource
    Resource(ResourceArgs),
}

#[derive(Args)]
pub struct ResourceArgs {
    /// Name of the resource recipe to run
    #[arg(short, long)]
    pub name: String,

    /// Override the resource format
    #[arg(short, long)]
    pub format: Option<DocFormat>,

    /// Override the resource type
    #[arg(short = 't', long = "type")]
    pub kind: Option<SourceKind>,

    /// Override the resource path
    #[arg(short, long)]
    pub path: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    /// Path of the recipe file
    #[arg(short = 'R', long, default_value = "./tenet.yaml")]
    pub recipe_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_execute_defaults() {
        let args = Cli::parse_from(["tenet", "execute"]);
        match args.command {
            Commands::Execute(execute) => {
                assert_eq!(execute.recipe_path, "./tenet.yaml");
                assert_eq!(execute.progress_type, "progressive");
                assert!(execute.scope.is_none());
            }
            _ => panic!("Expected Execute command"),
        }
    }

    #[test]
    fn test_parse_execute_resource_overrides() {
        let args = Cli::parse_from([
            "tenet", "execute", "-R", "my.yaml", "resource", "-n", "users", "-f", "yaml", "-t",
            "file", "-p", "./other",
        ]);
        match args.command {
            Commands::Execute(execute) => {
                assert_eq!(execute.recipe_path, "my.yaml");
                let Some(ExecuteScope::Resource(resource)) = execute.scope else {
                    panic!("Expected resource scope");
                };
                assert_eq!(resource.name, "users");
                assert_eq!(resource.format, Some(DocFormat::Yaml));
                assert_eq!(resource.kind, Some(SourceKind::File));
                assert_eq!(resource.path.as_deref(), Some("./other"));
            }
            _ => panic!("Expected Execute command"),
        }
    }

    #[test]
    fn test_parse_profile() {
        let args = Cli::parse_from(["tenet", "profile", "--recipe-path", "x.yaml"]);
        match args.command {
            Commands::Profile(profile) => assert_eq!(profile.recipe_path, "x.yaml"),
            _ => panic!("Expected Profile command"),
        }
    }
}
