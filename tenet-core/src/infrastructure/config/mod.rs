// tenet-core/src/infrastructure/config/mod.rs

pub mod recipe;

pub use recipe::{
    DefinitionRecipe, FrameworkRecipe, FunctionRecipe, OutputRecipe, ProcedureRecipe, Recipe,
    ResourceRecipe, SchemaRecipe, TargetRecipe,
};
