//! Command-line parsing for the insurance charges client.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! form, HTTP and rendering code.

use clap::{Args, Parser, Subcommand};

use crate::domain::{Category, Region};
use crate::form::{AGE_DEFAULT, BMI_DEFAULT, CHILDREN_DEFAULT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "charges", version, about = "Insurance charges prediction client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form.
    Tui(ServiceArgs),
    /// Submit one prediction from flags and print the result.
    Predict(PredictArgs),
    /// Show the options loaded for a categorical field.
    Entities(EntitiesArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone, Default)]
pub struct ServiceArgs {
    /// Prediction service base URL (overrides BASE_URL).
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Age in years (0-120).
    #[arg(long, default_value_t = AGE_DEFAULT)]
    pub age: u32,

    /// Sex label as served by the entities endpoint (e.g. Male, Female).
    #[arg(long, default_value = "Male")]
    pub sex: String,

    /// Body-mass index (0.0-100.0).
    #[arg(long, default_value_t = BMI_DEFAULT)]
    pub bmi: f64,

    /// Number of children (0-10).
    #[arg(long, default_value_t = CHILDREN_DEFAULT)]
    pub children: u32,

    /// Smoker label (No or Yes).
    #[arg(long, default_value = "No")]
    pub smoker: String,

    /// Region of residence.
    #[arg(long, value_enum, default_value_t = Region::Northwest)]
    pub region: Region,
}

#[derive(Debug, Args, Clone)]
pub struct EntitiesArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Category to fetch.
    #[arg(value_enum)]
    pub category: Category,
}
