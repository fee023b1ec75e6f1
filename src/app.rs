//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves settings and installs logging
//! - builds the API client
//! - dispatches to the interactive form or a one-shot command

use clap::Parser;
use tracing::info;

use crate::api::ApiClient;
use crate::cli::{Command, EntitiesArgs, PredictArgs, ServiceArgs};
use crate::config::Settings;
use crate::data::{load_all, load_reference};
use crate::error::AppError;
use crate::form::FormState;

pub mod pipeline;

/// Entry point for the `charges` binary.
pub fn run() -> Result<(), AppError> {
    // `charges` and `charges --base-url X` behave like `charges tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Predict(args) => handle_predict(args),
        Command::Entities(args) => handle_entities(args),
    }
}

fn handle_tui(args: ServiceArgs) -> Result<(), AppError> {
    let settings = Settings::from_env(args.base_url.as_deref());
    let _guard = crate::logging::init_tracing(&settings.log_dir, false)?;
    info!(base_url = %settings.base_url, "starting interactive form");

    crate::tui::run(ApiClient::with_reqwest(settings.base_url))
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let settings = Settings::from_env(args.service.base_url.as_deref());
    let _guard = crate::logging::init_tracing(&settings.log_dir, true)?;
    let client = ApiClient::with_reqwest(settings.base_url);

    let refs = load_all(&client);
    for warning in refs.warnings() {
        eprintln!("Warning: {warning}");
    }

    let form = FormState::from_labels(
        args.age,
        &args.sex,
        args.bmi,
        args.children,
        &args.smoker,
        args.region,
        &refs,
    )?;

    let outcome = pipeline::submit(&client, &form, &refs);
    let line = crate::report::format_outcome(&outcome);
    if outcome.is_success() {
        println!("{line}");
        Ok(())
    } else {
        Err(AppError::new(4, line))
    }
}

fn handle_entities(args: EntitiesArgs) -> Result<(), AppError> {
    let settings = Settings::from_env(args.service.base_url.as_deref());
    let _guard = crate::logging::init_tracing(&settings.log_dir, true)?;
    let client = ApiClient::with_reqwest(settings.base_url);

    let data = load_reference(&client, args.category);
    if let Some(warning) = data.warning() {
        eprintln!("Warning: {warning}");
    }
    print!("{}", crate::report::format_entities(args.category, &data));
    Ok(())
}

/// Rewrite argv so `charges` defaults to `charges tui`.
///
/// Rules:
/// - `charges`                       -> `charges tui`
/// - `charges --base-url URL`        -> `charges tui --base-url URL`
/// - `charges --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "predict" | "entities");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::domain::{Category, Region};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["charges"])), args(&["charges", "tui"]));
        assert_eq!(
            rewrite_args(args(&["charges", "--base-url", "http://x"])),
            args(&["charges", "tui", "--base-url", "http://x"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(args(&["charges", "--help"])), args(&["charges", "--help"]));
        assert_eq!(
            rewrite_args(args(&["charges", "entities", "sex"])),
            args(&["charges", "entities", "sex"])
        );
    }

    #[test]
    fn predict_flags_parse() {
        let cli = Cli::parse_from(args(&[
            "charges", "predict", "--age", "52", "--sex", "Female", "--bmi", "31.2", "--smoker",
            "Yes", "--region", "southeast",
        ]));
        let Command::Predict(p) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(p.age, 52);
        assert_eq!(p.sex, "Female");
        assert_eq!(p.bmi, 31.2);
        assert_eq!(p.children, 0);
        assert_eq!(p.smoker, "Yes");
        assert_eq!(p.region, Region::Southeast);
        assert_eq!(p.service.base_url, None);
    }

    #[test]
    fn entities_category_parses() {
        let cli = Cli::parse_from(args(&["charges", "entities", "smoker", "--base-url", "http://h"]));
        let Command::Entities(e) = cli.command else {
            panic!("expected entities");
        };
        assert_eq!(e.category, Category::Smoker);
        assert_eq!(e.service.base_url.as_deref(), Some("http://h"));
    }
}
