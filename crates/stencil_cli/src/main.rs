//! stencil CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use stencil_engine::{LoadError, TemplateError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const TEMPLATE_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.quiet {
        EnvFilter::from_default_env().add_directive("error".parse().unwrap())
    } else {
        let level = if cli.verbose { "stencil=debug" } else { "stencil=info" };
        EnvFilter::from_default_env()
            .add_directive(level.parse().unwrap())
            .add_directive("warn".parse().unwrap())
    };
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::Clean(args) => commands::clean::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.downcast_ref::<LoadError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }
        match cause.downcast_ref::<TemplateError>() {
            Some(TemplateError::Load(_)) => return ExitCodes::TEMPLATE_ERROR,
            Some(TemplateError::InvalidConfig(_)) => return ExitCodes::INVALID_ARGS,
            _ => {}
        }
    }

    let msg = format!("{:#}", e).to_lowercase();
    if msg.contains("argument") || msg.contains("unsupported") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_load_errors_are_template_errors() {
        let err = Err::<(), _>(LoadError::MissingMarker {
            marker: "START PAGE",
            path: PathBuf::from("page.html"),
        })
        .context("Failed to load template (page mode)")
        .unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::TEMPLATE_ERROR);

        let wrapped = anyhow::Error::new(TemplateError::Load(LoadError::UnterminatedIgnore {
            path: PathBuf::from("page.html"),
        }));
        assert_eq!(categorize_error(&wrapped), ExitCodes::TEMPLATE_ERROR);
    }

    #[test]
    fn test_paths_do_not_decide_the_category() {
        let err = anyhow::anyhow!("No such file or directory")
            .context("Failed to read data file \"./pages/ignored/template.json\"");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn test_invalid_configuration_is_invalid_args() {
        let err = Err::<(), _>(TemplateError::InvalidConfig("delimiter must not be whitespace".into()))
            .context("Invalid option combination")
            .unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);

        let err = anyhow::anyhow!("Unsupported data file type: \"data.toml\"");
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }
}
