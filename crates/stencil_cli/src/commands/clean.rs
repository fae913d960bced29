//! Clean command - Print a template's source after output cleanup.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::{load_template, resolve_config, CleanupArgs, SourceArgs};

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub cleanup: CleanupArgs,
}

pub fn execute(args: CleanArgs) -> Result<()> {
    let config = resolve_config(&args.source, &args.cleanup)?;
    let template = load_template(&args.source, &config)?;

    debug!("Cleaning with options {:?}", config.cleanup);
    print!("{}", template.template_html(config.cleanup));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parses_clean() {
        let cli = Cli::try_parse_from([
            "stencil",
            "clean",
            "<p>x</p>",
            "--mode",
            "inline",
            "--preserve-whitespace",
            "--delimiter",
            "%",
        ])
        .unwrap();
        match cli.command {
            Commands::Clean(args) => {
                assert_eq!(args.source.template, "<p>x</p>");
                assert_eq!(args.source.delimiter, Some('%'));
                assert!(args.cleanup.preserve_whitespace);
            }
            Commands::Render(_) => panic!("expected clean"),
        }
    }

    #[test]
    fn test_execute_inline_template() {
        let cli = Cli::try_parse_from(["stencil", "clean", "<p>x</p>", "--mode", "inline"]).unwrap();
        let Commands::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        execute(args).unwrap();
    }
}
