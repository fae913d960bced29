//! CLI command definitions.
//!
//! This module defines the command structure for the stencil CLI and the
//! options shared by its subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use stencil_engine::{
    CleanupOptions, DataContext, SourceMode, StencilConfig, TemplateLoader, TemplateSource,
};

pub mod clean;
pub mod render;

/// stencil - render HTML-like templates against structured data
#[derive(Parser)]
#[command(name = "stencil")]
#[command(version, about = "stencil - render HTML-like templates against structured data")]
#[command(long_about = r#"
stencil renders templates containing #variable# placeholders, REPEAT and
INCLUDEIF blocks, and STRIP WHITESPACE regions against JSON or YAML data.

COMMANDS:
  render  → Render a template against a data file
  clean   → Print the template with comments and whitespace cleaned

CONFIGURATION:
  Settings are read from stencil.yaml in the current directory (or --config)
  and overridden by command-line flags.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template against a data file
    Render(render::RenderArgs),

    /// Print the cleaned template source without rendering it
    Clean(clean::CleanArgs),
}

/// How the template argument is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// The argument is the template text itself
    Inline,
    /// The argument is a template file
    File,
    /// The argument is a page file with START/END PAGE markers
    Page,
}

impl From<ModeArg> for SourceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Inline => SourceMode::Inline,
            ModeArg::File => SourceMode::File,
            ModeArg::Page => SourceMode::Page,
        }
    }
}

/// Options selecting and loading the template.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Template path, or the template text with --mode inline
    pub template: String,

    /// How to read the template (default from config, else page)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Variable delimiter character
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Configuration file (default: ./stencil.yaml if present)
    #[arg(short, long, env = "STENCIL_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output cleanup flags.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct CleanupArgs {
    /// Keep line breaks and indentation
    #[arg(long)]
    pub preserve_whitespace: bool,

    /// Keep single-line HTML comments
    #[arg(long)]
    pub preserve_comments: bool,
}

impl CleanupArgs {
    /// Flags given on the command line add to those from the config file.
    pub fn merge(&self, configured: CleanupOptions) -> CleanupOptions {
        configured
            | CleanupOptions {
                preserve_whitespace: self.preserve_whitespace,
                preserve_comments: self.preserve_comments,
            }
    }
}

/// Load the configuration file and apply command-line overrides.
pub fn resolve_config(source: &SourceArgs, cleanup: &CleanupArgs) -> Result<StencilConfig> {
    let mut config = match &source.config {
        Some(path) => StencilConfig::load(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?,
        None => StencilConfig::discover(std::env::current_dir()?)
            .context("Failed to load stencil.yaml")?,
    };

    if let Some(mode) = source.mode {
        config.source_mode = mode.into();
    }
    if let Some(delimiter) = source.delimiter {
        config.delimiter = delimiter;
    }
    config.cleanup = cleanup.merge(config.cleanup);
    config
        .validate()
        .context("Invalid option combination")?;

    Ok(config)
}

/// Load the template named by `source` with the resolved settings.
///
/// Load problems are errors here: a CLI user should hear about a missing page
/// marker rather than receive empty output.
pub fn load_template(source: &SourceArgs, config: &StencilConfig) -> Result<stencil_engine::Template> {
    let template_source = TemplateSource::from_mode(config.source_mode, source.template.as_str());
    TemplateLoader::new()
        .with_delimiter(config.delimiter)
        .try_load(&template_source)
        .with_context(|| format!("Failed to load template ({} mode)", config.source_mode))
}

/// Read a data context from a JSON or YAML file.
pub fn load_data(path: &Path) -> Result<DataContext> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {:?}", path))?;

    let data = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => DataContext::from_json_str(&content),
        Some("yaml") | Some("yml") => DataContext::from_yaml_str(&content),
        _ => anyhow::bail!("Unsupported data file type: {:?}", path),
    };
    data.with_context(|| format!("Invalid data file {:?}", path))
}
