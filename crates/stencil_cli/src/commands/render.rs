//! Render command - Render a template against a data file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use stencil_engine::{DataContext, RenderConfig, StencilConfig, Translation};
use stencil_i18n::{Catalog, MarkupAdapter};

use super::{load_data, load_template, resolve_config, CleanupArgs, SourceArgs};

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Data file (JSON or YAML); renders against empty data when omitted
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    #[command(flatten)]
    pub cleanup: CleanupArgs,

    /// Message catalog enabling the translation pass
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Text domain for the translation pass
    #[arg(long)]
    pub text_domain: Option<String>,

    /// Class marking translatable elements
    #[arg(long)]
    pub marker_class: Option<String>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List scan warnings on stderr
    #[arg(long)]
    pub report: bool,
}

/// Translation inputs after merging flags with the configuration file.
#[derive(Debug, PartialEq)]
struct TranslationPlan {
    catalog: PathBuf,
    text_domain: String,
    marker_class: String,
}

impl TranslationPlan {
    /// Flags win over `translation:` in the config. Both a catalog and a text
    /// domain are needed; otherwise the pass is skipped.
    fn resolve(args: &RenderArgs, config: &StencilConfig) -> Option<Self> {
        let settings = config.translation.as_ref();
        let catalog = args
            .catalog
            .clone()
            .or_else(|| settings.and_then(|s| s.catalog.clone()))?;
        let text_domain = args
            .text_domain
            .clone()
            .or_else(|| settings.map(|s| s.text_domain.clone()))?;
        let marker_class = args
            .marker_class
            .clone()
            .or_else(|| settings.map(|s| s.marker_class.clone()))
            .unwrap_or_else(|| stencil_engine::DEFAULT_MARKER_CLASS.to_string());

        Some(Self {
            catalog,
            text_domain,
            marker_class,
        })
    }
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let config = resolve_config(&args.source, &args.cleanup)?;
    let template = load_template(&args.source, &config)?;

    let data = match &args.data {
        Some(path) => load_data(path)?,
        None => DataContext::new(),
    };

    let plan = TranslationPlan::resolve(&args, &config);
    if plan.is_none() && (args.catalog.is_some() || args.text_domain.is_some()) {
        warn!("Translation needs both a catalog and a text domain; skipping it");
    }

    let catalog = match &plan {
        Some(plan) => Some(
            Catalog::load(&plan.catalog)
                .with_context(|| format!("Failed to load catalog {:?}", plan.catalog))?,
        ),
        None => None,
    };
    let adapter = MarkupAdapter::new();

    let mut render_config = RenderConfig::new(config.cleanup);
    if let (Some(plan), Some(catalog)) = (&plan, &catalog) {
        info!("Translating with domain '{}'", plan.text_domain);
        render_config = render_config.with_translation(
            Translation::new(&plan.text_domain, catalog)
                .with_marker_class(&plan.marker_class)
                .with_adapter(&adapter),
        );
    }

    let rendered = template.render_report(&data, &render_config);

    if args.report {
        if rendered.warnings.is_empty() {
            eprintln!("No warnings");
        } else {
            eprintln!("{} warning(s):", rendered.warnings.len());
            for warning in &rendered.warnings {
                eprintln!("   - {}", warning);
            }
        }
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered.text)
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote {} bytes to {:?}", rendered.text.len(), path);
        }
        None => print!("{}", rendered.text),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_engine::TranslationSettings;
    use tempfile::tempdir;

    fn args(template: &str) -> RenderArgs {
        RenderArgs {
            source: SourceArgs {
                template: template.to_string(),
                mode: None,
                delimiter: None,
                config: None,
            },
            data: None,
            cleanup: CleanupArgs::default(),
            catalog: None,
            text_domain: None,
            marker_class: None,
            output: None,
            report: false,
        }
    }

    #[test]
    fn test_translation_plan_needs_catalog_and_domain() {
        let config = StencilConfig::default();
        let mut render = args("t.html");
        assert_eq!(TranslationPlan::resolve(&render, &config), None);

        render.catalog = Some(PathBuf::from("messages.yaml"));
        assert_eq!(TranslationPlan::resolve(&render, &config), None);

        render.text_domain = Some("recipes".to_string());
        let plan = TranslationPlan::resolve(&render, &config).unwrap();
        assert_eq!(plan.marker_class, "xlate");
    }

    #[test]
    fn test_translation_plan_flags_override_config() {
        let mut config = StencilConfig::default();
        config.translation = Some(TranslationSettings {
            text_domain: "recipes".to_string(),
            marker_class: "tr".to_string(),
            catalog: Some(PathBuf::from("config.yaml")),
        });

        let mut render = args("t.html");
        render.catalog = Some(PathBuf::from("flag.json"));
        let plan = TranslationPlan::resolve(&render, &config).unwrap();
        assert_eq!(plan.catalog, PathBuf::from("flag.json"));
        assert_eq!(plan.text_domain, "recipes");
        assert_eq!(plan.marker_class, "tr");
    }

    #[test]
    fn test_execute_writes_output_file() {
        let temp = tempdir().unwrap();
        let template = temp.path().join("card.html");
        fs::write(
            &template,
            "<!-- START PAGE --><h1 class=\"xlate\">Hello</h1><p>#name#</p><!-- END PAGE -->",
        )
        .unwrap();
        let data = temp.path().join("data.yaml");
        fs::write(&data, "name: Ada\n").unwrap();
        let catalog = temp.path().join("messages.yaml");
        fs::write(&catalog, "cards:\n  Hello: Hallo\n").unwrap();
        let output = temp.path().join("out.html");

        let mut render = args(template.to_str().unwrap());
        render.data = Some(data);
        render.catalog = Some(catalog);
        render.text_domain = Some("cards".to_string());
        render.output = Some(output.clone());

        execute(render).unwrap();
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "<h1 class=\"xlate\">Hallo</h1><p>Ada</p> "
        );
    }
}
