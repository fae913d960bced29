//! Integration tests for the translation pass.

use std::fs;
use tempfile::tempdir;

use stencil_engine::{CleanupOptions, DataContext, RenderConfig, Template, Translation};
use stencil_i18n::{Catalog, MarkupAdapter};

fn recipe_template() -> Template {
    Template::new(
        "<div>\n\
         <h3 class=\"xlate\">Ingredients</h3>\n\
         <ul><!-- START REPEAT items --><li class=\"xlate\">#name#</li><!-- END REPEAT items --></ul>\n\
         </div>\n",
    )
}

fn recipe_data() -> DataContext {
    DataContext::new().with_list(
        "items",
        vec![
            DataContext::new().with("name", "Salt"),
            DataContext::new().with("name", "Pepper"),
        ],
    )
}

#[test]
fn test_translation_pass_with_catalog() {
    let catalog = Catalog::new()
        .with("recipes", "Ingredients", "Zutaten")
        .with("recipes", "Salt", "Salz");
    let adapter = MarkupAdapter::new();
    let config = RenderConfig::new(CleanupOptions::NONE)
        .with_translation(Translation::new("recipes", &catalog).with_adapter(&adapter));

    assert_eq!(
        recipe_template().render_with(&recipe_data(), &config),
        "<div> <h3 class=\"xlate\">Zutaten</h3> \
         <ul><li class=\"xlate\">Salz</li><li class=\"xlate\">Pepper</li></ul> </div> "
    );
}

#[test]
fn test_translation_without_adapter_is_skipped() {
    let catalog = Catalog::new().with("recipes", "Ingredients", "Zutaten");
    let config = RenderConfig::new(CleanupOptions::PRESERVE_ALL)
        .with_translation(Translation::new("recipes", &catalog));

    let rendered = recipe_template().render_with(&recipe_data(), &config);
    assert!(rendered.contains(">Ingredients<"));
}

#[test]
fn test_custom_marker_class_and_catalog_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("messages.yaml");
    fs::write(&path, "site:\n  Hello: Hallo\n").unwrap();
    let catalog = Catalog::load(&path).unwrap();

    let adapter = MarkupAdapter::new();
    let config = RenderConfig::new(CleanupOptions::PRESERVE_ALL).with_translation(
        Translation::new("site", &catalog)
            .with_marker_class("i18n")
            .with_adapter(&adapter),
    );

    let template = Template::new("<b class=\"i18n\">#greeting#</b> <b class=\"xlate\">Hello</b>");
    let data = DataContext::new().with("greeting", "Hello");
    assert_eq!(
        template.render_with(&data, &config),
        "<b class=\"i18n\">Hallo</b> <b class=\"xlate\">Hello</b>"
    );
}

#[test]
fn test_attribute_values_do_not_end_the_tag() {
    let catalog = Catalog::new().with("site", "Home", "Start");
    let adapter = MarkupAdapter::new();
    let config = RenderConfig::new(CleanupOptions::PRESERVE_ALL)
        .with_translation(Translation::new("site", &catalog).with_adapter(&adapter));

    let template = Template::new(r#"<a class="xlate" title="a>b" href="/">Home</a>"#);
    assert_eq!(
        template.render_with(&DataContext::new(), &config),
        r#"<a class="xlate" title="a>b" href="/">Start</a>"#
    );
}
