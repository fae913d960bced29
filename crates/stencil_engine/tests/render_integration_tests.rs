//! Integration tests for loading and rendering templates.

use std::fs;
use tempfile::tempdir;

use stencil_engine::{
    clean, CleanupOptions, DataContext, LoadError, RenderConfig, ScanWarning, Template,
    TemplateLoader, TemplateSource, Value,
};

fn items(values: &[&str]) -> Vec<DataContext> {
    values
        .iter()
        .map(|v| DataContext::new().with("x", *v))
        .collect()
}

/// Text without directives comes back unchanged apart from line endings.
#[test]
fn test_plain_text_passthrough() {
    let template = Template::new("<p>\r\n  plain\r\n</p>");
    assert_eq!(
        template.render(&DataContext::new(), CleanupOptions::PRESERVE_ALL),
        "<p>\n  plain\n</p>"
    );
}

#[test]
fn test_variables() {
    let template = Template::new("Hello #name#!");
    let data = DataContext::new().with("name", "World");
    assert_eq!(template.render(&data, CleanupOptions::PRESERVE_ALL), "Hello World!");

    let template = Template::new("Hi #missing#");
    assert_eq!(
        template.render(&DataContext::new(), CleanupOptions::PRESERVE_ALL),
        "Hi #missing#"
    );
}

#[test]
fn test_repeat() {
    let template =
        Template::new("<!-- START REPEAT items --><li>#x#</li><!-- END REPEAT items -->");
    let data = DataContext::new().with_list("items", items(&["a", "b", "c"]));
    assert_eq!(
        template.render(&data, CleanupOptions::PRESERVE_ALL),
        "<li>a</li><li>b</li><li>c</li>"
    );
}

#[test]
fn test_repeat_flattened_output() {
    let template = Template::new(
        "<ul>\n<!-- START REPEAT items -->\n  <li>#x#</li>\n<!-- END REPEAT items -->\n</ul>\n",
    );
    let data = DataContext::new().with_list("items", items(&["a", "b"]));
    assert_eq!(
        template.render(&data, CleanupOptions::NONE),
        "<ul> <li>a</li> <li>b</li> </ul> "
    );
}

#[test]
fn test_include_if_truth_table() {
    let plain = Template::new("<!-- START INCLUDEIF flag -->Y<!-- END INCLUDEIF flag -->");
    let negated = Template::new("<!-- START INCLUDEIF !flag -->Y<!-- END INCLUDEIF !flag -->");
    let cases = [
        (DataContext::new().with("flag", "on"), "Y", ""),
        (DataContext::new().with("flag", 0i64), "Y", ""),
        (DataContext::new().with("flag", false), "", "Y"),
        (DataContext::new().with("flag", Value::Null), "", "Y"),
        (DataContext::new(), "", "Y"),
    ];
    for (data, expected, expected_negated) in cases {
        assert_eq!(plain.render(&data, CleanupOptions::PRESERVE_ALL), expected);
        assert_eq!(negated.render(&data, CleanupOptions::PRESERVE_ALL), expected_negated);
    }
}

#[test]
fn test_strip_region() {
    let template = Template::new(
        "<!-- START STRIP WHITESPACE 1 -->\n<div>\n  <p>x</p>\n</div>\n<!-- END STRIP WHITESPACE 1 -->",
    );
    assert_eq!(
        template.render(&DataContext::new(), CleanupOptions::PRESERVE_ALL),
        "<div><p>x</p></div>"
    );

    let outside = Template::new("<div>\n  <p>x</p>\n</div>\n");
    assert_eq!(
        outside.render(&DataContext::new(), CleanupOptions::PRESERVE_ALL),
        "<div>\n  <p>x</p>\n</div>\n"
    );
}

#[test]
fn test_cleaner_idempotence() {
    let samples = [
        "<div>\n  <!-- c -->\n  <p> x </p>\n\n</div>\n",
        "<!-- one --><!-- two -->\n\t\n",
        "<!-- open\n still open -->",
    ];
    for sample in samples {
        for bits in 0..4 {
            let options = CleanupOptions::from_bits(bits);
            let once = clean(sample, options);
            assert_eq!(clean(&once, options), once);
        }
    }
}

#[test]
fn test_recipe_page() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("recipe.html");
    fs::write(
        &path,
        "<html>\r\n<!-- START PAGE -->\r\n\
         <div class=\"recipe\">\r\n\
         <h2>#title#</h2>\r\n\
         <!-- START IGNORE --><p>designer notes</p><!-- END IGNORE -->\r\n\
         <!-- START INCLUDEIF notes --><p>#notes#</p><!-- END INCLUDEIF notes -->\r\n\
         <ul>\r\n\
         <!-- START REPEAT ingredients --><li>#amount# #name#</li>\r\n\
         <!-- END REPEAT ingredients -->\r\n\
         </ul>\r\n\
         </div>\r\n\
         <!-- END PAGE -->\r\n</html>",
    )
    .unwrap();

    let template = TemplateLoader::new().load(&TemplateSource::Page(path));
    let data = DataContext::from_json_str(
        r#"{
            "title": "Pancakes",
            "notes": null,
            "ingredients": [
                {"amount": "2", "name": "eggs"},
                {"amount": "1 cup", "name": "flour"}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        template.render(&data, CleanupOptions::NONE),
        "<div class=\"recipe\"> <h2>Pancakes</h2> <ul> <li>2 eggs</li> <li>1 cup flour</li> </ul> </div> "
    );
}

#[test]
fn test_page_without_markers_renders_empty() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("broken.html");
    fs::write(&path, "<p>no page markers</p>").unwrap();

    let source = TemplateSource::Page(path);
    assert!(matches!(
        TemplateLoader::new().try_load(&source),
        Err(LoadError::MissingMarker { .. })
    ));

    let template = TemplateLoader::new().load(&source);
    assert_eq!(template.render(&DataContext::new(), CleanupOptions::NONE), "");
}

#[test]
fn test_warnings_do_not_abort() {
    let template = Template::new(
        "a<!-- START REPEAT x -->b<!-- START INCLUDEIF y -->c<!-- START INCLUDEIF 1 -->d#e#",
    );
    let data = DataContext::new().with_list("x", vec![]);
    let rendered =
        template.render_report(&data, &RenderConfig::new(CleanupOptions::PRESERVE_ALL));

    assert_eq!(rendered.text, template.source());
    assert_eq!(rendered.warnings.len(), 4);
    assert!(matches!(rendered.warnings[0], ScanWarning::RepeatEndMissing { .. }));
    assert!(matches!(rendered.warnings[1], ScanWarning::IncludeIfEndMissing { .. }));
    assert!(matches!(rendered.warnings[2], ScanWarning::MalformedIncludeIf { .. }));
    assert!(matches!(rendered.warnings[3], ScanWarning::UnknownVariable { .. }));
}

#[test]
fn test_concurrent_renders_of_one_template() {
    let template = Template::new("<!-- START REPEAT r -->#x#<!-- END REPEAT r -->");
    std::thread::scope(|scope| {
        for n in 0..4 {
            let template = &template;
            scope.spawn(move || {
                let values: Vec<String> = (0..n).map(|i| i.to_string()).collect();
                let data = DataContext::new().with_list(
                    "r",
                    values
                        .iter()
                        .map(|v| DataContext::new().with("x", v.as_str()))
                        .collect(),
                );
                assert_eq!(
                    template.render(&data, CleanupOptions::PRESERVE_ALL),
                    values.concat()
                );
            });
        }
    });
}

/// Nested objects in the data file count as present for INCLUDEIF.
#[test]
fn test_include_if_on_nested_object() {
    let data = DataContext::from_json_str(r#"{"author": {"name": "Ada"}}"#).unwrap();
    let template =
        Template::new("<!-- START INCLUDEIF author -->BY<!-- END INCLUDEIF author -->");
    assert_eq!(template.render(&data, CleanupOptions::PRESERVE_ALL), "BY");

    let template =
        Template::new("<!-- START INCLUDEIF !author -->anonymous<!-- END INCLUDEIF !author -->");
    assert_eq!(template.render(&data, CleanupOptions::PRESERVE_ALL), "");
}
