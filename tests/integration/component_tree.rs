use abell_components::config::ComponentConfig;
use abell_components::templating::{ComponentTreeBuilder, RenderContext, parse_component};
use abell_components::test_utils::{ComponentDir, init_test_logging};
use serde_json::json;

use crate::fixtures;

#[test]
fn test_sample_fixture() {
    init_test_logging(None);
    let path = fixtures::component("Sample.abell");
    let tree = parse_component(&path, &json!({ "foo": "123TEST" }), &RenderContext::default()).unwrap();

    assert_eq!(tree.component, "Sample");
    assert_eq!(tree.component_path, path.canonicalize().unwrap());
    assert!(tree.rendered_html.contains("<div>Component to test abell. 123TEST</div>"));
    assert!(!tree.rendered_html.contains("<style"));
    assert!(!tree.rendered_html.contains("AbellComponent"));

    assert_eq!(tree.styles.len(), 1);
    assert!(tree.styles[0].content.contains("div {"));
    assert_eq!(tree.styles[0].component_path, tree.component_path);
    assert_eq!(tree.scripts.len(), 1);
    assert!(tree.scripts[0].content.contains("console.log(3)"));
    assert!(tree.components.is_empty());
}

#[test]
fn test_parent_child_fixture() {
    init_test_logging(None);
    let tree = parse_component(
        fixtures::component("Parent.abell"),
        &json!({ "message": "Woop Woop!" }),
        &RenderContext::default(),
    )
    .unwrap();

    assert_eq!(tree.component, "Parent");
    assert_eq!(tree.components.len(), 1);
    let child = &tree.components[0];
    assert_eq!(child.component, "Child");
    assert_eq!(
        child.component_path,
        fixtures::component("nested/Child.abell").canonicalize().unwrap()
    );
    assert!(child.rendered_html.contains(r#"<h2 data-level="2">Woop Woop!</h2>"#));
    assert!(tree.rendered_html.contains(r#"<section class="parent">"#));
    assert!(tree.rendered_html.contains(&child.rendered_html));
    assert!(!tree.rendered_html.contains("require"));

    // Each node owns only its own fragments
    assert_eq!(tree.styles.len(), 1);
    assert!(tree.scripts.is_empty());
    assert_eq!(child.styles.len(), 1);
    assert!(child.styles[0].is_inlined());
    assert_eq!(child.scripts[0].bundle(), Some("site.js"));

    let groups = tree.styles_by_bundle();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].bundle, Some("site.css"));
    assert_eq!(groups[1].bundle, None);
    assert_eq!(tree.all_scripts().count(), 1);
}

#[test]
fn test_json_shape() {
    let tree = parse_component(
        fixtures::component("Parent.abell"),
        &json!({ "message": "hi" }),
        &RenderContext::default(),
    )
    .unwrap();
    let value = serde_json::to_value(&tree).unwrap();

    assert_eq!(value["component"], "Parent");
    assert!(value["renderedHTML"].as_str().unwrap().contains("hi"));
    assert_eq!(value["components"][0]["component"], "Child");
    assert_eq!(value["components"][0]["styles"][0]["attributes"]["inlined"], json!(true));
    assert_eq!(value["components"][0]["scripts"][0]["attributes"]["bundle"], "site.js");
    assert_eq!(value["styles"][0]["component"], "Parent");
}

#[test]
fn test_same_component_in_sibling_branches() {
    let dir = ComponentDir::new().unwrap();
    dir.write("Card.abell", "<article>{{ props.title }}</article><style>article{}</style>").unwrap();
    dir.write(
        "Column.abell",
        "import Card from './Card.abell'\n<div><Card props={ title: props.title } /></div>",
    )
    .unwrap();
    let page = dir
        .write(
            "Page.abell",
            "const Column = require('./Column.abell');\n<main><Column props={ title: 'left' } /><Column props={ title: 'right' } /></main>",
        )
        .unwrap();

    let tree = parse_component(&page, &json!({}), &RenderContext::default()).unwrap();
    assert_eq!(tree.node_count(), 5);
    assert!(tree.rendered_html.contains("<article>left</article>"));
    assert!(tree.rendered_html.contains("<article>right</article>"));
    assert_eq!(tree.all_styles().count(), 2);
    assert_eq!(tree.components[0].components[0].component_path, dir.canonical("Card.abell").unwrap());
}

#[test]
fn test_unknown_tags_pass_through() {
    let dir = ComponentDir::new().unwrap();
    dir.write("Icon.abell", "<i>*</i>").unwrap();
    let page = dir
        .write(
            "Page.abell",
            "const Icon = require('./Icon.abell');\n<Layout title=\"x\"><Icon /></Layout>",
        )
        .unwrap();

    let tree = parse_component(&page, &json!({}), &RenderContext::default()).unwrap();
    assert!(tree.rendered_html.contains(r#"<Layout title="x"><i>*</i></Layout>"#));
}

#[test]
fn test_base_path_and_parent_relative_specifiers() {
    let dir = ComponentDir::new().unwrap();
    dir.write("components/Header.abell", "<header>{{ props.site }}</header>").unwrap();
    dir.write("shared/Footer.abell", "<footer/>").unwrap();
    let page = dir
        .write(
            "pages/index.abell",
            "const Header = require('components/Header.abell');\nconst Footer = require('../shared/Footer.abell');\n<Header props={ site: props.site } /><Footer />",
        )
        .unwrap();

    let context = RenderContext::for_file("pages/index.abell").with_base_path(dir.path());
    let tree = parse_component(&page, &json!({ "site": "Blog" }), &context).unwrap();
    assert!(tree.rendered_html.contains("<header>Blog</header><footer/>"));
    assert_eq!(tree.components[1].component, "Footer");
}

#[test]
fn test_autoescape_config() {
    let dir = ComponentDir::new().unwrap();
    let page = dir.write("Page.abell", "<p>{{ props.text }}</p>").unwrap();
    let props = json!({ "text": "<em>hi</em>" });

    let escaping = ComponentTreeBuilder::new(ComponentConfig {
        autoescape: true,
        ..ComponentConfig::default()
    });
    let tree = escaping.build(&page, &props, &RenderContext::default()).unwrap();
    assert_eq!(tree.rendered_html, "<p>&lt;em&gt;hi&lt;&#x2F;em&gt;</p>");

    let raw = ComponentTreeBuilder::default().build(&page, &props, &RenderContext::default()).unwrap();
    assert_eq!(raw.rendered_html, "<p><em>hi</em></p>");
}

#[test]
fn test_child_markup_is_not_re_rendered() {
    let dir = ComponentDir::new().unwrap();
    dir.write("Raw.abell", "<code>{{ props.snippet }}</code>").unwrap();
    let page = dir
        .write("Page.abell", "const Raw = require('./Raw.abell');\n<Raw props={ snippet: '{{ x }}' } />")
        .unwrap();

    let tree = parse_component(&page, &json!({}), &RenderContext::default()).unwrap();
    assert!(tree.rendered_html.contains("<code>{{ x }}</code>"));
}

#[test]
fn test_marker_like_text_in_child_output_survives() {
    let dir = ComponentDir::new().unwrap();
    dir.write("Raw.abell", "<code>{{ props.s }}</code>").unwrap();
    dir.write("B.abell", "<b>B</b>").unwrap();
    let page = dir
        .write(
            "Page.abell",
            "const Raw = require('./Raw.abell');\nconst B = require('./B.abell');\n<Raw props={ s: '__ABELL_COMPONENT_1__' } /><B />",
        )
        .unwrap();

    let tree = parse_component(&page, &json!({}), &RenderContext::default()).unwrap();
    assert_eq!(tree.rendered_html.trim(), "<code>__ABELL_COMPONENT_1__</code><b>B</b>");
}

#[test]
fn test_marker_like_text_in_parent_template_survives() {
    let dir = ComponentDir::new().unwrap();
    dir.write("B.abell", "<b>B</b>").unwrap();
    let page = dir
        .write("Page.abell", "const B = require('./B.abell');\n<p>__ABELL_COMPONENT_0__</p><B />")
        .unwrap();

    let tree = parse_component(&page, &json!({}), &RenderContext::default()).unwrap();
    assert_eq!(tree.rendered_html.trim(), "<p>__ABELL_COMPONENT_0__</p><b>B</b>");
}

fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn test_child_styles_do_not_leak_to_parent() {
    let dir = ComponentDir::new().unwrap();
    dir.write(
        "Child.abell",
        "<AbellComponent>\n<template>\n  <div>Component to test abell. {{ props.foo }}</div>\n</template>\n<style>\n  div { color: red; }\n</style>\n</AbellComponent>\n",
    )
    .unwrap();
    let parent = dir
        .write(
            "Parent.abell",
            "<AbellComponent>\n<template>\n  {{ const Child = require('./Child.abell') }}\n  <div>\n    <Child props={ foo: 'Woop Woop!' } />\n  </div>\n</template>\n</AbellComponent>\n",
        )
        .unwrap();

    let tree = parse_component(&parent, &json!({}), &RenderContext::default()).unwrap();
    assert_eq!(
        squash(&tree.rendered_html),
        squash("<div><div>Component to test abell. Woop Woop!</div></div>")
    );
    assert!(tree.styles.is_empty());
    assert!(tree.scripts.is_empty());
    assert!(tree.components[0].styles[0].content.contains("div"));
}

#[test]
fn test_plain_component_has_no_fragments_or_children() {
    let dir = ComponentDir::new().unwrap();
    let page = dir.write("Plain.abell", "<p>{{ props.n }}</p>").unwrap();

    let tree = parse_component(&page, &json!({ "n": 7 }), &RenderContext::default()).unwrap();
    assert_eq!(tree.rendered_html, "<p>7</p>");
    assert!(tree.styles.is_empty());
    assert!(tree.scripts.is_empty());
    assert!(tree.components.is_empty());
}
