use abell_components::core::ComponentError;
use abell_components::parser::ParseError;
use abell_components::templating::{RenderContext, parse_component};
use abell_components::test_utils::ComponentDir;
use serde_json::json;

use crate::fixtures;

#[test]
fn test_cycle_fixture() {
    let root = fixtures::component("cycle/A.abell");
    let err = parse_component(&root, &json!({}), &RenderContext::default()).unwrap_err();

    let ComponentError::Cycle {
        path,
        chain,
    } = &err
    else {
        panic!("expected a cycle error, got {err:?}");
    };
    assert_eq!(path, &root.canonicalize().unwrap());
    let names: Vec<_> = chain.iter().map(|entry| entry.component.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "A"]);
    assert_eq!(chain[0].component_path, chain[2].component_path);

    let report = err.format_with_context();
    assert!(report.contains("Circular Component Inclusion"));
    assert!(report.contains("B ("));
}

#[test]
fn test_cycle_below_the_root() {
    let dir = ComponentDir::new().unwrap();
    dir.write("Page.abell", "const A = require('./A.abell');\n<A />").unwrap();
    dir.write("A.abell", "const B = require('./B.abell');\n<B />").unwrap();
    dir.write("B.abell", "const A = require('./A.abell');\n<A />").unwrap();

    let err = parse_component(dir.path().join("Page.abell"), &json!({}), &RenderContext::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "Circular component inclusion: A -> B -> A");
}

#[test]
fn test_missing_component_file() {
    let dir = ComponentDir::new().unwrap();
    let page = dir.write("Page.abell", "const Nav = require('./Nav.abell');\n<nav><Nav /></nav>").unwrap();

    let err = parse_component(&page, &json!({}), &RenderContext::default()).unwrap_err();
    match &err {
        ComponentError::NotFound {
            path,
            chain,
            ..
        } => {
            assert!(path.ends_with("Nav.abell"));
            assert_eq!(chain.len(), 1);
            assert_eq!(chain[0].component, "Page");
        }
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(err.format_with_context().contains("Component File Not Found"));
}

#[test]
fn test_missing_root_file() {
    let dir = ComponentDir::new().unwrap();
    let err = parse_component(dir.path().join("Nope.abell"), &json!({}), &RenderContext::default())
        .unwrap_err();
    assert!(matches!(err, ComponentError::NotFound { .. }));
}

#[test]
fn test_non_self_closing_component() {
    let dir = ComponentDir::new().unwrap();
    dir.write("Nav.abell", "<nav/>").unwrap();
    let page = dir
        .write("Page.abell", "const Nav = require('./Nav.abell');\n<Nav>links</Nav>")
        .unwrap();

    let err = parse_component(&page, &json!({}), &RenderContext::default()).unwrap_err();
    match err {
        ComponentError::Parse {
            source: ParseError::UnsupportedClosingTag {
                tag,
                ..
            },
            ..
        } => assert_eq!(tag, "Nav"),
        other => panic!("expected unsupported closing tag, got {other:?}"),
    }
}

#[test]
fn test_bad_props_in_nested_file_reports_chain() {
    let dir = ComponentDir::new().unwrap();
    dir.write("Leaf.abell", "<b/>").unwrap();
    dir.write("Mid.abell", "const Leaf = require('./Leaf.abell');\n<Leaf props={ x: window.y } />")
        .unwrap();
    let page = dir.write("Page.abell", "const Mid = require('./Mid.abell');\n<Mid />").unwrap();

    let err = parse_component(&page, &json!({}), &RenderContext::default()).unwrap_err();
    match &err {
        ComponentError::Parse {
            path,
            chain,
            source: ParseError::InvalidProps {
                ..
            },
        } => {
            assert_eq!(path, &dir.canonical("Mid.abell").unwrap());
            let names: Vec<_> = chain.iter().map(|entry| entry.component.as_str()).collect();
            assert_eq!(names, vec!["Page", "Mid"]);
        }
        other => panic!("expected invalid props, got {other:?}"),
    }
    let report = err.format_with_context();
    assert!(report.contains("Component chain:"));
    assert!(report.contains("└─ Mid"));
}
