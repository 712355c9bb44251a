//! The component tree produced by the builder.
//!
//! Each [`ComponentNode`] owns only the style and script fragments written in
//! its own file. Descendant fragments stay on the descendants; callers that
//! want everything use [`ComponentNode::all_styles`] / [`ComponentNode::all_scripts`],
//! which walk the tree without changing it.
//!
//! Serialised with serde, a node uses the field names page builders expect:
//! `renderedHTML`, `styles`, `scripts`, `components`, and each fragment has
//! `component`, `attributes`, `componentPath` and `content`.

use std::path::PathBuf;

use serde::Serialize;

use crate::parser::{AttributeMap, AttributeValue};

/// A `<style>` or `<script>` block, tagged with the component that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// Owning component identifier
    pub component: String,
    /// Attributes of the block's opening tag
    pub attributes: AttributeMap,
    /// Canonical path of the owning component file
    pub component_path: PathBuf,
    /// Raw block body
    pub content: String,
}

/// Style fragment owned by one component.
pub type StyleFragment = Fragment;

/// Script fragment owned by one component.
pub type ScriptFragment = Fragment;

impl Fragment {
    /// Value of the `bundle` attribute, if it has one.
    #[must_use]
    pub fn bundle(&self) -> Option<&str> {
        match self.attributes.get("bundle") {
            Some(AttributeValue::Text(name)) => Some(name),
            _ => None,
        }
    }

    /// Whether the block asks to be inlined.
    ///
    /// `inlined` and `inlined="true"` count; `inlined=false` arrives as the
    /// string `"false"` and does not.
    #[must_use]
    pub fn is_inlined(&self) -> bool {
        match self.attributes.get("inlined") {
            Some(AttributeValue::Flag) => true,
            Some(AttributeValue::Text(value)) => value != "false",
            _ => false,
        }
    }
}

/// Fragments sharing the same `bundle` attribute, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentGroup<'a> {
    /// Bundle name, `None` for fragments without one
    pub bundle: Option<&'a str>,
    /// Fragments in traversal order, duplicates included
    pub fragments: Vec<&'a Fragment>,
}

/// Group fragments by bundle. Nothing is merged or deduplicated.
pub fn group_by_bundle<'a, I>(fragments: I) -> Vec<FragmentGroup<'a>>
where
    I: IntoIterator<Item = &'a Fragment>,
{
    let mut groups: Vec<FragmentGroup<'a>> = Vec::new();
    for fragment in fragments {
        let bundle = fragment.bundle();
        match groups.iter_mut().find(|group| group.bundle == bundle) {
            Some(group) => group.fragments.push(fragment),
            None => groups.push(FragmentGroup {
                bundle,
                fragments: vec![fragment],
            }),
        }
    }
    groups
}

/// One rendered component instance and its nested components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentNode {
    /// Identifier: the binding name, or the file stem for the root
    pub component: String,
    /// Canonical path of the component file
    #[serde(rename = "componentPath")]
    pub component_path: PathBuf,
    /// Final markup with every nested component already substituted
    #[serde(rename = "renderedHTML")]
    pub rendered_html: String,
    /// This file's own style blocks
    pub styles: Vec<StyleFragment>,
    /// This file's own script blocks
    pub scripts: Vec<ScriptFragment>,
    /// Nested components in source order, one per occurrence
    pub components: Vec<ComponentNode>,
}

impl ComponentNode {
    /// Depth-first pre-order walk over this node and all descendants.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![self],
        }
    }

    /// Every style fragment in the subtree: own first, then each child in order.
    pub fn all_styles(&self) -> impl Iterator<Item = &StyleFragment> {
        self.walk().flat_map(|node| node.styles.iter())
    }

    /// Every script fragment in the subtree: own first, then each child in order.
    pub fn all_scripts(&self) -> impl Iterator<Item = &ScriptFragment> {
        self.walk().flat_map(|node| node.scripts.iter())
    }

    /// Rolled-up style fragments grouped by `bundle`.
    #[must_use]
    pub fn styles_by_bundle(&self) -> Vec<FragmentGroup<'_>> {
        group_by_bundle(self.all_styles())
    }

    /// Rolled-up script fragments grouped by `bundle`.
    #[must_use]
    pub fn scripts_by_bundle(&self) -> Vec<FragmentGroup<'_>> {
        group_by_bundle(self.all_scripts())
    }

    /// Number of nodes in the subtree, this one included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Height of the subtree (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.components.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// Iterator returned by [`ComponentNode::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a ComponentNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ComponentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.components.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_attribute;

    fn fragment(component: &str, attributes: &str, content: &str) -> Fragment {
        Fragment {
            component: component.to_string(),
            attributes: parse_attribute(attributes).unwrap(),
            component_path: PathBuf::from(format!("/site/{component}.abell")),
            content: content.to_string(),
        }
    }

    fn node(name: &str, styles: Vec<Fragment>, components: Vec<ComponentNode>) -> ComponentNode {
        ComponentNode {
            component: name.to_string(),
            component_path: PathBuf::from(format!("/site/{name}.abell")),
            rendered_html: String::new(),
            styles,
            scripts: Vec::new(),
            components,
        }
    }

    fn sample_tree() -> ComponentNode {
        node(
            "Page",
            vec![fragment("Page", r#"bundle="main.css""#, "body{}")],
            vec![
                node(
                    "Nav",
                    vec![fragment("Nav", "inlined", "nav{}")],
                    vec![node("Logo", vec![fragment("Logo", r#"bundle="main.css""#, "img{}")], vec![])],
                ),
                node("Footer", vec![fragment("Footer", "", "footer{}")], vec![]),
            ],
        )
    }

    #[test]
    fn test_walk_is_pre_order() {
        let tree = sample_tree();
        let names: Vec<_> = tree.walk().map(|n| n.component.as_str()).collect();
        assert_eq!(names, vec!["Page", "Nav", "Logo", "Footer"]);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_all_styles_rolls_up_without_mutating() {
        let tree = sample_tree();
        let contents: Vec<_> = tree.all_styles().map(|f| f.content.as_str()).collect();
        assert_eq!(contents, vec!["body{}", "nav{}", "img{}", "footer{}"]);
        assert_eq!(tree.styles.len(), 1);
        assert_eq!(tree.all_scripts().count(), 0);
    }

    #[test]
    fn test_group_by_bundle() {
        let tree = sample_tree();
        let groups = tree.styles_by_bundle();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].bundle, Some("main.css"));
        assert_eq!(groups[0].fragments.len(), 2);
        assert_eq!(groups[1].bundle, None);
        assert_eq!(groups[1].fragments.len(), 2);
        assert!(tree.scripts_by_bundle().is_empty());
    }

    #[test]
    fn test_inlined_respects_false_string() {
        assert!(fragment("A", "inlined", "").is_inlined());
        assert!(fragment("A", r#"inlined="true""#, "").is_inlined());
        assert!(!fragment("A", "inlined=false", "").is_inlined());
        assert!(!fragment("A", "", "").is_inlined());
    }

    #[test]
    fn test_serialised_field_names() {
        let tree = node("Page", vec![fragment("Page", "inlined", "p{}")], vec![]);
        let json = serde_json::to_value(&tree).unwrap();
        let object = json.as_object().unwrap();
        for key in ["renderedHTML", "styles", "scripts", "components", "component", "componentPath"] {
            assert!(object.contains_key(key), "missing {key}");
        }
        let style = json["styles"][0].as_object().unwrap();
        let mut keys: Vec<_> = style.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["attributes", "component", "componentPath", "content"]);
        assert_eq!(json["styles"][0]["attributes"]["inlined"], serde_json::json!(true));
    }
}
