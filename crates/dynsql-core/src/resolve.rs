//! Node tree resolution.
//!
//! Walks a parsed template in document order and emits SQL text.
//! Resolution is pure: it never mutates the tree and never fails.
//! Failed conditions contribute nothing.

use crate::expr;
use crate::normalize::strip_leading_connector;
use crate::params::ParamMap;
use crate::template::Node;

/// Resolves a list of sibling nodes by concatenation.
#[must_use]
pub fn resolve_nodes(nodes: &[Node], params: &ParamMap) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&resolve_node(node, params));
    }
    out
}

/// Resolves a single node.
#[must_use]
pub fn resolve_node(node: &Node, params: &ParamMap) -> String {
    match node {
        Node::Text(text) => text.clone(),
        Node::If { test, children } => {
            if expr::evaluate(test, params) {
                resolve_nodes(children, params)
            } else {
                String::new()
            }
        }
        Node::Choose { whens, otherwise } => {
            for branch in whens {
                if expr::evaluate(&branch.test, params) {
                    return resolve_nodes(&branch.children, params);
                }
            }
            otherwise
                .as_ref()
                .map_or_else(String::new, |children| resolve_nodes(children, params))
        }
        Node::Where { children } => {
            let body = resolve_nodes(children, params);
            let body = body.trim();
            if body.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", strip_leading_connector(body))
            }
        }
        Node::Generic { children, .. } => resolve_nodes(children, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;
    use serde_json::json;

    fn params(value: serde_json::Value) -> ParamMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn resolve(fragment: &str, p: &ParamMap) -> String {
        let template = Template::parse(fragment).expect("fragment should parse");
        resolve_nodes(template.nodes(), p)
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(resolve("SELECT 1", &params(json!({}))), "SELECT 1");
    }

    #[test]
    fn test_if_included_and_excluded() {
        let fragment = "a<if test=\"x\">b</if>c";
        assert_eq!(resolve(fragment, &params(json!({ "x": 1 }))), "abc");
        assert_eq!(resolve(fragment, &params(json!({}))), "ac");
    }

    #[test]
    fn test_tail_text_always_emits() {
        let fragment = "<if test=\"x\">body</if> tail";
        assert_eq!(resolve(fragment, &params(json!({}))), " tail");
    }

    #[test]
    fn test_choose_first_match_wins() {
        let fragment = "<choose>\
                        <when test=\"a\">A</when>\
                        <when test=\"b\">B</when>\
                        <otherwise>Z</otherwise>\
                        </choose>";
        assert_eq!(resolve(fragment, &params(json!({ "a": 1, "b": 1 }))), "A");
        assert_eq!(resolve(fragment, &params(json!({ "b": 1 }))), "B");
        assert_eq!(resolve(fragment, &params(json!({}))), "Z");
    }

    #[test]
    fn test_choose_without_otherwise_emits_nothing() {
        let fragment = "<choose><when test=\"a\">A</when></choose>";
        assert_eq!(resolve(fragment, &params(json!({}))), "");
    }

    #[test]
    fn test_where_suppressed_when_body_empty() {
        let fragment = "SELECT 1<where><if test=\"x\">AND a=1</if></where>";
        assert_eq!(resolve(fragment, &params(json!({}))), "SELECT 1");
    }

    #[test]
    fn test_where_strips_single_leading_connector() {
        let fragment = "<where><if test=\"x\">AND a=1</if><if test=\"y\"> AND b=2</if></where>";
        assert_eq!(
            resolve(fragment, &params(json!({ "x": 1, "y": 1 }))),
            " WHERE a=1 AND b=2"
        );
        assert_eq!(resolve(fragment, &params(json!({ "y": 1 }))), " WHERE b=2");
    }

    #[test]
    fn test_where_strips_leading_or() {
        let fragment = "<where><if test=\"x\">or a=1</if></where>";
        assert_eq!(resolve(fragment, &params(json!({ "x": 1 }))), " WHERE a=1");
    }

    #[test]
    fn test_where_keeps_inner_connectors() {
        let fragment = "<where>AND a=1 AND b=2</where>";
        assert_eq!(resolve(fragment, &params(json!({}))), " WHERE a=1 AND b=2");
    }

    #[test]
    fn test_generic_tag_resolves_children_in_place() {
        let fragment = "x<wrap>y<if test=\"a\">z</if></wrap>";
        assert_eq!(resolve(fragment, &params(json!({ "a": 1 }))), "xyz");
    }

    #[test]
    fn test_nested_where_in_choose() {
        let fragment = "<choose><when test=\"a\"><where>AND x=1</where></when></choose>";
        assert_eq!(
            resolve(fragment, &params(json!({ "a": 1 }))),
            " WHERE x=1"
        );
    }
}
