//! Syntax tree produced by the grammar adapter.
//!
//! The node kinds form a closed set; anything else an external parser emits
//! is kept as [`AstNode::Unknown`] with its original tag so it can be
//! reported and replaced by silence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::pattern_system::{Fraction, SourceSpan};
use crate::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    Pattern(PatternNode),
    Element(ElementNode),
    Stretch(StretchNode),
    Scale(ScaleNode),
    Unknown(UnknownNode),
}

/// How a pattern's children share the cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// One after another, equal shares of the cycle.
    #[default]
    Horizontal,
    /// All at once.
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternNode {
    pub children: Vec<AstNode>,
    pub alignment: Alignment,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElementNode {
    pub source: ElementSource,
    pub options: Option<Options>,
    /// Byte range of the element in the notation source.
    pub location: Option<SourceSpan>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElementSource {
    Value(Value),
    Node(Box<AstNode>),
}

/// `slow n $ ...`: play the child `amount` times slower.
#[derive(Clone, Debug, PartialEq)]
pub struct StretchNode {
    pub child: Option<Box<AstNode>>,
    pub amount: Fraction,
}

/// `scale "C4 major" $ ...`: read the child's values as scale steps.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleNode {
    pub child: Option<Box<AstNode>>,
    pub scale: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnknownNode {
    pub kind: String,
    pub children: Vec<AstNode>,
}

/// Per-element decoration written after a step (`c*2`, `c@3`, `c(3,8)`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Fraction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub euclid: Option<Euclid>,
    /// Keys an external parser sent that have no typed field here.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Options {
    pub fn with_operator(operator: Operator) -> Self {
        Self {
            operator: Some(operator),
            ..Self::default()
        }
    }

    /// Names of every key that is set, in a stable order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if self.operator.is_some() {
            keys.push("operator".to_string());
        }
        if self.weight.is_some() {
            keys.push("weight".to_string());
        }
        if self.reps.is_some() {
            keys.push("reps".to_string());
        }
        if self.euclid.is_some() {
            keys.push("euclid".to_string());
        }
        keys.extend(self.extra.keys().cloned());
        keys
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    #[serde(rename = "type_")]
    pub kind: String,
    #[serde(rename = "arguments_", default)]
    pub arguments: OperatorArguments,
}

impl Operator {
    pub fn new(kind: impl Into<String>, amount: Option<Fraction>) -> Self {
        Self {
            kind: kind.into(),
            arguments: OperatorArguments { amount },
        }
    }

    /// The `stretch` operator: play the element `amount` times slower.
    pub fn stretch(amount: Fraction) -> Self {
        Self::new("stretch", Some(amount))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorArguments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Fraction>,
}

/// Euclidean rhythm request: `pulses` hits spread over `steps`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Euclid {
    pub pulses: u32,
    pub steps: u32,
    #[serde(default)]
    pub rotation: Option<u32>,
}

impl AstNode {
    /// Horizontal pattern of the given children.
    pub fn sequence(children: Vec<AstNode>) -> Self {
        AstNode::Pattern(PatternNode {
            children,
            alignment: Alignment::Horizontal,
        })
    }

    /// Vertical pattern of the given children.
    pub fn stack(children: Vec<AstNode>) -> Self {
        AstNode::Pattern(PatternNode {
            children,
            alignment: Alignment::Vertical,
        })
    }

    pub fn element(value: impl Into<Value>) -> Self {
        AstNode::Element(ElementNode {
            source: ElementSource::Value(value.into()),
            options: None,
            location: None,
        })
    }

    pub fn rest() -> Self {
        AstNode::element(crate::value::REST)
    }

    /// Element wrapping a whole sub-tree, as `[...]` produces.
    pub fn group(node: AstNode) -> Self {
        AstNode::Element(ElementNode {
            source: ElementSource::Node(Box::new(node)),
            options: None,
            location: None,
        })
    }

    pub fn stretch(child: AstNode, amount: Fraction) -> Self {
        AstNode::Stretch(StretchNode {
            child: Some(Box::new(child)),
            amount,
        })
    }

    pub fn scale(child: AstNode, scale: impl Into<String>) -> Self {
        AstNode::Scale(ScaleNode {
            child: Some(Box::new(child)),
            scale: scale.into(),
        })
    }

    pub fn unknown(kind: impl Into<String>, children: Vec<AstNode>) -> Self {
        AstNode::Unknown(UnknownNode {
            kind: kind.into(),
            children,
        })
    }

    /// Attach options; only elements carry them, other nodes are returned as-is.
    pub fn with_options(self, options: Options) -> Self {
        match self {
            AstNode::Element(element) => AstNode::Element(ElementNode {
                options: Some(options),
                ..element
            }),
            other => other,
        }
    }

    /// The node's type tag, as the JavaScript parser spells it.
    pub fn kind(&self) -> &str {
        match self {
            AstNode::Pattern(_) => "pattern",
            AstNode::Element(_) => "element",
            AstNode::Stretch(_) => "stretch",
            AstNode::Scale(_) => "scale",
            AstNode::Unknown(node) => &node.kind,
        }
    }

    pub fn options(&self) -> Option<&Options> {
        match self {
            AstNode::Element(element) => element.options.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AstError {
    #[error("invalid AST JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pattern node has no children")]
    EmptyPattern,

    #[error("{kind} node has an invalid \"{argument}\" argument: {reason}")]
    InvalidArgument {
        kind: String,
        argument: &'static str,
        reason: String,
    },
}

/// Node as the JavaScript krill parser serializes it.
#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "type_")]
    kind: String,
    #[serde(rename = "arguments_", default)]
    arguments: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "source_", default)]
    source: Option<RawSource>,
    #[serde(rename = "options_", default)]
    options: Option<Options>,
    #[serde(rename = "location_", default)]
    location: Option<RawLocation>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Nodes(Vec<RawNode>),
    Node(Box<RawNode>),
    Scalar(Value),
}

#[derive(Deserialize)]
struct RawLocation {
    start: RawPosition,
    end: RawPosition,
}

#[derive(Deserialize)]
struct RawPosition {
    offset: usize,
}

/// Read a tree in the shape the JavaScript krill parser emits
/// (`type_`, `arguments_`, `source_`, `options_`, `location_`).
///
/// Tags other than `pattern`, `element`, `stretch` and `scale` become
/// [`AstNode::Unknown`].
pub fn from_json(json: &str) -> Result<AstNode, AstError> {
    let raw: RawNode = serde_json::from_str(json)?;
    convert(raw)
}

/// Same as [`from_json`] for an already parsed JSON value.
pub fn from_json_value(value: serde_json::Value) -> Result<AstNode, AstError> {
    let raw: RawNode = serde_json::from_value(value)?;
    convert(raw)
}

fn convert(raw: RawNode) -> Result<AstNode, AstError> {
    match raw.kind.as_str() {
        "pattern" => {
            let children = convert_children(raw.source)?;
            if children.is_empty() {
                return Err(AstError::EmptyPattern);
            }
            let alignment = match raw.arguments.get("alignment").and_then(|a| a.as_str()) {
                Some("v") | Some("vertical") => Alignment::Vertical,
                _ => Alignment::Horizontal,
            };
            Ok(AstNode::Pattern(PatternNode {
                children,
                alignment,
            }))
        }
        "element" => {
            let source = match raw.source {
                Some(RawSource::Scalar(value)) => ElementSource::Value(value),
                Some(RawSource::Node(node)) => ElementSource::Node(Box::new(convert(*node)?)),
                Some(RawSource::Nodes(nodes)) => {
                    let mut children = nodes.into_iter().map(convert).collect::<Result<Vec<_>, _>>()?;
                    match children.len() {
                        0 => return Err(AstError::EmptyPattern),
                        1 => ElementSource::Node(Box::new(children.remove(0))),
                        _ => ElementSource::Node(Box::new(AstNode::sequence(children))),
                    }
                }
                None => ElementSource::Value(Value::text(crate::value::REST)),
            };
            Ok(AstNode::Element(ElementNode {
                source,
                options: raw.options,
                location: raw
                    .location
                    .map(|loc| SourceSpan::new(loc.start.offset, loc.end.offset)),
            }))
        }
        "stretch" => {
            let amount = raw
                .arguments
                .get("amount")
                .ok_or_else(|| AstError::InvalidArgument {
                    kind: raw.kind.clone(),
                    argument: "amount",
                    reason: "missing".to_string(),
                })
                .and_then(|amount| {
                    Fraction::deserialize(amount).map_err(|err| AstError::InvalidArgument {
                        kind: raw.kind.clone(),
                        argument: "amount",
                        reason: err.to_string(),
                    })
                })?;
            Ok(AstNode::Stretch(StretchNode {
                child: single_child(raw.source)?,
                amount,
            }))
        }
        "scale" => {
            let scale = raw
                .arguments
                .get("scale")
                .and_then(|s| s.as_str())
                .unwrap_or_default()
                .to_string();
            Ok(AstNode::Scale(ScaleNode {
                child: single_child(raw.source)?,
                scale,
            }))
        }
        _ => Ok(AstNode::Unknown(UnknownNode {
            children: convert_children(raw.source)?,
            kind: raw.kind,
        })),
    }
}

fn convert_children(source: Option<RawSource>) -> Result<Vec<AstNode>, AstError> {
    match source {
        Some(RawSource::Nodes(nodes)) => nodes.into_iter().map(convert).collect(),
        Some(RawSource::Node(node)) => Ok(vec![convert(*node)?]),
        Some(RawSource::Scalar(value)) => Ok(vec![AstNode::element(value)]),
        None => Ok(Vec::new()),
    }
}

fn single_child(source: Option<RawSource>) -> Result<Option<Box<AstNode>>, AstError> {
    let mut children = convert_children(source)?;
    Ok(match children.len() {
        0 => None,
        1 => Some(Box::new(children.remove(0))),
        _ => Some(Box::new(AstNode::sequence(children))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_keys() {
        let mut options = Options::with_operator(Operator::stretch(Fraction::from_integer(2)));
        options.weight = Some(Fraction::from_integer(3));
        options.extra.insert("struct".to_string(), serde_json::json!("x ~ x"));

        assert_eq!(options.keys(), vec!["operator", "weight", "struct"]);
        assert!(Options::default().keys().is_empty());
    }

    #[test]
    fn test_options_json() {
        let options: Options = serde_json::from_str(
            r#"{"operator": {"type_": "stretch", "arguments_": {"amount": "1/2"}}, "weight": 3, "seed": 4}"#,
        )
        .unwrap();

        assert_eq!(options.operator, Some(Operator::stretch(Fraction::new(1, 2))));
        assert_eq!(options.weight, Some(Fraction::from_integer(3)));
        assert_eq!(options.keys(), vec!["operator", "weight", "seed"]);
    }

    #[test]
    fn test_kind_and_options() {
        let element = AstNode::element("c").with_options(Options {
            reps: Some(2),
            ..Options::default()
        });
        assert_eq!(element.kind(), "element");
        assert_eq!(element.options().and_then(|o| o.reps), Some(2));

        let unknown = AstNode::unknown("struct", vec![]);
        assert_eq!(unknown.kind(), "struct");
        assert!(unknown.with_options(Options::default()).options().is_none());
    }

    #[test]
    fn test_from_json_krill_shape() {
        let json = r#"{
            "type_": "pattern",
            "arguments_": {"alignment": "h"},
            "source_": [
                {
                    "type_": "element",
                    "source_": "c3",
                    "options_": {"operator": {"type_": "stretch", "arguments_": {"amount": "1/2"}}},
                    "location_": {
                        "start": {"offset": 1, "line": 1, "column": 2},
                        "end": {"offset": 3, "line": 1, "column": 4}
                    }
                },
                {"type_": "element", "source_": "~"}
            ]
        }"#;

        let node = from_json(json).unwrap();
        let AstNode::Pattern(pattern) = node else {
            panic!("expected pattern, got {:?}", node);
        };
        assert_eq!(pattern.alignment, Alignment::Horizontal);
        assert_eq!(pattern.children.len(), 2);

        let AstNode::Element(first) = &pattern.children[0] else {
            panic!("expected element");
        };
        assert_eq!(first.source, ElementSource::Value(Value::text("c3")));
        assert_eq!(first.location, Some(SourceSpan::new(1, 3)));
        assert_eq!(
            first.options.as_ref().and_then(|o| o.operator.clone()),
            Some(Operator::stretch(Fraction::new(1, 2)))
        );
    }

    #[test]
    fn test_from_json_vertical_and_nested() {
        let json = r#"{
            "type_": "pattern",
            "arguments_": {"alignment": "v"},
            "source_": [
                {"type_": "element", "source_": {"type_": "pattern", "source_": [
                    {"type_": "element", "source_": 0},
                    {"type_": "element", "source_": 2}
                ]}}
            ]
        }"#;

        let node = from_json(json).unwrap();
        assert_eq!(
            node,
            AstNode::stack(vec![AstNode::group(AstNode::sequence(vec![
                AstNode::element(0.0),
                AstNode::element(2.0),
            ]))])
        );
    }

    #[test]
    fn test_from_json_stretch_and_scale() {
        let json = r#"{
            "type_": "scale",
            "arguments_": {"scale": "D minor"},
            "source_": {
                "type_": "stretch",
                "arguments_": {"amount": 2},
                "source_": {"type_": "pattern", "source_": [{"type_": "element", "source_": "0"}]}
            }
        }"#;

        let node = from_json(json).unwrap();
        let inner = AstNode::sequence(vec![AstNode::element("0")]);
        assert_eq!(
            node,
            AstNode::scale(AstNode::stretch(inner, Fraction::from_integer(2)), "D minor")
        );
    }

    #[test]
    fn test_from_json_unknown_kind() {
        let json = r#"{"type_": "polymeter", "source_": [{"type_": "element", "source_": "c"}]}"#;
        let node = from_json(json).unwrap();
        assert_eq!(node, AstNode::unknown("polymeter", vec![AstNode::element("c")]));
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            from_json(r#"{"type_": "pattern", "source_": []}"#),
            Err(AstError::EmptyPattern)
        ));
        assert!(matches!(
            from_json(r#"{"type_": "stretch", "arguments_": {"amount": "fast"}}"#),
            Err(AstError::InvalidArgument { argument: "amount", .. })
        ));
        assert!(matches!(from_json("[1, 2"), Err(AstError::Json(_))));
    }
}
