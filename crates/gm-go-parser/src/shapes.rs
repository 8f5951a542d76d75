//! Call-shape matching for framework constructs.
//!
//! Every `call_expression` in a file is viewed as a [`CallSite`] (callee
//! selector plus a coarse kind for each argument) and matched against the
//! declarative [`CALL_SHAPES`] table. Supporting another construct means
//! adding a row to the table, not another traversal.
//!
//! | Construct | Selector | Min args | First argument |
//! |-----------|----------|----------|----------------|
//! | Flow | `DefineFlow` | 2 | string literal |
//! | Model | `Model` | 1 | string literal |

use gm_core::{Flow, Model, SourceLocation};
use smallvec::SmallVec;
use tree_sitter::{Node, Tree};

use crate::classify::classify_model;
use crate::node::{node_text, node_to_location, string_literal};

/// Which construct a call shape produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    /// A flow definition.
    Flow,
    /// A model reference.
    Model,
}

/// Constraint on the first argument of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgTag {
    /// An interpreted or raw string literal.
    StringLiteral,
    /// Anything.
    Any,
}

/// A call pattern recognized as a framework construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallShape {
    /// Construct produced on a match.
    pub construct: ConstructKind,
    /// Field name of the qualified callee (`pkg.Selector`).
    pub selector: &'static str,
    /// Minimum argument count.
    pub min_args: usize,
    /// Constraint on the first argument.
    pub first_arg: ArgTag,
}

/// Recognized call shapes, tried in order. The first match wins.
pub const CALL_SHAPES: &[CallShape] = &[
    CallShape {
        construct: ConstructKind::Flow,
        selector: "DefineFlow",
        min_args: 2,
        first_arg: ArgTag::StringLiteral,
    },
    CallShape {
        construct: ConstructKind::Model,
        selector: "Model",
        min_args: 1,
        first_arg: ArgTag::StringLiteral,
    },
];

impl CallShape {
    /// Returns `true` if `site` has this shape.
    #[must_use]
    pub fn matches(&self, site: &CallSite<'_>) -> bool {
        if site.selector != Some(self.selector) || site.args.len() < self.min_args {
            return false;
        }
        match self.first_arg {
            ArgTag::Any => true,
            ArgTag::StringLiteral => site.first_string().is_some(),
        }
    }
}

/// Signature of an inline function literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncSignature {
    /// Type of the last non-context parameter.
    pub input: Option<String>,
    /// First result type that is not `error`.
    pub output: Option<String>,
}

/// Coarse classification of a call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind<'a> {
    /// String literal contents, quotes stripped.
    StringLiteral(&'a str),
    /// An inline `func(...) ... { }`.
    FuncLiteral(FuncSignature),
    /// Any other expression.
    Other,
}

/// View of one call expression.
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    /// Field name when the callee is `operand.field`.
    pub selector: Option<&'a str>,
    /// Arguments in order.
    pub args: SmallVec<[ArgKind<'a>; 4]>,
    /// Start of the call expression.
    pub location: SourceLocation,
    node: Node<'a>,
}

impl<'a> CallSite<'a> {
    /// Builds the view for a `call_expression` node.
    #[must_use]
    pub fn from_node(node: Node<'a>, source: &'a [u8]) -> Self {
        let selector = node
            .child_by_field_name("function")
            .filter(|callee| callee.kind() == "selector_expression")
            .and_then(|callee| callee.child_by_field_name("field"))
            .and_then(|field| node_text(field, source));

        let mut args = SmallVec::new();
        if let Some(list) = node.child_by_field_name("arguments") {
            let mut cursor = list.walk();
            for arg in list.named_children(&mut cursor) {
                if arg.is_extra() {
                    continue;
                }
                args.push(classify_arg(arg, source));
            }
        }

        Self {
            selector,
            args,
            location: node_to_location(node),
            node,
        }
    }

    /// Contents of the first argument if it is a string literal.
    #[must_use]
    pub fn first_string(&self) -> Option<&'a str> {
        match self.args.first() {
            Some(ArgKind::StringLiteral(text)) => Some(text),
            _ => None,
        }
    }

    /// Signature of the first function-literal argument.
    #[must_use]
    pub fn func_signature(&self) -> Option<&FuncSignature> {
        self.args.iter().find_map(|arg| match arg {
            ArgKind::FuncLiteral(sig) => Some(sig),
            _ => None,
        })
    }
}

fn classify_arg<'a>(arg: Node<'a>, source: &'a [u8]) -> ArgKind<'a> {
    if let Some(text) = string_literal(arg, source) {
        return ArgKind::StringLiteral(text);
    }
    if arg.kind() == "func_literal" {
        return ArgKind::FuncLiteral(func_signature(arg, source));
    }
    ArgKind::Other
}

fn func_signature(func: Node<'_>, source: &[u8]) -> FuncSignature {
    let input = func.child_by_field_name("parameters").and_then(|params| {
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter_map(|decl| decl.child_by_field_name("type"))
            .filter_map(|ty| node_text(ty, source))
            .filter(|ty| *ty != "context.Context")
            .last()
            .map(str::to_owned)
    });

    let output = func.child_by_field_name("result").and_then(|result| {
        if result.kind() == "parameter_list" {
            let mut cursor = result.walk();
            result
                .named_children(&mut cursor)
                .filter_map(|decl| decl.child_by_field_name("type"))
                .filter_map(|ty| node_text(ty, source))
                .find(|ty| *ty != "error")
                .map(str::to_owned)
        } else {
            node_text(result, source)
                .filter(|ty| *ty != "error")
                .map(str::to_owned)
        }
    });

    FuncSignature { input, output }
}

/// Flows and models found in one file, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructs {
    /// Flow definitions.
    pub flows: Vec<Flow>,
    /// Model references.
    pub models: Vec<Model>,
}

/// Walks the tree in pre-order and collects every call matching a shape.
///
/// Locations carry no file; callers attach it.
pub fn extract_constructs(tree: &Tree, source: &str) -> Constructs {
    let bytes = source.as_bytes();
    let mut found = Constructs::default();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        if node.kind() == "call_expression" {
            let site = CallSite::from_node(node, bytes);
            if let Some(shape) = CALL_SHAPES.iter().find(|shape| shape.matches(&site)) {
                record(&mut found, shape.construct, &site, bytes);
            }
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return found;
            }
        }
    }
}

fn record(found: &mut Constructs, construct: ConstructKind, site: &CallSite<'_>, source: &[u8]) {
    let Some(name) = site.first_string() else {
        return;
    };
    match construct {
        ConstructKind::Flow => {
            let mut flow = Flow::new(name, site.location.clone());
            if let Some(sig) = site.func_signature() {
                flow.input_type.clone_from(&sig.input);
                flow.output_type.clone_from(&sig.output);
            }
            flow.description = leading_comment(enclosing_statement(site.node), source);
            found.flows.push(flow);
        }
        ConstructKind::Model => {
            found
                .models
                .push(Model::new(name, classify_model(name), site.location.clone()));
        }
    }
}

/// Climbs from `node` to the statement or declaration that contains it.
fn enclosing_statement(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if matches!(parent.kind(), "block" | "statement_list" | "source_file") {
            break;
        }
        current = parent;
    }
    current
}

/// Joins the `//` comments directly above `statement`, with no blank line between.
fn leading_comment(statement: Node<'_>, source: &[u8]) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();
    let mut below_row = statement.start_position().row;
    let mut sibling = statement.prev_sibling().or_else(|| {
        statement
            .parent()
            .filter(|parent| parent.kind() == "statement_list")
            .and_then(|parent| parent.prev_sibling())
    });

    while let Some(node) = sibling {
        if node.kind() != "comment" || node.end_position().row + 1 != below_row {
            break;
        }
        let Some(text) = node_text(node, source).and_then(|t| t.strip_prefix("//")) else {
            break;
        };
        lines.push(text.trim());
        below_row = node.start_position().row;
        sibling = node.prev_sibling();
    }

    if lines.is_empty() {
        return None;
    }
    lines.reverse();
    Some(lines.join("\n"))
}
