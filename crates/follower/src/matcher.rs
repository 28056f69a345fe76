//! Interactive-element matching.
//!
//! A [`Matcher`] is compiled from a selector list (a small subset of CSS
//! selector syntax) and answers whether a node or any of its ancestors
//! counts as interactive. Supported forms, combinable into compounds:
//!
//! - `tag` (e.g. `a`, `button`, `summary`)
//! - `.class` (e.g. `.cursor-pointer`)
//! - `[attr]` presence (e.g. `[href]`)
//! - `[attr="value"]` equality (e.g. `[role="button"]`, `input[type="submit"]`)
//!
//! The walk ascends parent links from the event target and stops at the
//! first match. Malformed selectors and detached nodes surface as errors
//! from [`Matcher::closest`]; [`Matcher::is_interactive`] is the catch
//! boundary that turns any such failure into "not interactive".

use glidecursor_common::error::{GlideError, GlideResult};
use glidecursor_pointer_model::node::{Node, NodeId, NodeTree, TreeError};

/// A compiled interactive-element matcher.
#[derive(Debug, Clone)]
pub struct Matcher {
    selectors: Vec<Compound>,
}

/// One compound selector: every test must hold on the same node.
#[derive(Debug, Clone)]
struct Compound {
    tag: Option<String>,
    tests: Vec<Test>,
}

#[derive(Debug, Clone)]
enum Test {
    Class(String),
    AttrPresent(String),
    AttrEquals(String, String),
}

impl Matcher {
    /// Compile a comma-separated selector list.
    pub fn compile(selector: &str) -> GlideResult<Self> {
        let mut selectors = Vec::new();
        for part in selector.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(GlideError::matcher(format!(
                    "empty selector in list: {selector:?}"
                )));
            }
            selectors.push(parse_compound(part)?);
        }
        Ok(Self { selectors })
    }

    /// A matcher that matches nothing.
    pub fn never() -> Self {
        Self {
            selectors: Vec::new(),
        }
    }

    /// Find the closest matching element: `start` itself, or the nearest
    /// ancestor, walking upward and stopping at the first match.
    pub fn closest(&self, tree: &NodeTree, start: NodeId) -> Result<Option<NodeId>, TreeError> {
        if self.selectors.is_empty() {
            // Still validate the start node so detached targets behave
            // consistently across matcher configurations.
            return match tree.walk_up(start).next() {
                Some(Err(err)) => Err(err),
                _ => Ok(None),
            };
        }

        for step in tree.walk_up(start) {
            let node = step?;
            if self.matches_node(node) {
                return Ok(Some(node.id));
            }
        }
        Ok(None)
    }

    /// Whether `start` or any ancestor matches. This is the failure
    /// boundary: malformed trees and detached nodes report `false` instead
    /// of propagating, so hover errors can never break pointer tracking.
    pub fn is_interactive(&self, tree: &NodeTree, start: NodeId) -> bool {
        self.closest(tree, start)
            .map(|found| found.is_some())
            .unwrap_or(false)
    }

    /// Whether a single node satisfies any compound in the list.
    pub fn matches_node(&self, node: &Node) -> bool {
        self.selectors
            .iter()
            .any(|compound| compound.matches(node))
    }
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if node.kind.tag() != tag.as_str() {
                return false;
            }
        }
        self.tests.iter().all(|test| match test {
            Test::Class(class) => node.has_class(class),
            Test::AttrPresent(name) => attr_lookup(node, name).is_some(),
            Test::AttrEquals(name, value) => attr_lookup(node, name) == Some(value.as_str()),
        })
    }
}

/// Attribute lookup with `role` resolved from the dedicated field first.
fn attr_lookup<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
    if name == "role" {
        if let Some(role) = node.role.as_deref() {
            return Some(role);
        }
    }
    node.attrs.get(name).map(String::as_str)
}

fn parse_compound(part: &str) -> GlideResult<Compound> {
    let mut chars = part.chars().peekable();
    let mut compound = Compound {
        tag: None,
        tests: Vec::new(),
    };

    // Optional leading tag name.
    if chars
        .peek()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false)
    {
        let tag = take_ident(&mut chars);
        compound.tag = Some(tag.to_ascii_lowercase());
    }

    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                let class = take_ident(&mut chars);
                if class.is_empty() {
                    return Err(GlideError::matcher(format!(
                        "empty class name in selector {part:?}"
                    )));
                }
                compound.tests.push(Test::Class(class));
            }
            '[' => {
                chars.next();
                compound.tests.push(parse_attr_test(&mut chars, part)?);
            }
            other => {
                return Err(GlideError::matcher(format!(
                    "unexpected {other:?} in selector {part:?}"
                )));
            }
        }
    }

    if compound.tag.is_none() && compound.tests.is_empty() {
        return Err(GlideError::matcher(format!(
            "selector {part:?} matches nothing"
        )));
    }

    Ok(compound)
}

fn parse_attr_test(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    part: &str,
) -> GlideResult<Test> {
    let name = take_ident(chars);
    if name.is_empty() {
        return Err(GlideError::matcher(format!(
            "empty attribute name in selector {part:?}"
        )));
    }

    match chars.next() {
        Some(']') => Ok(Test::AttrPresent(name)),
        Some('=') => {
            let value = take_attr_value(chars, part)?;
            match chars.next() {
                Some(']') => Ok(Test::AttrEquals(name, value)),
                _ => Err(GlideError::matcher(format!(
                    "unterminated attribute test in selector {part:?}"
                ))),
            }
        }
        _ => Err(GlideError::matcher(format!(
            "unterminated attribute test in selector {part:?}"
        ))),
    }
}

fn take_attr_value(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    part: &str,
) -> GlideResult<String> {
    match chars.peek() {
        Some(&quote @ ('"' | '\'')) => {
            chars.next();
            let mut value = String::new();
            for c in chars.by_ref() {
                if c == quote {
                    return Ok(value);
                }
                value.push(c);
            }
            Err(GlideError::matcher(format!(
                "unterminated quoted value in selector {part:?}"
            )))
        }
        Some(_) => {
            let value = take_ident(chars);
            if value.is_empty() {
                return Err(GlideError::matcher(format!(
                    "empty attribute value in selector {part:?}"
                )));
            }
            Ok(value)
        }
        None => Err(GlideError::matcher(format!(
            "missing attribute value in selector {part:?}"
        ))),
    }
}

/// Consume identifier characters: letters, digits, `-`, `_`.
fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }
    ident
}
