//! Template fragments and their node tree.
//!
//! A fragment is SQL text with embedded conditional markup:
//!
//! ```text
//! SELECT * FROM users
//! <where>
//!   <if test="status">AND status = :status</if>
//! </where>
//! ```
//!
//! Parsing wraps the fragment in a synthetic root so plain SQL around
//! the markup survives as ordinary text, then folds the XML event
//! stream into [`Node`]s. Whitespace is kept exactly as written and
//! entity references in text stay encoded until final normalization,
//! so comparison operators written as `&gt;=` pass through the parser
//! untouched.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::TemplateError;
use crate::params::ParamMap;

/// Tag used to wrap fragments into a well-formed document.
const WRAPPER_TAG: &str = "dynsql";

/// One node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal SQL text, emitted as-is.
    Text(String),
    /// `<if test="...">`: children emit only when the condition holds.
    If {
        /// The condition from the `test` attribute.
        test: String,
        /// Nodes emitted when the condition holds.
        children: Vec<Node>,
    },
    /// `<choose>`: the first `<when>` whose condition holds emits its
    /// children; otherwise the `<otherwise>` branch emits, if present.
    Choose {
        /// Candidate branches in document order.
        whens: Vec<When>,
        /// Fallback branch.
        otherwise: Option<Vec<Node>>,
    },
    /// `<where>`: emits ` WHERE ` plus its resolved body, unless the
    /// body is empty. A single leading `AND`/`OR` is stripped.
    Where {
        /// Nodes forming the clause body.
        children: Vec<Node>,
    },
    /// Any other element. The tag itself is dropped; children resolve
    /// in place.
    Generic {
        /// The tag as written.
        tag: String,
        /// Child nodes.
        children: Vec<Node>,
    },
}

/// One `<when>` branch of a `<choose>`.
#[derive(Debug, Clone, PartialEq)]
pub struct When {
    /// The condition from the `test` attribute.
    pub test: String,
    /// Nodes emitted when this branch is taken.
    pub children: Vec<Node>,
}

/// A parsed template fragment, immutable once built.
///
/// Parsing is independent of parameters; the same template can be
/// resolved any number of times, from any thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses a fragment into a template.
    pub fn parse(fragment: &str) -> Result<Self, TemplateError> {
        let nodes = parse_fragment(fragment)?;
        Ok(Self { nodes })
    }

    /// Returns the root nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Resolves the template against parameters into final SQL.
    #[must_use]
    pub fn resolve(&self, params: &ParamMap) -> String {
        crate::engine::resolve(self, params)
    }

    /// Resolves with additional literal replacements applied to the
    /// normalized SQL.
    #[must_use]
    pub fn resolve_with(&self, params: &ParamMap, replacements: &[(String, String)]) -> String {
        crate::engine::resolve_with(self, params, replacements)
    }
}

/// An open element while parsing.
struct Frame {
    /// Tag as written in the fragment.
    tag: String,
    /// The `test` attribute, unescaped.
    test: Option<String>,
    children: Vec<Node>,
    /// Populated only while this frame is a `<choose>`.
    whens: Vec<When>,
    otherwise: Option<Vec<Node>>,
}

impl Frame {
    fn new(tag: String, test: Option<String>) -> Self {
        Self {
            tag,
            test,
            children: Vec::new(),
            whens: Vec::new(),
            otherwise: None,
        }
    }

    fn is_choose(&self) -> bool {
        self.tag.eq_ignore_ascii_case("choose")
    }

    /// Adds a completed node. Inside `<choose>` only `<when>` and
    /// `<otherwise>` are meaningful, so anything else is dropped.
    fn push(&mut self, node: Node) {
        if !self.is_choose() {
            self.children.push(node);
        }
    }
}

fn parse_fragment(fragment: &str) -> Result<Vec<Node>, TemplateError> {
    let wrapped = format!("<{WRAPPER_TAG}>{fragment}</{WRAPPER_TAG}>");
    let mut reader = Reader::from_str(&wrapped);
    let mut stack: Vec<Frame> = Vec::new();
    let mut finished: Option<Vec<Node>> = None;

    loop {
        let position = fragment_offset(&reader);
        let event = reader
            .read_event()
            .map_err(|err| TemplateError::new(err.to_string(), position))?;

        if finished.is_some() {
            match event {
                Event::Eof => break,
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
                _ => {
                    return Err(TemplateError::new(
                        "content after end of template".to_string(),
                        position,
                    ));
                }
            }
            continue;
        }

        match event {
            Event::Start(start) => {
                stack.push(open_frame(&start, position)?);
            }
            Event::Empty(start) => {
                let frame = open_frame(&start, position)?;
                stack.push(frame);
                finished = close_frame(&mut stack, position)?;
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let open = stack
                    .last()
                    .ok_or_else(|| unmatched_close(&name, position))?;
                if open.tag != name {
                    return Err(unmatched_close(&name, position));
                }
                finished = close_frame(&mut stack, position)?;
            }
            Event::Text(text) => {
                push_text(&mut stack, &String::from_utf8_lossy(&text));
            }
            Event::CData(cdata) => {
                push_text(&mut stack, &String::from_utf8_lossy(&cdata.into_inner()));
            }
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => {
                return Err(TemplateError::new("unclosed element".to_string(), position));
            }
        }
    }

    Ok(finished.unwrap_or_default())
}

fn open_frame(start: &BytesStart<'_>, position: usize) -> Result<Frame, TemplateError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let test = start
        .try_get_attribute("test")
        .map_err(|err| TemplateError::new(err.to_string(), position))?
        .map(|attr| {
            attr.unescape_value()
                .map(|value| value.into_owned())
                .map_err(|err| TemplateError::new(err.to_string(), position))
        })
        .transpose()?;
    Ok(Frame::new(tag, test))
}

/// Pops the innermost frame and folds it into its parent. Returns the
/// finished node list when the popped frame is the synthetic root.
fn close_frame(
    stack: &mut Vec<Frame>,
    position: usize,
) -> Result<Option<Vec<Node>>, TemplateError> {
    let frame = stack
        .pop()
        .ok_or_else(|| TemplateError::new("unexpected close tag".to_string(), position))?;

    let Some(parent) = stack.last_mut() else {
        return Ok(Some(frame.children));
    };

    match frame.tag.to_ascii_lowercase().as_str() {
        "if" => parent.push(Node::If {
            test: frame.test.unwrap_or_default(),
            children: frame.children,
        }),
        "where" => parent.push(Node::Where {
            children: frame.children,
        }),
        "choose" => parent.push(Node::Choose {
            whens: frame.whens,
            otherwise: frame.otherwise,
        }),
        // `when` and `otherwise` only have their meaning directly
        // inside `<choose>`; elsewhere they are generic wrappers.
        "when" if parent.is_choose() => parent.whens.push(When {
            test: frame.test.unwrap_or_default(),
            children: frame.children,
        }),
        "otherwise" if parent.is_choose() => {
            if parent.otherwise.is_none() {
                parent.otherwise = Some(frame.children);
            }
        }
        _ => parent.push(Node::Generic {
            tag: frame.tag,
            children: frame.children,
        }),
    }

    Ok(None)
}

fn push_text(stack: &mut [Frame], text: &str) {
    if let Some(top) = stack.last_mut() {
        top.push(Node::Text(text.to_string()));
    }
}

fn unmatched_close(name: &str, position: usize) -> TemplateError {
    TemplateError::new(format!("mismatched close tag </{name}>"), position)
}

/// Maps the reader position in the wrapped document back onto the
/// original fragment.
fn fragment_offset(reader: &Reader<&[u8]>) -> usize {
    let position = usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX);
    position.saturating_sub(WRAPPER_TAG.len() + 2)
}
