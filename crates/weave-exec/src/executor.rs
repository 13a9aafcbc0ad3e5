//! Interpreter for compiled units.

use std::collections::HashSet;

use serde_json::Value;
use weave_compiler::{CompiledUnit, UNIT_HEADER};
use weave_tree::{ElementType, GROUPING_IDENTIFIER, Node, Props};

use crate::environment::{BindingEnvironment, TreeBuilder};

/// Errors raised while running a compiled unit. Lines are 1-based lines of
/// the unit text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("Unit does not start with the unit header")]
    InvalidHeader,

    #[error("Line {line}: unknown instruction {instruction:?}")]
    UnknownInstruction { instruction: String, line: usize },

    #[error("Line {line}: malformed argument to {instruction}: {message}")]
    MalformedArgument {
        instruction: &'static str,
        message: String,
        line: usize,
    },

    #[error("Line {line}: {name} is not bound in the environment")]
    UnboundName { name: String, line: usize },

    #[error("Line {line}: {name} is used before it is imported")]
    NotImported { name: String, line: usize },

    #[error("Line {line}: {instruction} outside of an element")]
    NoOpenElement {
        instruction: &'static str,
        line: usize,
    },

    #[error("Line {line}: element {identifier} is never closed")]
    UnterminatedElement { identifier: String, line: usize },
}

/// Element being assembled.
struct Pending {
    element_type: ElementType,
    stand_in: bool,
    key: Option<String>,
    props: Props,
    children: Vec<Node>,
    line: usize,
}

/// Run `unit` and return its tree.
///
/// Top-level nodes are wrapped in a root grouping element. Every element is
/// produced through `builder` and carries a `debugType` prop (its
/// identifier), plus `parentName` when nested and `originalType` when it
/// comes from a stand-in binding.
///
/// # Errors
///
/// Returns [`ExecutionError`] for a bad header, unknown or malformed
/// instructions, references to names that are unbound or not imported, and
/// unbalanced elements.
pub fn execute(
    unit: &CompiledUnit,
    env: &BindingEnvironment,
    builder: &mut dyn TreeBuilder,
) -> Result<Node, ExecutionError> {
    let mut lines = unit.as_str().lines().enumerate();
    match lines.next() {
        Some((_, header)) if header == UNIT_HEADER => {}
        _ => return Err(ExecutionError::InvalidHeader),
    }

    let mut imported: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Pending> = Vec::new();
    let mut top_level: Vec<Node> = Vec::new();

    for (index, text) in lines {
        let line = index + 1;
        if text.is_empty() {
            continue;
        }
        let (op, arg) = text.split_once(' ').unwrap_or((text, ""));
        match op {
            "import" => {
                if env.get(arg).is_none() {
                    return Err(ExecutionError::UnboundName {
                        name: arg.to_owned(),
                        line,
                    });
                }
                imported.insert(arg);
            }
            "open" => {
                let (element_type, stand_in) = if let Some(name) = arg.strip_prefix('@') {
                    if !imported.contains(name) {
                        return Err(ExecutionError::NotImported {
                            name: name.to_owned(),
                            line,
                        });
                    }
                    let binding = env.get(name).ok_or_else(|| ExecutionError::UnboundName {
                        name: name.to_owned(),
                        line,
                    })?;
                    (binding.element_type.clone(), binding.stand_in)
                } else if arg.is_empty() || arg.contains(char::is_whitespace) {
                    return Err(malformed("open", "expected a tag name", line));
                } else {
                    (ElementType::Tag(arg.to_owned()), false)
                };
                stack.push(Pending {
                    element_type,
                    stand_in,
                    key: None,
                    props: Props::new(),
                    children: Vec::new(),
                    line,
                });
            }
            "key" => {
                let key = parse_string("key", arg, line)?;
                let top = stack.last_mut().ok_or(ExecutionError::NoOpenElement {
                    instruction: "key",
                    line,
                })?;
                top.key = Some(key);
            }
            "prop" => {
                let (name, value) = arg
                    .split_once(' ')
                    .ok_or_else(|| malformed("prop", "expected a name and a value", line))?;
                let value: Value = serde_json::from_str(value)
                    .map_err(|e| malformed("prop", &e.to_string(), line))?;
                let top = stack.last_mut().ok_or(ExecutionError::NoOpenElement {
                    instruction: "prop",
                    line,
                })?;
                top.props.insert(name.to_owned(), value.into());
            }
            "text" => {
                let text = parse_string("text", arg, line)?;
                match stack.last_mut() {
                    Some(top) => top.children.push(Node::String(text)),
                    None => top_level.push(Node::String(text)),
                }
            }
            "close" => {
                let pending = stack.pop().ok_or(ExecutionError::NoOpenElement {
                    instruction: "close",
                    line,
                })?;
                let parent = stack
                    .last()
                    .map(|p| p.element_type.identifier().to_owned());
                let node = finish(pending, parent, builder);
                match stack.last_mut() {
                    Some(top) => top.children.push(node),
                    None => top_level.push(node),
                }
            }
            other => {
                return Err(ExecutionError::UnknownInstruction {
                    instruction: other.to_owned(),
                    line,
                });
            }
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ExecutionError::UnterminatedElement {
            identifier: open.element_type.identifier().to_owned(),
            line: open.line,
        });
    }

    let mut root_props = Props::new();
    root_props.insert("debugType".to_owned(), GROUPING_IDENTIFIER.into());
    Ok(builder.create_element(ElementType::Grouping, None, root_props, top_level))
}

fn finish(pending: Pending, parent: Option<String>, builder: &mut dyn TreeBuilder) -> Node {
    let Pending {
        element_type,
        stand_in,
        key,
        mut props,
        children,
        ..
    } = pending;

    let identifier = element_type.identifier().to_owned();
    if stand_in {
        props.insert("originalType".to_owned(), identifier.clone().into());
    }
    props.insert("debugType".to_owned(), identifier.into());
    if let Some(parent) = parent {
        props.insert("parentName".to_owned(), parent.into());
    }
    builder.create_element(element_type, key, props, children)
}

fn parse_string(instruction: &'static str, arg: &str, line: usize) -> Result<String, ExecutionError> {
    serde_json::from_str(arg).map_err(|e| malformed(instruction, &e.to_string(), line))
}

fn malformed(instruction: &'static str, message: &str, line: usize) -> ExecutionError {
    ExecutionError::MalformedArgument {
        instruction,
        message: message.to_owned(),
        line,
    }
}
