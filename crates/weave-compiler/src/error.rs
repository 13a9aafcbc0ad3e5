//! Compiler error types.

/// Errors raised while compiling a document body.
///
/// Line numbers are 1-based and count lines of the document body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A declared component name is not an identifier.
    #[error("Invalid component name {0:?}: expected an identifier")]
    InvalidComponentName(String),

    /// A component name was declared more than once.
    #[error("Component {0} is declared more than once")]
    DuplicateComponentName(String),

    /// A declared component name collides with the grouping identifier.
    #[error("Component name {0:?} is reserved")]
    ReservedComponentName(String),

    /// A body import names a component that was not declared.
    #[error("Line {line}: import of undeclared component {name}")]
    UnresolvedImport { name: String, line: usize },

    /// Markup references a component that is not bound.
    #[error("Line {line}: unknown component <{name}>")]
    UnknownComponent { name: String, line: usize },

    /// A closing tag does not match the innermost open tag.
    #[error("Line {line}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        line: usize,
    },

    /// An opening tag was never closed.
    #[error("Line {line}: <{name}> is never closed")]
    UnclosedTag { name: String, line: usize },

    /// A closing tag has no matching opening tag.
    #[error("Line {line}: unexpected closing tag </{name}>")]
    UnexpectedClosingTag { name: String, line: usize },

    /// An attribute value could not be parsed.
    #[error("Line {line}: invalid value for attribute {name}: {message}")]
    InvalidAttribute {
        name: String,
        message: String,
        line: usize,
    },
}
