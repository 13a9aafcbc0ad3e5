//! Document compiler for docweave.
//!
//! Turns Markdown bodies with embedded component tags into [`CompiledUnit`]s:
//! small line-oriented programs that the executor runs to build a component
//! tree. Compilation has four stages:
//!
//! 1. Declared component names are validated and turned into an import
//!    prelude, so every name is bound for the body
//! 2. The body is parsed with `pulldown-cmark`; raw HTML is read as component
//!    markup (`<Note tone="warm">`, `<Badge count={2} />`)
//! 3. [`Transform`] plugins rewrite the syntax tree
//! 4. The tree is lowered to unit text
//!
//! [`CachingCompiler`] memoizes the whole pipeline through a [`UnitCache`]
//! keyed by a content [`Fingerprint`].
//!
//! # Example
//!
//! ```
//! use weave_compiler::DocumentCompiler;
//!
//! let compiler = DocumentCompiler::default();
//! let unit = compiler
//!     .compile("# Hello\n\n<Note>Careful</Note>\n", &["Note".to_owned()])
//!     .unwrap();
//! assert!(unit.as_str().starts_with("#!weave-unit 1\nimport Note\n"));
//! ```

mod ast;
mod cache;
mod compiler;
mod error;
mod fingerprint;
mod frontend;
mod markup;
mod transform;
mod unit;

pub use ast::{AstElement, AstKind, AstNode, walk_elements_mut};
pub use cache::UnitCache;
pub use compiler::{CachingCompiler, CompileOutcome, DocumentCompiler, validate_names};
pub use error::CompileError;
pub use fingerprint::Fingerprint;
pub use transform::{ExternalLinks, HeadingIds, Transform, slugify};
pub use unit::{CompiledUnit, UNIT_FORMAT_VERSION, UNIT_HEADER};

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::CachingCompiler: Send, Sync);
}
