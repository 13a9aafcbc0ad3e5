//! Sandboxed executor for docweave compiled units.
//!
//! A [`CompiledUnit`](weave_compiler::CompiledUnit) is run by a small
//! interpreter, not evaluated as general code. The unit can only import names
//! bound in a [`BindingEnvironment`] and create elements through the
//! [`TreeBuilder`] it is handed; it has no other access to the host.
//!
//! Units are trusted build output. The interpreter keeps no state between
//! runs and each run is single-threaded.
//!
//! # Example
//!
//! ```
//! use weave_compiler::DocumentCompiler;
//! use weave_exec::{BindingEnvironment, ElementFactory, execute};
//!
//! let names = vec!["Note".to_owned()];
//! let unit = DocumentCompiler::default()
//!     .compile("Hello <Note>there</Note>\n", &names)
//!     .unwrap();
//! let tree = execute(&unit, &BindingEnvironment::stand_ins(&names), &mut ElementFactory).unwrap();
//! assert_eq!(tree.text_content(), "Hello there");
//! ```

mod environment;
mod executor;

pub use environment::{Binding, BindingEnvironment, ElementFactory, TreeBuilder};
pub use executor::{ExecutionError, execute};
