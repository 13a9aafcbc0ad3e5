//! Single-page build: read, compile, execute, postprocess, serialize.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use weave_compiler::{CachingCompiler, CompileError};
use weave_exec::{BindingEnvironment, ElementFactory, ExecutionError, execute};
use weave_storage::{LogicalPath, Metadata, Storage, StorageError};
use weave_tree::serialize;

use crate::postprocess::{Postprocessor, TocPostprocessor};

/// Transport payload for one page.
///
/// `content` and `toc` are encoded trees; `meta` is plain data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PagePayload {
    pub content: String,
    pub toc: String,
    pub meta: Metadata,
}

/// Error returned when building a page fails.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No document exists for the path.
    #[error("Document not found: {path}")]
    NotFound { path: String },
    /// Any other storage failure, including malformed frontmatter.
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to compile {path}: {source}")]
    Compile {
        path: String,
        #[source]
        source: CompileError,
    },
    #[error("Failed to execute {path}: {source}")]
    Execution {
        path: String,
        #[source]
        source: ExecutionError,
    },
    #[error("Failed to serialize tree: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Builds page payloads from a content store.
///
/// Pages are independent: the builder holds no per-page state and can be
/// shared across threads.
pub struct PageBuilder {
    storage: Arc<dyn Storage>,
    compiler: CachingCompiler,
    names: Vec<String>,
    postprocessor: Box<dyn Postprocessor>,
}

impl PageBuilder {
    /// Create a builder with the default [`TocPostprocessor`].
    ///
    /// `names` are the component names every document may reference, in
    /// declaration order.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, compiler: CachingCompiler, names: Vec<String>) -> Self {
        Self {
            storage,
            compiler,
            names,
            postprocessor: Box::new(TocPostprocessor),
        }
    }

    /// Replace the postprocessor.
    #[must_use]
    pub fn with_postprocessor(mut self, postprocessor: impl Postprocessor + 'static) -> Self {
        self.postprocessor = Box::new(postprocessor);
        self
    }

    /// The content store pages are read from.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Build the payload for one document.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] naming the document when it cannot be read,
    /// compiled or executed.
    pub fn build_page(&self, path: &LogicalPath) -> Result<PagePayload, BuildError> {
        let page = path.to_string();

        let document = self.storage.read(path).map_err(|e| {
            if e.is_not_found() {
                BuildError::NotFound {
                    path: page.clone(),
                }
            } else {
                BuildError::Storage(e)
            }
        })?;

        let outcome = self
            .compiler
            .compile(&page, &document.body, &self.names)
            .map_err(|source| BuildError::Compile {
                path: page.clone(),
                source,
            })?;

        let environment = BindingEnvironment::stand_ins(&self.names);
        let tree = execute(&outcome.unit, &environment, &mut ElementFactory).map_err(|source| {
            BuildError::Execution {
                path: page.clone(),
                source,
            }
        })?;

        let processed = self.postprocessor.process(path, &tree);
        let payload = PagePayload {
            content: serialize(&processed.children)?,
            toc: serialize(&processed.toc)?,
            meta: document.metadata,
        };

        tracing::debug!(path = %page, from_cache = outcome.from_cache, "Built page");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use weave_compiler::{DocumentCompiler, UnitCache};
    use weave_storage::MockStorage;
    use weave_tree::Node;

    use super::*;
    use crate::postprocess::Processed;

    fn builder(storage: MockStorage, names: &[&str]) -> PageBuilder {
        let compiler =
            CachingCompiler::new(DocumentCompiler::default(), UnitCache::disabled(), String::new());
        let names = names.iter().map(|&n| n.to_owned()).collect();
        PageBuilder::new(Arc::new(storage), compiler, names)
    }

    fn path(s: &str) -> LogicalPath {
        LogicalPath::parse(s).unwrap()
    }

    #[test]
    fn test_build_page_payload() {
        let storage = MockStorage::new().with_document(
            "guide",
            "---\ntitle: Guide\n---\n## Setup\n\n<Note tone=\"warm\">\n\nCareful\n\n</Note>\n",
        );
        let page = builder(storage, &["Note"]).build_page(&path("guide")).unwrap();

        assert_eq!(page.meta.title.as_deref(), Some("Guide"));

        let content: Value = serde_json::from_str(&page.content).unwrap();
        assert_eq!(
            content,
            json!(["$r", "#group", null, {"children": [
                ["$r", "h2", null, {"id": "setup", "children": "Setup"}],
                ["$r", "Note", null, {"tone": "warm", "children":
                    ["$r", "p", null, {"children": "Careful"}]
                }]
            ]}])
        );

        let toc: Value = serde_json::from_str(&page.toc).unwrap();
        assert_eq!(
            toc,
            json!([
                {"url": "#", "depth": 2, "text": "Overview"},
                {"url": "#setup", "depth": 2, "text": "Setup"}
            ])
        );
    }

    #[test]
    fn test_no_internal_props_in_payload() {
        let storage = MockStorage::new().with_document("a", "<Intro>\n\n*hi*\n\n</Intro>\n");
        let page = builder(storage, &["Intro"]).build_page(&path("a")).unwrap();

        for internal in ["debugType", "originalType", "parentName"] {
            assert!(!page.content.contains(internal), "{internal} leaked");
        }
    }

    #[test]
    fn test_payload_round_trips_through_registry() {
        use weave_hydrate::{
            ElementKind, LiveNode, LiveProps, Registry, deserialize, render_to_string,
        };

        let storage = MockStorage::new().with_document(
            "a",
            "Intro <Badge count={2} /> text\n\n<Note key=\"n\">\n\n- one\n\n</Note>\n",
        );
        let page = builder(storage, &["Note", "Badge"]).build_page(&path("a")).unwrap();
        let registry = Registry::new()
            .with("Note", |_: &LiveProps, c: &str| format!("<aside>{c}</aside>"))
            .with("Badge", |p: &LiveProps, _: &str| match p.get("count") {
                Some(LiveNode::Number(n)) => format!("[{n}]"),
                _ => String::new(),
            });

        let hydrated = deserialize(&page.content, &registry).unwrap();

        assert!(hydrated.warnings.is_empty());
        let root = hydrated.node.as_element().unwrap();
        assert_eq!(root.kind, ElementKind::Fragment);
        let note = root.children()[1].as_element().unwrap();
        assert_eq!(note.component_name(), Some("Note"));
        assert_eq!(note.key.as_deref(), Some("n"));
        assert_eq!(
            render_to_string(&hydrated.node),
            "<p>Intro [2] text</p><aside><ul><li>one</li></ul></aside>"
        );
    }

    #[test]
    fn test_root_page_has_empty_toc() {
        let storage = MockStorage::new().with_document("", "## Welcome\n");
        let page = builder(storage, &[]).build_page(&LogicalPath::root()).unwrap();
        assert_eq!(page.toc, "[]");
    }

    #[test]
    fn test_missing_document() {
        let err = builder(MockStorage::new(), &[])
            .build_page(&path("nope"))
            .unwrap_err();
        assert!(matches!(err, BuildError::NotFound { ref path } if path == "nope"));
    }

    #[test]
    fn test_malformed_frontmatter_is_storage_error() {
        let storage = MockStorage::new().with_document("bad", "---\ntitle: [\n---\nBody\n");
        let err = builder(storage, &[]).build_page(&path("bad")).unwrap_err();
        assert!(matches!(err, BuildError::Storage(_)));
    }

    #[test]
    fn test_compile_error_names_document() {
        let storage = MockStorage::new().with_document("guide/setup", "<Missing />\n");
        let err = builder(storage, &[]).build_page(&path("guide/setup")).unwrap_err();

        let BuildError::Compile { path, source } = err else {
            panic!("expected compile error");
        };
        assert_eq!(path, "guide/setup");
        assert!(matches!(source, CompileError::UnknownComponent { .. }));
    }

    #[test]
    fn test_custom_postprocessor() {
        struct Passthrough;

        impl Postprocessor for Passthrough {
            fn process(&self, _: &LogicalPath, root: &Node) -> Processed {
                Processed {
                    toc: Node::Null,
                    children: root.clone(),
                }
            }
        }

        let storage = MockStorage::new().with_document("a", "Text\n");
        let page = builder(storage, &[])
            .with_postprocessor(Passthrough)
            .build_page(&path("a"))
            .unwrap();
        assert_eq!(page.toc, "null");
        assert!(page.content.starts_with(r##"["$r","#group""##));
    }
}
