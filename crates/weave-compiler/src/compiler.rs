//! Document compiler and its cached front door.

use weave_tree::{GROUPING_IDENTIFIER, is_component_name};

use crate::cache::UnitCache;
use crate::error::CompileError;
use crate::fingerprint::Fingerprint;
use crate::frontend;
use crate::transform::{ExternalLinks, HeadingIds, Transform};
use crate::unit::{CompiledUnit, UNIT_FORMAT_VERSION, lower};

/// Compiles document bodies into [`CompiledUnit`]s.
///
/// Compilation is a pure function of the body, the declared component names
/// and the configured transforms.
pub struct DocumentCompiler {
    transforms: Vec<Box<dyn Transform>>,
}

impl Default for DocumentCompiler {
    fn default() -> Self {
        Self::new()
            .with_transform(HeadingIds)
            .with_transform(ExternalLinks)
    }
}

impl DocumentCompiler {
    /// Create a compiler without transforms.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Append a transform. Transforms run in insertion order.
    #[must_use]
    pub fn with_transform<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Compile `body` with every name in `names` available as a component.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] for invalid declared names, references to
    /// unbound components, unbalanced tags and malformed attributes.
    pub fn compile(&self, body: &str, names: &[String]) -> Result<CompiledUnit, CompileError> {
        validate_names(names)?;

        let mut source = String::with_capacity(body.len() + names.len() * 32 + 1);
        for name in names {
            source.push_str(&format!("import {name} from \"{name}\";\n"));
        }
        source.push('\n');
        source.push_str(body);

        let mut parsed = frontend::parse(&source, names.len() + 1)?;
        for transform in &self.transforms {
            tracing::trace!(transform = transform.name(), "applying transform");
            transform.apply(&mut parsed.nodes);
        }
        Ok(lower(&parsed.bindings, &parsed.nodes))
    }
}

/// Check declared names are identifiers, unique, and not reserved.
///
/// # Errors
///
/// Returns the first violation found, in declaration order.
pub fn validate_names(names: &[String]) -> Result<(), CompileError> {
    for (i, name) in names.iter().enumerate() {
        if name == GROUPING_IDENTIFIER {
            return Err(CompileError::ReservedComponentName(name.clone()));
        }
        if !is_component_name(name) {
            return Err(CompileError::InvalidComponentName(name.clone()));
        }
        if names[..i].contains(name) {
            return Err(CompileError::DuplicateComponentName(name.clone()));
        }
    }
    Ok(())
}

/// Result of a cached compile.
#[derive(Clone, Debug)]
pub struct CompileOutcome {
    pub unit: CompiledUnit,
    pub fingerprint: Fingerprint,
    /// True when the unit came from the cache and the compiler did not run.
    pub from_cache: bool,
}

/// [`DocumentCompiler`] memoized through a [`UnitCache`].
///
/// The fingerprint covers the body, declared names, the lockfile snapshot and
/// the unit format version. On a hit neither parsing nor transforms run.
pub struct CachingCompiler {
    compiler: DocumentCompiler,
    cache: UnitCache,
    lockfile: String,
    format_version: u32,
}

impl CachingCompiler {
    #[must_use]
    pub fn new(compiler: DocumentCompiler, cache: UnitCache, lockfile: String) -> Self {
        Self {
            compiler,
            cache,
            lockfile,
            format_version: UNIT_FORMAT_VERSION,
        }
    }

    /// Compile `body`, reusing a cached unit when the fingerprint matches.
    ///
    /// `path` is used for log context only.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] when compilation runs and fails. Failures are
    /// not cached.
    pub fn compile(
        &self,
        path: &str,
        body: &str,
        names: &[String],
    ) -> Result<CompileOutcome, CompileError> {
        let fingerprint = Fingerprint::compute(body, names, &self.lockfile, self.format_version);

        if let Some(unit) = self.cache.get(&fingerprint) {
            tracing::debug!(path, %fingerprint, "compiled unit cache hit");
            return Ok(CompileOutcome {
                unit,
                fingerprint,
                from_cache: true,
            });
        }

        tracing::debug!(path, %fingerprint, "compiled unit cache miss");
        let unit = self.compiler.compile(body, names)?;
        self.cache.set(&fingerprint, &unit);
        Ok(CompileOutcome {
            unit,
            fingerprint,
            from_cache: false,
        })
    }
}
