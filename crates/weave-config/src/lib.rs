//! Configuration management for docweave.
//!
//! Reads `weave.toml`, found either at an explicit path or by walking up from
//! the working directory. Relative paths resolve against the file's
//! directory; project data (the unit cache, default build output) lives under
//! `.weave/` next to it. [`CliSettings`] override file values after loading.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.source_dir`
//! - `docs.lockfile`
//! - `build.output_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use weave_tree::{GROUPING_IDENTIFIER, is_component_name};

/// Command-line overrides. `None` keeps the configured value.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "weave.toml";

/// Project data directory, relative to the config file.
const PROJECT_DIR: &str = ".weave";

/// Loaded `weave.toml`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    docs: DocsConfigRaw,
    build: BuildConfigRaw,
    /// Declared presentation components.
    pub components: ComponentsConfig,

    /// `[docs]` with paths resolved.
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// `[build]` with paths resolved.
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// `[docs]` as written.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    cache_enabled: Option<bool>,
    lockfile: Option<String>,
}

/// Content and cache settings.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Content root.
    pub source_dir: PathBuf,
    /// Project directory for docweave data (.weave/).
    pub project_dir: PathBuf,
    /// Whether compiled units are cached on disk.
    pub cache_enabled: bool,
    /// Dependency manifest whose contents feed every fingerprint.
    pub lockfile: PathBuf,
}

impl DocsConfig {
    /// Cache directory path (.weave/cache/).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir.join("cache")
    }

    /// Contents of the lockfile, or an empty snapshot if it cannot be read.
    #[must_use]
    pub fn lockfile_snapshot(&self) -> String {
        match std::fs::read_to_string(&self.lockfile) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %self.lockfile.display(),
                    "No lockfile, using empty snapshot"
                );
                String::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.lockfile.display(),
                    error = %e,
                    "Failed to read lockfile, using empty snapshot"
                );
                String::new()
            }
        }
    }
}

/// Raw build configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    output_dir: Option<String>,
}

/// Resolved build configuration.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory that receives page payloads and the manifest.
    pub output_dir: PathBuf,
}

/// Component declarations.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    /// Names available to every document, in declaration order.
    ///
    /// Order is significant: it is part of every fingerprint.
    pub names: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.source_dir`").
        field: String,
        /// Error message (e.g., "${`CONTENT_ROOT`} not set").
        message: String,
    },
}

impl Config {
    /// Load `config_path`, or the nearest `weave.toml` above the working
    /// directory, then apply `cli_settings`.
    ///
    /// Without any config file the defaults are rooted at the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] for a missing explicit path, and
    /// parse, expansion or validation errors for a bad file.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.docs_resolved.cache_enabled = cache_enabled;
        }
    }

    /// Nearest `weave.toml` in the working directory or an ancestor.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Defaults as if an empty `weave.toml` lived in `base`.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            docs: DocsConfigRaw::default(),
            build: BuildConfigRaw::default(),
            components: ComponentsConfig::default(),
            docs_resolved: DocsConfig::default(),
            build_resolved: BuildConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_components()
    }

    /// Component names must be identifiers, unique and not reserved.
    fn validate_components(&self) -> Result<(), ConfigError> {
        let names = &self.components.names;
        for (i, name) in names.iter().enumerate() {
            if name == GROUPING_IDENTIFIER {
                return Err(ConfigError::Validation(format!(
                    "components.names: {name} is reserved"
                )));
            }
            if !is_component_name(name) {
                return Err(ConfigError::Validation(format!(
                    "components.names: {name:?} is not a valid identifier"
                )));
            }
            if names[..i].contains(name) {
                return Err(ConfigError::Validation(format!(
                    "components.names: {name} is declared more than once"
                )));
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref source_dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(source_dir, "docs.source_dir")?);
        }
        if let Some(ref lockfile) = self.docs.lockfile {
            self.docs.lockfile = Some(expand::expand_env(lockfile, "docs.lockfile")?);
        }
        if let Some(ref output_dir) = self.build.output_dir {
            self.build.output_dir = Some(expand::expand_env(output_dir, "build.output_dir")?);
        }
        Ok(())
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let project_dir = config_dir.join(PROJECT_DIR);

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "content"),
            cache_enabled: self.docs.cache_enabled.unwrap_or(true),
            lockfile: resolve(self.docs.lockfile.as_deref(), "Cargo.lock"),
            project_dir: project_dir.clone(),
        };

        self.build_resolved = BuildConfig {
            output_dir: self
                .build
                .output_dir
                .as_deref()
                .map_or_else(|| project_dir.join("build"), |dir| config_dir.join(dir)),
        };
    }
}
