//! `weave build` command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use weave_cache::{Cache, FileCache, NullCache};
use weave_compiler::{CachingCompiler, DocumentCompiler, UnitCache};
use weave_config::{CliSettings, Config};
use weave_site::{PageBuilder, SiteBuilder};
use weave_storage::FsStorage;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover weave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for page payloads (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Disable the compiled unit cache.
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output (cache and build logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// Successful pages are written even when others fail.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or enumeration fails, output cannot
    /// be written, or any page failed to build.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            cache_enabled: self.no_cache.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let docs = &config.docs_resolved;
        let output_dir = &config.build_resolved.output_dir;

        output.info(&format!("Source: {}", docs.source_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let cache: Box<dyn Cache> = if docs.cache_enabled {
            ensure_project_dir(&docs.project_dir)?;
            output.info(&format!("Cache directory: {}", docs.cache_dir().display()));
            Box::new(FileCache::new(docs.cache_dir(), version))
        } else {
            output.info("Cache: disabled");
            Box::new(NullCache)
        };

        let compiler = CachingCompiler::new(
            DocumentCompiler::default(),
            UnitCache::new(cache.as_ref()),
            docs.lockfile_snapshot(),
        );
        let storage = Arc::new(FsStorage::new(docs.source_dir.clone()));
        let site = SiteBuilder::new(PageBuilder::new(
            storage,
            compiler,
            config.components.names.clone(),
        ));

        let report = site.build_all()?;
        report.write_to(output_dir)?;

        for failure in &report.failures {
            output.warning(&format!(
                "  {}: {}",
                display_path(&failure.path.to_string()),
                failure.error
            ));
        }

        if !report.is_success() {
            return Err(CliError::PagesFailed(report.failures.len()));
        }

        output.success(&format!(
            "Built {} page(s) to {}",
            report.pages.len(),
            output_dir.display()
        ));
        Ok(())
    }
}

/// Root-relative display form of a logical path.
pub(crate) fn display_path(path: &str) -> String {
    format!("/{path}")
}

/// Ensure the `.weave/` project directory exists with a `.gitignore`.
fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by weave\n*\n");
    }

    Ok(())
}
