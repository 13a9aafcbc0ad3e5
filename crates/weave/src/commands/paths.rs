//! `weave paths` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use weave_config::{CliSettings, Config};
use weave_storage::{FsStorage, LogicalPath, Storage};

use super::build::display_path;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the paths command.
#[derive(Args)]
pub(crate) struct PathsArgs {
    /// Path to configuration file (default: auto-discover weave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Print one JSON record per line instead of plain paths.
    #[arg(long)]
    json: bool,
}

/// One enumerated build target.
#[derive(Debug, Serialize)]
struct PathRecord<'a> {
    path: String,
    segments: &'a [String],
}

impl PathsArgs {
    /// Execute the paths command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the content root cannot be
    /// scanned.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let storage = FsStorage::new(config.docs_resolved.source_dir.clone());

        let paths = storage.scan()?;
        for path in &paths {
            output.data(&format_line(path, self.json)?)?;
        }
        output.info(&format!("{} document(s)", paths.len()));
        Ok(())
    }
}

fn format_line(path: &LogicalPath, json: bool) -> Result<String, CliError> {
    if !json {
        return Ok(display_path(&path.to_string()));
    }
    let record = PathRecord {
        path: path.to_string(),
        segments: path.segments(),
    };
    Ok(serde_json::to_string(&record)?)
}
