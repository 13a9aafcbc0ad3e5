//! CLI error types.

use weave_config::ConfigError;
use weave_hydrate::HydrateError;
use weave_storage::StorageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Hydrate(#[from] HydrateError),

    #[error("Invalid page payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{0} page(s) failed to build")]
    PagesFailed(usize),
}
