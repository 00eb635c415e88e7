use load_catalog::LoadError;
use std::path::PathBuf;

/// Problems with the environment of a check (configuration, files), as opposed to problems with
/// the checked expression, which are reported in the [crate::Outcome].
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to parse config value {0:?}; no '=' found")]
    BadOverride(String),
    #[error("no {0} file given")]
    MissingPath(&'static str),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] LoadError),
    #[error("failed to write result: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}
