use reformas_config::ConfigError;
use reformas_core::CoreError;
use reformas_domain::DomainError;
use thiserror::Error;

/// Unified error for the facade crate and the CLI.
#[derive(Debug, Error)]
pub enum ReformasError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
}

impl ReformasError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReformasError::Core(err) if err.is_not_found())
    }
}
