use thiserror::Error;

use crate::RuleError;

/// Unified error type covering rule construction, configuration, and I/O.
///
/// Returned by convenience methods like
/// [`RoutingConfig::load()`](crate::config::RoutingConfig::load).
#[derive(Debug, Error)]
pub enum LinkrouteError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("invalid routing configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid routing configuration: {0}")]
    Config(String),

    #[error("unknown business domain `{0}`")]
    UnknownDomain(String),

    #[error("business domain `{0}` needs a non-blank default backend")]
    BlankDefaultBackend(String),
}
