//! Error types for gridlb core parsing.

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown metric: {0} (expected cpu, memory or disk)")]
    UnknownMetric(String),

    #[error("unknown mode: {0} (expected avg, peak or current)")]
    UnknownMode(String),

    #[error("failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    #[error("invalid config value: {0}")]
    ConfigValue(String),
}
