use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FusionError {
    #[error("invalid fusion configuration: {0}")]
    InvalidConfig(String),
}
