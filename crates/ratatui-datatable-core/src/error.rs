use thiserror::Error;

/// Errors raised while loading or validating table configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid table spec JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("page size options must not be empty")]
    EmptyPageSizeOptions,

    #[error("page sizes must be greater than zero")]
    ZeroPageSize,

    #[error("default page size {default} is not one of the page size options {options:?}")]
    DefaultPageSizeNotOffered { default: usize, options: Vec<usize> },

    #[error("duplicate column key `{0}`")]
    DuplicateColumn(String),

    #[error("unknown column `{0}`")]
    UnknownColumn(String),
}
