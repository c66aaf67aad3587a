use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter '{key}': {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Relation '{0}' is subject-scoped but no subject was bound")]
    MissingScope(&'static str),
}
