//! Error types for Quarry

use thiserror::Error;

/// The main error type for Quarry operations
#[derive(Error, Debug)]
pub enum Error {
    /// Error reported by the statement executor
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error (configuration or result rows)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A condition whose operator and operand do not fit together
    #[error("Invalid condition: {message}")]
    InvalidCondition { message: String },

    /// Two selections of one statement share an output alias
    #[error("Duplicate output alias '{alias}'")]
    DuplicateAlias { alias: String },

    /// The statement lacks a clause it cannot be rendered without
    #[error("Missing {clause} clause: {message}")]
    MissingClause {
        clause: &'static str,
        message: String,
    },

    /// A field refers to a source alias that is neither the base table nor a join
    #[error("Unknown source alias '{alias}'")]
    UnknownSource { alias: String },

    /// ORDER BY direction other than asc/desc
    #[error("Invalid sort direction '{direction}', expected 'asc' or 'desc'")]
    InvalidDirection { direction: String },

    /// Operator text that does not name a known operator
    #[error("Unknown operator '{operator}'")]
    InvalidOperator { operator: String },

    /// A single row was required but the executor returned none
    #[error("Query returned no rows")]
    NoRows,
}

/// Convenience Result type for Quarry operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid condition error
    pub fn invalid_condition(message: impl Into<String>) -> Self {
        Self::InvalidCondition {
            message: message.into(),
        }
    }

    /// Create a new duplicate alias error
    pub fn duplicate_alias(alias: impl Into<String>) -> Self {
        Self::DuplicateAlias {
            alias: alias.into(),
        }
    }

    /// Create a new missing clause error
    pub fn missing_clause(clause: &'static str, message: impl Into<String>) -> Self {
        Self::MissingClause {
            clause,
            message: message.into(),
        }
    }

    /// Create a new unknown source error
    pub fn unknown_source(alias: impl Into<String>) -> Self {
        Self::UnknownSource {
            alias: alias.into(),
        }
    }

    /// Create a new invalid direction error
    pub fn invalid_direction(direction: impl Into<String>) -> Self {
        Self::InvalidDirection {
            direction: direction.into(),
        }
    }

    /// Create a new invalid operator error
    pub fn invalid_operator(operator: impl Into<String>) -> Self {
        Self::InvalidOperator {
            operator: operator.into(),
        }
    }
}
