use crate::{config::ConfigError, db::cursor::TokenError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// EngineError
///
/// Structured pagination error with a stable classification.
///
/// `class` says what went wrong, `origin` says which subsystem noticed.
/// Token failures keep their typed [`TokenError`] in `detail` so callers can
/// branch on the exact rejection reason.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct EngineError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl EngineError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a configuration error for a specific origin.
    pub(crate) fn configuration(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Configuration, origin, message)
    }

    /// Construct a source-origin failure (the external data source failed).
    pub(crate) fn source_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Source, message)
    }

    /// Construct a source-origin contract violation.
    pub(crate) fn source_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Source, message)
    }

    /// Borrow the token rejection detail, if this error came from a token.
    #[must_use]
    pub const fn token_error(&self) -> Option<&TokenError> {
        match &self.detail {
            Some(ErrorDetail::Token(err)) => Some(err),
            None => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<TokenError> for EngineError {
    fn from(err: TokenError) -> Self {
        let class = if err.kind().is_schema() {
            ErrorClass::Incompatible
        } else {
            ErrorClass::Corruption
        };

        Self {
            class,
            origin: ErrorOrigin::Token,
            message: err.to_string(),
            detail: Some(ErrorDetail::Token(err)),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`EngineError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Token(TokenError),
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Input bytes are damaged, tampered with, or not a token at all.
    Corruption,
    /// Well-formed token that belongs to a different column model.
    Incompatible,
    /// Paginator or column model used outside its configured envelope.
    Configuration,
    /// A collaborator broke its contract.
    InvariantViolation,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::Incompatible => "incompatible",
            Self::Configuration => "configuration",
            Self::InvariantViolation => "invariant_violation",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Token,
    Column,
    Paginator,
    Source,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Token => "token",
            Self::Column => "column",
            Self::Paginator => "paginator",
            Self::Source => "source",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
