//! Module: config
//! Responsibility: explicit, passed configuration for paginators and tokens.
//! Does not own: column models (built in code, accessors are closures).
//! Boundary: deserializable from TOML so hosts can keep options in files.

use crate::db::PaginationDirection;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Default upper bound on rows per page.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 1_000;

/// Default upper bound on serialized token length (base64 characters).
pub const DEFAULT_MAX_TOKEN_LEN: usize = 8 * 1024;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to parse pagination config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid pagination config: {0}")]
    Invalid(String),
}

///
/// TokenOptions
///
/// Token serializer stage switches. Both sides of a token exchange must use
/// the same options; a hashed token does not decode under a hashless codec.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenOptions {
    /// Prefix the payload with a 16-byte digest and verify it on decode.
    pub include_hash: bool,

    /// Deflate the binary payload before hashing.
    pub use_compression: bool,

    /// Reject incoming tokens longer than this many characters. Issued
    /// tokens are never truncated, so the limit must cover the widest key
    /// the column model can produce.
    pub max_token_len: usize,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            include_hash: true,
            use_compression: false,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl TokenOptions {
    #[must_use]
    pub const fn with_hash(mut self, include_hash: bool) -> Self {
        self.include_hash = include_hash;
        self
    }

    #[must_use]
    pub const fn with_compression(mut self, use_compression: bool) -> Self {
        self.use_compression = use_compression;
        self
    }
}

///
/// PaginationConfig
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Traversal sense of `NextPage` relative to the column ordering.
    pub direction: PaginationDirection,

    pub max_page_size: usize,

    pub token: TokenOptions,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            direction: PaginationDirection::Forward,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            token: TokenOptions::default(),
        }
    }
}

impl PaginationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    ///
    /// ```toml
    /// direction = "backward"
    /// max_page_size = 200
    ///
    /// [token]
    /// include_hash = true
    /// use_compression = true
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "max_page_size must be greater than zero".to_string(),
            ));
        }
        if self.token.max_token_len == 0 {
            return Err(ConfigError::Invalid(
                "token.max_token_len must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_direction(mut self, direction: PaginationDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub const fn with_token(mut self, token: TokenOptions) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub const fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }
}

///
/// TESTS
///
