//! Error types for the cjk-analysis library.
//!
//! All fallible operations return [`CjkAnalysisError`] through the crate-wide
//! [`Result`] alias. Configuration problems (missing resources, malformed rule
//! sets, unknown options) surface once, when a filter is constructed. Failures
//! of an upstream producer are propagated unchanged from the pull call that hit
//! them.
//!
//! # Examples
//!
//! ```
//! use cjk_analysis::error::{CjkAnalysisError, Result};
//!
//! fn build() -> Result<()> {
//!     Err(CjkAnalysisError::configuration("unknown transform id: Foo-Bar"))
//! }
//!
//! match build() {
//!     Ok(_) => println!("built"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for cjk-analysis operations.
#[derive(Error, Debug)]
pub enum CjkAnalysisError {
    /// I/O errors raised by an upstream producer or a resource loader.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid or missing configuration detected while building a filter.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A caller passed an argument the operation cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with CjkAnalysisError.
pub type Result<T> = std::result::Result<T, CjkAnalysisError>;

impl CjkAnalysisError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        CjkAnalysisError::Configuration(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CjkAnalysisError::InvalidArgument(msg.into())
    }

    /// Whether this error was raised while building a filter chain.
    pub fn is_configuration(&self) -> bool {
        matches!(self, CjkAnalysisError::Configuration(_))
    }
}
