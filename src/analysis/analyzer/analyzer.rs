//! Core analyzer trait definition.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Index
//!             ↓
//!         Char Filters
//!             ↓
//!         Tokenizer
//!             ↓
//!         Token Filters
//! ```
//!
//! # Examples
//!
//! Implementing a custom analyzer:
//!
//! ```
//! use cjk_analysis::analysis::analyzer::analyzer::Analyzer;
//! use cjk_analysis::analysis::token::TokenStream;
//! use cjk_analysis::error::Result;
//!
//! struct NothingAnalyzer;
//!
//! impl Analyzer for NothingAnalyzer {
//!     fn analyze(&self, _text: &str) -> Result<TokenStream> {
//!         Ok(Box::new(std::iter::empty()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "nothing"
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Requires `Send + Sync` so a configured analyzer can be shared by indexing
/// threads.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens whose offsets
    /// refer to `text`.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Provide access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn std::any::Any;
}
