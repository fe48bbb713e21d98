//! Tokenizer implementations for text analysis.
//!
//! Tokenizers produce the upstream token stream that token filters such as
//! [`CjkFoldingFilter`](crate::analysis::token_filter::cjk_folding::CjkFoldingFilter)
//! consume.
//!
//! # Available Tokenizers
//!
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`whole::WholeTokenizer`] - Treats entire text as single token
//!
//! # Examples
//!
//! ```
//! use cjk_analysis::analysis::tokenizer::Tokenizer;
//! use cjk_analysis::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("亜黒 Des").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so one tokenizer can be shared by many
/// analysis chains.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod whitespace;
pub mod whole;
