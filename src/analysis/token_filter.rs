//! Token filter implementations for token transformation.
//!
//! Filters receive the token stream produced by a tokenizer and return a new
//! stream. They run after tokenization, so they never see token boundaries
//! move.
//!
//! # Available Filters
//!
//! - [`cjk_folding::CjkFoldingFilter`] - Folds variant Han characters to a canonical form
//!
//! # Examples
//!
//! ```
//! use cjk_analysis::analysis::token_filter::Filter;
//! use cjk_analysis::analysis::token_filter::cjk_folding::CjkFoldingFilter;
//! use cjk_analysis::analysis::token::Token;
//!
//! let filter = CjkFoldingFilter::builtin().unwrap();
//! let tokens = vec![Token::new("亜黒亜", 0), Token::new("Des", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "亞黑亞");
//! assert_eq!(filtered[1].text, "Des");
//! ```
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → CJK Folding → Index
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// The trait requires `Send + Sync` so a configured filter can be shared by
/// analysis chains running on different threads. Per-stream state belongs in
/// the stream returned by [`filter`](Filter::filter), not in the filter.
///
/// # Examples
///
/// Implementing a custom filter:
///
/// ```
/// use cjk_analysis::analysis::token::{Token, TokenStream};
/// use cjk_analysis::analysis::token_filter::Filter;
/// use cjk_analysis::error::Result;
///
/// struct ReverseFilter;
///
/// impl Filter for ReverseFilter {
///     fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
///         Ok(Box::new(tokens.map(|mut t| {
///             t.text = t.text.chars().rev().collect();
///             t
///         })))
///     }
///
///     fn name(&self) -> &'static str {
///         "reverse"
///     }
/// }
/// ```
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod cjk_folding;
