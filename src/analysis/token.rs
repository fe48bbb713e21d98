//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows between tokenizers and token filters.
//! Filters rewrite `text` in place; positions and offsets are left to the
//! producer of the token.
//!
//! # Examples
//!
//! ```
//! use cjk_analysis::analysis::token::Token;
//!
//! let token = Token::with_offsets("亜黒", 1, 4, 10);
//! assert_eq!(token.text, "亜黒");
//! assert_eq!(token.char_len(), 2);
//! assert_eq!(token.start_offset, 4);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// Whether this token has been marked as stopped by a filter
    pub stopped: bool,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
            stopped: false,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            stopped: false,
        }
    }

    /// Length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Length of the token text in codepoints.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check if this token is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

/// Trait for types that can produce a token stream.
pub trait IntoTokenStream {
    /// Convert this type into a token stream.
    fn into_token_stream(self) -> TokenStream;
}

impl IntoTokenStream for Vec<Token> {
    fn into_token_stream(self) -> TokenStream {
        Box::new(self.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("両", 0);
        assert_eq!(token.text, "両");
        assert_eq!(token.position, 0);
        assert_eq!(token.len(), 3);
        assert_eq!(token.char_len(), 1);
        assert!(!token.is_stopped());
    }

    #[test]
    fn test_token_stop() {
        let token = Token::new("the", 0).stop();
        assert!(token.is_stopped());
    }

    #[test]
    fn test_token_display() {
        let token = Token::new("hello", 0);
        assert_eq!(format!("{token}"), "hello");
    }

    #[test]
    fn test_token_stream() {
        let tokens = vec![Token::new("亜", 0), Token::new("黒", 1)];

        let collected: Vec<_> = tokens.into_token_stream().collect();

        assert_eq!(collected.len(), 2);
        assert_eq!(collected[1].text, "黒");
    }
}
