//! Whole tokenizer implementation.

use super::Tokenizer;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A tokenizer that treats the entire input as a single token.
///
/// Empty input still yields one (empty) token, so keyword fields keep a term
/// for the empty value.
#[derive(Clone, Debug, Default)]
pub struct WholeTokenizer;

impl WholeTokenizer {
    /// Create a new whole tokenizer.
    pub fn new() -> Self {
        WholeTokenizer
    }
}

impl Tokenizer for WholeTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let token = Token::with_offsets(text, 0, 0, text.len());
        Ok(Box::new(std::iter::once(token)))
    }

    fn name(&self) -> &'static str {
        "whole"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_tokenizer() {
        let tokenizer = WholeTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("亜黒 亜").unwrap().collect();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "亜黒 亜");
        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[0].end_offset, 10);
    }

    #[test]
    fn test_whole_tokenizer_empty() {
        let tokenizer = WholeTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("").unwrap().collect();

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_empty());
    }
}
