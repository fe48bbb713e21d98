//! Char filter implementations for text normalization.
//!
//! Char filters rewrite text before it reaches the tokenizer. They come in two
//! shapes:
//!
//! - whole-string filters implementing [`CharFilter`], which return the
//!   rewritten text with a list of [`Transformation`]s for offset correction;
//! - streaming filters implementing [`reader::CharRead`], which pull from an
//!   upstream character source in bounded chunks and map output positions back
//!   to input positions through a [`offset::PositionCorrector`].
//!
//! # Available Filters
//!
//! - [`transliterate::TransliterateCharFilter`] - Rule-based or built-in transliteration
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use cjk_analysis::analysis::char_filter::CharFilter;
//! use cjk_analysis::analysis::char_filter::transliterate::TransliterateCharFilter;
//! use cjk_analysis::analysis::transliterator::rules::RuleSet;
//! use cjk_analysis::analysis::transliterator::rule_based::RuleBasedTransliterator;
//! use cjk_analysis::config::Direction;
//!
//! let rules = RuleSet::parse("cjk", "両 > 兩 ;", Direction::Forward).unwrap();
//! let filter = TransliterateCharFilter::new(Arc::new(RuleBasedTransliterator::new(rules)));
//!
//! let (output, transformations) = filter.filter("両方");
//! assert_eq!(output, "兩方");
//! assert_eq!(transformations.len(), 1);
//! ```

/// Represents a change in the text, mapping a byte range in the original text
/// to a byte range in the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transformation {
    pub original_start: usize,
    pub original_end: usize,
    pub new_start: usize,
    pub new_end: usize,
}

impl Transformation {
    pub fn new(
        original_start: usize,
        original_end: usize,
        new_start: usize,
        new_end: usize,
    ) -> Self {
        Self {
            original_start,
            original_end,
            new_start,
            new_end,
        }
    }
}

/// Trait for character filters that transform text before tokenization.
///
/// Implementations return the modified text along with the list of
/// transformations that occurred, ordered by position.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> (String, Vec<Transformation>);

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod offset;
pub mod reader;
pub mod transliterate;
