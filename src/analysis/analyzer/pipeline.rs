//! Pipeline analyzer that combines char filters, a tokenizer and token filters.
//!
//! # Architecture
//!
//! The PipelineAnalyzer applies processing in this order:
//! 1. Char Filters: Rewrite the raw text (e.g. transliteration)
//! 2. Tokenizer: Splits the filtered text into tokens
//! 3. Token Filters: Applied sequentially in the order they were added
//!
//! Token offsets are then mapped back through every char filter, so they
//! always point into the text passed to [`analyze`](Analyzer::analyze).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use cjk_analysis::analysis::analyzer::analyzer::Analyzer;
//! use cjk_analysis::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use cjk_analysis::analysis::char_filter::transliterate::TransliterateCharFilter;
//! use cjk_analysis::analysis::token_filter::cjk_folding::CjkFoldingFilter;
//! use cjk_analysis::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//! use cjk_analysis::config::TransformConfig;
//! use cjk_analysis::resource::MemoryResourceLoader;
//!
//! let loader = MemoryResourceLoader::new();
//! let width = TransliterateCharFilter::from_config(
//!     &TransformConfig::new("Fullwidth-Halfwidth"),
//!     &loader,
//! )
//! .unwrap();
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
//!     .add_char_filter(Arc::new(width))
//!     .add_filter(Arc::new(CjkFoldingFilter::builtin().unwrap()))
//!     .with_name("cjk");
//!
//! let tokens: Vec<_> = analyzer.analyze("ＡＢＣ\u{3000}亜黒").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].text, "ABC");
//! assert_eq!(tokens[1].text, "亞黑");
//! assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (12, 18));
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::char_filter::{CharFilter, Transformation};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with chains of char
/// filters and token filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    char_filters: Vec<Arc<dyn CharFilter>>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            char_filters: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Add a char filter to the pipeline.
    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// The configured name, used in logs.
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn char_filters(&self) -> &[Arc<dyn CharFilter>] {
        &self.char_filters
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    /// Maps a byte offset in filtered text back to the text the filter saw.
    ///
    /// An offset strictly inside a rewritten range has no exact counterpart,
    /// so it widens to the whole original range: start offsets snap to its
    /// start and end offsets to its end. Results always fall on character
    /// boundaries of the original text.
    fn correct_offset(offset: usize, edge: Edge, transformations: &[Transformation]) -> usize {
        let mut corrected = offset as isize;
        for t in transformations {
            if offset >= t.new_end {
                let original_len = (t.original_end - t.original_start) as isize;
                let new_len = (t.new_end - t.new_start) as isize;
                corrected += original_len - new_len;
            } else if offset > t.new_start {
                return match edge {
                    Edge::Start => t.original_start,
                    Edge::End => t.original_end,
                };
            } else if offset == t.new_start {
                return t.original_start;
            } else {
                // Transformations are ordered by position.
                break;
            }
        }
        assert!(corrected >= 0, "offset {offset} corrected below zero");
        corrected as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut filtered_text = text.to_string();
        let mut filter_transformations = Vec::with_capacity(self.char_filters.len());

        for char_filter in &self.char_filters {
            let (new_text, transformations) = char_filter.filter(&filtered_text);
            log::trace!(
                "{}: char filter '{}' made {} changes",
                self.name,
                char_filter.name(),
                transformations.len()
            );
            filtered_text = new_text;
            filter_transformations.push(transformations);
        }

        let mut tokens = self.tokenizer.tokenize(&filtered_text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        if filter_transformations.iter().all(|t| t.is_empty()) {
            return Ok(tokens);
        }

        // Map Final -> Filter N -> ... -> Filter 1 -> Original.
        let collected: Vec<_> = tokens
            .map(|mut token| {
                for transformations in filter_transformations.iter().rev() {
                    token.start_offset =
                        Self::correct_offset(token.start_offset, Edge::Start, transformations);
                    token.end_offset =
                        Self::correct_offset(token.end_offset, Edge::End, transformations);
                }
                token
            })
            .collect();
        Ok(Box::new(collected.into_iter()))
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "char_filters",
                &self
                    .char_filters
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>(),
            )
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
