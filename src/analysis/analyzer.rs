//! Analyzer implementations that combine char filters, tokenizers and token
//! filters.
//!
//! # Available Analyzers
//!
//! - [`pipeline::PipelineAnalyzer`] - Custom char filter + tokenizer + filter chains

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod pipeline;
