//! Text analysis module for cjk-analysis.
//!
//! This module provides the character-level and token-level normalization
//! filters plus the minimal tokenizer/analyzer plumbing they plug into.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
pub mod transliterator;
pub mod variant_map;
