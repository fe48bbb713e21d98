//! # cjk-analysis
//!
//! Text normalization filters for CJK (and other) text prior to indexing.
//!
//! ## Features
//!
//! - Streaming transliteration of a character source in bounded chunks, with
//!   exact mapping of output positions back to input positions
//! - Rule-based and built-in transliterators with a finality contract, so a
//!   rewrite is never committed before enough lookahead has arrived
//! - Whole-token folding of variant Han characters to a canonical form
//! - Fallible, one-time construction from option records and resources

pub mod analysis;
pub mod config;
pub mod error;
pub mod resource;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
