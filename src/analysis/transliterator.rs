//! Transliteration engines used by the streaming char filter.
//!
//! A [`Transliterator`] rewrites a span of characters and reports how much of
//! that span it is willing to commit. Outside a final pass, any trailing
//! characters whose rewrite could still change once more input arrives are
//! withheld: they are neither consumed nor emitted, and the caller offers them
//! again together with the next chunk.
//!
//! # Available Transliterators
//!
//! - [`rule_based::RuleBasedTransliterator`] - Custom rules loaded from a resource
//! - [`builtin::CharMapTransliterator`] - Built-in 1:1 script transforms
//! - [`builtin::WidthTransliterator`] - Built-in fullwidth / halfwidth transforms
//!
//! # Examples
//!
//! ```
//! use cjk_analysis::analysis::transliterator::Transliterator;
//! use cjk_analysis::analysis::transliterator::rules::RuleSet;
//! use cjk_analysis::analysis::transliterator::rule_based::RuleBasedTransliterator;
//! use cjk_analysis::config::Direction;
//!
//! let rules = RuleSet::parse("demo", "両 > 兩 ;", Direction::Forward).unwrap();
//! let transliterator = RuleBasedTransliterator::new(rules);
//!
//! let span: Vec<char> = "両方".chars().collect();
//! let result = transliterator.transliterate(&span, true);
//! assert_eq!(result.consumed, 2);
//! assert_eq!(result.output.iter().collect::<String>(), "兩方");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::TransformConfig;
use crate::error::Result;
use crate::resource::ResourceLoader;

pub mod builtin;
pub mod rule_based;
pub mod rules;

/// One substitution unit inside a [`Transliteration`].
///
/// `input_len` characters of the span became `output_len` characters of the
/// output. Characters copied through unchanged form length-preserving units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub input_len: usize,
    pub output_len: usize,
}

impl Edit {
    pub fn new(input_len: usize, output_len: usize) -> Self {
        Edit {
            input_len,
            output_len,
        }
    }

    pub fn is_length_preserving(&self) -> bool {
        self.input_len == self.output_len
    }
}

/// The committed result of one transliteration call.
///
/// The edits partition the consumed prefix in order: their input lengths sum
/// to `consumed` and their output lengths sum to `output.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transliteration {
    /// Number of span characters that are final.
    pub consumed: usize,
    /// Rewritten form of the consumed prefix.
    pub output: Vec<char>,
    /// Substitution units covering the consumed prefix.
    pub edits: Vec<Edit>,
}

impl Transliteration {
    pub fn with_capacity(capacity: usize) -> Self {
        Transliteration {
            consumed: 0,
            output: Vec::with_capacity(capacity),
            edits: Vec::new(),
        }
    }

    /// Number of characters produced.
    pub fn produced(&self) -> usize {
        self.output.len()
    }

    /// Record that `input_len` characters were replaced by `replacement`.
    pub fn push(&mut self, input_len: usize, replacement: &[char]) {
        self.consumed += input_len;
        self.output.extend_from_slice(replacement);
        self.push_edit(Edit::new(input_len, replacement.len()));
    }

    /// Record a character copied through unchanged.
    pub fn push_unchanged(&mut self, c: char) {
        self.consumed += 1;
        self.output.push(c);
        self.push_edit(Edit::new(1, 1));
    }

    // Adjacent length-preserving units collapse into one.
    fn push_edit(&mut self, edit: Edit) {
        if edit.is_length_preserving() {
            if let Some(last) = self.edits.last_mut() {
                if last.is_length_preserving() {
                    last.input_len += edit.input_len;
                    last.output_len += edit.output_len;
                    return;
                }
            }
        }
        self.edits.push(edit);
    }
}

/// A rule-driven character rewriter with an explicit finality contract.
///
/// Implementations are immutable once built and are shared by every filter
/// instance that uses them.
pub trait Transliterator: Send + Sync + fmt::Debug {
    /// Identifier of the transform (a built-in id or the rule resource id).
    fn id(&self) -> &str;

    /// Rewrite a prefix of `span`.
    ///
    /// With `final_pass == false` the implementation must withhold every
    /// trailing sub-span whose rewrite could change if more characters were
    /// appended, so the committed prefix never changes under more context.
    /// With `final_pass == true` the whole span is consumed.
    fn transliterate(&self, span: &[char], final_pass: bool) -> Transliteration;
}

/// Resolve a transform configuration to a shared transliterator.
///
/// Built-in ids are tried first; any other id names a rule resource that is
/// read through `loader` and parsed in the configured direction.
pub fn transliterator_for(
    config: &TransformConfig,
    loader: &dyn ResourceLoader,
) -> Result<Arc<dyn Transliterator>> {
    if let Some(builtin) = builtin::lookup(&config.id, config.direction) {
        log::debug!("using built-in transform '{}' ({})", config.id, config.direction);
        return Ok(builtin);
    }

    let text = loader.open_resource(&config.id)?;
    let rules = rules::RuleSet::parse(&config.id, &text, config.direction)?;
    log::debug!(
        "loaded {} transliteration rules from '{}' ({})",
        rules.len(),
        config.id,
        config.direction
    );
    Ok(Arc::new(rule_based::RuleBasedTransliterator::new(rules)))
}
