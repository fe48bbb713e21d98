//! Immutable tables of character variants and their canonical forms.
//!
//! A [`VariantMap`] is built once, validated, and shared read-only (behind an
//! `Arc`) by every folding filter in every analysis chain.
//!
//! # Table formats
//!
//! Tab or space separated text, one entry per line:
//!
//! ```text
//! # variant  canonical
//! 亜	亞
//! U+9ED2	U+9ED1
//! ```
//!
//! or a JSON object:
//!
//! ```json
//! { "亜": "亞", "黒": "黑" }
//! ```
//!
//! # Examples
//!
//! ```
//! use cjk_analysis::analysis::variant_map::VariantMap;
//!
//! let map = VariantMap::parse_tsv("亜\t亞\n黒 U+9ED1\n").unwrap();
//! assert_eq!(map.get('亜'), Some(&['亞'][..]));
//! assert_eq!(map.get('黒'), Some(&['黑'][..]));
//! assert_eq!(map.threshold(), Some('亜'));
//! ```

use std::collections::BTreeMap;

use ahash::AHashMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{CjkAnalysisError, Result};
use crate::resource::ResourceLoader;

/// Default table, folding modern Japanese and variant Han forms to their
/// traditional forms.
const BUILTIN_TABLE: &str = include_str!("../../resources/variantmap.tsv");

/// Lower bound of the per-character expansion factor used to size fold
/// buffers.
pub const MIN_EXPANSION_FACTOR: usize = 4;

lazy_static! {
    static ref CODE_POINT: Regex = Regex::new(r"^(?:[Uu]\+|\\u)([0-9A-Fa-f]{4,6})$").unwrap();
}

/// Variant character → canonical replacement.
///
/// Invariants, checked at construction:
/// - every source is a single character and never maps to itself;
/// - every replacement is non-empty;
/// - no replacement contains a character that is itself a source, so folding
///   twice gives the same result as folding once.
#[derive(Debug, Clone)]
pub struct VariantMap {
    entries: AHashMap<char, Box<[char]>>,
    /// Smallest source codepoint, `u32::MAX` when the map is empty.
    threshold: u32,
    max_replacement_len: usize,
}

impl VariantMap {
    /// Build a map from `(variant, canonical)` pairs.
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut entries: AHashMap<char, Box<[char]>> = AHashMap::new();

        for (source, replacement) in pairs {
            let (source, replacement) = (source.as_ref(), replacement.as_ref());

            let mut source_chars = source.chars();
            let key = match (source_chars.next(), source_chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(CjkAnalysisError::configuration(format!(
                        "variant '{source}' must be exactly one character"
                    )));
                }
            };
            if replacement.is_empty() {
                return Err(CjkAnalysisError::configuration(format!(
                    "variant '{source}' has an empty replacement"
                )));
            }

            let replacement: Box<[char]> = replacement.chars().collect();
            if replacement[..] == [key] {
                log::warn!("ignoring variant '{key}' mapped to itself");
                continue;
            }

            match entries.get(&key) {
                Some(existing) if *existing != replacement => {
                    return Err(CjkAnalysisError::configuration(format!(
                        "variant '{}' is mapped to both '{}' and '{}'",
                        key,
                        existing.iter().collect::<String>(),
                        replacement.iter().collect::<String>()
                    )));
                }
                Some(_) => {}
                None => {
                    entries.insert(key, replacement);
                }
            }
        }

        for (source, replacement) in &entries {
            if let Some(c) = replacement.iter().find(|c| entries.contains_key(*c)) {
                return Err(CjkAnalysisError::configuration(format!(
                    "replacement '{}' of '{}' contains '{}', which is itself a variant",
                    replacement.iter().collect::<String>(),
                    source,
                    c
                )));
            }
        }

        let threshold = entries.keys().map(|&c| c as u32).min().unwrap_or(u32::MAX);
        let max_replacement_len = entries.values().map(|r| r.len()).max().unwrap_or(0);

        Ok(VariantMap {
            entries,
            threshold,
            max_replacement_len,
        })
    }

    /// Parse a whitespace separated table. Lines starting with `#` and blank
    /// lines are skipped.
    pub fn parse_tsv(text: &str) -> Result<Self> {
        let mut pairs = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            let [source, replacement] = fields.as_slice() else {
                return Err(CjkAnalysisError::configuration(format!(
                    "line {}: expected 'variant canonical', found {} fields",
                    index + 1,
                    fields.len()
                )));
            };

            let source = decode_field(source)
                .map_err(|e| CjkAnalysisError::configuration(format!("line {}: {e}", index + 1)))?;
            let replacement = decode_field(replacement)
                .map_err(|e| CjkAnalysisError::configuration(format!("line {}: {e}", index + 1)))?;
            pairs.push((source, replacement));
        }

        Self::from_pairs(pairs)
    }

    /// Parse a JSON object of `"variant": "canonical"` members.
    pub fn from_json(text: &str) -> Result<Self> {
        let pairs: BTreeMap<String, String> = serde_json::from_str(text)?;
        Self::from_pairs(pairs)
    }

    /// Load a table through `loader`; ids ending in `.json` are read as JSON,
    /// anything else as a whitespace separated table.
    pub fn load(loader: &dyn ResourceLoader, id: &str) -> Result<Self> {
        let text = loader.open_resource(id)?;
        let map = if id.trim().to_ascii_lowercase().ends_with(".json") {
            Self::from_json(&text).map_err(|e| match e {
                CjkAnalysisError::Json(e) => CjkAnalysisError::configuration(format!(
                    "variant table '{id}' is not valid JSON: {e}"
                )),
                other => other,
            })?
        } else {
            Self::parse_tsv(&text)?
        };
        log::debug!("loaded {} variants from '{}'", map.len(), id);
        Ok(map)
    }

    /// The embedded default table.
    pub fn builtin() -> Result<Self> {
        Self::parse_tsv(BUILTIN_TABLE)
    }

    /// Replacement for `c`, if `c` is a variant.
    #[inline]
    pub fn get(&self, c: char) -> Option<&[char]> {
        self.entries.get(&c).map(|r| &r[..])
    }

    /// Whether any character of `text` is at or above the threshold.
    #[inline]
    pub fn needs_folding(&self, text: &str) -> bool {
        text.chars().any(|c| c as u32 >= self.threshold)
    }

    /// Lowest variant character; anything below it is never folded.
    pub fn threshold(&self) -> Option<char> {
        char::from_u32(self.threshold)
    }

    /// Longest replacement in the table, in characters.
    pub fn max_replacement_len(&self) -> usize {
        self.max_replacement_len
    }

    /// Output characters reserved per input character before folding a token.
    pub fn expansion_factor(&self) -> usize {
        self.max_replacement_len.max(MIN_EXPANSION_FACTOR)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &[char])> {
        self.entries.iter().map(|(&c, r)| (c, &r[..]))
    }
}

/// A literal character sequence, or a single `U+XXXX` / `\uXXXX` code point.
fn decode_field(field: &str) -> std::result::Result<String, String> {
    let Some(caps) = CODE_POINT.captures(field) else {
        return Ok(field.to_string());
    };
    u32::from_str_radix(&caps[1], 16)
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
        .ok_or_else(|| format!("'{field}' is not a valid code point"))
}
