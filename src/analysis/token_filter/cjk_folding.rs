//! CJK folding filter implementation.
//!
//! Rewrites every variant character of a token into its canonical form, as
//! given by a [`VariantMap`]. Each token is folded on its own: a replacement
//! never spans or moves a token boundary, and token order, count, positions
//! and offsets are left as they were.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use cjk_analysis::analysis::token::Token;
//! use cjk_analysis::analysis::token_filter::cjk_folding::TokenFolder;
//! use cjk_analysis::analysis::variant_map::VariantMap;
//!
//! let mut folder = TokenFolder::new(Arc::new(VariantMap::builtin().unwrap()));
//!
//! let mut token = Token::new("両", 0);
//! assert!(folder.fold(&mut token));
//! assert_eq!(token.text, "兩");
//! ```

use std::sync::Arc;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::analysis::variant_map::VariantMap;
use crate::config::FoldingConfig;
use crate::error::Result;
use crate::resource::ResourceLoader;

/// Reusable output buffer for folding.
///
/// Capacity grows geometrically and is never released, so a folder that has
/// seen its longest token stops allocating.
#[derive(Debug, Default)]
pub struct FoldBuffer {
    chars: Vec<char>,
}

impl FoldBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FoldBuffer {
            chars: Vec::with_capacity(capacity),
        }
    }

    /// Make room for at least `min_capacity` characters, at least doubling
    /// the current capacity when it has to grow.
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        let capacity = self.chars.capacity();
        if min_capacity <= capacity {
            return;
        }
        let target = min_capacity.max(capacity.saturating_mul(2));
        self.chars.reserve_exact(target - self.chars.len());
    }

    pub fn capacity(&self) -> usize {
        self.chars.capacity()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Drop the contents, keeping the capacity.
    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    pub fn extend_from_slice(&mut self, chars: &[char]) {
        self.chars.extend_from_slice(chars);
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}

/// Folds tokens one at a time through a shared [`VariantMap`].
///
/// A folder owns its buffer and is meant for a single token stream; the map is
/// shared.
#[derive(Debug)]
pub struct TokenFolder {
    map: Arc<VariantMap>,
    buffer: FoldBuffer,
}

impl TokenFolder {
    pub fn new(map: Arc<VariantMap>) -> Self {
        TokenFolder {
            map,
            buffer: FoldBuffer::new(),
        }
    }

    /// Fold `token` in place and report whether its text changed.
    ///
    /// A token with no character at or above the map's threshold is left
    /// untouched, including its allocation.
    pub fn fold(&mut self, token: &mut Token) -> bool {
        if !self.map.needs_folding(&token.text) {
            return false;
        }

        let char_len = token.text.chars().count();
        self.buffer.clear();
        self.buffer
            .ensure_capacity(char_len.saturating_mul(self.map.expansion_factor()));

        let mut changed = false;
        for c in token.text.chars() {
            match self.map.get(c) {
                Some(replacement) => {
                    self.buffer.extend_from_slice(replacement);
                    changed = true;
                }
                None => self.buffer.push(c),
            }
        }

        if changed {
            token.text.clear();
            token.text.extend(self.buffer.as_slice());
        }
        changed
    }

    pub fn buffer(&self) -> &FoldBuffer {
        &self.buffer
    }

    pub fn variant_map(&self) -> &Arc<VariantMap> {
        &self.map
    }
}

/// A filter that folds variant Han characters to their canonical forms.
///
/// # Behavior
///
/// - Folds every character found in the variant map
/// - Skips tokens marked as stopped
/// - Preserves token positions and offsets
/// - Leaves tokens below the map's threshold untouched
///
/// # Examples
///
/// ```
/// use cjk_analysis::analysis::token_filter::Filter;
/// use cjk_analysis::analysis::token_filter::cjk_folding::CjkFoldingFilter;
/// use cjk_analysis::analysis::token::Token;
///
/// let filter = CjkFoldingFilter::builtin().unwrap();
/// let tokens = vec![Token::new("亜", 0), Token::new("黒", 1)];
///
/// let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .collect();
///
/// assert_eq!(result[0].text, "亞");
/// assert_eq!(result[1].text, "黑");
/// ```
#[derive(Clone, Debug)]
pub struct CjkFoldingFilter {
    map: Arc<VariantMap>,
}

impl CjkFoldingFilter {
    pub fn new(map: Arc<VariantMap>) -> Self {
        CjkFoldingFilter { map }
    }

    /// Create a filter over the embedded default table.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(VariantMap::builtin()?)))
    }

    /// Build the filter from its options, loading a custom table through
    /// `loader` when one is named.
    pub fn from_config(config: &FoldingConfig, loader: &dyn ResourceLoader) -> Result<Self> {
        let map = match &config.resource {
            Some(id) => VariantMap::load(loader, id)?,
            None => VariantMap::builtin()?,
        };
        log::debug!(
            "created cjk folding filter ({} variants, threshold {:?})",
            map.len(),
            map.threshold()
        );
        Ok(Self::new(Arc::new(map)))
    }

    pub fn variant_map(&self) -> &Arc<VariantMap> {
        &self.map
    }
}

impl Filter for CjkFoldingFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(FoldingTokenStream {
            tokens,
            folder: TokenFolder::new(Arc::clone(&self.map)),
        }))
    }

    fn name(&self) -> &'static str {
        "cjk_folding"
    }
}

/// Folds tokens as they are pulled, reusing one buffer for the whole stream.
struct FoldingTokenStream {
    tokens: TokenStream,
    folder: TokenFolder,
}

impl Iterator for FoldingTokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut token = self.tokens.next()?;
        if !token.is_stopped() {
            self.folder.fold(&mut token);
        }
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tokens.size_hint()
    }
}
