//! Transliteration char filter.
//!
//! The filter is available in two forms:
//!
//! - [`TransliterateCharFilter`] rewrites a whole string at once and reports
//!   byte-offset [`Transformation`]s, for use in a
//!   [`PipelineAnalyzer`](crate::analysis::analyzer::pipeline::PipelineAnalyzer);
//! - [`TransliterateReader`] pulls from an upstream [`CharRead`] in bounded
//!   chunks and keeps a [`PositionCorrector`] for every character it has
//!   produced.
//!
//! Both produce the same text for the same input, however the reader's
//! upstream splits it.

use std::fmt;
use std::sync::Arc;

use super::offset::PositionCorrector;
use super::reader::{CharRead, check_destination};
use super::{CharFilter, Transformation};
use crate::analysis::transliterator::{Transliteration, Transliterator, transliterator_for};
use crate::config::TransformConfig;
use crate::error::Result;
use crate::resource::ResourceLoader;

/// Characters requested from upstream per fill.
const UPSTREAM_CHUNK: usize = 128;

/// Applies a [`Transliterator`] to text.
///
/// The filter itself is an immutable handle; cloning it shares the
/// transliterator. Every call to [`reader`](Self::reader) starts an
/// independent streaming instance with its own buffers.
#[derive(Clone)]
pub struct TransliterateCharFilter {
    transliterator: Arc<dyn Transliterator>,
}

impl TransliterateCharFilter {
    pub fn new(transliterator: Arc<dyn Transliterator>) -> Self {
        TransliterateCharFilter { transliterator }
    }

    /// Build the filter from its options, resolving the transform through
    /// `loader`.
    ///
    /// Unknown transforms, missing rule resources and malformed rules are
    /// reported here, before any text is read.
    pub fn from_config(config: &TransformConfig, loader: &dyn ResourceLoader) -> Result<Self> {
        let transliterator = transliterator_for(config, loader)?;
        log::debug!(
            "created transliterate char filter (id={}, direction={})",
            transliterator.id(),
            config.direction
        );
        Ok(Self::new(transliterator))
    }

    pub fn transliterator(&self) -> &Arc<dyn Transliterator> {
        &self.transliterator
    }

    /// Start a streaming filter over `upstream`.
    pub fn reader<R: CharRead>(&self, upstream: R) -> TransliterateReader<R> {
        TransliterateReader::new(upstream, Arc::clone(&self.transliterator))
    }
}

impl CharFilter for TransliterateCharFilter {
    fn filter(&self, input: &str) -> (String, Vec<Transformation>) {
        let chars: Vec<char> = input.chars().collect();
        let result = self.transliterator.transliterate(&chars, true);
        assert_eq!(
            result.consumed,
            chars.len(),
            "final pass of '{}' left input unconsumed",
            self.transliterator.id()
        );

        let mut output = String::with_capacity(input.len());
        let mut transformations = Vec::new();
        let mut input_pos = 0;
        let mut output_pos = 0;
        let mut input_byte = 0;

        for edit in &result.edits {
            let source = &chars[input_pos..input_pos + edit.input_len];
            let target = &result.output[output_pos..output_pos + edit.output_len];

            if edit.is_length_preserving() {
                // Record each rewritten character on its own so byte offsets
                // stay exact when widths differ.
                for (&from, &to) in source.iter().zip(target) {
                    let new_byte = output.len();
                    output.push(to);
                    if from != to {
                        transformations.push(Transformation::new(
                            input_byte,
                            input_byte + from.len_utf8(),
                            new_byte,
                            output.len(),
                        ));
                    }
                    input_byte += from.len_utf8();
                }
            } else {
                let source_bytes: usize = source.iter().map(|c| c.len_utf8()).sum();
                let new_byte = output.len();
                output.extend(target);
                transformations.push(Transformation::new(
                    input_byte,
                    input_byte + source_bytes,
                    new_byte,
                    output.len(),
                ));
                input_byte += source_bytes;
            }

            input_pos += edit.input_len;
            output_pos += edit.output_len;
        }

        (output, transformations)
    }

    fn name(&self) -> &'static str {
        "transliterate"
    }
}

impl fmt::Debug for TransliterateCharFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransliterateCharFilter")
            .field("transliterator", &self.transliterator.id())
            .finish()
    }
}

/// Streaming transliteration over an upstream character source.
///
/// Characters move from upstream into a staging buffer, through the
/// transliterator into a result buffer, and from there to the caller. Staged
/// characters the transliterator withholds stay staged until more input
/// arrives or upstream ends, at which point a final pass resolves them.
pub struct TransliterateReader<R> {
    upstream: R,
    transliterator: Arc<dyn Transliterator>,
    /// Read from upstream, not yet committed by the transliterator.
    staging: Vec<char>,
    /// Committed output not yet handed to the caller.
    result: Vec<char>,
    corrector: PositionCorrector,
    fill: Vec<char>,
    input_finished: bool,
}

impl<R: CharRead> TransliterateReader<R> {
    pub fn new(upstream: R, transliterator: Arc<dyn Transliterator>) -> Self {
        TransliterateReader {
            upstream,
            transliterator,
            staging: Vec::with_capacity(UPSTREAM_CHUNK),
            result: Vec::with_capacity(UPSTREAM_CHUNK),
            corrector: PositionCorrector::new(),
            fill: vec!['\0'; UPSTREAM_CHUNK],
            input_finished: false,
        }
    }

    /// Map a position in this reader's output back to the upstream position
    /// of the character that produced it. Both count characters.
    pub fn correct_offset(&self, position: usize) -> usize {
        self.corrector.correct(position)
    }

    pub fn corrector(&self) -> &PositionCorrector {
        &self.corrector
    }

    /// Release the filter and hand back its upstream.
    pub fn into_inner(self) -> R {
        self.upstream
    }

    fn commit(&mut self, transliteration: Transliteration) {
        for edit in &transliteration.edits {
            self.corrector.record(edit.input_len, edit.output_len);
        }
        self.result.extend_from_slice(&transliteration.output);
        self.staging.drain(..transliteration.consumed);
    }
}

impl<R: CharRead> CharRead for TransliterateReader<R> {
    fn read_chars(&mut self, buf: &mut [char]) -> Result<usize> {
        check_destination(buf)?;

        loop {
            if !self.result.is_empty() {
                let n = buf.len().min(self.result.len());
                buf[..n].copy_from_slice(&self.result[..n]);
                self.result.drain(..n);
                return Ok(n);
            }

            if !self.staging.is_empty() {
                let final_pass = self.input_finished;
                let transliteration = self.transliterator.transliterate(&self.staging, final_pass);
                assert!(
                    transliteration.consumed <= self.staging.len(),
                    "'{}' consumed {} of {} staged characters",
                    self.transliterator.id(),
                    transliteration.consumed,
                    self.staging.len()
                );
                assert!(
                    !final_pass || transliteration.consumed == self.staging.len(),
                    "final pass of '{}' left {} characters unconsumed",
                    self.transliterator.id(),
                    self.staging.len() - transliteration.consumed
                );
                log::trace!(
                    "{} pass over {} staged characters: consumed {}, produced {}",
                    if final_pass { "final" } else { "incremental" },
                    self.staging.len(),
                    transliteration.consumed,
                    transliteration.produced()
                );

                let produced = transliteration.produced();
                self.commit(transliteration);
                if produced > 0 {
                    continue;
                }
            }

            if self.input_finished {
                if self.staging.is_empty() {
                    return Ok(0);
                }
                continue;
            }

            let n = self.upstream.read_chars(&mut self.fill)?;
            if n == 0 {
                log::trace!("upstream exhausted with {} staged characters", self.staging.len());
                self.input_finished = true;
            } else {
                self.staging.extend_from_slice(&self.fill[..n]);
            }
        }
    }
}

impl<R> fmt::Debug for TransliterateReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransliterateReader")
            .field("transliterator", &self.transliterator.id())
            .field("staged", &self.staging.len())
            .field("buffered", &self.result.len())
            .field("input_finished", &self.input_finished)
            .finish()
    }
}
