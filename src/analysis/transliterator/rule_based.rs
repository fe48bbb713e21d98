//! Rule-based transliterator.

use std::fmt;

use ahash::{AHashMap, AHashSet};

use super::rules::RuleSet;
use super::{Transliteration, Transliterator};
use crate::config::Direction;

/// Rewrites text with the rules of a [`RuleSet`].
///
/// At each position the longest rule source that matches wins; characters no
/// rule matches are copied through. Outside a final pass, rewriting stops at
/// the first position whose remaining text is a proper prefix of a longer rule
/// source, since the next chunk could complete that rule.
pub struct RuleBasedTransliterator {
    id: String,
    direction: Direction,
    rules: AHashMap<Box<[char]>, Box<[char]>>,
    /// Proper, non-empty prefixes of every rule source.
    prefixes: AHashSet<Box<[char]>>,
    max_source_len: usize,
}

impl RuleBasedTransliterator {
    pub fn new(rule_set: RuleSet) -> Self {
        let mut rules: AHashMap<Box<[char]>, Box<[char]>> =
            AHashMap::with_capacity(rule_set.len());
        let mut prefixes: AHashSet<Box<[char]>> = AHashSet::new();
        let mut max_source_len = 0;

        for rule in rule_set.rules() {
            if rules.contains_key(rule.source.as_slice()) {
                log::warn!(
                    "rule set '{}': duplicate source '{}', keeping the first rule",
                    rule_set.id(),
                    rule.source.iter().collect::<String>()
                );
                continue;
            }
            for len in 1..rule.source.len() {
                prefixes.insert(Box::from(&rule.source[..len]));
            }
            max_source_len = max_source_len.max(rule.source.len());
            rules.insert(
                rule.source.clone().into_boxed_slice(),
                rule.target.clone().into_boxed_slice(),
            );
        }

        RuleBasedTransliterator {
            id: rule_set.id().to_string(),
            direction: rule_set.direction(),
            rules,
            prefixes,
            max_source_len,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of distinct rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn longest_match(&self, rest: &[char]) -> Option<(usize, &[char])> {
        let longest = self.max_source_len.min(rest.len());
        (1..=longest)
            .rev()
            .find_map(|len| self.rules.get(&rest[..len]).map(|target| (len, &target[..])))
    }

    fn could_extend(&self, rest: &[char]) -> bool {
        rest.len() < self.max_source_len && self.prefixes.contains(rest)
    }
}

impl Transliterator for RuleBasedTransliterator {
    fn id(&self) -> &str {
        &self.id
    }

    fn transliterate(&self, span: &[char], final_pass: bool) -> Transliteration {
        let mut result = Transliteration::with_capacity(span.len());
        let mut pos = 0;

        while pos < span.len() {
            let rest = &span[pos..];
            if !final_pass && self.could_extend(rest) {
                break;
            }
            match self.longest_match(rest) {
                Some((len, target)) => {
                    result.push(len, target);
                    pos += len;
                }
                None => {
                    result.push_unchanged(rest[0]);
                    pos += 1;
                }
            }
        }

        result
    }
}

impl fmt::Debug for RuleBasedTransliterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBasedTransliterator")
            .field("id", &self.id)
            .field("direction", &self.direction)
            .field("rules", &self.rules.len())
            .field("max_source_len", &self.max_source_len)
            .finish()
    }
}
