//! Mapping of filtered output positions back to input positions.
//!
//! A [`PositionCorrector`] keeps a table of `(output position, cumulative
//! diff)` pairs, ordered by strictly increasing position. The input position of output
//! position `p` is `p + d`, where `d` is the diff of the last entry at or
//! before `p` (0 if there is none). Positions are counted in characters.
//!
//! Each substitution of `input_len` characters by `output_len` characters is
//! recorded as it is committed:
//!
//! - equal lengths add nothing;
//! - a shrink adds one entry right after the shortened output, so every later
//!   position skips the elided input;
//! - a growth adds one entry per extra output character, so all of the extra
//!   characters map back to the input character that produced them.
//!
//! ```text
//! input   a  両  b          ("両" → "XYZ")
//!         0  1   2
//! output  a  X  Y  Z  b
//!         0  1  2  3  4
//! entries (2, -1) (3, -2)
//! mapped  0  1  1  1  2
//! ```
//!
//! Entries are appended, with one exception: a deletion recorded directly
//! after a growth or a shrink lands on the position of the last entry, which
//! is always the current end of output. That entry's diff is replaced rather
//! than a second entry added. No character has been produced at that position
//! yet, so the mapping of every position already handed out stays fixed.

/// One row of the correction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    /// First output position the diff applies to.
    pub position: usize,
    /// Input position minus output position from `position` onwards.
    pub cumulative_diff: isize,
}

/// Output → input position table for one filter instance.
#[derive(Debug, Clone, Default)]
pub struct PositionCorrector {
    entries: Vec<Correction>,
    /// Output characters recorded so far.
    output_len: usize,
    /// Input characters recorded so far, minus `output_len`.
    cumulative_diff: isize,
}

impl PositionCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `input_len` input characters produced `output_len` output
    /// characters, directly after everything recorded before.
    pub fn record(&mut self, input_len: usize, output_len: usize) {
        let start = self.output_len;
        let diff = self.cumulative_diff;

        if input_len > output_len {
            let shrink = (input_len - output_len) as isize;
            self.push(start + output_len, diff + shrink);
        } else if output_len > input_len {
            let growth = output_len - input_len;
            for i in 1..=growth {
                self.push(start + i, diff - i as isize);
            }
        }

        self.output_len += output_len;
        self.cumulative_diff += input_len as isize - output_len as isize;
    }

    /// Map an output position back to the input position it came from.
    pub fn correct(&self, position: usize) -> usize {
        let idx = self.entries.partition_point(|e| e.position <= position);
        let diff = match idx {
            0 => 0,
            _ => self.entries[idx - 1].cumulative_diff,
        };
        let corrected = position as isize + diff;
        assert!(
            corrected >= 0,
            "position correction produced a negative input position ({corrected}) for {position}"
        );
        corrected as usize
    }

    /// The table, ordered by strictly increasing output position.
    pub fn entries(&self) -> &[Correction] {
        &self.entries
    }

    /// Output characters recorded so far.
    pub fn output_len(&self) -> usize {
        self.output_len
    }

    /// Input characters recorded so far.
    pub fn input_len(&self) -> usize {
        (self.output_len as isize + self.cumulative_diff) as usize
    }

    pub fn cumulative_diff(&self) -> isize {
        self.cumulative_diff
    }

    fn push(&mut self, position: usize, cumulative_diff: isize) {
        match self.entries.last_mut() {
            // Only the entry at the end of output can be revisited.
            Some(last) if last.position == position => {
                assert_eq!(
                    position, self.output_len,
                    "correction entry at {position} rewritten behind the end of output"
                );
                last.cumulative_diff = cumulative_diff;
            }
            Some(last) => {
                assert!(
                    last.position < position,
                    "correction entries out of order: {} after {}",
                    position,
                    last.position
                );
                self.entries.push(Correction {
                    position,
                    cumulative_diff,
                });
            }
            None => self.entries.push(Correction {
                position,
                cumulative_diff,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(corrector: &PositionCorrector) -> Vec<usize> {
        (0..=corrector.output_len())
            .map(|p| corrector.correct(p))
            .collect()
    }

    #[test]
    fn test_length_preserving_adds_no_entries() {
        let mut corrector = PositionCorrector::new();
        corrector.record(3, 3);
        corrector.record(1, 1);

        assert!(corrector.entries().is_empty());
        assert_eq!(mapped(&corrector), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_growth_maps_extra_output_to_its_source() {
        // "a" "両"→"XYZ" "b"
        let mut corrector = PositionCorrector::new();
        corrector.record(1, 1);
        corrector.record(1, 3);
        corrector.record(1, 1);

        assert_eq!(
            corrector.entries(),
            &[
                Correction {
                    position: 2,
                    cumulative_diff: -1
                },
                Correction {
                    position: 3,
                    cumulative_diff: -2
                },
            ]
        );
        assert_eq!(mapped(&corrector), vec![0, 1, 1, 1, 2, 3]);
    }

    #[test]
    fn test_shrink_skips_elided_input() {
        // "x" "e\u{301}"→"é" "y"
        let mut corrector = PositionCorrector::new();
        corrector.record(1, 1);
        corrector.record(2, 1);
        corrector.record(1, 1);

        assert_eq!(corrector.entries().len(), 1);
        assert_eq!(mapped(&corrector), vec![0, 1, 3, 4]);
        assert_eq!(corrector.input_len(), 4);
    }

    #[test]
    fn test_deletion() {
        // "a" "\u{200b}"→"" "b"
        let mut corrector = PositionCorrector::new();
        corrector.record(1, 1);
        corrector.record(1, 0);
        corrector.record(1, 1);

        assert_eq!(mapped(&corrector), vec![0, 2, 3]);
    }

    #[test]
    fn test_insertion_followed_by_deletion_shares_a_position() {
        // ""→"XY" then "z"→"" then "w"
        let mut corrector = PositionCorrector::new();
        corrector.record(0, 2);
        corrector.record(1, 0);
        corrector.record(1, 1);

        let positions: Vec<_> = corrector.entries().iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(mapped(&corrector), vec![0, 0, 1, 2]);
    }

    #[test]
    fn test_produced_positions_never_remap() {
        let edits = [(1, 3), (1, 0), (2, 1), (3, 0), (0, 2), (1, 0), (2, 2), (1, 0)];
        let mut corrector = PositionCorrector::new();
        let mut seen: Vec<usize> = Vec::new();

        for (input, output) in edits {
            corrector.record(input, output);
            // Every position below the end of output keeps its mapping.
            let produced = corrector.output_len();
            assert_eq!(&mapped(&corrector)[..seen.len()], &seen[..]);
            seen = mapped(&corrector)[..produced].to_vec();

            let positions: Vec<_> = corrector.entries().iter().map(|e| e.position).collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
            assert!(positions.iter().all(|&p| p <= produced));
        }
        assert_eq!(corrector.correct(corrector.output_len()), corrector.input_len());
    }

    #[test]
    fn test_mixed_sequence_matches_running_totals() {
        let mut corrector = PositionCorrector::new();
        for (input, output) in [(2, 1), (1, 4), (3, 3), (1, 0), (2, 2)] {
            corrector.record(input, output);
        }

        assert_eq!(corrector.input_len(), 9);
        assert_eq!(corrector.output_len(), 10);
        // End of output maps to end of input.
        assert_eq!(corrector.correct(10), 9);
    }
}
