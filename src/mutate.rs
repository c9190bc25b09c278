//! Generation and incremental evolution of stitch sequences.

use crate::error::{PatternError, Result};
use crate::sequence::StitchSequences;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How the pattern advances on each update tick.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdatePolicy {
    /// Redraw both sequences from scratch.
    #[default]
    Regenerate,
    /// Shift both sequences by one and draw fresh heads.
    UniformShift,
    /// Shift the horizontal sequence, invert the vertical one.
    Scroll,
    /// Alternate `Scroll` between the two axes.
    DiagonalScroll,
}

impl UpdatePolicy {
    pub const ALL: [UpdatePolicy; 4] = [
        UpdatePolicy::Regenerate,
        UpdatePolicy::UniformShift,
        UpdatePolicy::Scroll,
        UpdatePolicy::DiagonalScroll,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UpdatePolicy::Regenerate => "REGENERATE",
            UpdatePolicy::UniformShift => "SHIFT",
            UpdatePolicy::Scroll => "SCROLL",
            UpdatePolicy::DiagonalScroll => "DIAGONAL SCROLL",
        }
    }
}

/// The sequence that advances during a scroll step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

impl ScrollAxis {
    fn toggled(self) -> Self {
        match self {
            ScrollAxis::Horizontal => ScrollAxis::Vertical,
            ScrollAxis::Vertical => ScrollAxis::Horizontal,
        }
    }
}

/// What a single mutation did, including the entries shifted in at index 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Regenerated,
    UniformShift {
        horizontal_head: bool,
        vertical_head: bool,
    },
    Scroll {
        axis: ScrollAxis,
        head: bool,
    },
}

pub struct SequenceMutator<R = StdRng> {
    rng: R,
    direction: ScrollAxis,
}

impl SequenceMutator<StdRng> {
    /// Mutator backed by `StdRng`, seeded explicitly or from OS entropy.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng)
    }
}

impl<R: Rng> SequenceMutator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            direction: ScrollAxis::Horizontal,
        }
    }

    /// Axis the next `diagonal_scroll` will advance.
    pub fn direction(&self) -> ScrollAxis {
        self.direction
    }

    pub fn apply(
        &mut self,
        policy: UpdatePolicy,
        sequences: &mut StitchSequences,
        probability_h: f64,
        probability_v: f64,
    ) -> Result<Step> {
        match policy {
            UpdatePolicy::Regenerate => self.regenerate(sequences, probability_h, probability_v),
            UpdatePolicy::UniformShift => {
                self.uniform_shift(sequences, probability_h, probability_v)
            }
            UpdatePolicy::Scroll => self.scroll(sequences, probability_h),
            UpdatePolicy::DiagonalScroll => {
                self.diagonal_scroll(sequences, probability_h, probability_v)
            }
        }
    }

    /// Redraw every entry independently.
    pub fn regenerate(
        &mut self,
        sequences: &mut StitchSequences,
        probability_h: f64,
        probability_v: f64,
    ) -> Result<Step> {
        check_ready(sequences, &[probability_h, probability_v])?;

        for entry in sequences.horizontal_mut() {
            *entry = self.rng.gen::<f64>() < probability_h;
        }
        for entry in sequences.vertical_mut() {
            *entry = self.rng.gen::<f64>() < probability_v;
        }
        Ok(Step::Regenerated)
    }

    /// Advance both sequences by one position with fresh heads.
    pub fn uniform_shift(
        &mut self,
        sequences: &mut StitchSequences,
        probability_h: f64,
        probability_v: f64,
    ) -> Result<Step> {
        check_ready(sequences, &[probability_h, probability_v])?;

        let horizontal_head = self.rng.gen::<f64>() < probability_h;
        shift_in(sequences.horizontal_mut(), horizontal_head);
        let vertical_head = self.rng.gen::<f64>() < probability_v;
        shift_in(sequences.vertical_mut(), vertical_head);

        Ok(Step::UniformShift {
            horizontal_head,
            vertical_head,
        })
    }

    /// Advance the horizontal sequence and invert the vertical one.
    pub fn scroll(&mut self, sequences: &mut StitchSequences, probability_h: f64) -> Result<Step> {
        check_ready(sequences, &[probability_h])?;
        Ok(self.scroll_axis(sequences, ScrollAxis::Horizontal, probability_h))
    }

    /// Scroll along the current direction, then toggle the direction.
    pub fn diagonal_scroll(
        &mut self,
        sequences: &mut StitchSequences,
        probability_h: f64,
        probability_v: f64,
    ) -> Result<Step> {
        check_ready(sequences, &[probability_h, probability_v])?;

        let probability = match self.direction {
            ScrollAxis::Horizontal => probability_h,
            ScrollAxis::Vertical => probability_v,
        };
        let step = self.scroll_axis(sequences, self.direction, probability);
        self.direction = self.direction.toggled();
        Ok(step)
    }

    fn scroll_axis(
        &mut self,
        sequences: &mut StitchSequences,
        axis: ScrollAxis,
        probability: f64,
    ) -> Step {
        let head = self.rng.gen::<f64>() < probability;
        match axis {
            ScrollAxis::Horizontal => {
                shift_in(sequences.horizontal_mut(), head);
                invert(sequences.vertical_mut());
            }
            ScrollAxis::Vertical => {
                shift_in(sequences.vertical_mut(), head);
                invert(sequences.horizontal_mut());
            }
        }
        Step::Scroll { axis, head }
    }
}

fn check_ready(sequences: &StitchSequences, probabilities: &[f64]) -> Result<()> {
    if !sequences.is_allocated() {
        return Err(PatternError::NotAllocated);
    }
    for &probability in probabilities {
        if !(0.0..=1.0).contains(&probability) {
            return Err(PatternError::InvalidProbability(probability));
        }
    }
    Ok(())
}

fn shift_in(sequence: &mut [bool], head: bool) {
    sequence.rotate_right(1);
    sequence[0] = head;
}

fn invert(sequence: &mut [bool]) {
    for entry in sequence {
        *entry = !*entry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mutator() -> SequenceMutator {
        SequenceMutator::seeded(Some(1023))
    }

    fn fixture() -> StitchSequences {
        StitchSequences::from_parts(
            vec![true, false, false, true, true],
            vec![false, true, true],
        )
        .unwrap()
    }

    #[test]
    fn regenerate_respects_extreme_probabilities() {
        let mut sequences = StitchSequences::new(16, 9).unwrap();
        let mut mutator = mutator();

        mutator.regenerate(&mut sequences, 1.0, 0.0).unwrap();
        assert!(sequences.horizontal().iter().all(|v| *v));
        assert!(sequences.vertical().iter().all(|v| !*v));
        assert_eq!(sequences.horizontal().len(), 16);
        assert_eq!(sequences.vertical().len(), 9);
    }

    #[test]
    fn regenerate_draws_roughly_at_requested_rate() {
        let mut sequences = StitchSequences::new(10_000, 1).unwrap();
        let mut mutator = mutator();
        mutator.regenerate(&mut sequences, 0.3, 0.5).unwrap();

        let set = sequences.horizontal().iter().filter(|v| **v).count();
        assert!((2_500..3_500).contains(&set), "got {set} set entries");
    }

    #[test]
    fn uniform_shift_moves_entries_toward_high_end() {
        let mut sequences = fixture();
        let before = sequences.clone();
        let step = mutator().uniform_shift(&mut sequences, 1.0, 0.0).unwrap();

        assert_eq!(
            step,
            Step::UniformShift {
                horizontal_head: true,
                vertical_head: false
            }
        );
        assert_eq!(sequences.horizontal().len(), before.horizontal().len());
        assert_eq!(sequences.vertical().len(), before.vertical().len());
        for i in 1..sequences.width() {
            assert_eq!(sequences.horizontal()[i], before.horizontal()[i - 1]);
        }
        for i in 1..sequences.height() {
            assert_eq!(sequences.vertical()[i], before.vertical()[i - 1]);
        }
        assert!(sequences.horizontal()[0]);
        assert!(!sequences.vertical()[0]);
    }

    #[test]
    fn scroll_shifts_horizontal_and_inverts_vertical() {
        let mut sequences = fixture();
        let before = sequences.clone();
        let step = mutator().scroll(&mut sequences, 0.0).unwrap();

        assert_eq!(
            step,
            Step::Scroll {
                axis: ScrollAxis::Horizontal,
                head: false
            }
        );
        assert_eq!(sequences.horizontal(), &[false, true, false, false, true]);
        let inverted: Vec<bool> = before.vertical().iter().map(|v| !v).collect();
        assert_eq!(sequences.vertical(), inverted.as_slice());
    }

    #[test]
    fn diagonal_scroll_alternates_axes() {
        let mut sequences = fixture();
        let mut mutator = mutator();
        assert_eq!(mutator.direction(), ScrollAxis::Horizontal);

        let before = sequences.clone();
        mutator.diagonal_scroll(&mut sequences, 1.0, 1.0).unwrap();
        assert_eq!(mutator.direction(), ScrollAxis::Vertical);
        assert_eq!(&sequences.horizontal()[1..], &before.horizontal()[..4]);
        assert_eq!(sequences.vertical(), &[true, false, false]);

        let before = sequences.clone();
        let step = mutator.diagonal_scroll(&mut sequences, 1.0, 1.0).unwrap();
        assert_eq!(
            step,
            Step::Scroll {
                axis: ScrollAxis::Vertical,
                head: true
            }
        );
        assert_eq!(mutator.direction(), ScrollAxis::Horizontal);
        assert_eq!(&sequences.vertical()[1..], &before.vertical()[..2]);
        let inverted: Vec<bool> = before.horizontal().iter().map(|v| !v).collect();
        assert_eq!(sequences.horizontal(), inverted.as_slice());
    }

    #[test]
    fn single_entry_sequences_shift_cleanly() {
        let mut sequences = StitchSequences::from_parts(vec![false], vec![true]).unwrap();
        mutator().uniform_shift(&mut sequences, 1.0, 0.0).unwrap();
        assert_eq!(sequences.horizontal(), &[true]);
        assert_eq!(sequences.vertical(), &[false]);
    }

    #[test]
    fn mutating_unallocated_store_fails() {
        let mut sequences = StitchSequences::default();
        let mut mutator = mutator();
        for policy in UpdatePolicy::ALL {
            let err = mutator.apply(policy, &mut sequences, 0.5, 0.5).unwrap_err();
            assert_eq!(err, PatternError::NotAllocated);
        }
    }

    #[test]
    fn out_of_range_probability_fails() {
        let mut sequences = fixture();
        let before = sequences.clone();
        let err = mutator().scroll(&mut sequences, 1.5).unwrap_err();
        assert_eq!(err, PatternError::InvalidProbability(1.5));
        assert!(mutator().regenerate(&mut sequences, f64::NAN, 0.5).is_err());
        assert_eq!(sequences, before);
    }
}
