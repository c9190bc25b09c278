//! The pattern context the presentation layer drives each frame.
//!
//! `PatternEngine` owns the stitch sequences, the mutator with its random
//! source, and the continuity label that keeps region colors stable across
//! incremental updates. Every operation runs to completion on the caller's
//! thread.

use crate::edge::{is_closed, Axis, EdgeState};
use crate::error::{PatternError, Result};
use crate::labeling::{carry_continuity, sweep_labels, Island, LabelGrid};
use crate::mutate::{SequenceMutator, Step, UpdatePolicy};
use crate::sequence::StitchSequences;
use std::time::Instant;

/// Label given to cell `(0, 0)` when there is no previous frame to follow.
pub const DEFAULT_SEED: Island = Island::A;

pub struct PatternEngine {
    width: usize,
    height: usize,
    sequences: StitchSequences,
    mutator: SequenceMutator,
    probabilities: (f64, f64),
    continuity: Option<Island>,
    generation: u64,
}

impl PatternEngine {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            width: 0,
            height: 0,
            sequences: StitchSequences::default(),
            mutator: SequenceMutator::seeded(seed),
            probabilities: (0.5, 0.5),
            continuity: None,
            generation: 0,
        }
    }

    /// Resize the grid. A change reallocates and regenerates both sequences
    /// with the most recently used probabilities.
    ///
    /// Returns `true` when the dimensions changed.
    pub fn set_dimensions(&mut self, width: usize, height: usize) -> Result<bool> {
        if width == 0 || height == 0 {
            return Err(PatternError::InvalidDimensions { width, height });
        }
        if width == self.width && height == self.height && self.sequences.is_allocated() {
            return Ok(false);
        }

        log::info!(
            "Resizing pattern grid: {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.sequences.allocate(width, height)?;
        self.width = width;
        self.height = height;

        let (probability_h, probability_v) = self.probabilities;
        self.regenerate(probability_h, probability_v)?;
        Ok(true)
    }

    /// Probabilities used when a resize forces a regeneration.
    pub fn set_probabilities(&mut self, probability_h: f64, probability_v: f64) -> Result<()> {
        for probability in [probability_h, probability_v] {
            if !(0.0..=1.0).contains(&probability) {
                return Err(PatternError::InvalidProbability(probability));
            }
        }
        self.probabilities = (probability_h, probability_v);
        Ok(())
    }

    /// Redraw both sequences from scratch and forget the continuity label.
    pub fn regenerate(&mut self, probability_h: f64, probability_v: f64) -> Result<()> {
        self.ensure_ready()?;
        let step = self
            .mutator
            .regenerate(&mut self.sequences, probability_h, probability_v)?;
        self.finish_step(step, probability_h, probability_v);
        log::info!(
            "Regenerated {}x{} pattern (p_h={:.2}, p_v={:.2})",
            self.width,
            self.height,
            probability_h,
            probability_v
        );
        Ok(())
    }

    /// Advance the pattern by exactly one step of `policy`.
    pub fn mutate(
        &mut self,
        policy: UpdatePolicy,
        probability_h: f64,
        probability_v: f64,
    ) -> Result<()> {
        if policy == UpdatePolicy::Regenerate {
            return self.regenerate(probability_h, probability_v);
        }
        self.ensure_ready()?;
        let step = self
            .mutator
            .apply(policy, &mut self.sequences, probability_h, probability_v)?;
        self.finish_step(step, probability_h, probability_v);
        log::debug!(
            "Applied {} step, generation {}",
            policy.label(),
            self.generation
        );
        Ok(())
    }

    /// Openness of the segment at `position` along `axis`, at crossing index
    /// `parity`.
    ///
    /// For [`Axis::Vertical`], `position` is the column and `parity` the row;
    /// the segment lies on the right side of that cell. For
    /// [`Axis::Horizontal`], `position` is the row and `parity` the column;
    /// the segment lies below that cell. The last column and row address the
    /// outer border.
    pub fn query_edge(&self, axis: Axis, position: usize, parity: usize) -> Result<EdgeState> {
        self.ensure_ready()?;
        let (bias, x, y) = match axis {
            Axis::Vertical => (self.sequences.horizontal().get(position), position, parity),
            Axis::Horizontal => (self.sequences.vertical().get(position), parity, position),
        };
        let crossing_limit = match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        };
        match bias {
            Some(&bias) if parity < crossing_limit => {
                Ok(EdgeState::from_closed(is_closed(bias, parity)))
            }
            _ => Err(PatternError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            }),
        }
    }

    /// Label every cell, seeding `(0, 0)` from the continuity label.
    ///
    /// Returns `None` without doing any work when coloring is disabled.
    pub fn compute_labels(&mut self, color_enabled: bool) -> Result<Option<LabelGrid>> {
        if !color_enabled {
            return Ok(None);
        }
        self.ensure_ready()?;

        let started = Instant::now();
        let seed = self.continuity.unwrap_or(DEFAULT_SEED);
        let labels = sweep_labels(&self.sequences, seed)?;
        self.continuity = labels.get(0, 0);
        log::debug!(
            "Labeled {}x{} grid in {}us (seed {:?})",
            self.width,
            self.height,
            started.elapsed().as_micros(),
            seed
        );
        Ok(Some(labels))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn sequences(&self) -> &StitchSequences {
        &self.sequences
    }

    pub fn horizontal(&self) -> &[bool] {
        self.sequences.horizontal()
    }

    pub fn vertical(&self) -> &[bool] {
        self.sequences.vertical()
    }

    /// Label `(0, 0)` carried from the last labeling pass, if any.
    pub fn continuity(&self) -> Option<Island> {
        self.continuity
    }

    /// Incremented on every regeneration or mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || !self.sequences.is_allocated() {
            return Err(PatternError::NotAllocated);
        }
        self.sequences.ensure_matches(self.width, self.height)
    }

    fn finish_step(&mut self, step: Step, probability_h: f64, probability_v: f64) {
        self.probabilities = (probability_h, probability_v);
        self.continuity = carry_continuity(step, self.continuity);
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::flood_fill;
    use crate::labeling::tests::assert_two_coloring;

    fn engine(width: usize, height: usize) -> PatternEngine {
        let mut engine = PatternEngine::new(Some(1023));
        engine.set_dimensions(width, height).unwrap();
        engine
    }

    #[test]
    fn operations_before_allocation_fail() {
        let mut engine = PatternEngine::new(Some(1));
        assert_eq!(
            engine.mutate(UpdatePolicy::Scroll, 0.5, 0.5).unwrap_err(),
            PatternError::NotAllocated
        );
        assert_eq!(
            engine.regenerate(0.5, 0.5).unwrap_err(),
            PatternError::NotAllocated
        );
        assert!(engine.query_edge(Axis::Vertical, 0, 0).is_err());
        assert!(engine.compute_labels(true).is_err());
        assert_eq!(engine.compute_labels(false).unwrap(), None);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let mut engine = PatternEngine::new(Some(1));
        assert!(matches!(
            engine.set_dimensions(0, 5),
            Err(PatternError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn resize_reallocates_before_any_query() {
        let mut engine = engine(8, 6);
        assert!(!engine.set_dimensions(8, 6).unwrap());
        assert!(engine.set_dimensions(3, 11).unwrap());

        assert_eq!(engine.horizontal().len(), 3);
        assert_eq!(engine.vertical().len(), 11);
        assert!(engine.query_edge(Axis::Vertical, 2, 10).is_ok());
        assert!(engine.query_edge(Axis::Vertical, 3, 0).is_err());
        assert!(engine.query_edge(Axis::Horizontal, 10, 2).is_ok());
        assert!(engine.query_edge(Axis::Horizontal, 10, 3).is_err());

        let labels = engine.compute_labels(true).unwrap().unwrap();
        assert_eq!((labels.width(), labels.height()), (3, 11));
    }

    #[test]
    fn query_edge_follows_parity_rule() {
        let mut engine = engine(3, 2);
        engine.regenerate(1.0, 0.0).unwrap();

        assert_eq!(engine.query_edge(Axis::Vertical, 0, 0).unwrap(), EdgeState::Closed);
        assert_eq!(engine.query_edge(Axis::Vertical, 0, 1).unwrap(), EdgeState::Open);
        assert_eq!(engine.query_edge(Axis::Horizontal, 1, 0).unwrap(), EdgeState::Open);
        assert_eq!(engine.query_edge(Axis::Horizontal, 1, 1).unwrap(), EdgeState::Closed);
    }

    #[test]
    fn labels_cover_grid_and_match_reference() {
        let mut engine = engine(17, 13);
        for policy in UpdatePolicy::ALL {
            engine.mutate(policy, 0.4, 0.6).unwrap();
            let labels = engine.compute_labels(true).unwrap().unwrap();
            assert_two_coloring(engine.sequences(), &labels);

            let seed = labels.get(0, 0).unwrap();
            let reference = flood_fill(engine.sequences(), (0, 0), seed).unwrap();
            assert_eq!(labels, reference);
        }
    }

    #[test]
    fn regenerate_resets_continuity() {
        let mut engine = engine(5, 5);
        engine.compute_labels(true).unwrap();
        assert_eq!(engine.continuity(), Some(DEFAULT_SEED));

        engine.regenerate(0.5, 0.5).unwrap();
        assert_eq!(engine.continuity(), None);
        let labels = engine.compute_labels(true).unwrap().unwrap();
        assert_eq!(labels.get(0, 0), Some(DEFAULT_SEED));
    }

    #[test]
    fn scroll_keeps_tracked_region_color() {
        let mut engine = engine(4, 4);
        let before = engine.compute_labels(true).unwrap().unwrap();

        engine.mutate(UpdatePolicy::Scroll, 0.5, 0.5).unwrap();
        let after = engine.compute_labels(true).unwrap().unwrap();

        let previous = before.get(0, 0).unwrap();
        let expected = previous.flipped_if(engine.horizontal()[0]);
        assert_eq!(after.get(0, 0), Some(expected));
        assert_eq!(after.get(1, 0), Some(previous));
    }

    #[test]
    fn continuity_composes_across_unlabeled_steps() {
        let mut engine = engine(10, 8);
        let before = engine.compute_labels(true).unwrap().unwrap();

        for _ in 0..3 {
            engine.mutate(UpdatePolicy::Scroll, 0.5, 0.5).unwrap();
        }
        let after = engine.compute_labels(true).unwrap().unwrap();
        for y in 0..8 {
            for x in 0..7 {
                assert_eq!(after.get(x + 3, y), before.get(x, y));
            }
        }
    }

    #[test]
    fn resize_uses_last_probabilities() {
        let mut engine = engine(4, 4);
        engine.regenerate(1.0, 0.0).unwrap();
        engine.set_dimensions(6, 3).unwrap();
        assert!(engine.horizontal().iter().all(|v| *v));
        assert!(engine.vertical().iter().all(|v| !*v));
        assert_eq!(engine.continuity(), None);
    }

    #[test]
    fn invalid_probabilities_are_rejected() {
        let mut engine = engine(4, 4);
        assert_eq!(
            engine.set_probabilities(0.5, -0.1).unwrap_err(),
            PatternError::InvalidProbability(-0.1)
        );
        assert!(engine.mutate(UpdatePolicy::UniformShift, 2.0, 0.5).is_err());
    }

    #[test]
    fn generation_counts_steps() {
        let mut engine = engine(4, 4);
        let start = engine.generation();
        engine.mutate(UpdatePolicy::UniformShift, 0.5, 0.5).unwrap();
        engine.mutate(UpdatePolicy::DiagonalScroll, 0.5, 0.5).unwrap();
        assert_eq!(engine.generation(), start + 2);
    }
}
