//! Two-color labeling of the cells of a hitomezashi grid.
//!
//! Crossing an open edge keeps the label and crossing a stitch flips it. The
//! stitch rule guarantees every unit square of edges flips an even number of
//! times, so the labeling is path independent and a single row-major sweep
//! gives the same answer as a flood fill.

use crate::edge::{horizontal_closed, vertical_closed};
use crate::error::{PatternError, Result};
use crate::mutate::Step;
use crate::sequence::StitchSequences;
use serde::{Deserialize, Serialize};

/// One of the two region colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Island {
    A,
    B,
}

impl Island {
    /// The partner label. Applying it twice returns the original.
    pub fn flipped(self) -> Self {
        match self {
            Island::A => Island::B,
            Island::B => Island::A,
        }
    }

    #[inline]
    pub fn flipped_if(self, flip: bool) -> Self {
        if flip {
            self.flipped()
        } else {
            self
        }
    }
}

/// Per-cell labels for a `width x height` grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelGrid {
    width: usize,
    height: usize,
    cells: Vec<Island>,
}

impl LabelGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Island> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    pub fn cells(&self) -> &[Island] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Island]> {
        self.cells.chunks(self.width)
    }

    pub fn count(&self, island: Island) -> usize {
        self.cells.iter().filter(|cell| **cell == island).count()
    }

    /// The same partition with the two labels swapped.
    pub fn flipped(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(|cell| cell.flipped()).collect(),
        }
    }
}

/// Reference labeler: work-list flood fill from `start`.
///
/// A cell is labeled when it is first discovered and never revisited, so the
/// work-list holds at most one entry per cell.
pub fn flood_fill(
    sequences: &StitchSequences,
    start: (usize, usize),
    start_label: Island,
) -> Result<LabelGrid> {
    let width = sequences.width();
    let height = sequences.height();
    if !sequences.is_allocated() {
        return Err(PatternError::NotAllocated);
    }
    let (sx, sy) = start;
    if sx >= width || sy >= height {
        return Err(PatternError::OutOfBounds {
            x: sx,
            y: sy,
            width,
            height,
        });
    }

    let len = width * height;
    let horizontal = sequences.horizontal();
    let vertical = sequences.vertical();

    let mut labels: Vec<Option<Island>> = Vec::new();
    labels.try_reserve_exact(len)?;
    labels.resize(len, None);
    let mut pending = Vec::<usize>::new();
    pending.try_reserve(len)?;

    let start_idx = sy * width + sx;
    labels[start_idx] = Some(start_label);
    pending.push(start_idx);

    while let Some(idx) = pending.pop() {
        let Some(label) = labels[idx] else {
            continue;
        };
        let x = idx % width;
        let y = idx / width;

        let mut visit = |n: usize, closed: bool| {
            if labels[n].is_none() {
                labels[n] = Some(label.flipped_if(closed));
                pending.push(n);
            }
        };

        if x > 0 {
            visit(idx - 1, vertical_closed(horizontal, x - 1, y));
        }
        if x + 1 < width {
            visit(idx + 1, vertical_closed(horizontal, x, y));
        }
        if y > 0 {
            visit(idx - width, horizontal_closed(vertical, x, y - 1));
        }
        if y + 1 < height {
            visit(idx + width, horizontal_closed(vertical, x, y));
        }
    }

    // Every cell is four-connected to the start, so nothing stays unset.
    debug_assert!(labels.iter().all(Option::is_some));
    let cells = labels
        .into_iter()
        .map(|cell| cell.unwrap_or(start_label))
        .collect();

    Ok(LabelGrid {
        width,
        height,
        cells,
    })
}

/// Production labeler: single row-major sweep seeded at `(0, 0)`.
pub fn sweep_labels(sequences: &StitchSequences, seed: Island) -> Result<LabelGrid> {
    let width = sequences.width();
    let height = sequences.height();
    if !sequences.is_allocated() {
        return Err(PatternError::NotAllocated);
    }

    let horizontal = sequences.horizontal();
    let vertical = sequences.vertical();

    let mut cells = Vec::new();
    cells.try_reserve_exact(width * height)?;

    let mut row_start = seed;
    for y in 0..height {
        if y > 0 {
            row_start = row_start.flipped_if(horizontal_closed(vertical, 0, y - 1));
        }
        let mut current = row_start;
        cells.push(current);
        for x in 1..width {
            current = current.flipped_if(vertical_closed(horizontal, x - 1, y));
            cells.push(current);
        }
    }

    Ok(LabelGrid {
        width,
        height,
        cells,
    })
}

/// Derive the `(0, 0)` label after `step` from the label it had before.
///
/// Scroll steps translate the whole pattern by one cell, so the previous
/// origin cell now sits at `(1, 0)` or `(0, 1)` and the new origin is one
/// edge away from it. A uniform shift moves the old origin to `(1, 1)` and
/// inverts every stitch; the new origin is two edges away. Regeneration has
/// no correspondence with the previous frame.
pub fn carry_continuity(step: Step, previous: Option<Island>) -> Option<Island> {
    match step {
        Step::Regenerated => None,
        Step::Scroll { head, .. } => previous.map(|label| label.flipped_if(head)),
        Step::UniformShift {
            horizontal_head,
            vertical_head,
        } => previous.map(|label| label.flipped_if(horizontal_head ^ !vertical_head)),
    }
}
