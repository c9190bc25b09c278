//! Edge openness rule for hitomezashi grids.
//!
//! A vertical grid-line segment separates cells `(x, y)` and `(x + 1, y)` and
//! is governed by `horizontal[x]` and the parity of `y`. A horizontal segment
//! separates `(x, y)` and `(x, y + 1)` and is governed by `vertical[y]` and
//! the parity of `x`. Flipping the parity moves the stitch by one cell, which
//! gives the characteristic running-stitch look.

use serde::{Deserialize, Serialize};

/// Orientation of a grid-line segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// Segment at a column boundary, indexed by column then row.
    Vertical,
    /// Segment at a row boundary, indexed by row then column.
    Horizontal,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeState {
    Open,
    Closed,
}

impl EdgeState {
    pub fn from_closed(closed: bool) -> Self {
        if closed {
            EdgeState::Closed
        } else {
            EdgeState::Open
        }
    }

    pub fn is_closed(self) -> bool {
        self == EdgeState::Closed
    }
}

/// Whether the segment driven by `bias` is stitched at a crossing index with
/// the given parity.
#[inline]
pub fn is_closed(bias: bool, crossing: usize) -> bool {
    bias ^ (crossing % 2 == 1)
}

/// Segment between `(x, y)` and `(x + 1, y)`.
#[inline]
pub fn vertical_closed(horizontal: &[bool], x: usize, y: usize) -> bool {
    is_closed(horizontal[x], y)
}

/// Segment between `(x, y)` and `(x, y + 1)`.
#[inline]
pub fn horizontal_closed(vertical: &[bool], x: usize, y: usize) -> bool {
    is_closed(vertical[y], x)
}
