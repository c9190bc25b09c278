//! Immutable per-frame snapshot handed to the presentation layer.

use crate::edge::{horizontal_closed, vertical_closed};
use crate::engine::PatternEngine;
use crate::error::Result;
use crate::labeling::LabelGrid;
use crate::regions::find_islands;
use crate::sequence::StitchSequences;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

/// A closed edge in pixel space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchSegment {
    pub from: GridPoint,
    pub to: GridPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub cell_size: u32,
    pub generation: u64,
    pub stitches: Vec<StitchSegment>,
    pub labels: Option<LabelGrid>,
    pub island_count: Option<usize>,
}

impl Frame {
    /// Snapshot the engine. Islands are only counted when labels are present.
    pub fn capture(
        engine: &PatternEngine,
        cell_size: u32,
        labels: Option<LabelGrid>,
    ) -> Result<Self> {
        let island_count = match labels {
            Some(_) => Some(find_islands(engine.sequences())?.len()),
            None => None,
        };
        Ok(Self {
            width: engine.width(),
            height: engine.height(),
            cell_size,
            generation: engine.generation(),
            stitches: stitch_segments(engine.sequences(), cell_size),
            labels,
            island_count,
        })
    }

    pub fn pixel_width(&self) -> u32 {
        self.width as u32 * self.cell_size
    }

    pub fn pixel_height(&self) -> u32 {
        self.height as u32 * self.cell_size
    }
}

/// Every closed segment, including those on the right and bottom border.
pub fn stitch_segments(sequences: &StitchSequences, cell_size: u32) -> Vec<StitchSegment> {
    let cell = cell_size as i32;
    let horizontal = sequences.horizontal();
    let vertical = sequences.vertical();
    let mut segments = Vec::new();

    for x in 0..sequences.width() {
        let px = (x as i32 + 1) * cell;
        for y in 0..sequences.height() {
            if vertical_closed(horizontal, x, y) {
                let py = y as i32 * cell;
                segments.push(StitchSegment {
                    from: GridPoint { x: px, y: py },
                    to: GridPoint { x: px, y: py + cell },
                });
            }
        }
    }

    for y in 0..sequences.height() {
        let py = (y as i32 + 1) * cell;
        for x in 0..sequences.width() {
            if horizontal_closed(vertical, x, y) {
                let px = x as i32 * cell;
                segments.push(StitchSegment {
                    from: GridPoint { x: px, y: py },
                    to: GridPoint { x: px + cell, y: py },
                });
            }
        }
    }

    segments
}
