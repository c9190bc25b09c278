//! Storage for the two stitch sequences that drive a hitomezashi pattern.
//!
//! The horizontal sequence has one entry per grid column and the vertical
//! sequence one entry per grid row. Both are always replaced together so a
//! reader never sees a half-resized snapshot.

use crate::error::{PatternError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StitchSequences {
    width: usize,
    height: usize,
    horizontal: Vec<bool>,
    vertical: Vec<bool>,
}

impl StitchSequences {
    /// Allocate a `width x height` pair of sequences, all entries `false`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let mut sequences = Self::default();
        sequences.allocate(width, height)?;
        Ok(sequences)
    }

    /// Build sequences from explicit contents. Grid dimensions follow the lengths.
    pub fn from_parts(horizontal: Vec<bool>, vertical: Vec<bool>) -> Result<Self> {
        if horizontal.is_empty() || vertical.is_empty() {
            return Err(PatternError::InvalidDimensions {
                width: horizontal.len(),
                height: vertical.len(),
            });
        }
        Ok(Self {
            width: horizontal.len(),
            height: vertical.len(),
            horizontal,
            vertical,
        })
    }

    /// Replace both sequences with fresh buffers of the given lengths.
    ///
    /// The previous buffers are dropped as a whole. On failure the store is
    /// left untouched.
    pub fn allocate(&mut self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(PatternError::InvalidDimensions { width, height });
        }

        let horizontal = fresh_buffer(width)?;
        let vertical = fresh_buffer(height)?;

        self.width = width;
        self.height = height;
        self.horizontal = horizontal;
        self.vertical = vertical;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_allocated(&self) -> bool {
        !self.horizontal.is_empty() && !self.vertical.is_empty()
    }

    pub fn horizontal(&self) -> &[bool] {
        &self.horizontal
    }

    pub fn vertical(&self) -> &[bool] {
        &self.vertical
    }

    pub(crate) fn horizontal_mut(&mut self) -> &mut [bool] {
        &mut self.horizontal
    }

    pub(crate) fn vertical_mut(&mut self) -> &mut [bool] {
        &mut self.vertical
    }

    /// Check that the stored buffers match `width x height`.
    pub fn ensure_matches(&self, width: usize, height: usize) -> Result<()> {
        if self.horizontal.len() != width || self.vertical.len() != height {
            return Err(PatternError::DimensionMismatch {
                width,
                height,
                horizontal: self.horizontal.len(),
                vertical: self.vertical.len(),
            });
        }
        Ok(())
    }
}

fn fresh_buffer(len: usize) -> Result<Vec<bool>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    buffer.resize(len, false);
    Ok(buffer)
}
