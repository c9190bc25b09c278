use crate::edge::{horizontal_closed, vertical_closed};
use crate::error::{PatternError, Result};
use crate::labeling::{Island, LabelGrid};
use crate::sequence::StitchSequences;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A maximal set of cells connected through open edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IslandRegion {
    pub id: usize,
    pub area: usize,
    /// First cell of the island in row-major order.
    pub origin_x: usize,
    pub origin_y: usize,
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
    pub centroid_x: f32,
    pub centroid_y: f32,
}

impl IslandRegion {
    pub fn label(&self, labels: &LabelGrid) -> Option<Island> {
        labels.get(self.origin_x, self.origin_y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IslandMap {
    pub width: usize,
    pub height: usize,
    pub regions: Vec<IslandRegion>,
    region_ids: Vec<usize>,
}

impl IslandMap {
    pub fn region_at(&self, x: usize, y: usize) -> Option<&IslandRegion> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.regions.get(self.region_ids[y * self.width + x])
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

const NO_REGION: usize = usize::MAX;

pub fn find_islands(sequences: &StitchSequences) -> Result<IslandMap> {
    if !sequences.is_allocated() {
        return Err(PatternError::NotAllocated);
    }
    let width = sequences.width();
    let height = sequences.height();
    let len = width * height;
    let horizontal = sequences.horizontal();
    let vertical = sequences.vertical();

    let mut region_ids = Vec::new();
    region_ids.try_reserve_exact(len)?;
    region_ids.resize(len, NO_REGION);
    let mut regions = Vec::<IslandRegion>::new();
    let mut queue = VecDeque::<usize>::new();
    let mut cells = Vec::<usize>::new();

    for start in 0..len {
        if region_ids[start] != NO_REGION {
            continue;
        }

        let id = regions.len();
        region_ids[start] = id;
        queue.push_back(start);
        cells.clear();

        let mut sum_x = 0.0f64;
        let mut sum_y = 0.0f64;
        let mut min_x = width;
        let mut min_y = height;
        let mut max_x = 0;
        let mut max_y = 0;

        while let Some(idx) = queue.pop_front() {
            cells.push(idx);

            let x = idx % width;
            let y = idx / width;
            sum_x += x as f64 + 0.5;
            sum_y += y as f64 + 0.5;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            let mut enqueue = |n: usize| {
                if region_ids[n] == NO_REGION {
                    region_ids[n] = id;
                    queue.push_back(n);
                }
            };

            if x > 0 && !vertical_closed(horizontal, x - 1, y) {
                enqueue(idx - 1);
            }
            if x + 1 < width && !vertical_closed(horizontal, x, y) {
                enqueue(idx + 1);
            }
            if y > 0 && !horizontal_closed(vertical, x, y - 1) {
                enqueue(idx - width);
            }
            if y + 1 < height && !horizontal_closed(vertical, x, y) {
                enqueue(idx + width);
            }
        }

        let (centroid_x, centroid_y) = pick_island_centroid(width, &cells, sum_x, sum_y);
        regions.push(IslandRegion {
            id,
            area: cells.len(),
            origin_x: start % width,
            origin_y: start / width,
            min_x,
            min_y,
            max_x,
            max_y,
            centroid_x,
            centroid_y,
        });
    }

    Ok(IslandMap {
        width,
        height,
        regions,
        region_ids,
    })
}

/// Mean cell center, or the nearest member cell when the mean falls outside
/// the island (rings and corridors).
fn pick_island_centroid(width: usize, cells: &[usize], sum_x: f64, sum_y: f64) -> (f32, f32) {
    let area = cells.len().max(1) as f64;
    let mean_x = sum_x / area;
    let mean_y = sum_y / area;

    let target = (mean_y.floor() as usize) * width + mean_x.floor() as usize;
    if cells.contains(&target) {
        return (mean_x as f32, mean_y as f32);
    }

    let nearest = cells.iter().copied().min_by(|a, b| {
        let da = distance_sq(width, *a, mean_x, mean_y);
        let db = distance_sq(width, *b, mean_x, mean_y);
        da.total_cmp(&db)
    });
    match nearest {
        Some(idx) => ((idx % width) as f32 + 0.5, (idx / width) as f32 + 0.5),
        None => (mean_x as f32, mean_y as f32),
    }
}

fn distance_sq(width: usize, idx: usize, mean_x: f64, mean_y: f64) -> f64 {
    let cx = (idx % width) as f64 + 0.5;
    let cy = (idx / width) as f64 + 0.5;
    (cx - mean_x) * (cx - mean_x) + (cy - mean_y) * (cy - mean_y)
}
