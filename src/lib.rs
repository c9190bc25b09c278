//! Hitomezashi stitch pattern generation and two-color region labeling.
//!
//! The presentation layer owns a [`Session`] (or a bare [`PatternEngine`]),
//! feeds it viewport sizes and edited [`PatternConfig`] values, and draws the
//! returned [`Frame`]s.

mod config;
mod edge;
mod engine;
mod error;
mod frame;
mod labeling;
mod mutate;
mod regions;
mod render;
mod sequence;
mod session;

pub use config::{PatternColors, PatternConfig, MAX_UPDATE_SPEED, MIN_CELL_SIZE};
pub use edge::{horizontal_closed, is_closed, vertical_closed, Axis, EdgeState};
pub use engine::{PatternEngine, DEFAULT_SEED};
pub use error::{PatternError, Result};
pub use frame::{stitch_segments, Frame, GridPoint, StitchSegment};
pub use labeling::{carry_continuity, flood_fill, sweep_labels, Island, LabelGrid};
pub use mutate::{ScrollAxis, SequenceMutator, Step, UpdatePolicy};
pub use regions::{find_islands, IslandMap, IslandRegion};
pub use render::{parse_color, rasterize};
pub use sequence::StitchSequences;
pub use session::{Session, UpdateClock};

use image::RgbaImage;

/// Render a preview of the pattern after `steps` timed updates.
///
/// Updates are spaced so each one fires exactly once regardless of the
/// configured speed; a speed of zero renders the freshly generated pattern.
pub fn preview_pattern(
    config: &PatternConfig,
    viewport_width: u32,
    viewport_height: u32,
    steps: u32,
) -> Result<RgbaImage> {
    log::info!(
        "Rendering preview: {}x{} viewport, {} steps of {}, colored={}",
        viewport_width,
        viewport_height,
        steps,
        config.update_policy.label(),
        config.colored
    );

    let mut session = Session::new(config.clone())?;
    let mut frame = session.frame(viewport_width, viewport_height, 0.0)?;
    let interval = if config.update_speed > 0.0 {
        2.0 / config.update_speed as f64
    } else {
        1.0
    };
    for step in 1..=steps {
        frame = session.frame(viewport_width, viewport_height, step as f64 * interval)?;
    }

    let image = rasterize(&frame, &session.config().colors)?;
    log::info!(
        "Preview rendered: {}x{} cells, generation {}, {} islands",
        frame.width,
        frame.height,
        frame.generation,
        frame
            .island_count
            .map(|count| count.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    Ok(image)
}
