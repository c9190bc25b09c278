//! Headless preview rasterizer for [`Frame`] snapshots.

use crate::config::PatternColors;
use crate::error::{PatternError, Result};
use crate::frame::Frame;
use crate::labeling::Island;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use palette::Srgb;
use rayon::prelude::*;
use std::str::FromStr;

/// Parse `#RRGGBB` (or `#RGB`) into an opaque pixel.
pub fn parse_color(hex: &str) -> Result<Rgba<u8>> {
    let color = Srgb::<u8>::from_str(hex.trim())
        .map_err(|err| PatternError::Config(format!("Invalid color {hex:?}: {err}")))?;
    let (r, g, b) = color.into_components();
    Ok(Rgba([r, g, b, 255]))
}

/// Draw the frame: cell fills first, then stitches on top.
///
/// The image is one pixel wider and taller than the grid so stitches on the
/// right and bottom border stay visible.
pub fn rasterize(frame: &Frame, colors: &PatternColors) -> Result<RgbaImage> {
    if frame.width == 0 || frame.height == 0 || frame.cell_size == 0 {
        return Err(PatternError::InvalidDimensions {
            width: frame.width,
            height: frame.height,
        });
    }

    let background = parse_color(&colors.background)?;
    let stitch = parse_color(&colors.stitch)?;
    let island_a = parse_color(&colors.island_a)?;
    let island_b = parse_color(&colors.island_b)?;

    let image_width = frame.pixel_width() + 1;
    let image_height = frame.pixel_height() + 1;
    let cell = frame.cell_size as usize;
    let mut image = RgbaImage::new(image_width, image_height);

    let buffer: &mut [u8] = &mut image;
    buffer
        .par_chunks_mut(image_width as usize * 4)
        .enumerate()
        .for_each(|(py, row)| {
            let cy = py / cell;
            for (px, pixel) in row.chunks_exact_mut(4).enumerate() {
                let fill = match frame.labels.as_ref().and_then(|l| l.get(px / cell, cy)) {
                    Some(Island::A) => island_a,
                    Some(Island::B) => island_b,
                    None => background,
                };
                pixel.copy_from_slice(&fill.0);
            }
        });

    for segment in &frame.stitches {
        draw_line_segment_mut(
            &mut image,
            (segment.from.x as f32, segment.from.y as f32),
            (segment.to.x as f32, segment.to.y as f32),
            stitch,
        );
    }

    log::debug!(
        "Rasterized {}x{} preview with {} stitches",
        image_width,
        image_height,
        frame.stitches.len()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PatternEngine;

    fn frame(colored: bool) -> Frame {
        let mut engine = PatternEngine::new(Some(1023));
        engine.set_dimensions(4, 3).unwrap();
        engine.regenerate(1.0, 0.0).unwrap();
        let labels = engine.compute_labels(colored).unwrap();
        Frame::capture(&engine, 10, labels).unwrap()
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_color("#FF8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert_eq!(parse_color(" 000000 ").unwrap(), Rgba([0, 0, 0, 255]));
        assert!(matches!(parse_color("#GG0000"), Err(PatternError::Config(_))));
    }

    #[test]
    fn plain_frame_uses_background_and_stitches() {
        let colors = PatternColors::default();
        let image = rasterize(&frame(false), &colors).unwrap();
        assert_eq!(image.dimensions(), (41, 31));

        let background = parse_color(&colors.background).unwrap();
        let stitch = parse_color(&colors.stitch).unwrap();
        assert_eq!(*image.get_pixel(5, 5), background);
        // horizontal[0] is set, so row 0 is stitched right of cell (0, 0).
        assert_eq!(*image.get_pixel(10, 5), stitch);
        // ...and row 1 is open there.
        assert_eq!(*image.get_pixel(10, 15), background);
    }

    #[test]
    fn colored_frame_fills_cells_by_label() {
        let colors = PatternColors::default();
        let frame = frame(true);
        let labels = frame.labels.clone().unwrap();
        let image = rasterize(&frame, &colors).unwrap();

        let a = parse_color(&colors.island_a).unwrap();
        let b = parse_color(&colors.island_b).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                let expected = match labels.get(x, y).unwrap() {
                    Island::A => a,
                    Island::B => b,
                };
                let pixel = *image.get_pixel(x as u32 * 10 + 5, y as u32 * 10 + 5);
                assert_eq!(pixel, expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn bad_palette_is_reported() {
        let colors = PatternColors {
            stitch: "black".to_string(),
            ..PatternColors::default()
        };
        assert!(rasterize(&frame(false), &colors).is_err());
    }
}
