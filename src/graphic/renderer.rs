//! Feature Graphic Renderer
//! Draws the fixed store listing graphic and writes it out as a PNG.
//!
//! Layout:
//! 1. Near-black background across the full 1024x500 canvas
//! 2. Title centered horizontally in accent green, top edge 150 px down
//! 3. Subtitle centered horizontally in white, top edge 280 px down
//! 4. Accent fade overlay, zero at the top row, ~10% at the bottom row

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::pixelops::interpolate;
use thiserror::Error;

use crate::graphic::font::{FontSet, SizedFont};

// Canvas geometry
const CANVAS_WIDTH: u32 = 1024;
const CANVAS_HEIGHT: u32 = 500;

// Colors (RGB)
const BACKGROUND: Rgb<u8> = Rgb([13, 13, 13]);
const ACCENT_GREEN: Rgb<u8> = Rgb([0, 214, 50]);
const TEXT_WHITE: Rgb<u8> = Rgb([255, 255, 255]);

// Copy
const TITLE: &str = "In The Biz AI";
const SUBTITLE: &str = "Track Shift Earnings, Tips & Taxes with AI";

// Text layout
const TITLE_SIZE: f32 = 72.0;
const SUBTITLE_SIZE: f32 = 36.0;
const TITLE_TOP: i32 = 150;
const SUBTITLE_TOP: i32 = 280;

// The fade overlay peaks at this fraction of the accent color
const OVERLAY_PEAK_OPACITY: f32 = 0.1;

// Output location, relative to the working directory
const OUTPUT_DIR: &str = "store-assets";
const OUTPUT_FILE: &str = "feature-graphic.png";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write graphic: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode graphic: {0}")]
    Image(#[from] image::ImageError),
}

/// Renders the promotional graphic from the fixed layout constants.
pub struct FeatureGraphicRenderer;

impl FeatureGraphicRenderer {
    /// Render the graphic into the fixed `store-assets` directory and
    /// return the path of the written file.
    pub fn render() -> Result<PathBuf, RenderError> {
        Self::render_to(Path::new(OUTPUT_DIR))
    }

    /// Render the graphic into `dir`, creating the directory if missing
    /// and overwriting any previous output.
    pub fn render_to(dir: &Path) -> Result<PathBuf, RenderError> {
        let fonts = FontSet::load(TITLE_SIZE, SUBTITLE_SIZE);
        let img = Self::compose(&fonts);

        fs::create_dir_all(dir)?;
        let path = dir.join(OUTPUT_FILE);
        img.save(&path)?;
        Ok(path)
    }

    fn compose(fonts: &FontSet) -> RgbImage {
        let mut img = ImageBuffer::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);

        Self::draw_centered(&mut img, &fonts.title, TITLE, TITLE_TOP, ACCENT_GREEN);
        Self::draw_centered(&mut img, &fonts.subtitle, SUBTITLE, SUBTITLE_TOP, TEXT_WHITE);
        Self::apply_fade_overlay(&mut img);

        img
    }

    fn draw_centered(img: &mut RgbImage, font: &SizedFont, text: &str, top: i32, color: Rgb<u8>) {
        let x = Self::centered_x(font.measure(text));
        font.draw(img, text, x, top, color);
    }

    fn centered_x(text_width: i32) -> i32 {
        (CANVAS_WIDTH as i32 - text_width) / 2
    }

    /// Blend the accent color into each scan line, strongest at the
    /// bottom. The per-row opacity is quantized to an integer alpha
    /// before blending, so row 0 stays untouched.
    fn apply_fade_overlay(img: &mut RgbImage) {
        let height = img.height();
        for y in 0..height {
            let alpha = (255.0 * (y as f32 / height as f32) * OVERLAY_PEAK_OPACITY) as u8;
            if alpha == 0 {
                continue;
            }
            let weight = f32::from(alpha) / 255.0;
            for x in 0..img.width() {
                let pixel = img.get_pixel_mut(x, y);
                *pixel = interpolate(ACCENT_GREEN, *pixel, weight);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn output_decodes_as_1024x500_rgb() {
        let dir = tempdir().unwrap();
        let path = FeatureGraphicRenderer::render_to(dir.path()).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), CANVAS_WIDTH);
        assert_eq!(img.height(), CANVAS_HEIGHT);
        assert_eq!(img.color(), image::ColorType::Rgb8);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join(OUTPUT_DIR);
        assert!(!nested.exists());

        let path = FeatureGraphicRenderer::render_to(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), OUTPUT_FILE);
    }

    #[test]
    fn rerender_overwrites_previous_output() {
        let dir = tempdir().unwrap();
        let first = FeatureGraphicRenderer::render_to(dir.path()).unwrap();
        let second = FeatureGraphicRenderer::render_to(dir.path()).unwrap();

        assert_eq!(first, second);
        assert!(fs::metadata(&second).unwrap().len() > 0);
    }

    #[test]
    fn titles_center_without_overflow() {
        let fonts = FontSet::load(TITLE_SIZE, SUBTITLE_SIZE);
        for (font, text) in [(&fonts.title, TITLE), (&fonts.subtitle, SUBTITLE)] {
            let width = font.measure(text);
            let x = FeatureGraphicRenderer::centered_x(width);
            assert!(x >= 0, "{text:?} starts off-canvas");
            assert!(
                x + width <= CANVAS_WIDTH as i32,
                "{text:?} overflows the canvas"
            );
        }
    }

    #[test]
    fn overlay_fades_in_toward_bottom() {
        let mut img = ImageBuffer::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);
        FeatureGraphicRenderer::apply_fade_overlay(&mut img);

        // Row 0 computes a zero alpha and stays untouched.
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);

        // The bottom row is tinted toward the accent green, but far from
        // fully opaque.
        let bottom = *img.get_pixel(0, CANVAS_HEIGHT - 1);
        assert!(bottom[1] > BACKGROUND[1]);
        assert!(bottom[1] < ACCENT_GREEN[1]);
    }

    #[test]
    fn title_band_contains_drawn_pixels() {
        let fonts = FontSet::load(TITLE_SIZE, SUBTITLE_SIZE);
        let mut img = ImageBuffer::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);
        FeatureGraphicRenderer::draw_centered(&mut img, &fonts.title, TITLE, TITLE_TOP, ACCENT_GREEN);

        let band = TITLE_TOP as u32..TITLE_TOP as u32 + TITLE_SIZE as u32;
        let drawn = band
            .flat_map(|y| (0..CANVAS_WIDTH).map(move |x| (x, y)))
            .any(|(x, y)| *img.get_pixel(x, y) != BACKGROUND);
        assert!(drawn, "no title pixels landed in the title band");
    }
}
