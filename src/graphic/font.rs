//! Font loading and text drawing.
//!
//! Prefers a scalable TrueType face found on the host; when none of the
//! candidate files can be located or parsed, falls back to a built-in
//! 5x7 bitmap face so rendering always succeeds.

use image::{Rgb, RgbImage};
use imageproc::pixelops::interpolate;
use log::{debug, warn};
use rusttype::{point, Font, Scale};

/// Candidate scalable fonts, probed in order.
const FONT_CANDIDATES: &[&str] = &[
    // A font dropped into the working directory wins.
    "arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    // macOS
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

// Built-in face geometry: 5x7 glyph cells plus one blank column between
// characters, on an 8 px nominal line.
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;
const GLYPH_LINE: u32 = GLYPH_HEIGHT + 1;
const FIRST_GLYPH: char = ' ';

#[derive(Clone)]
enum FontFace {
    Scalable(Font<'static>),
    Builtin,
}

/// A drawing face bound to a pixel size.
pub struct SizedFont {
    face: FontFace,
    size: f32,
}

impl SizedFont {
    /// Width in pixels of `text` as this face renders it.
    pub fn measure(&self, text: &str) -> i32 {
        match &self.face {
            FontFace::Scalable(font) => {
                let scale = Scale::uniform(self.size);
                let v_metrics = font.v_metrics(scale);
                let mut width = 0;
                for glyph in font.layout(text, scale, point(0.0, v_metrics.ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        width = width.max(bb.max.x);
                    }
                }
                width
            }
            FontFace::Builtin => {
                let chars = text.chars().count() as u32;
                if chars == 0 {
                    return 0;
                }
                // Drop the trailing inter-character gap.
                ((chars * GLYPH_ADVANCE - 1) * self.cell()) as i32
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y), blending glyph
    /// coverage against the pixels beneath. Pixels outside the buffer
    /// are clipped.
    pub fn draw(&self, img: &mut RgbImage, text: &str, x: i32, y: i32, color: Rgb<u8>) {
        match &self.face {
            FontFace::Scalable(font) => {
                Self::draw_scalable(img, font, self.size, text, x, y, color)
            }
            FontFace::Builtin => self.draw_builtin(img, text, x, y, color),
        }
    }

    /// Integer magnification applied to the 5x7 cells for this size.
    fn cell(&self) -> u32 {
        ((self.size / GLYPH_LINE as f32) as u32).max(1)
    }

    fn draw_scalable(
        img: &mut RgbImage,
        font: &Font<'static>,
        size: f32,
        text: &str,
        x: i32,
        y: i32,
        color: Rgb<u8>,
    ) {
        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        for glyph in font.layout(text, scale, point(x as f32, y as f32 + v_metrics.ascent)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let px = bb.min.x + gx as i32;
                    let py = bb.min.y + gy as i32;
                    if coverage > 0.0
                        && px >= 0
                        && py >= 0
                        && (px as u32) < img.width()
                        && (py as u32) < img.height()
                    {
                        let pixel = img.get_pixel_mut(px as u32, py as u32);
                        *pixel = interpolate(color, *pixel, coverage);
                    }
                });
            }
        }
    }

    fn draw_builtin(&self, img: &mut RgbImage, text: &str, x: i32, y: i32, color: Rgb<u8>) {
        let cell = self.cell() as i32;
        let mut pen_x = x;
        for c in text.chars() {
            if let Some(columns) = builtin_glyph(c) {
                for (col, bits) in columns.iter().enumerate() {
                    for row in 0..GLYPH_HEIGHT {
                        if bits & (1 << row) != 0 {
                            fill_cell(
                                img,
                                pen_x + col as i32 * cell,
                                y + row as i32 * cell,
                                cell,
                                color,
                            );
                        }
                    }
                }
            }
            pen_x += GLYPH_ADVANCE as i32 * cell;
        }
    }
}

/// The title and subtitle faces used by the renderer.
pub struct FontSet {
    pub title: SizedFont,
    pub subtitle: SizedFont,
}

impl FontSet {
    /// Resolve the drawing faces at the given pixel sizes. Never fails:
    /// when no scalable font loads, both faces use the built-in bitmap
    /// face.
    pub fn load(title_size: f32, subtitle_size: f32) -> Self {
        let face = match load_scalable() {
            Some(font) => FontFace::Scalable(font),
            None => {
                warn!("no scalable font found, using the built-in bitmap face");
                FontFace::Builtin
            }
        };
        FontSet {
            title: SizedFont {
                face: face.clone(),
                size: title_size,
            },
            subtitle: SizedFont {
                face,
                size: subtitle_size,
            },
        }
    }
}

fn load_scalable() -> Option<Font<'static>> {
    for path in FONT_CANDIDATES {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match Font::try_from_vec(bytes) {
            Some(font) => {
                debug!("using scalable font {path}");
                return Some(font);
            }
            None => warn!("{path} exists but did not parse as a font"),
        }
    }
    None
}

fn builtin_glyph(c: char) -> Option<&'static [u8; 5]> {
    let idx = (c as usize).checked_sub(FIRST_GLYPH as usize)?;
    GLYPHS.get(idx)
}

fn fill_cell(img: &mut RgbImage, x: i32, y: i32, cell: i32, color: Rgb<u8>) {
    for dy in 0..cell {
        for dx in 0..cell {
            let px = x + dx;
            let py = y + dy;
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Classic 5x7 column bitmaps for the printable ASCII range, least
/// significant bit at the top row.
#[rustfmt::skip]
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '\''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x00, 0x08, 0x14, 0x22, 0x41], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x41, 0x22, 0x14, 0x08, 0x00], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x01, 0x01], // 'F'
    [0x3E, 0x41, 0x41, 0x51, 0x32], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x03, 0x04, 0x78, 0x04, 0x03], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x00, 0x7F, 0x41, 0x41], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x00, 0x7F, 0x10, 0x28, 0x44], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x08, 0x08, 0x2A, 0x1C, 0x08], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(size: f32) -> SizedFont {
        SizedFont {
            face: FontFace::Builtin,
            size,
        }
    }

    #[test]
    fn builtin_measure_grows_with_length() {
        let font = builtin(36.0);
        assert_eq!(font.measure(""), 0);
        let short = font.measure("AI");
        let long = font.measure("In The Biz AI");
        assert!(short > 0);
        assert!(long > short);
    }

    #[test]
    fn builtin_measure_uses_integer_cells() {
        // 36 px over the 8 px nominal line magnifies cells 4x.
        let font = builtin(36.0);
        assert_eq!(font.cell(), 4);
        assert_eq!(font.measure("AB"), ((2 * GLYPH_ADVANCE - 1) * 4) as i32);
    }

    #[test]
    fn builtin_cell_never_below_one() {
        assert_eq!(builtin(4.0).cell(), 1);
    }

    #[test]
    fn builtin_draw_clips_at_edges() {
        let mut img = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
        let font = builtin(72.0);
        // Glyphs extend far past the 20x20 buffer in every direction.
        font.draw(&mut img, "W", -30, -30, Rgb([255, 255, 255]));
        font.draw(&mut img, "W", 15, 15, Rgb([255, 255, 255]));
    }

    #[test]
    fn glyph_table_covers_printable_ascii() {
        assert!(builtin_glyph(' ').is_some());
        assert!(builtin_glyph('~').is_some());
        assert!(builtin_glyph('&').is_some());
        assert!(builtin_glyph('\n').is_none());
        assert!(builtin_glyph('é').is_none());
    }

    #[test]
    fn load_measures_fixed_strings_under_any_face() {
        // Whether the host has a scalable font or not, both faces must
        // produce a usable width for the rendered copy.
        let fonts = FontSet::load(72.0, 36.0);
        assert!(fonts.title.measure("In The Biz AI") > 0);
        assert!(fonts.subtitle.measure("Track Shift Earnings, Tips & Taxes with AI") > 0);
    }
}
