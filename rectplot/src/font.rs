//! Minimal bitmap font for plot labels.
//!
//! Covers the characters needed for rectangle indices and `(x, y)`
//! coordinate labels. Each glyph is 5 pixels wide and 7 high, and is scaled
//! up by an integer factor when drawn.

use rten_imageproc::PointF;
use rten_tensor::prelude::*;
use rten_tensor::NdTensorViewMut;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;

/// Blank columns between adjacent glyphs.
const GLYPH_SPACING: usize = 1;

/// Return the rows of a glyph, top to bottom. The most significant of the
/// low 5 bits is the leftmost pixel.
fn glyph(ch: char) -> Option<[u8; GLYPH_HEIGHT]> {
    let rows = match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ' ' => [0; GLYPH_HEIGHT],
        _ => return None,
    };
    Some(rows)
}

/// Return the integer scale factor which makes glyphs approximately
/// `size_pt` points high at `dpi` dots per inch.
pub fn glyph_scale(size_pt: f32, dpi: u32) -> usize {
    let height_px = size_pt * dpi as f32 / 72.;
    (height_px / GLYPH_HEIGHT as f32).round().max(1.) as usize
}

/// Return the (width, height) in pixels of `text` drawn at `scale`.
pub fn text_size(text: &str, scale: usize) -> (usize, usize) {
    let n_chars = text.chars().count();
    let width = if n_chars == 0 {
        0
    } else {
        (n_chars * GLYPH_WIDTH + (n_chars - 1) * GLYPH_SPACING) * scale
    };
    (width, GLYPH_HEIGHT * scale)
}

/// Position of the anchor point on the text's bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TextAnchor {
    /// Middle of the text.
    Center,
    /// Middle of the bottom edge.
    Bottom,
    /// Middle of the top edge.
    Top,
    /// Middle of the right edge.
    Right,
}

/// Draw `text` into a CHW image. Pixels falling outside the image are
/// clipped. Characters without a glyph are drawn as spaces.
pub fn draw_text(
    mut img: NdTensorViewMut<f32, 3>,
    text: &str,
    anchor: PointF,
    placement: TextAnchor,
    scale: usize,
    color: [f32; 3],
) {
    let [_, img_h, img_w] = img.shape();
    let (text_w, text_h) = text_size(text, scale);
    let (text_w, text_h) = (text_w as f32, text_h as f32);
    let (left, top) = match placement {
        TextAnchor::Center => (anchor.x - text_w / 2., anchor.y - text_h / 2.),
        TextAnchor::Bottom => (anchor.x - text_w / 2., anchor.y.round() - text_h),
        TextAnchor::Top => (anchor.x - text_w / 2., anchor.y),
        TextAnchor::Right => (anchor.x.round() - text_w, anchor.y - text_h / 2.),
    };
    let (left, top) = (left.round() as i64, top.round() as i64);

    let advance = ((GLYPH_WIDTH + GLYPH_SPACING) * scale) as i64;
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let glyph_left = left + i as i64 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let x0 = glyph_left + (col * scale) as i64;
                let y0 = top + (row * scale) as i64;
                for y in y0.max(0)..(y0 + scale as i64).min(img_h as i64) {
                    for x in x0.max(0)..(x0 + scale as i64).min(img_w as i64) {
                        for (c, value) in color.iter().enumerate() {
                            img[[c, y as usize, x as usize]] = *value;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rten_imageproc::PointF;
    use rten_tensor::NdTensor;

    use super::{draw_text, glyph, glyph_scale, text_size, TextAnchor, GLYPH_HEIGHT};

    #[test]
    fn test_glyphs_fit_width() {
        for ch in "0123456789(),-. ".chars() {
            let rows = glyph(ch).unwrap();
            assert!(rows.iter().all(|r| *r < 32), "glyph {:?} too wide", ch);
        }
        assert!(glyph('x').is_none());
    }

    #[test]
    fn test_glyph_scale() {
        // 12pt at 300 DPI is 50 pixels high.
        assert_eq!(glyph_scale(12., 300), 7);
        assert_eq!(glyph_scale(10., 300), 6);
        assert_eq!(glyph_scale(12., 10), 1);
    }

    #[test]
    fn test_text_size() {
        assert_eq!(text_size("", 2), (0, 14));
        assert_eq!(text_size("7", 1), (5, 7));
        assert_eq!(text_size("(1, 2)", 3), ((6 * 5 + 5) * 3, GLYPH_HEIGHT * 3));
    }

    #[test]
    fn test_draw_text_center() {
        let mut img = NdTensor::zeros([3, 20, 20]);
        draw_text(
            img.view_mut(),
            "1",
            PointF::from_yx(10., 10.),
            TextAnchor::Center,
            1,
            [1., 0.5, 0.],
        );

        // "1" at scale 1 spans x in [8, 13) and y in [7, 14) (rounded from
        // 6.5). Its stem is the middle column.
        for y in 7..14 {
            assert_eq!(img[[0, y, 10]], 1.);
            assert_eq!(img[[1, y, 10]], 0.5);
            assert_eq!(img[[2, y, 10]], 0.);
        }
        assert_eq!(img[[0, 10, 8]], 0.);
        let painted = (0..20)
            .flat_map(|y| (0..20).map(move |x| (y, x)))
            .filter(|&(y, x)| img[[0, y, x]] > 0.)
            .count();
        assert_eq!(painted, 10);
    }

    #[test]
    fn test_draw_text_bottom_and_clipping() {
        let mut img = NdTensor::zeros([3, 10, 10]);
        draw_text(
            img.view_mut(),
            "-",
            PointF::from_yx(9., 1.),
            TextAnchor::Bottom,
            2,
            [1., 1., 1.],
        );

        // Text is 10x14, so with its bottom edge at row 9 the dash (glyph
        // row 3) covers rows 1..3. The left half falls outside the image.
        assert_eq!(img[[0, 1, 0]], 1.);
        assert_eq!(img[[0, 2, 5]], 1.);
        assert_eq!(img[[0, 3, 0]], 0.);
        assert_eq!(img[[0, 2, 6]], 0.);
    }

    #[test]
    fn test_draw_text_top_and_right() {
        let mut img = NdTensor::zeros([3, 20, 20]);
        draw_text(
            img.view_mut(),
            "-",
            PointF::from_yx(2., 10.),
            TextAnchor::Top,
            1,
            [1., 1., 1.],
        );
        // Dash glyph row 3 sits 3 rows below the top edge, spanning x in
        // [8, 13) after rounding 7.5 up.
        assert_eq!(img[[0, 5, 8]], 1.);
        assert_eq!(img[[0, 5, 12]], 1.);
        assert_eq!(img[[0, 5, 13]], 0.);
        assert_eq!(img[[0, 4, 10]], 0.);

        let mut img = NdTensor::zeros([3, 20, 20]);
        draw_text(
            img.view_mut(),
            "-",
            PointF::from_yx(10., 15.),
            TextAnchor::Right,
            1,
            [1., 1., 1.],
        );
        // Right edge at column 15, top at row 7 (6.5 rounded up).
        assert_eq!(img[[0, 10, 10]], 1.);
        assert_eq!(img[[0, 10, 14]], 1.);
        assert_eq!(img[[0, 10, 15]], 0.);
        assert_eq!(img[[0, 10, 9]], 0.);
    }
}
