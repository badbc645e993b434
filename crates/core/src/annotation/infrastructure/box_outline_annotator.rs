use ndarray::ArrayViewMut3;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{BOX_COLOR, BOX_LINE_WIDTH, LABEL_BASELINE_OFFSET};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// 5x7 bitmaps for the "Face" caption, one row per byte, MSB-first in the
/// low five bits.
const LABEL_GLYPHS: [[u8; 7]; 4] = [
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
    [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
    [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
    [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
];
const GLYPH_WIDTH: i64 = 5;
const GLYPH_HEIGHT: i64 = 7;
const GLYPH_SCALE: i64 = 2;

/// Strokes each region as a hollow rectangle.
///
/// The stroke is centred on the rectangle edge (`line_width / 2` pixels
/// outside, the rest inside) and clipped to the frame. On RGBA frames the
/// stroked pixels become fully opaque. With [`with_label`](Self::with_label)
/// a "Face" caption is drawn above each box, its baseline
/// [`LABEL_BASELINE_OFFSET`] pixels over the top edge.
pub struct BoxOutlineAnnotator {
    color: [u8; 3],
    line_width: u32,
    label: bool,
}

impl BoxOutlineAnnotator {
    pub fn new(color: [u8; 3], line_width: u32) -> Self {
        Self {
            color,
            line_width,
            label: false,
        }
    }

    pub fn with_label(mut self, label: bool) -> Self {
        self.label = label;
        self
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    pub fn has_label(&self) -> bool {
        self.label
    }

    fn paint(&self, pixels: &mut ArrayViewMut3<'_, u8>, px: i64, py: i64) {
        let (h, w, channels) = pixels.dim();
        if px < 0 || py < 0 || px >= w as i64 || py >= h as i64 {
            return;
        }
        let (row, col) = (py as usize, px as usize);
        for (c, &v) in self.color.iter().enumerate() {
            pixels[[row, col, c]] = v;
        }
        if channels == 4 {
            pixels[[row, col, 3]] = u8::MAX;
        }
    }

    fn stroke(&self, pixels: &mut ArrayViewMut3<'_, u8>, r: &Region) {
        let lw = self.line_width as i64;
        let outside = lw / 2;
        let (x, y) = (r.x as i64, r.y as i64);
        let (w, h) = (r.width as i64, r.height as i64);

        // Outer edge of the stroke, and the untouched interior.
        let (ox0, oy0) = (x - outside, y - outside);
        let (ox1, oy1) = (x + w - outside + lw, y + h - outside + lw);
        let (ix0, iy0) = (ox0 + lw, oy0 + lw);
        let (ix1, iy1) = (x + w - outside, y + h - outside);

        let (fh, fw, _) = pixels.dim();
        for py in oy0.max(0)..oy1.min(fh as i64) {
            for px in ox0.max(0)..ox1.min(fw as i64) {
                let interior = px >= ix0 && px < ix1 && py >= iy0 && py < iy1;
                if !interior {
                    self.paint(pixels, px, py);
                }
            }
        }
    }

    fn caption(&self, pixels: &mut ArrayViewMut3<'_, u8>, r: &Region) {
        let top = r.y as i64 - LABEL_BASELINE_OFFSET - GLYPH_HEIGHT * GLYPH_SCALE;
        let advance = (GLYPH_WIDTH + 1) * GLYPH_SCALE;

        for (i, glyph) in LABEL_GLYPHS.iter().enumerate() {
            let left = r.x as i64 + i as i64 * advance;
            for (gy, bits) in glyph.iter().enumerate() {
                for gx in 0..GLYPH_WIDTH {
                    if (*bits >> (GLYPH_WIDTH - 1 - gx)) & 1 == 0 {
                        continue;
                    }
                    for sy in 0..GLYPH_SCALE {
                        for sx in 0..GLYPH_SCALE {
                            self.paint(
                                pixels,
                                left + gx * GLYPH_SCALE + sx,
                                top + gy as i64 * GLYPH_SCALE + sy,
                            );
                        }
                    }
                }
            }
        }
    }
}

impl Default for BoxOutlineAnnotator {
    fn default() -> Self {
        Self::new(BOX_COLOR, BOX_LINE_WIDTH)
    }
}

impl FrameAnnotator for BoxOutlineAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() < 3 {
            return Err(format!(
                "cannot draw colour outlines on a {}-channel frame",
                frame.channels()
            )
            .into());
        }
        let expected = frame.pixel_count() * frame.channels() as usize;
        if frame.data().len() != expected {
            return Err(format!(
                "frame buffer holds {} bytes, {}x{}x{} needs {expected}",
                frame.data().len(),
                frame.width(),
                frame.height(),
                frame.channels()
            )
            .into());
        }

        let mut pixels = frame.as_ndarray_mut();
        for r in regions {
            if self.line_width > 0 {
                self.stroke(&mut pixels, r);
            }
            if self.label {
                self.caption(&mut pixels, r);
            }
        }

        Ok(())
    }
}
