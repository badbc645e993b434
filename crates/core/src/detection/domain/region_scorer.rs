use crate::shared::constants::{SYMMETRY_TOLERANCE, TOP_BRIGHTNESS_RATIO};
use crate::shared::intensity_buffer::IntensityBuffer;

/// Raw intensity totals over the four half-windows of a square window.
///
/// Halves use `half = size / 2` (floored): top/left span `half` rows or
/// columns, bottom/right take the rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadrantSums {
    pub top: u64,
    pub bottom: u64,
    pub left: u64,
    pub right: u64,
}

impl QuadrantSums {
    /// Averages `(top, bottom, left, right)`, each divided by
    /// `half * size` pixels.
    ///
    /// Every half uses the floored pixel count, even the larger bottom and
    /// right halves of an odd window. A zero count gives NaN.
    pub fn averages(&self, size: u32) -> (f64, f64, f64, f64) {
        let half = (size / 2) as f64;
        let pixels = half * size as f64;
        (
            self.top as f64 / pixels,
            self.bottom as f64 / pixels,
            self.left as f64 / pixels,
            self.right as f64 / pixels,
        )
    }

    /// Brighter-on-top and left/right balanced.
    pub fn is_face_like(&self, size: u32) -> bool {
        let (top, bottom, left, right) = self.averages(size);
        top > bottom * TOP_BRIGHTNESS_RATIO && (left - right).abs() < SYMMETRY_TOLERANCE
    }
}

/// Evaluates one square window of an intensity image.
pub trait RegionScorer {
    fn quadrant_sums(&self, x: u32, y: u32, size: u32) -> QuadrantSums;

    fn is_face_region(&self, x: u32, y: u32, size: u32) -> bool {
        self.quadrant_sums(x, y, size).is_face_like(size)
    }
}

/// Sums quadrants pixel by pixel.
///
/// Samples are addressed by flat index `(y + dy) * width + (x + dx)`, so a
/// window running past the right edge continues on the next row and one
/// running past the end of the buffer reads zeros.
pub struct PixelSumScorer<'a> {
    buffer: &'a IntensityBuffer,
}

impl<'a> PixelSumScorer<'a> {
    pub fn new(buffer: &'a IntensityBuffer) -> Self {
        Self { buffer }
    }

    fn block_sum(&self, x: u32, y: u32, rows: (u32, u32), cols: (u32, u32)) -> u64 {
        let width = self.buffer.width() as usize;
        let mut sum = 0u64;
        for dy in rows.0..rows.1 {
            let row_start = (y as usize + dy as usize) * width + x as usize;
            for dx in cols.0..cols.1 {
                sum += self.buffer.sample_or_zero(row_start + dx as usize) as u64;
            }
        }
        sum
    }
}

impl RegionScorer for PixelSumScorer<'_> {
    fn quadrant_sums(&self, x: u32, y: u32, size: u32) -> QuadrantSums {
        let half = size / 2;
        QuadrantSums {
            top: self.block_sum(x, y, (0, half), (0, size)),
            bottom: self.block_sum(x, y, (half, size), (0, size)),
            left: self.block_sum(x, y, (0, size), (0, half)),
            right: self.block_sum(x, y, (0, size), (half, size)),
        }
    }
}
