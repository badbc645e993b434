//! Summed-area table acceleration for quadrant sums.
//!
//! The table has one extra leading row and column of zeros so that
//! `table[[y, x]]` is the sum of every sample above and left of `(x, y)`.

use ndarray::Array2;

use crate::detection::domain::region_scorer::{PixelSumScorer, QuadrantSums, RegionScorer};
use crate::shared::intensity_buffer::IntensityBuffer;

/// Answers in-bounds windows with four table lookups per quadrant.
///
/// Windows that leave the image fall back to [`PixelSumScorer`], so the
/// zero-fill and row-wrap behaviour of flat indexing is kept exactly.
pub struct IntegralImageScorer<'a> {
    buffer: &'a IntensityBuffer,
    table: Array2<u64>,
}

impl<'a> IntegralImageScorer<'a> {
    pub fn new(buffer: &'a IntensityBuffer) -> Self {
        Self {
            buffer,
            table: summed_area_table(buffer),
        }
    }

    /// Sum over `w x h` pixels with top-left `(x, y)`; must lie in bounds.
    fn rect_sum(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        let t = &self.table;
        t[[y1, x1]] + t[[y0, x0]] - t[[y1, x0]] - t[[y0, x1]]
    }

    fn contains(&self, x: u32, y: u32, size: u32) -> bool {
        x as u64 + size as u64 <= self.buffer.width() as u64
            && y as u64 + size as u64 <= self.buffer.height() as u64
    }
}

impl RegionScorer for IntegralImageScorer<'_> {
    fn quadrant_sums(&self, x: u32, y: u32, size: u32) -> QuadrantSums {
        if !self.contains(x, y, size) {
            return PixelSumScorer::new(self.buffer).quadrant_sums(x, y, size);
        }
        let half = size / 2;
        QuadrantSums {
            top: self.rect_sum(x, y, size, half),
            bottom: self.rect_sum(x, y + half, size, size - half),
            left: self.rect_sum(x, y, half, size),
            right: self.rect_sum(x + half, y, size - half, size),
        }
    }
}

pub fn summed_area_table(buffer: &IntensityBuffer) -> Array2<u64> {
    let w = buffer.width() as usize;
    let h = buffer.height() as usize;
    let mut table = Array2::<u64>::zeros((h + 1, w + 1));
    let pixels = buffer.as_ndarray();

    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += pixels[[y, x]] as u64;
            table[[y + 1, x + 1]] = table[[y, x + 1]] + row_sum;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::window_scanner::WindowScanner;

    fn patterned(width: u32, height: u32) -> IntensityBuffer {
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 31 + y * 17 + x * y) % 256) as u8);
            }
        }
        IntensityBuffer::new(data, width, height)
    }

    #[test]
    fn test_table_of_ones_counts_pixels() {
        let buf = IntensityBuffer::filled(4, 3, 1);
        let table = summed_area_table(&buf);
        assert_eq!(table.shape(), &[4, 5]);
        assert_eq!(table[[0, 4]], 0);
        assert_eq!(table[[3, 4]], 12);
        assert_eq!(table[[2, 3]], 6);
    }

    #[test]
    fn test_matches_pixel_sums_inside_image() {
        let buf = patterned(80, 70);
        let fast = IntegralImageScorer::new(&buf);
        let slow = PixelSumScorer::new(&buf);
        for &(x, y, size) in &[(0, 0, 30), (13, 9, 31), (40, 30, 30), (50, 40, 30), (1, 2, 5)] {
            assert_eq!(
                fast.quadrant_sums(x, y, size),
                slow.quadrant_sums(x, y, size),
                "window ({x}, {y}, {size})"
            );
        }
    }

    #[test]
    fn test_matches_pixel_sums_outside_image() {
        let buf = patterned(40, 40);
        let fast = IntegralImageScorer::new(&buf);
        let slow = PixelSumScorer::new(&buf);
        for &(x, y, size) in &[(30, 0, 30), (0, 30, 30), (35, 35, 30), (100, 100, 4)] {
            assert_eq!(fast.quadrant_sums(x, y, size), slow.quadrant_sums(x, y, size));
            assert_eq!(
                fast.is_face_region(x, y, size),
                slow.is_face_region(x, y, size)
            );
        }
    }

    #[test]
    fn test_full_scan_matches_pixel_sum_scan() {
        let buf = patterned(130, 100);
        let scanner = WindowScanner::new();
        let fast = scanner.scan(&IntegralImageScorer::new(&buf), 130, 100, 1.1);
        let slow = scanner.scan(&PixelSumScorer::new(&buf), 130, 100, 1.1);
        assert!(!fast.is_empty());
        assert_eq!(fast, slow);
    }

    #[test]
    fn test_max_intensity_does_not_overflow() {
        let buf = IntensityBuffer::filled(300, 300, 255);
        let sums = IntegralImageScorer::new(&buf).quadrant_sums(0, 0, 300);
        assert_eq!(sums.top, 150 * 300 * 255);
        assert_eq!(sums.bottom, 150 * 300 * 255);
    }
}
