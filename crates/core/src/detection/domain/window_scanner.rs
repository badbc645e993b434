use rayon::prelude::*;

use crate::detection::domain::region_scorer::RegionScorer;
use crate::shared::constants::MIN_WINDOW_SIZE;
use crate::shared::region::Region;

/// Sweeps square windows over an image at growing sizes and collects the
/// ones the scorer accepts.
///
/// Candidates come out ordered by size, then `y`, then `x`. The cluster
/// merger depends on that order to pick its seeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowScanner {
    parallel: bool,
}

impl WindowScanner {
    pub fn new() -> Self {
        Self { parallel: false }
    }

    /// Scans each window size on the rayon pool. Output order is unchanged.
    pub fn parallel() -> Self {
        Self { parallel: true }
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn scan<S>(&self, scorer: &S, width: u32, height: u32, scale_factor: f64) -> Vec<Region>
    where
        S: RegionScorer + Sync,
    {
        let sizes = window_sizes(width, height, scale_factor);
        if self.parallel {
            let per_size: Vec<Vec<Region>> = sizes
                .par_iter()
                .map(|&size| scan_size(scorer, width, height, size))
                .collect();
            per_size.into_iter().flatten().collect()
        } else {
            sizes
                .iter()
                .flat_map(|&size| scan_size(scorer, width, height, size))
                .collect()
        }
    }
}

/// Window sides evaluated for an image, ascending.
///
/// Starts at [`MIN_WINDOW_SIZE`] and keeps going while
/// `size < min(width, height) / 2` (real division). Each step takes
/// `floor(size * scale_factor)`, bumped by one pixel when flooring would
/// leave the size unchanged.
pub fn window_sizes(width: u32, height: u32, scale_factor: f64) -> Vec<u32> {
    let limit = width.min(height) as f64 / 2.0;
    let mut sizes = Vec::new();
    let mut size = MIN_WINDOW_SIZE as u64;
    while (size as f64) < limit {
        sizes.push(size as u32);
        let next = (size as f64 * scale_factor).floor() as u64;
        size = next.max(size + 1);
    }
    sizes
}

/// Positions visited for one window size along an axis of `extent` pixels:
/// `0, step, 2*step, ...` while `pos < extent - size`.
pub fn window_positions(extent: u32, size: u32) -> impl Iterator<Item = u32> {
    let step = (size / 4).max(1) as usize;
    (0..extent.saturating_sub(size)).step_by(step)
}

fn scan_size<S: RegionScorer>(scorer: &S, width: u32, height: u32, size: u32) -> Vec<Region> {
    let mut found = Vec::new();
    for y in window_positions(height, size) {
        for x in window_positions(width, size) {
            if scorer.is_face_region(x, y, size) {
                found.push(Region::square(x as i32, y as i32, size as i32));
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::region_scorer::{PixelSumScorer, QuadrantSums};
    use crate::shared::intensity_buffer::IntensityBuffer;
    use rstest::rstest;
    use std::sync::Mutex;

    /// Accepts every window and remembers what it was asked.
    struct RecordingScorer {
        calls: Mutex<Vec<(u32, u32, u32)>>,
    }

    impl RecordingScorer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl RegionScorer for RecordingScorer {
        fn quadrant_sums(&self, x: u32, y: u32, size: u32) -> QuadrantSums {
            self.calls.lock().unwrap().push((x, y, size));
            QuadrantSums {
                top: 1,
                bottom: 0,
                left: 0,
                right: 0,
            }
        }
    }

    #[rstest]
    #[case::scale_1_3(100, 100, 1.3, vec![30, 39])]
    #[case::scale_1_1(100, 100, 1.1, vec![30, 33, 36, 39, 42, 46])]
    #[case::scale_2_0(100, 100, 2.0, vec![30])]
    #[case::uses_smaller_side(400, 100, 1.3, vec![30, 39])]
    #[case::real_division_61(61, 61, 1.3, vec![30])]
    #[case::exactly_sixty(60, 60, 1.3, vec![])]
    #[case::tiny(20, 20, 1.3, vec![])]
    #[case::empty(0, 0, 1.3, vec![])]
    fn test_window_sizes(
        #[case] width: u32,
        #[case] height: u32,
        #[case] scale: f64,
        #[case] expected: Vec<u32>,
    ) {
        assert_eq!(window_sizes(width, height, scale), expected);
    }

    #[test]
    fn test_window_sizes_always_advance_for_small_scale() {
        // floor(30 * 1.01) == 30; the sweep still terminates.
        let sizes = window_sizes(200, 200, 1.01);
        assert_eq!(sizes.first(), Some(&30));
        assert!(sizes.windows(2).all(|w| w[1] > w[0]));
        assert!(sizes.iter().all(|&s| s < 100));
    }

    #[test]
    fn test_window_sizes_huge_scale_stops_after_first() {
        assert_eq!(window_sizes(1000, 1000, 1e12), vec![30]);
    }

    #[rstest]
    #[case(100, 30, vec![0, 7, 14, 21, 28, 35, 42, 49, 56, 63])]
    #[case(64, 30, vec![0, 7, 14, 21, 28])]
    #[case(30, 30, vec![])]
    #[case(10, 30, vec![])]
    fn test_window_positions(#[case] extent: u32, #[case] size: u32, #[case] expected: Vec<u32>) {
        assert_eq!(window_positions(extent, size).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_scan_order_is_size_then_y_then_x() {
        let scorer = RecordingScorer::new();
        let found = WindowScanner::new().scan(&scorer, 100, 100, 1.3);
        let calls = scorer.calls.into_inner().unwrap();
        assert_eq!(found.len(), calls.len());
        assert_eq!(calls.len(), 10 * 10 + 7 * 7);

        let keys: Vec<(u32, u32, u32)> = calls.iter().map(|&(x, y, s)| (s, y, x)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        assert_eq!(found[0], Region::square(0, 0, 30));
        assert_eq!(found[1], Region::square(7, 0, 30));
        assert_eq!(found[10], Region::square(0, 7, 30));
        assert_eq!(found[100], Region::square(0, 0, 39));
    }

    #[test]
    fn test_scan_never_evaluates_outside_size_bounds() {
        let scorer = RecordingScorer::new();
        WindowScanner::new().scan(&scorer, 150, 90, 1.2);
        let calls = scorer.calls.into_inner().unwrap();
        assert!(!calls.is_empty());
        for (x, y, size) in calls {
            assert!(size >= 30);
            assert!((size as f64) < 90.0 / 2.0);
            assert!(x + size < 150);
            assert!(y + size < 90);
        }
    }

    #[test]
    fn test_scan_below_minimum_size_finds_nothing() {
        let scorer = RecordingScorer::new();
        let found = WindowScanner::new().scan(&scorer, 59, 300, 1.3);
        assert!(found.is_empty());
        assert!(scorer.calls.into_inner().unwrap().is_empty());
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let mut data = Vec::with_capacity(120 * 90);
        for y in 0..90u32 {
            for x in 0..120u32 {
                data.push(((x * 7 + y * 13) % 256) as u8);
            }
        }
        let buf = IntensityBuffer::new(data, 120, 90);
        let scorer = PixelSumScorer::new(&buf);
        let sequential = WindowScanner::new().scan(&scorer, 120, 90, 1.1);
        let parallel = WindowScanner::parallel().scan(&scorer, 120, 90, 1.1);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_uniform_image_candidate_count() {
        let buf = IntensityBuffer::filled(100, 100, 128);
        let found = WindowScanner::new().scan(&PixelSumScorer::new(&buf), 100, 100, 1.3);
        assert_eq!(found.len(), 149);
    }

    #[test]
    fn test_upward_ramp_yields_no_candidates() {
        // Intensity grows downwards, so every top half is darker than
        // 0.9 of its bottom half.
        let mut data = Vec::with_capacity(64 * 64);
        for y in 0..64u32 {
            data.extend(std::iter::repeat((y * 4) as u8).take(64));
        }
        let buf = IntensityBuffer::new(data, 64, 64);
        let found = WindowScanner::new().scan(&PixelSumScorer::new(&buf), 64, 64, 1.3);
        assert!(found.is_empty());
    }
}
