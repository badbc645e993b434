use serde::{Deserialize, Serialize};

/// Overlap ratio a candidate must exceed to join a cluster seed.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.3;

/// An axis-aligned rectangle in pixel coordinates, origin at the top-left.
///
/// Used both for raw scanner windows (always square) and for the averaged
/// rectangles reported after clustering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square window of side `size` anchored at `(x, y)`.
    pub fn square(x: i32, y: i32, size: i32) -> Self {
        Self::new(x, y, size, size)
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Intersection area divided by the smaller of the two areas.
    ///
    /// Unlike IoU this reaches 1.0 whenever one rectangle contains the
    /// other. Touching or disjoint rectangles score 0.
    pub fn overlap_ratio(&self, other: &Region) -> f64 {
        let ix1 = self.x.max(other.x) as i64;
        let iy1 = self.y.max(other.y) as i64;
        let ix2 = (self.x as i64 + self.width as i64).min(other.x as i64 + other.width as i64);
        let iy2 = (self.y as i64 + self.height as i64).min(other.y as i64 + other.height as i64);

        if ix2 - ix1 <= 0 || iy2 - iy1 <= 0 {
            return 0.0;
        }

        let inter = ((ix2 - ix1) * (iy2 - iy1)) as f64;
        let smaller = self.area().min(other.area()) as f64;
        inter / smaller
    }

    /// Component-wise floored mean of a group of regions.
    ///
    /// Returns `None` for an empty group.
    pub fn average(group: &[Region]) -> Option<Region> {
        if group.is_empty() {
            return None;
        }
        let n = group.len() as i64;
        let mean = |f: fn(&Region) -> i32| -> i32 {
            let sum: i64 = group.iter().map(|r| f(r) as i64).sum();
            sum.div_euclid(n) as i32
        };
        Some(Region {
            x: mean(|r| r.x),
            y: mean(|r| r.y),
            width: mean(|r| r.width),
            height: mean(|r| r.height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn region(x: i32, y: i32, w: i32, h: i32) -> Region {
        Region::new(x, y, w, h)
    }

    // ── Overlap ratio ────────────────────────────────────────────────

    #[test]
    fn test_overlap_identical_regions() {
        let a = region(10, 10, 100, 100);
        assert_relative_eq!(a.overlap_ratio(&a), 1.0);
    }

    #[test]
    fn test_overlap_no_overlap() {
        let a = region(0, 0, 50, 50);
        let b = region(100, 100, 50, 50);
        assert_relative_eq!(a.overlap_ratio(&b), 0.0);
    }

    #[test]
    fn test_overlap_partial() {
        // a: [0,0]-[100,100], b: [50,0]-[150,100]
        // intersection 50*100 = 5000, smaller area 10000
        let a = region(0, 0, 100, 100);
        let b = region(50, 0, 100, 100);
        assert_relative_eq!(a.overlap_ratio(&b), 0.5);
    }

    #[test]
    fn test_overlap_contained_is_one() {
        let a = region(0, 0, 100, 100);
        let b = region(25, 25, 50, 50);
        assert_relative_eq!(a.overlap_ratio(&b), 1.0);
        assert_relative_eq!(b.overlap_ratio(&a), 1.0);
    }

    #[test]
    fn test_overlap_uses_smaller_area() {
        // inter = 20*40 = 800, areas 1600 and 3600
        let a = region(0, 0, 40, 40);
        let b = region(20, 0, 60, 60);
        assert_relative_eq!(a.overlap_ratio(&b), 800.0 / 1600.0);
    }

    #[rstest]
    #[case::shared_vertical_edge(region(0, 0, 50, 50), region(50, 0, 50, 50))]
    #[case::shared_horizontal_edge(region(0, 0, 50, 50), region(0, 50, 50, 50))]
    #[case::shared_corner(region(0, 0, 50, 50), region(50, 50, 50, 50))]
    #[case::zero_width(region(0, 0, 0, 100), region(0, 0, 50, 50))]
    #[case::zero_height(region(0, 0, 100, 0), region(0, 0, 50, 50))]
    fn test_overlap_degenerate_is_zero(#[case] a: Region, #[case] b: Region) {
        assert_relative_eq!(a.overlap_ratio(&b), 0.0);
        assert_relative_eq!(b.overlap_ratio(&a), 0.0);
    }

    #[test]
    fn test_default_threshold() {
        assert_relative_eq!(DEFAULT_OVERLAP_THRESHOLD, 0.3);
    }

    // ── Averaging ────────────────────────────────────────────────────

    #[test]
    fn test_average_empty() {
        assert_eq!(Region::average(&[]), None);
    }

    #[test]
    fn test_average_single() {
        let r = region(3, 4, 30, 30);
        assert_eq!(Region::average(&[r]), Some(r));
    }

    #[test]
    fn test_average_floors_each_component() {
        let group = [region(0, 0, 30, 30), region(7, 7, 30, 30), region(14, 0, 39, 39)];
        // x: 21/3=7, y: 7/3=2.33→2, w: 99/3=33, h: 33
        assert_eq!(Region::average(&group), Some(region(7, 2, 33, 33)));
    }

    #[test]
    fn test_average_floors_negative_toward_minus_infinity() {
        let group = [region(-1, 0, 10, 10), region(0, 0, 10, 10)];
        assert_eq!(Region::average(&group).unwrap().x, -1);
    }

    #[test]
    fn test_square_constructor() {
        let r = Region::square(5, 6, 30);
        assert_eq!(r, region(5, 6, 30, 30));
        assert_eq!(r.area(), 900);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let json = serde_json::to_string(&region(1, 2, 3, 4)).unwrap();
        assert_eq!(json, r#"{"x":1,"y":2,"width":3,"height":4}"#);
    }
}
