use serde::Serialize;

use crate::detection::domain::detection_error::DetectionError;
use crate::shared::constants::{DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR};

/// Per-call tuning for the scanner and cluster merger.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DetectionParams {
    scale_factor: f64,
    min_neighbors: i32,
}

impl DetectionParams {
    /// Rejects scale factors that would stall the window-size sweep.
    ///
    /// `min_neighbors` is accepted as-is; values at or below zero fall back
    /// to a cluster size of one.
    pub fn new(scale_factor: f64, min_neighbors: i32) -> Result<Self, DetectionError> {
        if !scale_factor.is_finite() || scale_factor <= 1.0 {
            return Err(DetectionError::InvalidScaleFactor(scale_factor));
        }
        Ok(Self {
            scale_factor,
            min_neighbors,
        })
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn min_neighbors(&self) -> i32 {
        self.min_neighbors
    }

    /// Smallest cluster that gets reported: `max(1, min_neighbors - 2)`.
    pub fn min_cluster_size(&self) -> usize {
        min_cluster_size(self.min_neighbors)
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
        }
    }
}

pub fn min_cluster_size(min_neighbors: i32) -> usize {
    (min_neighbors.saturating_sub(2)).max(1) as usize
}
