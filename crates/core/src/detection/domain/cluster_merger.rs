use crate::shared::detection_params::min_cluster_size;
use crate::shared::region::{Region, DEFAULT_OVERLAP_THRESHOLD};

/// Collapses overlapping candidate windows into averaged face rectangles.
///
/// Greedy and seed-based: each unused candidate, in input order, seeds a
/// cluster and claims every later unused candidate whose overlap ratio
/// with the *seed* exceeds the threshold. Membership is not transitive.
/// Clusters smaller than `max(1, min_neighbors - 2)` are dropped.
#[derive(Clone, Copy, Debug)]
pub struct ClusterMerger {
    overlap_threshold: f64,
}

impl ClusterMerger {
    pub fn new() -> Self {
        Self {
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
        }
    }

    pub fn merge(&self, candidates: &[Region], min_neighbors: i32) -> Vec<Region> {
        let min_size = min_cluster_size(min_neighbors);
        self.clusters(candidates)
            .into_iter()
            .filter(|cluster| cluster.len() >= min_size)
            .filter_map(|cluster| Region::average(&cluster))
            .collect()
    }

    /// All clusters in seed order, before the size filter.
    pub fn clusters(&self, candidates: &[Region]) -> Vec<Vec<Region>> {
        let mut used = vec![false; candidates.len()];
        let mut clusters = Vec::new();

        for (i, seed) in candidates.iter().enumerate() {
            if used[i] {
                continue;
            }
            used[i] = true;
            let mut cluster = vec![*seed];

            for (j, other) in candidates.iter().enumerate().skip(i + 1) {
                if used[j] {
                    continue;
                }
                if seed.overlap_ratio(other) > self.overlap_threshold {
                    cluster.push(*other);
                    used[j] = true;
                }
            }
            clusters.push(cluster);
        }
        clusters
    }
}

impl Default for ClusterMerger {
    fn default() -> Self {
        Self::new()
    }
}
