use std::time::Instant;

use crate::detection::domain::cluster_merger::ClusterMerger;
use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::grayscale_converter::to_intensity;
use crate::detection::domain::window_scanner::{window_sizes, WindowScanner};
use crate::detection::infrastructure::integral_image_scorer::IntegralImageScorer;
use crate::shared::detection_params::DetectionParams;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Wall-clock time spent in each stage of one detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageTimings {
    pub grayscale_ms: f64,
    pub scan_ms: f64,
    pub merge_ms: f64,
}

/// Result of one pass: reported faces plus what it took to find them.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionOutcome {
    pub faces: Vec<Region>,
    pub candidates: usize,
    pub timings: StageTimings,
}

/// Heuristic face detector: grayscale → multi-scale window scan →
/// greedy cluster merge.
///
/// Holds only its configuration; every call builds and drops its own
/// intensity buffer and summed-area table.
#[derive(Clone, Debug)]
pub struct BrightnessAsymmetryDetector {
    params: DetectionParams,
    scanner: WindowScanner,
    merger: ClusterMerger,
}

impl BrightnessAsymmetryDetector {
    pub fn new(params: DetectionParams) -> Self {
        Self {
            params,
            scanner: WindowScanner::new(),
            merger: ClusterMerger::new(),
        }
    }

    pub fn with_scanner(mut self, scanner: WindowScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    pub fn detect_frame(&self, frame: &Frame) -> Result<DetectionOutcome, DetectionError> {
        let started = Instant::now();
        let gray = to_intensity(frame)?;
        let grayscale_ms = elapsed_ms(started);

        let started = Instant::now();
        let scorer = IntegralImageScorer::new(&gray);
        let candidates = self.scanner.scan(
            &scorer,
            gray.width(),
            gray.height(),
            self.params.scale_factor(),
        );
        let scan_ms = elapsed_ms(started);

        let started = Instant::now();
        let faces = self.merger.merge(&candidates, self.params.min_neighbors());
        let merge_ms = elapsed_ms(started);

        log::debug!(
            "frame {}: {}x{}, sizes {:?}, {} candidates, {} faces \
             (grayscale {grayscale_ms:.2}ms, scan {scan_ms:.2}ms, merge {merge_ms:.2}ms)",
            frame.index(),
            gray.width(),
            gray.height(),
            window_sizes(gray.width(), gray.height(), self.params.scale_factor()),
            candidates.len(),
            faces.len()
        );

        Ok(DetectionOutcome {
            faces,
            candidates: candidates.len(),
            timings: StageTimings {
                grayscale_ms,
                scan_ms,
                merge_ms,
            },
        })
    }
}

impl Default for BrightnessAsymmetryDetector {
    fn default() -> Self {
        Self::new(DetectionParams::default())
    }
}

impl FaceDetector for BrightnessAsymmetryDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        Ok(self.detect_frame(frame)?.faces)
    }
}

/// One-shot detection over a caller-owned frame.
pub fn detect_faces(frame: &Frame, params: &DetectionParams) -> Result<Vec<Region>, DetectionError> {
    BrightnessAsymmetryDetector::new(*params)
        .detect_frame(frame)
        .map(|outcome| outcome.faces)
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
