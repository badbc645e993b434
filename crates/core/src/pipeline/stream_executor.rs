use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_reader::FrameReader;

/// Receives each frame together with the faces found in it.
pub type FrameHandler<'a> =
    dyn FnMut(Frame, Vec<Region>) -> Result<(), Box<dyn std::error::Error>> + 'a;

/// Configuration for a continuous detection run.
pub struct StreamConfig {
    /// Called after each frame; returning `false` stops the run.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    /// Checked between frames; a pass already under way always finishes.
    pub cancelled: Arc<AtomicBool>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Abstracts how the read → detect → handle loop is driven.
///
/// Implementations must keep at most one detection pass in flight and
/// deliver frames to the handler in capture order. Returns the number of
/// frames handled.
pub trait StreamExecutor: Send {
    fn execute(
        &self,
        reader: Box<dyn FrameReader>,
        detector: Box<dyn FaceDetector>,
        metadata: &SourceMetadata,
        config: StreamConfig,
        on_frame: &mut FrameHandler<'_>,
    ) -> Result<usize, Box<dyn std::error::Error>>;
}
