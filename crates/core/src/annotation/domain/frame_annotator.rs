use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for drawing detections onto a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`).
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, regions: &[Region])
        -> Result<(), Box<dyn std::error::Error>>;
}
