use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Faces found in one frame, in the frame's own pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectionReport {
    pub source: Option<PathBuf>,
    pub frame_index: usize,
    pub width: u32,
    pub height: u32,
    pub face_count: usize,
    pub faces: Vec<Region>,
}

impl DetectionReport {
    pub fn new(frame: &Frame, source: Option<&Path>, faces: Vec<Region>) -> Self {
        Self {
            source: source.map(Path::to_path_buf),
            frame_index: frame.index(),
            width: frame.width(),
            height: frame.height(),
            face_count: faces.len(),
            faces,
        }
    }
}

impl fmt::Display for DetectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame {}: Faces detected: {}", self.frame_index, self.face_count)?;
        for face in &self.faces {
            write!(
                f,
                "\n  x={} y={} width={} height={}",
                face.x, face.y, face.width, face.height
            )?;
        }
        Ok(())
    }
}
