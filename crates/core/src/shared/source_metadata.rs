use std::path::PathBuf;

/// Describes an opened frame source: a single image or an ordered
/// sequence of frames.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_and_equality() {
        let meta = SourceMetadata {
            width: 640,
            height: 480,
            total_frames: 12,
            source_path: Some(PathBuf::from("/tmp/frames")),
        };
        let cloned = meta.clone();
        assert_eq!(meta, cloned);
        assert_eq!(cloned.total_frames, 12);
    }
}
