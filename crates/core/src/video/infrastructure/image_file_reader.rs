use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_reader::FrameReader;

/// Adapts a single image file to the [`FrameReader`] interface.
///
/// Treats the image as a one-frame sequence so stills and frame
/// directories go through the same pipeline.
pub struct ImageFileReader {
    frame: Option<Frame>,
    metadata: Option<SourceMetadata>,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self {
            frame: None,
            metadata: None,
        }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes any format the `image` crate understands into an RGBA frame.
pub(crate) fn decode_rgba(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok(Frame::try_new(img.into_raw(), width, height, 4, index)?)
}

impl FrameReader for ImageFileReader {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        let frame = decode_rgba(path, 0)?;
        let metadata = SourceMetadata {
            width: frame.width(),
            height: frame.height(),
            total_frames: 1,
            source_path: Some(path.to_path_buf()),
        };
        self.frame = Some(frame);
        self.metadata = Some(metadata.clone());
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if self.frame.is_none() {
            return Box::new(std::iter::once(Err("ImageFileReader: not opened".into())));
        }
        Box::new(self.frame.take().into_iter().map(Ok))
    }

    fn close(&mut self) {
        self.frame = None;
        self.metadata = None;
    }
}
