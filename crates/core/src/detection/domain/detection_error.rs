use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DetectionError {
    #[error("scale factor must be a finite value greater than 1.0, got {0}")]
    InvalidScaleFactor(f64),
    #[error("pixel buffer length {len} is not a multiple of {channels} channels")]
    MisalignedBuffer { len: usize, channels: u8 },
    #[error("pixel buffer holds {actual} pixels but {width}x{height} needs {expected}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("luminance needs at least 3 colour channels, got {0}")]
    UnsupportedChannels(u8),
}
