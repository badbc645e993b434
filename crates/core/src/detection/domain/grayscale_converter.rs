use crate::detection::domain::detection_error::DetectionError;
use crate::shared::frame::Frame;
use crate::shared::intensity_buffer::IntensityBuffer;

const RGBA_CHANNELS: u8 = 4;

/// BT.601 luma of one pixel, stored with clamped-byte semantics:
/// clamp to [0, 255] then round half to even.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    y.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Converts an RGB or RGBA frame into one intensity sample per pixel.
///
/// Channels beyond the third (alpha) are ignored. The buffer length is
/// checked against the frame's dimensions, since [`Frame::new`] only
/// asserts it in debug builds.
pub fn to_intensity(frame: &Frame) -> Result<IntensityBuffer, DetectionError> {
    let channels = frame.channels();
    if channels < 3 {
        return Err(DetectionError::UnsupportedChannels(channels));
    }
    check_shape(frame.data(), channels, frame.width(), frame.height())?;
    let data = convert(frame.data(), channels as usize);
    Ok(IntensityBuffer::new(data, frame.width(), frame.height()))
}

/// Converts a raw interleaved RGBA buffer, validating its shape first.
pub fn rgba_to_intensity(
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<IntensityBuffer, DetectionError> {
    check_shape(data, RGBA_CHANNELS, width, height)?;
    Ok(IntensityBuffer::new(
        convert(data, RGBA_CHANNELS as usize),
        width,
        height,
    ))
}

/// `data` must hold whole pixels, exactly `width * height` of them.
fn check_shape(data: &[u8], channels: u8, width: u32, height: u32) -> Result<(), DetectionError> {
    if data.len() % channels as usize != 0 {
        return Err(DetectionError::MisalignedBuffer {
            len: data.len(),
            channels,
        });
    }
    let expected = (width as usize) * (height as usize);
    let actual = data.len() / channels as usize;
    if actual != expected {
        return Err(DetectionError::DimensionMismatch {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}

fn convert(data: &[u8], channels: usize) -> Vec<u8> {
    data.chunks_exact(channels)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect()
}
