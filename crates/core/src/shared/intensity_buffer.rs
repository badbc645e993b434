use ndarray::ArrayView2;

/// Single-channel luminance image, one byte per pixel, row-major.
///
/// Derived from a [`Frame`](crate::shared::frame::Frame) for one detection
/// pass and dropped afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntensityBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl IntensityBuffer {
    /// # Panics
    ///
    /// If `data.len() != width * height`. The grayscale converter checks
    /// frame shape before building one, so detection never trips this.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "data length must equal width * height"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Flat buffer filled with one value.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self::new(
            vec![value; (width as usize) * (height as usize)],
            width,
            height,
        )
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at a flat index; indices past the end read as 0.
    #[inline]
    pub fn sample_or_zero(&self, idx: usize) -> u8 {
        self.data.get(idx).copied().unwrap_or(0)
    }

    /// `(height, width)` view. The length invariant is enforced by
    /// [`IntensityBuffer::new`], so the shape always fits.
    pub fn as_ndarray(&self) -> ArrayView2<'_, u8> {
        ArrayView2::from_shape((self.height as usize, self.width as usize), &self.data)
            .expect("IntensityBuffer data length must match dimensions")
    }
}
