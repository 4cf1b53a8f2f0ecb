//! Borrowed view over a decoded height map.

use crate::error::NormalMapError;
use crate::format::InputFormat;

/// Read-only view of decoded height samples.
///
/// The view is validated once at construction, so the gradient sampler can
/// index the data without re-checking lengths.
#[derive(Debug, Clone, Copy)]
pub struct SampleBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> SampleBuffer<'a> {
    /// Wrap `data` with an explicit per-texel byte stride.
    ///
    /// Fails with [`NormalMapError::PreconditionViolation`] when a dimension
    /// or the stride is zero, or when `data.len() != width * height * stride`.
    pub fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Result<Self, NormalMapError> {
        if width == 0 || height == 0 {
            return Err(NormalMapError::precondition(format!(
                "dimensions must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        if stride == 0 {
            return Err(NormalMapError::precondition("stride must be positive"));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|texels| texels.checked_mul(stride))
            .ok_or_else(|| {
                NormalMapError::precondition(format!(
                    "buffer size overflows for {}x{} with stride {}",
                    width, height, stride
                ))
            })?;

        if data.len() != expected {
            return Err(NormalMapError::precondition(format!(
                "buffer length {} does not match {}x{}x{} = {}",
                data.len(),
                width,
                height,
                stride,
                expected
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Wrap `data`, taking the stride from the declared pixel format.
    pub fn with_format(
        data: &'a [u8],
        width: u32,
        height: u32,
        format: InputFormat,
    ) -> Result<Self, NormalMapError> {
        Self::new(data, width, height, format.stride())
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per texel.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of texels in the grid.
    #[inline]
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// First channel of the texel whose first byte sits at `offset`.
    #[inline]
    pub(crate) fn byte_at(&self, offset: usize) -> u8 {
        self.data[offset]
    }
}
