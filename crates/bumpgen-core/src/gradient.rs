//! Neighbor-difference gradient sampling with toroidal addressing.
//!
//! Every texel is compared with its left/right and top/bottom neighbors. The
//! grid is periodic: the column left of 0 is `width - 1` and the row above 0
//! is `height - 1`. There is no clamping and no special border case.

use crate::error::NormalMapError;
use crate::sample::SampleBuffer;

/// Wrap a possibly negative coordinate into `[0, bound)`.
///
/// `bound` must be positive.
#[inline]
pub fn wrap(coord: i64, bound: usize) -> usize {
    coord.rem_euclid(bound as i64) as usize
}

/// Byte offsets of the four neighbors of a texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborOffsets {
    /// Left neighbor.
    pub u0: usize,
    /// Right neighbor.
    pub u1: usize,
    /// Neighbor one row above.
    pub v0: usize,
    /// Neighbor one row below.
    pub v1: usize,
}

/// Raw gradient at one texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    /// Right minus left, in [-255, 255].
    pub dx: i16,
    /// Below minus above, in [-255, 255].
    pub dy: i16,
    /// The texel's own first channel.
    pub height: u8,
}

/// Compute neighbor offsets for texel `index` of a `width x height` grid.
///
/// Offsets are in bytes and already multiplied by `stride`. Fails when the
/// grid's byte size `width * height * stride` does not fit in `usize`.
pub fn neighbor_offsets(
    width: u32,
    height: u32,
    stride: usize,
    index: usize,
) -> Result<NeighborOffsets, NormalMapError> {
    let size = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| NormalMapError::precondition(format!("{}x{} grid overflows", width, height)))?;
    if width == 0 || height == 0 || index >= size {
        return Err(NormalMapError::precondition(format!(
            "texel index {} out of range for {}x{} grid",
            index, width, height
        )));
    }
    if size.checked_mul(stride).is_none() {
        return Err(NormalMapError::precondition(format!(
            "byte offsets overflow for {}x{} with stride {}",
            width, height, stride
        )));
    }
    Ok(offsets_unchecked(width as usize, height as usize, stride, index))
}

/// Offsets for an index already known to be in range.
#[inline]
pub(crate) fn offsets_unchecked(
    width: usize,
    height: usize,
    stride: usize,
    index: usize,
) -> NeighborOffsets {
    let row_stride = width;
    let col = index % width;
    let row = index / width;

    let left = wrap(col as i64 - 1, width);
    let right = wrap(col as i64 + 1, width);
    let above = wrap(row as i64 - 1, height);
    let below = wrap(row as i64 + 1, height);

    NeighborOffsets {
        u0: (row * row_stride + left) * stride,
        u1: (row * row_stride + right) * stride,
        v0: (above * row_stride + col) * stride,
        v1: (below * row_stride + col) * stride,
    }
}

/// Sample the gradient at texel `index`.
pub fn sample_gradient(buffer: &SampleBuffer<'_>, index: usize) -> Result<Gradient, NormalMapError> {
    if index >= buffer.texel_count() {
        return Err(NormalMapError::precondition(format!(
            "texel index {} out of range for {}x{} grid",
            index,
            buffer.width(),
            buffer.height()
        )));
    }
    Ok(gradient_unchecked(buffer, index))
}

#[inline]
pub(crate) fn gradient_unchecked(buffer: &SampleBuffer<'_>, index: usize) -> Gradient {
    let stride = buffer.stride();
    let offsets = offsets_unchecked(
        buffer.width() as usize,
        buffer.height() as usize,
        stride,
        index,
    );

    let sample = |offset: usize| buffer.byte_at(offset) as i16;

    Gradient {
        dx: sample(offsets.u1) - sample(offsets.u0),
        dy: sample(offsets.v1) - sample(offsets.v0),
        height: buffer.byte_at(index * stride),
    }
}
