//! Normal map assembly from a height map.
//!
//! Each texel of the output holds four components `[dx, dy, z, h]`:
//! the horizontal and vertical neighbor differences, the caller's constant
//! z weight, and the texel's own height sample. Byte storage formats get a
//! final remap into [0, 1]; float formats keep the raw values.

mod normalize;
mod range;


pub use normalize::normalize_vectors;
pub use range::GradientRange;

use serde::{Deserialize, Serialize};

use crate::error::NormalMapError;
use crate::format::{InputFormat, NumericDomain, StorageFormat};
use crate::gradient::{gradient_unchecked, sample_gradient, Gradient};
use crate::sample::SampleBuffer;

/// Components stored per output texel.
pub const COMPONENTS: usize = 4;

/// Packed 4-component normal map.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalMapBuffer {
    width: u32,
    height: u32,
    domain: NumericDomain,
    normalized: bool,
    data: Vec<f32>,
}

impl NormalMapBuffer {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Numeric range the components are stored in.
    #[inline]
    pub fn domain(&self) -> NumericDomain {
        self.domain
    }

    /// Whether `(x, y, z)` of every non-zero texel has unit length.
    ///
    /// Unnormalized buffers carry raw byte differences in x and y.
    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Flat component data, `width * height * 4` values, row-major.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Consume the buffer, returning the flat component data.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Number of texels.
    #[inline]
    pub fn texel_count(&self) -> usize {
        self.data.len() / COMPONENTS
    }

    /// The four components of texel `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.texel_count()`. Use [`Self::get_texel`] for a
    /// checked lookup.
    pub fn texel(&self, index: usize) -> [f32; 4] {
        let base = index * COMPONENTS;
        [
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        ]
    }

    /// The four components of texel `index`, or `None` when out of range.
    pub fn get_texel(&self, index: usize) -> Option<[f32; 4]> {
        (index < self.texel_count()).then(|| self.texel(index))
    }

    /// Iterate over texels in row-major order.
    pub fn texels(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.data.chunks_exact(COMPONENTS)
    }

    /// Quantize to 8-bit unsigned values.
    ///
    /// Components are clamped to [0, 1] and rounded, so this is only
    /// meaningful for byte-domain buffers.
    pub fn to_unorm8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }

    /// BLAKE3 hex digest of the buffer contents.
    ///
    /// Covers dimensions, domain, and the little-endian component bytes, so
    /// two buffers hash equal only when they are bit-identical.
    pub fn hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(self.domain.name().as_bytes());
        for value in &self.data {
            hasher.update(&value.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub(crate) fn set_normalized(&mut self) {
        self.normalized = true;
    }
}

/// Optional behavior for [`build_normal_map_with`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// How gradient differences are scaled for byte storage.
    pub gradient_range: GradientRange,
    /// Scale each `(dx, dy, z)` to unit length before the range transform.
    pub normalize: bool,
    /// Evaluate texels on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

/// Build a normal map from raw height data.
///
/// `input_format` decides the byte stride of `height_data`, `nz` is written
/// unchanged into every texel's z component, and `storage_format` decides
/// whether the result is remapped for byte storage. No unit-length
/// normalization is applied; see [`normalize_vectors`].
pub fn build_normal_map(
    height_data: &[u8],
    width: u32,
    height: u32,
    input_format: InputFormat,
    nz: f32,
    storage_format: StorageFormat,
) -> Result<NormalMapBuffer, NormalMapError> {
    let buffer = SampleBuffer::with_format(height_data, width, height, input_format)?;
    build_normal_map_with(&buffer, nz, storage_format, &BuildOptions::default())
}

/// Build a normal map from a validated sample buffer.
pub fn build_normal_map_with(
    buffer: &SampleBuffer<'_>,
    nz: f32,
    storage_format: StorageFormat,
    options: &BuildOptions,
) -> Result<NormalMapBuffer, NormalMapError> {
    let domain = storage_format.domain();
    log::debug!(
        "building {}x{} normal map (stride {}, storage {}, domain {})",
        buffer.width(),
        buffer.height(),
        buffer.stride(),
        storage_format.name(),
        domain.name()
    );

    let mut output = NormalMapBuffer {
        width: buffer.width(),
        height: buffer.height(),
        domain: NumericDomain::FloatSigned,
        normalized: false,
        data: vec![0.0; buffer.texel_count() * COMPONENTS],
    };

    fill_texels(&mut output.data, buffer, nz, options.parallel);

    if options.normalize {
        normalize_vectors(&mut output);
    }

    if domain == NumericDomain::ByteUnsigned {
        // Unit vectors are already in [-1, 1].
        let scale = if options.normalize {
            1.0
        } else {
            options.gradient_range.scale()
        };
        range::to_byte_domain(&mut output, scale);
    }

    Ok(output)
}

/// The pre-transform record for one texel: `[dx, dy, nz, height]`.
pub fn texel_record(
    buffer: &SampleBuffer<'_>,
    nz: f32,
    index: usize,
) -> Result<[f32; 4], NormalMapError> {
    Ok(record(sample_gradient(buffer, index)?, nz))
}

#[inline]
fn record(gradient: Gradient, nz: f32) -> [f32; 4] {
    [
        gradient.dx as f32,
        gradient.dy as f32,
        nz,
        gradient.height as f32,
    ]
}

#[inline]
fn record_unchecked(buffer: &SampleBuffer<'_>, nz: f32, index: usize) -> [f32; 4] {
    record(gradient_unchecked(buffer, index), nz)
}

fn fill_texels(out: &mut [f32], buffer: &SampleBuffer<'_>, nz: f32, parallel: bool) {
    if parallel && fill_texels_parallel(out, buffer, nz) {
        return;
    }

    for (i, texel) in out.chunks_exact_mut(COMPONENTS).enumerate() {
        texel.copy_from_slice(&record_unchecked(buffer, nz, i));
    }
}

#[cfg(feature = "parallel")]
fn fill_texels_parallel(out: &mut [f32], buffer: &SampleBuffer<'_>, nz: f32) -> bool {
    use rayon::prelude::*;

    out.par_chunks_exact_mut(COMPONENTS)
        .enumerate()
        .for_each(|(i, texel)| texel.copy_from_slice(&record_unchecked(buffer, nz, i)));
    true
}

#[cfg(not(feature = "parallel"))]
fn fill_texels_parallel(_out: &mut [f32], _buffer: &SampleBuffer<'_>, _nz: f32) -> bool {
    log::warn!("parallel build requested without the `parallel` feature; running serially");
    false
}
