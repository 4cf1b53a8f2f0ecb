//! Handing a finished normal map to a GPU texture upload.
//!
//! The actual graphics calls live with the caller. This module fixes what an
//! uploader receives: the encoded texel bytes, the client-side pixel type,
//! the storage format, and the sampler setup expected for normal maps.

use half::f16;
use serde::{Deserialize, Serialize};

use crate::builder::{build_normal_map_with, BuildOptions, NormalMapBuffer};
use crate::error::{PipelineError, UploadError};
use crate::format::StorageFormat;
use crate::sample::SampleBuffer;

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Texture coordinate wrap mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

/// Sampler configuration applied with the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerParams {
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    /// Ask the uploader to build the mip chain after the base level.
    pub generate_mipmaps: bool,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            wrap_s: WrapMode::ClampToEdge,
            wrap_t: WrapMode::ClampToEdge,
            generate_mipmaps: true,
        }
    }
}

/// Client-side component type of the upload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelTransfer {
    /// One byte per component.
    UnsignedByte,
    /// IEEE 754 binary16, little-endian.
    HalfFloat,
    /// IEEE 754 binary32, little-endian.
    Float,
}

impl PixelTransfer {
    /// Pick the transfer type for a storage format.
    pub fn for_storage(format: StorageFormat) -> Self {
        if format.is_half_float() {
            PixelTransfer::HalfFloat
        } else if format.is_float() {
            PixelTransfer::Float
        } else {
            PixelTransfer::UnsignedByte
        }
    }

    /// Bytes per component.
    pub fn component_size(self) -> usize {
        match self {
            PixelTransfer::UnsignedByte => 1,
            PixelTransfer::HalfFloat => 2,
            PixelTransfer::Float => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelTransfer::UnsignedByte => "unsigned_byte",
            PixelTransfer::HalfFloat => "half_float",
            PixelTransfer::Float => "float",
        }
    }
}

/// Everything an uploader needs for one texture.
///
/// The source layout is always four components per texel (RGBA).
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub width: u32,
    pub height: u32,
    pub storage_format: StorageFormat,
    pub transfer: PixelTransfer,
    pub bytes: Vec<u8>,
    pub params: SamplerParams,
}

impl UploadRequest {
    /// Encode `buffer` for upload into a texture of `storage_format`.
    ///
    /// Fails when the buffer was built for the other numeric domain.
    pub fn from_buffer(
        buffer: &NormalMapBuffer,
        storage_format: StorageFormat,
        params: SamplerParams,
    ) -> Result<Self, UploadError> {
        let expected = storage_format.domain();
        if buffer.domain() != expected {
            return Err(UploadError::DomainMismatch {
                buffer: buffer.domain().name(),
                storage: storage_format.name(),
            });
        }

        let transfer = PixelTransfer::for_storage(storage_format);
        let bytes = match transfer {
            PixelTransfer::UnsignedByte => buffer.to_unorm8(),
            PixelTransfer::HalfFloat => {
                let halves: Vec<u16> = buffer
                    .data()
                    .iter()
                    .map(|&v| f16::from_f32(v).to_bits().to_le())
                    .collect();
                bytemuck::cast_slice::<u16, u8>(&halves).to_vec()
            }
            PixelTransfer::Float => {
                let words: Vec<u32> = buffer.data().iter().map(|v| v.to_bits().to_le()).collect();
                bytemuck::cast_slice::<u32, u8>(&words).to_vec()
            }
        };

        Ok(Self {
            width: buffer.width(),
            height: buffer.height(),
            storage_format,
            transfer,
            bytes,
            params,
        })
    }

    /// Expected byte length for the request's dimensions and transfer type.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4 * self.transfer.component_size()
    }
}

/// Handle returned by a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// One-shot upload boundary: accept a request, report success or failure.
pub trait TextureUploader {
    fn upload(&mut self, request: &UploadRequest) -> Result<TextureId, UploadError>;
}

/// Uploader that keeps every request in memory.
///
/// Stands in for a GPU context in tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryUploader {
    textures: Vec<UploadRequest>,
}

impl MemoryUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously uploaded texture.
    pub fn get(&self, id: TextureId) -> Option<&UploadRequest> {
        self.textures.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureUploader for MemoryUploader {
    fn upload(&mut self, request: &UploadRequest) -> Result<TextureId, UploadError> {
        if request.bytes.len() != request.expected_len() {
            return Err(UploadError::Rejected(format!(
                "expected {} bytes, got {}",
                request.expected_len(),
                request.bytes.len()
            )));
        }

        let id = TextureId(self.textures.len() as u32);
        log::trace!(
            "uploaded texture {} ({}x{}, {}, {})",
            id.0,
            request.width,
            request.height,
            request.storage_format.name(),
            request.transfer.name()
        );
        self.textures.push(request.clone());
        Ok(id)
    }
}

/// Build a normal map and upload it in one go.
///
/// Returns the texture handle together with the buffer that was uploaded.
pub fn derive_and_upload<U: TextureUploader>(
    uploader: &mut U,
    samples: &SampleBuffer<'_>,
    nz: f32,
    storage_format: StorageFormat,
    options: &BuildOptions,
    params: SamplerParams,
) -> Result<(TextureId, NormalMapBuffer), PipelineError> {
    let buffer = build_normal_map_with(samples, nz, storage_format, options)?;
    let request = UploadRequest::from_buffer(&buffer, storage_format, params)?;
    let id = uploader.upload(&request)?;
    Ok((id, buffer))
}
