//! bumpgen: tangent-space normal maps from height maps.
//!
//! This crate turns a decoded grayscale (or packed multi-channel) height map
//! into a packed 4-component normal map ready for a GPU texture upload.
//! All output is deterministic: the same samples and parameters always give
//! bit-identical buffers.
//!
//! # Pipeline
//!
//! - **Gradient sampling**: neighbor differences with toroidal addressing
//!   ([`gradient`])
//! - **Assembly**: `[dx, dy, z, h]` per texel plus a storage-dependent range
//!   transform ([`builder`])
//! - **Upload contract**: encoded bytes and sampler setup for a texture
//!   uploader ([`upload`])
//! - **Preview**: deterministic PNG export ([`png`](crate::png))
//!
//! # Example
//!
//! ```
//! use bumpgen_core::{build_normal_map, InputFormat, StorageFormat};
//!
//! let heights = [10u8, 20, 30, 40];
//! let map = build_normal_map(&heights, 2, 2, InputFormat::Red, 1.0, StorageFormat::Rgba16f).unwrap();
//! assert_eq!(map.texel(0), [0.0, 0.0, 1.0, 10.0]);
//! ```

pub mod builder;
pub mod error;
pub mod format;
pub mod gradient;
pub mod params;
pub mod png;
pub mod sample;
pub mod upload;

// Re-export main types for convenience
pub use builder::{
    build_normal_map, build_normal_map_with, normalize_vectors, texel_record, BuildOptions,
    GradientRange, NormalMapBuffer,
};
pub use error::{NormalMapError, PipelineError, ReportableError, UploadError};
pub use format::{InputFormat, NumericDomain, StorageFormat};
pub use gradient::{neighbor_offsets, sample_gradient, wrap, Gradient, NeighborOffsets};
pub use params::DeriveParams;
pub use self::png::{PngConfig, PngError};
pub use sample::SampleBuffer;
pub use upload::{
    derive_and_upload, MemoryUploader, PixelTransfer, SamplerParams, TextureId, TextureUploader,
    UploadRequest,
};
