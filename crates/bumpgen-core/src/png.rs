//! Deterministic PNG preview of a normal map.
//!
//! Uses fixed compression settings so the same buffer always encodes to the
//! same bytes. Previews are RGBA8: xyz in RGB, height in alpha.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::builder::NormalMapBuffer;
use crate::error::ReportableError;
use crate::format::NumericDomain;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

impl ReportableError for PngError {
    fn code(&self) -> &'static str {
        match self {
            PngError::Io(_) => "PNG_001",
            PngError::Encoding(_) => "PNG_002",
            PngError::InvalidDimensions(_) => "PNG_003",
        }
    }

    fn category(&self) -> &'static str {
        "png"
    }
}

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            // No filtering keeps the encoder output stable across versions.
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smaller files, slower.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }
}

/// RGBA8 bytes for a preview image.
///
/// Byte-domain buffers are quantized as they are. Float-domain buffers are
/// first brought into [0, 1]: dx/dy are divided by 255 (unless the buffer
/// already holds unit vectors) and remapped like the z component, height is
/// divided by 255.
pub fn preview_rgba8(buffer: &NormalMapBuffer) -> Vec<u8> {
    match buffer.domain() {
        NumericDomain::ByteUnsigned => buffer.to_unorm8(),
        NumericDomain::FloatSigned => {
            let scale = if buffer.is_normalized() { 1.0 } else { 1.0 / 255.0 };
            let mut bytes = Vec::with_capacity(buffer.data().len());
            for texel in buffer.texels() {
                let encoded = [
                    texel[0] * scale * 0.5 + 0.5,
                    texel[1] * scale * 0.5 + 0.5,
                    texel[2] * 0.5 + 0.5,
                    texel[3] / 255.0,
                ];
                bytes.extend(encoded.iter().map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8));
            }
            bytes
        }
    }
}

/// Write a preview of `buffer` to any writer.
pub fn write_preview_to_writer<W: Write>(
    buffer: &NormalMapBuffer,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(PngError::InvalidDimensions(format!(
            "{}x{}",
            buffer.width(),
            buffer.height()
        )));
    }

    let mut encoder = Encoder::new(writer, buffer.width(), buffer.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&preview_rgba8(buffer))?;

    Ok(())
}

/// Write a preview of `buffer` to a PNG file.
pub fn write_preview(buffer: &NormalMapBuffer, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_preview_to_writer(buffer, writer, config)
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Write a preview to a Vec<u8> and return it with its hash.
pub fn write_preview_to_vec_with_hash(
    buffer: &NormalMapBuffer,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_preview_to_writer(buffer, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_normal_map, build_normal_map_with, BuildOptions};
    use crate::format::{InputFormat, StorageFormat};
    use crate::sample::SampleBuffer;

    fn decode(data: &[u8]) -> (u32, u32, Vec<u8>) {
        let decoder = png::Decoder::new(data);
        let mut reader = decoder.read_info().unwrap();
        let mut pixels = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut pixels).unwrap();
        pixels.truncate(info.buffer_size());
        (info.width, info.height, pixels)
    }

    #[test]
    fn test_preview_deterministic() {
        let data: Vec<u8> = (0..32 * 32u32).map(|v| (v * 7 % 256) as u8).collect();
        let map = build_normal_map(&data, 32, 32, InputFormat::Red, 1.0, StorageFormat::Rgba8).unwrap();
        let config = PngConfig::default();

        let (data1, hash1) = write_preview_to_vec_with_hash(&map, &config).unwrap();
        let (data2, hash2) = write_preview_to_vec_with_hash(&map, &config).unwrap();

        assert_eq!(data1, data2, "PNG data should be identical");
        assert_eq!(hash1, hash2, "PNG hashes should be identical");
    }

    #[test]
    fn test_flat_float_preview() {
        let data = [128u8; 16];
        let map = build_normal_map(&data, 4, 4, InputFormat::Red, 1.0, StorageFormat::Rgba32f).unwrap();
        let (png_data, _) = write_preview_to_vec_with_hash(&map, &PngConfig::default()).unwrap();

        let (width, height, pixels) = decode(&png_data);
        assert_eq!((width, height), (4, 4));
        assert_eq!(&pixels[..4], &[128, 128, 255, 128]);
    }

    #[test]
    fn test_normalized_float_preview_keeps_unit_vectors() {
        // 3x3 ramp; the center texel has dx = 20, dy = 60.
        let data: Vec<u8> = (1..=9).map(|v| v * 10).collect();
        let samples = SampleBuffer::new(&data, 3, 3, 1).unwrap();
        let options = BuildOptions {
            normalize: true,
            ..BuildOptions::default()
        };
        let map = build_normal_map_with(&samples, 1.0, StorageFormat::Rgba32f, &options).unwrap();
        assert!(map.is_normalized());

        let pixels = preview_rgba8(&map);
        let center = &pixels[4 * 4..5 * 4];
        let expected = |v: f32| ((v * 0.5 + 0.5) * 255.0).round() as u8;
        let texel = map.texel(4);
        assert_eq!(center[0], expected(texel[0]));
        assert_eq!(center[1], expected(texel[1]));
        assert_eq!(center[2], expected(texel[2]));
        assert!(center[1] > 240, "dy channel {} should lean strongly", center[1]);
        assert_eq!(center[3], 50);
    }

    #[test]
    fn test_byte_preview_matches_unorm8() {
        let data: Vec<u8> = (0..12u8).map(|v| v * 20).collect();
        let map = build_normal_map(&data, 4, 3, InputFormat::Red, 1.0, StorageFormat::Rgba8).unwrap();
        let (png_data, _) = write_preview_to_vec_with_hash(&map, &PngConfig::default()).unwrap();

        let (_, _, pixels) = decode(&png_data);
        assert_eq!(pixels, map.to_unorm8());
    }

    #[test]
    fn test_write_preview_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("normal.png");
        let data = [0u8, 64, 128, 255];
        let map = build_normal_map(&data, 2, 2, InputFormat::Red, 1.0, StorageFormat::Rgba8).unwrap();

        write_preview(&map, &path, &PngConfig::best_compression()).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
