//! Pixel format tags for the height input and the normal map storage.
//!
//! Both tags map to and from the matching OpenGL enum values so a caller
//! driving a GL context can pass its constants straight through.

use serde::{Deserialize, Serialize};

/// OpenGL enum values for the recognized formats.
pub mod gl {
    pub const RED: u32 = 0x1903;
    pub const RG: u32 = 0x8227;
    pub const RGB: u32 = 0x1907;
    pub const BGR: u32 = 0x80E0;
    pub const RGB8: u32 = 0x8051;
    pub const RGBA8: u32 = 0x8058;
    pub const RGB16F: u32 = 0x881B;
    pub const RGBA16F: u32 = 0x881A;
    pub const RGB32F: u32 = 0x8815;
    pub const RGBA32F: u32 = 0x8814;
}

/// Declared pixel format of the height map samples.
///
/// Only the first channel of each texel is read; the format decides how many
/// bytes to step over per texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Single channel.
    #[default]
    Red,
    /// Two channels.
    Rg,
    /// Three channels, red first.
    Rgb,
    /// Three channels, blue first.
    Bgr,
    /// Any format not listed above. Treated as one byte per texel.
    Other,
}

impl InputFormat {
    /// Bytes per texel in the input buffer.
    pub fn stride(self) -> usize {
        match self {
            InputFormat::Red => 1,
            InputFormat::Rg => 2,
            InputFormat::Rgb | InputFormat::Bgr => 3,
            InputFormat::Other => 1,
        }
    }

    /// Map a GL pixel format enum. Unrecognized values become `Other`.
    pub fn from_gl(value: u32) -> Self {
        match value {
            gl::RED => InputFormat::Red,
            gl::RG => InputFormat::Rg,
            gl::RGB => InputFormat::Rgb,
            gl::BGR => InputFormat::Bgr,
            _ => InputFormat::Other,
        }
    }

    /// The GL enum for this format, if it has one.
    pub fn to_gl(self) -> Option<u32> {
        match self {
            InputFormat::Red => Some(gl::RED),
            InputFormat::Rg => Some(gl::RG),
            InputFormat::Rgb => Some(gl::RGB),
            InputFormat::Bgr => Some(gl::BGR),
            InputFormat::Other => None,
        }
    }

    /// Parse a lowercase name as used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "red" | "r" => Some(InputFormat::Red),
            "rg" => Some(InputFormat::Rg),
            "rgb" => Some(InputFormat::Rgb),
            "bgr" => Some(InputFormat::Bgr),
            "other" => Some(InputFormat::Other),
            _ => None,
        }
    }
}

/// GPU internal storage format the normal map is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageFormat {
    Rgb8,
    Rgba8,
    Rgb16f,
    #[default]
    Rgba16f,
    Rgb32f,
    Rgba32f,
    /// Unrecognized GL internal format. Treated as a byte format.
    Other(u32),
}

impl StorageFormat {
    /// Whether this is one of the floating-point storage formats.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            StorageFormat::Rgb16f
                | StorageFormat::Rgba16f
                | StorageFormat::Rgb32f
                | StorageFormat::Rgba32f
        )
    }

    /// Whether the format stores 16-bit floats.
    pub fn is_half_float(self) -> bool {
        matches!(self, StorageFormat::Rgb16f | StorageFormat::Rgba16f)
    }

    /// Numeric domain the normal map must be built in for this format.
    pub fn domain(self) -> NumericDomain {
        if self.is_float() {
            NumericDomain::FloatSigned
        } else {
            NumericDomain::ByteUnsigned
        }
    }

    /// Map a GL internal format enum.
    pub fn from_gl(value: u32) -> Self {
        match value {
            gl::RGB8 => StorageFormat::Rgb8,
            gl::RGBA8 => StorageFormat::Rgba8,
            gl::RGB16F => StorageFormat::Rgb16f,
            gl::RGBA16F => StorageFormat::Rgba16f,
            gl::RGB32F => StorageFormat::Rgb32f,
            gl::RGBA32F => StorageFormat::Rgba32f,
            other => StorageFormat::Other(other),
        }
    }

    /// The GL enum for this format.
    pub fn to_gl(self) -> u32 {
        match self {
            StorageFormat::Rgb8 => gl::RGB8,
            StorageFormat::Rgba8 => gl::RGBA8,
            StorageFormat::Rgb16f => gl::RGB16F,
            StorageFormat::Rgba16f => gl::RGBA16F,
            StorageFormat::Rgb32f => gl::RGB32F,
            StorageFormat::Rgba32f => gl::RGBA32F,
            StorageFormat::Other(value) => value,
        }
    }

    /// Short lowercase name, e.g. "rgba16f".
    pub fn name(self) -> &'static str {
        match self {
            StorageFormat::Rgb8 => "rgb8",
            StorageFormat::Rgba8 => "rgba8",
            StorageFormat::Rgb16f => "rgb16f",
            StorageFormat::Rgba16f => "rgba16f",
            StorageFormat::Rgb32f => "rgb32f",
            StorageFormat::Rgba32f => "rgba32f",
            StorageFormat::Other(_) => "other",
        }
    }

    /// Parse a lowercase name as used on the command line.
    ///
    /// Only the six known formats have names; [`StorageFormat::Other`] is
    /// reachable only through [`StorageFormat::from_gl`] or deserialization.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rgb8" => Some(StorageFormat::Rgb8),
            "rgba8" => Some(StorageFormat::Rgba8),
            "rgb16f" => Some(StorageFormat::Rgb16f),
            "rgba16f" => Some(StorageFormat::Rgba16f),
            "rgb32f" => Some(StorageFormat::Rgb32f),
            "rgba32f" => Some(StorageFormat::Rgba32f),
            _ => None,
        }
    }
}

/// Numeric range of the values held in a normal map buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericDomain {
    /// Raw signed values for floating-point textures.
    FloatSigned,
    /// Values remapped to [0, 1], expanded to bytes on upload.
    ByteUnsigned,
}

impl NumericDomain {
    pub fn name(self) -> &'static str {
        match self {
            NumericDomain::FloatSigned => "float_signed",
            NumericDomain::ByteUnsigned => "byte_unsigned",
        }
    }
}
