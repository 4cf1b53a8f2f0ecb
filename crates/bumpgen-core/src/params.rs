//! Serializable derivation parameters.

use serde::{Deserialize, Serialize};

use crate::builder::{BuildOptions, GradientRange};
use crate::error::NormalMapError;
use crate::format::{InputFormat, StorageFormat};

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 8192;

/// Parameters for one height map to normal map derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeriveParams {
    /// Grid size [width, height] in texels.
    pub resolution: [u32; 2],
    /// Declared pixel format of the height samples.
    #[serde(default)]
    pub input_format: InputFormat,
    /// Constant written into the z component of every texel.
    #[serde(default = "default_nz")]
    pub nz: f32,
    /// Target GPU storage format.
    #[serde(default)]
    pub storage_format: StorageFormat,
    #[serde(default)]
    pub gradient_range: GradientRange,
    #[serde(default)]
    pub normalize: bool,
    #[serde(default)]
    pub parallel: bool,
}

fn default_nz() -> f32 {
    1.0
}

impl DeriveParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width, height],
            input_format: InputFormat::default(),
            nz: default_nz(),
            storage_format: StorageFormat::default(),
            gradient_range: GradientRange::default(),
            normalize: false,
            parallel: false,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.resolution[0]
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.resolution[1]
    }

    /// Build options carried by these parameters.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            gradient_range: self.gradient_range,
            normalize: self.normalize,
            parallel: self.parallel,
        }
    }

    /// Byte length the height data must have.
    pub fn expected_input_len(&self) -> usize {
        self.width() as usize * self.height() as usize * self.input_format.stride()
    }

    /// Check resolution bounds and that `nz` is finite.
    pub fn validate(&self) -> Result<(), NormalMapError> {
        let [width, height] = self.resolution;
        if width == 0 || height == 0 {
            return Err(NormalMapError::precondition(format!(
                "resolution must be at least 1x1, got [{}, {}]",
                width, height
            )));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(NormalMapError::precondition(format!(
                "resolution is too large: max is {}x{}, got [{}, {}]",
                MAX_DIMENSION, MAX_DIMENSION, width, height
            )));
        }
        if !self.nz.is_finite() {
            return Err(NormalMapError::precondition(format!(
                "nz must be finite, got {}",
                self.nz
            )));
        }
        Ok(())
    }
}
