//! Remap from raw values into the byte storage range.

use serde::{Deserialize, Serialize};

use super::{NormalMapBuffer, COMPONENTS};
use crate::format::NumericDomain;

const INV_255: f32 = 1.0 / 255.0;

/// How gradient differences are brought into [-1, 1] before the byte remap.
///
/// Raw differences are byte deltas in [-255, 255]. `PerByte` divides them by
/// 255 first so the remapped components land in [0, 1]. `Literal` applies
/// `v * 0.5 + 0.5` to the unscaled deltas, which puts them far outside
/// [0, 1]; it exists for bit-exact parity with older pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientRange {
    #[default]
    PerByte,
    Literal,
}

impl GradientRange {
    /// Factor applied to dx/dy ahead of the remap.
    pub fn scale(self) -> f32 {
        match self {
            GradientRange::PerByte => INV_255,
            GradientRange::Literal => 1.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "per-byte" | "per_byte" => Some(GradientRange::PerByte),
            "literal" => Some(GradientRange::Literal),
            _ => None,
        }
    }
}

/// Remap every texel in place: `v * 0.5 + 0.5` for the vector part and
/// `h / 255` for the height.
pub(super) fn to_byte_domain(buffer: &mut NormalMapBuffer, gradient_scale: f32) {
    for texel in buffer.data_mut().chunks_exact_mut(COMPONENTS) {
        texel[0] = texel[0] * gradient_scale * 0.5 + 0.5;
        texel[1] = texel[1] * gradient_scale * 0.5 + 0.5;
        texel[2] = texel[2] * 0.5 + 0.5;
        texel[3] *= INV_255;
    }
    buffer.domain = NumericDomain::ByteUnsigned;
}
