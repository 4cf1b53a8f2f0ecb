//! Opt-in unit-length normalization of the vector part of each texel.

use super::{NormalMapBuffer, COMPONENTS};
use crate::format::NumericDomain;

/// Scale `(x, y, z)` of every texel to unit length.
///
/// Zero-length vectors are left alone and the height component is never
/// touched. Byte-domain buffers are decoded to [-1, 1], normalized, and
/// encoded back.
pub fn normalize_vectors(buffer: &mut NormalMapBuffer) {
    let encoded = buffer.domain() == NumericDomain::ByteUnsigned;

    for texel in buffer.data_mut().chunks_exact_mut(COMPONENTS) {
        let mut v = [texel[0], texel[1], texel[2]];
        if encoded {
            for c in &mut v {
                *c = *c * 2.0 - 1.0;
            }
        }

        normalize3(&mut v);

        if encoded {
            for c in &mut v {
                *c = *c * 0.5 + 0.5;
            }
        }
        texel[..3].copy_from_slice(&v);
    }
    buffer.set_normalized();
}

#[inline]
fn normalize3(v: &mut [f32; 3]) {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        v[0] /= len;
        v[1] /= len;
        v[2] /= len;
    }
}
