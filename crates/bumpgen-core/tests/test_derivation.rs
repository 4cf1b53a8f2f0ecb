//! End-to-end checks of the height map to normal map derivation.
//!
//! Covers wraparound addressing, output layout, the storage-dependent range
//! transform, and determinism through the public API.

use bumpgen_core::{
    build_normal_map, build_normal_map_with, neighbor_offsets, BuildOptions, DeriveParams,
    GradientRange, InputFormat, NeighborOffsets, NumericDomain, SampleBuffer, StorageFormat,
};
use pretty_assertions::assert_eq;

const FLOAT_FORMATS: [StorageFormat; 4] = [
    StorageFormat::Rgb16f,
    StorageFormat::Rgba16f,
    StorageFormat::Rgb32f,
    StorageFormat::Rgba32f,
];

fn pattern(len: usize, seed: u32) -> Vec<u8> {
    (0..len as u32)
        .map(|i| (i.wrapping_mul(2654435761).wrapping_add(seed) >> 24) as u8)
        .collect()
}

// ============================================================================
// Addressing
// ============================================================================

#[test_log::test]
fn test_corner_texel_wraps_to_opposite_edges() {
    let offsets = neighbor_offsets(4, 4, 1, 0).unwrap();
    assert_eq!(
        offsets,
        NeighborOffsets {
            u0: 3,
            u1: 1,
            v0: 12,
            v1: 4,
        }
    );
}

#[test_log::test]
fn test_non_square_odd_grid_wraps() {
    // 5x3 grid, texel (col 4, row 0) = index 4.
    let offsets = neighbor_offsets(5, 3, 1, 4).unwrap();
    assert_eq!(offsets.u0, 3);
    assert_eq!(offsets.u1, 0);
    assert_eq!(offsets.v0, 14);
    assert_eq!(offsets.v1, 9);
}

// ============================================================================
// Layout
// ============================================================================

#[test_log::test]
fn test_output_shape_for_every_stride() {
    for format in [InputFormat::Red, InputFormat::Rg, InputFormat::Rgb, InputFormat::Other] {
        for (width, height) in [(1u32, 1u32), (7, 3), (16, 9)] {
            let data = pattern(width as usize * height as usize * format.stride(), 3);
            let map = build_normal_map(&data, width, height, format, 1.0, StorageFormat::Rgba8).unwrap();
            assert_eq!(map.data().len(), (width * height * 4) as usize);
        }
    }
}

#[test_log::test]
fn test_passthrough_before_transform() {
    let data = pattern(6 * 5 * 2, 11);
    for format in FLOAT_FORMATS {
        let map = build_normal_map(&data, 6, 5, InputFormat::Rg, 0.3, format).unwrap();
        for (i, texel) in map.texels().enumerate() {
            assert_eq!(texel[2], 0.3);
            assert_eq!(texel[3], data[i * 2] as f32);
        }
    }
}

#[test_log::test]
fn test_concrete_2x2_scenario() {
    let data = [10u8, 20, 30, 40];
    let map = build_normal_map(&data, 2, 2, InputFormat::Red, 1.0, StorageFormat::Rgba32f).unwrap();
    assert_eq!(map.texel(0), [0.0, 0.0, 1.0, 10.0]);
}

// ============================================================================
// Range transform
// ============================================================================

#[test_log::test]
fn test_byte_branch_stays_in_unit_range() {
    let data = pattern(24 * 24, 5);
    for nz in [-1.0, 0.0, 0.5, 1.0] {
        let map = build_normal_map(&data, 24, 24, InputFormat::Red, nz, StorageFormat::Rgba8).unwrap();
        assert_eq!(map.domain(), NumericDomain::ByteUnsigned);
        assert!(map.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

#[test_log::test]
fn test_float_branch_is_untransformed() {
    let data = pattern(9 * 4, 17);
    let buffer = SampleBuffer::new(&data, 9, 4, 1).unwrap();
    for format in FLOAT_FORMATS {
        for range in [GradientRange::PerByte, GradientRange::Literal] {
            let options = BuildOptions {
                gradient_range: range,
                ..BuildOptions::default()
            };
            let map = build_normal_map_with(&buffer, 1.0, format, &options).unwrap();
            assert_eq!(map.domain(), NumericDomain::FloatSigned);
            for i in 0..buffer.texel_count() {
                let g = bumpgen_core::sample_gradient(&buffer, i).unwrap();
                assert_eq!(
                    map.texel(i),
                    [g.dx as f32, g.dy as f32, 1.0, g.height as f32]
                );
            }
        }
    }
}

#[test_log::test]
fn test_literal_range_reproduces_unscaled_remap() {
    let data = pattern(5 * 5, 23);
    let buffer = SampleBuffer::new(&data, 5, 5, 1).unwrap();
    let raw = build_normal_map_with(&buffer, 1.0, StorageFormat::Rgba32f, &BuildOptions::default()).unwrap();
    let literal = build_normal_map_with(
        &buffer,
        1.0,
        StorageFormat::Rgba8,
        &BuildOptions {
            gradient_range: GradientRange::Literal,
            ..BuildOptions::default()
        },
    )
    .unwrap();

    for (r, l) in raw.texels().zip(literal.texels()) {
        assert_eq!(l[0], r[0] * 0.5 + 0.5);
        assert_eq!(l[1], r[1] * 0.5 + 0.5);
        assert_eq!(l[2], 1.0);
    }
}

// ============================================================================
// Determinism
// ============================================================================

#[test_log::test]
fn test_repeated_builds_are_identical() {
    let data = pattern(64 * 48 * 3, 99);
    let first = build_normal_map(&data, 64, 48, InputFormat::Bgr, 0.8, StorageFormat::Rgba8).unwrap();
    for _ in 0..3 {
        let again = build_normal_map(&data, 64, 48, InputFormat::Bgr, 0.8, StorageFormat::Rgba8).unwrap();
        assert_eq!(first.hash(), again.hash());
        assert_eq!(first.to_unorm8(), again.to_unorm8());
    }
}

#[test_log::test]
fn test_params_drive_a_build() {
    let params: DeriveParams = serde_json::from_str(
        r#"{"resolution": [4, 4], "storage_format": "rgba8", "nz": 0.0}"#,
    )
    .unwrap();
    params.validate().unwrap();

    let data = pattern(params.expected_input_len(), 1);
    let buffer = SampleBuffer::with_format(&data, params.width(), params.height(), params.input_format).unwrap();
    let map = build_normal_map_with(&buffer, params.nz, params.storage_format, &params.build_options()).unwrap();
    assert_eq!(map.texel(0)[2], 0.5);
}

#[test_log::test]
fn test_malformed_input_fails_without_output() {
    let data = pattern(10, 0);
    let result = build_normal_map(&data, 4, 3, InputFormat::Red, 1.0, StorageFormat::Rgba8);
    assert!(result.is_err());
}
