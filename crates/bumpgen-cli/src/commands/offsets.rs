//! Offsets command implementation
//!
//! Prints the wrapped neighbor offsets of a single texel, for checking the
//! border policy against hand-computed values.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use bumpgen_core::neighbor_offsets;

/// Machine-readable offsets report.
#[derive(Debug, Serialize)]
pub struct OffsetsReport {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub texel: usize,
    pub column: usize,
    pub row: usize,
    pub u0: usize,
    pub u1: usize,
    pub v0: usize,
    pub v1: usize,
}

/// Compute the report without printing it.
pub fn compute(width: u32, height: u32, stride: usize, texel: usize) -> Result<OffsetsReport> {
    if stride == 0 {
        anyhow::bail!("stride must be positive");
    }
    let offsets = neighbor_offsets(width, height, stride, texel)?;
    Ok(OffsetsReport {
        width,
        height,
        stride,
        texel,
        column: texel % width as usize,
        row: texel / width as usize,
        u0: offsets.u0,
        u1: offsets.u1,
        v0: offsets.v0,
        v1: offsets.v1,
    })
}

/// Run the offsets command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(width: u32, height: u32, stride: usize, texel: usize, json_output: bool) -> Result<ExitCode> {
    let report = compute(width, height, stride, texel)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} (col {}, row {}) in {}x{}, stride {}",
        "Texel".cyan().bold(),
        report.texel,
        report.column,
        report.row,
        report.width,
        report.height,
        report.stride
    );
    println!("  {} {}", "left  u0:".dimmed(), report.u0);
    println!("  {} {}", "right u1:".dimmed(), report.u1);
    println!("  {} {}", "above v0:".dimmed(), report.v0);
    println!("  {} {}", "below v1:".dimmed(), report.v1);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_corner() {
        let report = compute(4, 4, 1, 0).unwrap();
        assert_eq!((report.u0, report.u1, report.v0, report.v1), (3, 1, 12, 4));
        assert_eq!((report.column, report.row), (0, 0));
    }

    #[test]
    fn test_compute_rejects_out_of_range() {
        assert!(compute(4, 4, 1, 16).is_err());
        assert!(compute(4, 4, 0, 0).is_err());
    }

    #[test]
    fn test_compute_rejects_overflowing_stride() {
        let err = compute(4, 4, usize::MAX / 2, 1).unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }
}
