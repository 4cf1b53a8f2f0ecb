//! Derive command implementation
//!
//! Reads raw, already-decoded height samples, builds the normal map, encodes
//! it for upload, and writes the upload bytes and an optional PNG preview.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bumpgen_core::png::{write_preview_to_vec_with_hash, PngConfig};
use bumpgen_core::{
    derive_and_upload, DeriveParams, GradientRange, InputFormat, MemoryUploader, SampleBuffer,
    SamplerParams, StorageFormat,
};

/// Options collected from the command line.
///
/// Every `Option` left as `None` falls back to the params file, then to the
/// `DeriveParams` defaults.
#[derive(Debug, Default, Clone)]
pub struct DeriveOptions {
    pub input: PathBuf,
    pub params: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub nz: Option<f32>,
    pub storage: Option<String>,
    pub range: Option<String>,
    pub normalize: bool,
    pub parallel: bool,
    pub output: Option<PathBuf>,
    pub preview: Option<PathBuf>,
    pub json: bool,
}

/// Result of a derive run.
#[derive(Debug, Serialize)]
pub struct DeriveReport {
    pub width: u32,
    pub height: u32,
    pub input_format: InputFormat,
    pub storage_format: StorageFormat,
    pub domain: &'static str,
    pub transfer: &'static str,
    pub nz: f32,
    pub gradient_range: GradientRange,
    pub normalized: bool,
    pub buffer_hash: String,
    pub upload_bytes: usize,
    pub sampler: SamplerParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_hash: Option<String>,
}

/// Merge the params file and command-line overrides, then validate.
pub fn resolve_params(options: &DeriveOptions) -> Result<DeriveParams> {
    let mut params = match &options.params {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read params file: {}", path.display()))?;
            serde_json::from_str::<DeriveParams>(&text)
                .with_context(|| format!("Failed to parse params file: {}", path.display()))?
        }
        None => {
            let (Some(width), Some(height)) = (options.width, options.height) else {
                anyhow::bail!("--width and --height are required without --params");
            };
            DeriveParams::new(width, height)
        }
    };

    if let Some(width) = options.width {
        params.resolution[0] = width;
    }
    if let Some(height) = options.height {
        params.resolution[1] = height;
    }
    if let Some(name) = &options.format {
        params.input_format = InputFormat::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown input format: {}", name))?;
    }
    if let Some(nz) = options.nz {
        params.nz = nz;
    }
    if let Some(name) = &options.storage {
        params.storage_format = StorageFormat::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown storage format: {}", name))?;
    }
    if let Some(name) = &options.range {
        params.gradient_range = GradientRange::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown gradient range: {}", name))?;
    }
    params.normalize |= options.normalize;
    params.parallel |= options.parallel;

    params.validate()?;
    Ok(params)
}

/// Execute a derive run and write its outputs.
pub fn execute(options: &DeriveOptions) -> Result<DeriveReport> {
    let params = resolve_params(options)?;

    let data = fs::read(&options.input)
        .with_context(|| format!("Failed to read input: {}", options.input.display()))?;
    if data.len() != params.expected_input_len() {
        anyhow::bail!(
            "Input has {} bytes, expected {} for {}x{} {:?}",
            data.len(),
            params.expected_input_len(),
            params.width(),
            params.height(),
            params.input_format
        );
    }

    let samples = SampleBuffer::with_format(&data, params.width(), params.height(), params.input_format)?;
    let sampler = SamplerParams::default();
    let mut uploader = MemoryUploader::new();
    let (id, buffer) = derive_and_upload(
        &mut uploader,
        &samples,
        params.nz,
        params.storage_format,
        &params.build_options(),
        sampler,
    )?;
    let request = uploader
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Upload {} missing after success", id.0))?;
    log::debug!("encoded {} upload bytes", request.bytes.len());

    if let Some(path) = &options.output {
        write_file(path, &request.bytes)?;
    }

    let mut preview_hash = None;
    if let Some(path) = &options.preview {
        let (png_data, hash) = write_preview_to_vec_with_hash(&buffer, &PngConfig::default())?;
        write_file(path, &png_data)?;
        preview_hash = Some(hash);
    }

    Ok(DeriveReport {
        width: buffer.width(),
        height: buffer.height(),
        input_format: params.input_format,
        storage_format: params.storage_format,
        domain: buffer.domain().name(),
        transfer: request.transfer.name(),
        nz: params.nz,
        gradient_range: params.gradient_range,
        normalized: params.normalize,
        buffer_hash: buffer.hash(),
        upload_bytes: request.bytes.len(),
        sampler,
        output: options.output.as_ref().map(|p| p.display().to_string()),
        preview: options.preview.as_ref().map(|p| p.display().to_string()),
        preview_hash,
    })
}

/// Run the derive command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(options: &DeriveOptions) -> Result<ExitCode> {
    let report = execute(options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    print_report(&report);
    Ok(ExitCode::SUCCESS)
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(path, data).with_context(|| format!("Failed to write: {}", path.display()))
}

fn print_report(report: &DeriveReport) {
    println!("{}", "Normal map derived".green().bold());
    println!(
        "  {} {}x{}",
        "Size:".dimmed(),
        report.width,
        report.height
    );
    println!(
        "  {} {:?} -> {}",
        "Format:".dimmed(),
        report.input_format,
        report.storage_format.name()
    );
    println!(
        "  {} {} ({} transfer, {} bytes)",
        "Domain:".dimmed(),
        report.domain,
        report.transfer,
        report.upload_bytes
    );
    println!("  {} {}", "Hash:".dimmed(), &report.buffer_hash[..16]);
    if let Some(output) = &report.output {
        println!("  {} {}", "Output:".dimmed(), output);
    }
    if let Some(preview) = &report.preview {
        println!("  {} {}", "Preview:".dimmed(), preview);
    }
}
