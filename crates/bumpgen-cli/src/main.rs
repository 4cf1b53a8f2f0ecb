//! bumpgen CLI - derive normal maps from raw height samples
//!
//! Input files hold already-decoded samples (no image container); the tool
//! builds the packed normal map and writes the bytes a texture upload
//! would receive.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use bumpgen_cli::commands;
use bumpgen_cli::commands::derive::DeriveOptions;

/// bumpgen - height map to normal map derivation
#[derive(Parser)]
#[command(name = "bumpgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a normal map from a raw height sample file
    Derive {
        /// Raw height samples, row-major, `stride` bytes per texel
        #[arg(short, long)]
        input: PathBuf,

        /// JSON parameters file (flags below override it)
        #[arg(long)]
        params: Option<PathBuf>,

        /// Grid width in texels
        #[arg(long)]
        width: Option<u32>,

        /// Grid height in texels
        #[arg(long)]
        height: Option<u32>,

        /// Input pixel format
        #[arg(long, value_parser = ["red", "rg", "rgb", "bgr", "other"])]
        format: Option<String>,

        /// Constant z component of every normal
        #[arg(long, allow_negative_numbers = true)]
        nz: Option<f32>,

        /// GPU storage format of the target texture
        #[arg(long, value_parser = ["rgb8", "rgba8", "rgb16f", "rgba16f", "rgb32f", "rgba32f"])]
        storage: Option<String>,

        /// Gradient scaling for byte storage
        #[arg(long, value_parser = ["per-byte", "literal"])]
        range: Option<String>,

        /// Normalize (x, y, z) to unit length
        #[arg(long)]
        normalize: bool,

        /// Evaluate texels in parallel
        #[arg(long)]
        parallel: bool,

        /// Write the encoded upload bytes here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an RGBA8 PNG preview here
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the wrapped neighbor offsets of one texel
    Offsets {
        /// Grid width in texels
        #[arg(long)]
        width: u32,

        /// Grid height in texels
        #[arg(long)]
        height: u32,

        /// Bytes per texel
        #[arg(long, default_value_t = 1)]
        stride: usize,

        /// Flat texel index
        #[arg(long)]
        texel: usize,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Derive {
            input,
            params,
            width,
            height,
            format,
            nz,
            storage,
            range,
            normalize,
            parallel,
            output,
            preview,
            json,
        } => commands::derive::run(&DeriveOptions {
            input,
            params,
            width,
            height,
            format,
            nz,
            storage,
            range,
            normalize,
            parallel,
            output,
            preview,
            json,
        }),
        Commands::Offsets {
            width,
            height,
            stride,
            texel,
            json,
        } => commands::offsets::run(width, height, stride, texel, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_derive() {
        let cli = Cli::try_parse_from([
            "bumpgen",
            "derive",
            "--input",
            "height.raw",
            "--width",
            "64",
            "--height",
            "32",
            "--storage",
            "rgba8",
            "--nz",
            "-0.5",
            "--normalize",
        ])
        .unwrap();
        match cli.command {
            Commands::Derive {
                input,
                width,
                height,
                storage,
                nz,
                normalize,
                parallel,
                ..
            } => {
                assert_eq!(input, PathBuf::from("height.raw"));
                assert_eq!(width, Some(64));
                assert_eq!(height, Some(32));
                assert_eq!(storage.as_deref(), Some("rgba8"));
                assert_eq!(nz, Some(-0.5));
                assert!(normalize);
                assert!(!parallel);
            }
            _ => panic!("expected derive command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_storage() {
        let result = Cli::try_parse_from([
            "bumpgen", "derive", "--input", "h.raw", "--storage", "dxt5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_offsets() {
        let cli = Cli::try_parse_from([
            "bumpgen", "offsets", "--width", "4", "--height", "4", "--texel", "0",
        ])
        .unwrap();
        match cli.command {
            Commands::Offsets {
                width,
                height,
                stride,
                texel,
                json,
            } => {
                assert_eq!((width, height, stride, texel), (4, 4, 1, 0));
                assert!(!json);
            }
            _ => panic!("expected offsets command"),
        }
    }
}
