//! imgtools: chromakey, resize, convert and compress images from the command line.

use anyhow::Context;
use clap::{Parser, Subcommand};
use imgtools_cli::{render, OutputFormat, Status};
use imgtools_core::config::Config;
use imgtools_core::error::exit_codes;
use imgtools_image::{
    writable_extensions, ChromakeyParams, CompressParams, ConvertParams, ImageTools,
    MetadataParams, ResizeParams, ToolCall, TOOL_NAMES,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Image processing tools with safe in-place writes
#[derive(Parser)]
#[command(name = "imgtools")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: .imgtools.toml, imgtools.toml or .config/imgtools.toml)
    #[arg(short, long, global = true, env = "IMGTOOLS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Make a solid background color transparent (PNG output)
    Chromakey {
        /// Image to key
        input: PathBuf,
        /// Where to write the PNG
        output: PathBuf,
        /// Background color as #RRGGBB
        #[arg(short, long)]
        key_color: Option<String>,
        /// Color distance treated as background (0-442)
        #[arg(short, long, allow_negative_numbers = true)]
        tolerance: Option<f64>,
    },

    /// Resize by dimensions or scale factor
    Resize {
        /// Image to resize
        input: PathBuf,
        /// Destination; its extension selects the format
        output: PathBuf,
        /// Target width in pixels
        #[arg(short = 'W', long)]
        width: Option<u32>,
        /// Target height in pixels
        #[arg(short = 'H', long)]
        height: Option<u32>,
        /// Uniform scale factor
        #[arg(short, long, conflicts_with_all = ["width", "height"])]
        scale: Option<f64>,
        /// Do not derive the missing dimension from the aspect ratio
        #[arg(long)]
        no_aspect: bool,
        /// nearest, bilinear, bicubic or lanczos
        #[arg(short, long)]
        resample: Option<String>,
    },

    /// Convert to the format named by the output extension
    Convert {
        /// Image to convert
        input: PathBuf,
        /// Destination (.png, .jpg, .webp, .gif, .bmp)
        output: PathBuf,
        /// Quality for lossy formats (1-100)
        #[arg(short, long)]
        quality: Option<u8>,
    },

    /// Lossy-compress a PNG with pngquant
    Compress {
        /// PNG to compress
        input: PathBuf,
        /// Destination (default: overwrite the input)
        output: Option<PathBuf>,
        /// Target quality (0-100)
        #[arg(short, long)]
        quality: Option<u8>,
    },

    /// Show format, mode, dimensions and transparency
    Metadata {
        /// Image to inspect
        path: PathBuf,
    },

    /// Run a JSON tool request: {"tool": "...", "arguments": {...}}
    Call {
        /// Request document (default: read from stdin)
        #[arg(short, long)]
        request: Option<String>,
    },

    /// Check the external compressor and the loaded config
    Doctor,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            exit_code(exit_codes::FAILURE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("imgtools=debug,imgtools_image=debug,imgtools_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            match cli.format {
                OutputFormat::Json => {
                    let report = serde_json::to_value(err.to_report())?;
                    render(&report, OutputFormat::Json);
                }
                OutputFormat::Text => Status::error(&err.to_string()),
            }
            return Ok(exit_code(exit_codes::CONFIG_ERROR));
        }
    };
    tracing::debug!(path = ?config.path, "configuration loaded");

    let tools = ImageTools::new(config.schema.clone());

    let call = match cli.command {
        Commands::Doctor => return Ok(doctor(&config, &tools)),
        Commands::Call { request } => {
            let request = match request {
                Some(request) => request,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read request from stdin")?;
                    buf
                }
            };
            let response = tools.call_json(&request);
            return Ok(finish(&response, cli.format));
        }
        command => tool_call(command)?,
    };

    let response = tools.call(&call);
    Ok(finish(&response, cli.format))
}

/// Map a subcommand onto its tool request, resolving paths against the cwd.
fn tool_call(command: Commands) -> anyhow::Result<ToolCall> {
    let call = match command {
        Commands::Chromakey {
            input,
            output,
            key_color,
            tolerance,
        } => {
            let mut params = ChromakeyParams::new(absolute(&input)?, absolute(&output)?);
            params.key_color = key_color;
            params.tolerance = tolerance;
            ToolCall::ChromakeyToTransparent(params)
        }
        Commands::Resize {
            input,
            output,
            width,
            height,
            scale,
            no_aspect,
            resample,
        } => ToolCall::ResizeImage(ResizeParams {
            input_path: absolute(&input)?,
            output_path: absolute(&output)?,
            width,
            height,
            scale,
            maintain_aspect: no_aspect.then_some(false),
            resample,
        }),
        Commands::Convert {
            input,
            output,
            quality,
        } => {
            let mut params = ConvertParams::new(absolute(&input)?, absolute(&output)?);
            params.quality = quality;
            ToolCall::ConvertFormat(params)
        }
        Commands::Compress {
            input,
            output,
            quality,
        } => ToolCall::CompressPng(CompressParams {
            input_path: absolute(&input)?,
            output_path: output.as_deref().map(absolute).transpose()?,
            quality,
        }),
        Commands::Metadata { path } => ToolCall::GetImageMetadata(MetadataParams::new(absolute(&path)?)),
        Commands::Call { .. } | Commands::Doctor => {
            anyhow::bail!("not a tool subcommand")
        }
    };
    Ok(call)
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Failed to resolve {}", path.display()))
}

fn finish(response: &serde_json::Value, format: OutputFormat) -> ExitCode {
    if render(response, format) {
        ExitCode::SUCCESS
    } else {
        exit_code(exit_codes::FAILURE)
    }
}

fn doctor(config: &Config, tools: &ImageTools) -> ExitCode {
    Status::header("imgtools doctor");

    match &config.path {
        Some(path) => Status::info(&format!("Config: {}", path.display())),
        None => Status::info("Config: built-in defaults"),
    }

    let compressor = tools.compressor();
    if compressor.is_available() {
        Status::success(&format!("{} found", compressor.name()));
    } else {
        Status::warning(&format!(
            "{} not installed, compress_png will copy files unchanged",
            compressor.name()
        ));
    }

    Status::info(&format!("Tools: {}", TOOL_NAMES.join(", ")));
    Status::info(&format!("Writable extensions: {}", writable_extensions().join(", ")));
    ExitCode::SUCCESS
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
