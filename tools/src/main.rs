use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{
    decode_frame, encode_frame_with_stats, CodecLimits, EncodeOptions, Encoding, FrameDesc,
    PixelFormat,
};
use framedelta_tools::{format_inspect_pretty, inspect_frame, InspectReport};
use glob::Pattern;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "framedelta-tools",
    version,
    about = "framedelta encoding, decoding and inspection tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a raw pixel file into a framedelta stream.
    Encode {
        /// Path to the raw pixel bytes.
        input: PathBuf,
        /// Where to write the encoded stream.
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Pixel format: r8g8b8, l8 or bayer.
        #[arg(long, default_value = "r8g8b8")]
        format: PixelFormat,
        /// Encoding: raw, temporal or spatial.
        #[arg(long, default_value = "spatial")]
        encoding: Encoding,
        /// Raw pixels of the previous frame, for temporal encoding.
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Run the payload through zlib.
        #[arg(long)]
        compress: bool,
        /// zlib level, 0 to 9.
        #[arg(long, default_value_t = 6)]
        level: u32,
    },
    /// Decode a framedelta stream into raw pixels.
    Decode {
        /// Path to the encoded stream.
        input: PathBuf,
        /// Where to write the raw pixel bytes.
        #[arg(short, long)]
        output: PathBuf,
        /// Raw pixels of the previous frame, for temporal streams.
        #[arg(long)]
        previous: Option<PathBuf>,
    },
    /// Inspect frame headers and sizes.
    Inspect {
        /// Path to an encoded stream, or a directory of them.
        frame_path: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = InspectFormat::Pretty)]
        format: InspectFormat,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected frames.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected frames (after sorting).
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse().command)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Encode {
            input,
            output,
            width,
            height,
            format,
            encoding,
            previous,
            compress,
            level,
        } => {
            let frame = read_file(&input, "frame")?;
            let previous = previous
                .as_deref()
                .map(|path| read_file(path, "previous frame"))
                .transpose()?;
            let desc = FrameDesc::new(width, height, format);
            let mut options = EncodeOptions::new(encoding);
            if compress {
                options = options.with_compression(level);
            }
            let (bytes, stats) =
                encode_frame_with_stats(&frame, previous.as_deref(), desc, &options)
                    .context("encode frame")?;
            fs::write(&output, &bytes)
                .with_context(|| format!("write stream {}", output.display()))?;
            tracing::info!(
                frame_bytes = frame.len(),
                encoded_bytes = bytes.len(),
                literal_bytes = stats.literal_bytes,
                delta_codes = stats.delta_codes,
                escapes = stats.escapes,
                "wrote {}",
                output.display()
            );
        }
        Command::Decode {
            input,
            output,
            previous,
        } => {
            let bytes = read_file(&input, "stream")?;
            let previous = previous
                .as_deref()
                .map(|path| read_file(path, "previous frame"))
                .transpose()?;
            let decoded = decode_frame(&bytes, previous.as_deref(), &CodecLimits::default())
                .context("decode frame")?;
            fs::write(&output, &decoded.pixels)
                .with_context(|| format!("write pixels {}", output.display()))?;
            tracing::info!(
                encoding = %decoded.header.encoding,
                format = %decoded.header.format,
                width = decoded.header.width,
                height = decoded.header.height,
                "wrote {}",
                output.display()
            );
        }
        Command::Inspect {
            frame_path,
            format,
            glob,
            sort,
            limit,
        } => {
            let limits = CodecLimits::default();
            if frame_path.is_dir() {
                let entries = collect_frame_entries(&frame_path, glob.as_deref())?;
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                for entry in entries {
                    let bytes = read_file(&entry.path, "stream")?;
                    let report = inspect_frame(&bytes, &limits)
                        .with_context(|| format!("inspect {}", entry.path.display()))?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    print_inspect_report(&report, format)?;
                }
            } else {
                let bytes = read_file(&frame_path, "stream")?;
                let report = inspect_frame(&bytes, &limits).context("inspect frame")?;
                print_inspect_report(&report, format)?;
            }
        }
    }
    Ok(())
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {what} {}", path.display()))
}

struct FrameEntry {
    path: PathBuf,
    size: u64,
}

fn collect_frame_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<FrameEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(FrameEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn maybe_sort_entries(mut entries: Vec<FrameEntry>, sort: Option<InspectSort>) -> Vec<FrameEntry> {
    if let Some(InspectSort::Size) = sort {
        entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    }
    entries
}

fn print_inspect_report(report: &InspectReport, format: InspectFormat) -> Result<()> {
    match format {
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("serialize json")?;
            println!("{json}");
        }
        InspectFormat::Pretty => println!("{}", format_inspect_pretty(report)),
    }
    Ok(())
}
