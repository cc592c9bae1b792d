use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use hubcodec_codecs::{get_compressor, supported_names, Compressor};
use hubcodec_core::npy::{from_npy, to_npy};
use hubcodec_core::{Codec, CodecConfig, CodecKind, JpegConfig, Lz4Config, PngConfig, ZstdConfig};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "hubcodec",
    about = "Compress and decompress arrays and byte streams with the registered dataset codecs",
    version
)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered codec names
    Codecs,
    /// Compress a .npy file (or raw bytes with --raw)
    Compress {
        /// Source file
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Decompress back into a .npy file (or raw bytes with --raw)
    Decompress {
        /// Compressed source file
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
}

#[derive(Args, Debug, Default)]
struct CodecArgs {
    /// Registered codec name, see `hubcodec codecs`
    #[arg(short, long)]
    codec: String,
    /// TOML file with codec options, e.g. `codec = "zstd"` and `level = 10`
    #[arg(long)]
    config: Option<PathBuf>,
    /// LZ4 acceleration (>= 1)
    #[arg(long)]
    acceleration: Option<i32>,
    /// Zstd level (1-22)
    #[arg(long)]
    level: Option<i32>,
    /// JPEG quality (1-95)
    #[arg(long)]
    quality: Option<i32>,
    /// Keep grayscale images as (H, W, 1) instead of (H, W)
    #[arg(long)]
    single_channel: Option<bool>,
    /// Treat the data as raw bytes (lz4 and zstd only)
    #[arg(long)]
    raw: bool,
}

// ── Helpers ────────────────────────────────────────────────────────────────

/// Render a byte count with a binary unit, e.g. `2.00 KB`.
fn human_bytes(n: u64) -> String {
    const STEP: f64 = 1024.0;
    if n < 1024 {
        return format!("{n} B");
    }
    let mut size = n as f64 / STEP;
    let mut units = ["KB", "MB", "GB", "TB"].into_iter().peekable();
    while size >= STEP && units.len() > 1 {
        size /= STEP;
        units.next();
    }
    format!("{size:.2} {}", units.peek().copied().unwrap_or("TB"))
}

fn read_config_file(path: &Path) -> anyhow::Result<CodecConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading config file {:?}", path))?;
    toml::from_str(&text).with_context(|| format!("parsing config file {:?}", path))
}

fn unused_flag(flag: &str, codec: &str) -> anyhow::Error {
    anyhow::anyhow!("--{flag} does not apply to codec '{codec}'")
}

/// Merge the options file with the command-line flags. Flags win.
///
/// Unknown codec names and options written for another codec pass through
/// untouched so the registry reports them.
fn resolve_config(args: &CodecArgs) -> anyhow::Result<CodecConfig> {
    let base = match &args.config {
        Some(path) => read_config_file(path)?,
        None => CodecConfig::Default,
    };
    let Some(kind) = CodecKind::from_name(&args.codec) else {
        return Ok(base);
    };
    let flagged = args.acceleration.is_some()
        || args.level.is_some()
        || args.quality.is_some()
        || args.single_channel.is_some();
    if !flagged {
        return Ok(base);
    }
    if base != CodecConfig::Default && base.label() != kind.name() {
        return Ok(base);
    }

    let name = kind.name();
    let config = match kind {
        CodecKind::Png => {
            let mut cfg = match base {
                CodecConfig::Png(cfg) => cfg,
                _ => PngConfig::default(),
            };
            if let Some(single_channel) = args.single_channel {
                cfg.single_channel = single_channel;
            }
            CodecConfig::Png(cfg)
        }
        CodecKind::Jpeg => {
            let mut cfg = match base {
                CodecConfig::Jpeg(cfg) => cfg,
                _ => JpegConfig::default(),
            };
            if let Some(quality) = args.quality {
                cfg.quality = quality;
            }
            if let Some(single_channel) = args.single_channel {
                cfg.single_channel = single_channel;
            }
            CodecConfig::Jpeg(cfg)
        }
        CodecKind::Lz4 => {
            let mut cfg = match base {
                CodecConfig::Lz4(cfg) => cfg,
                _ => Lz4Config::default(),
            };
            if let Some(acceleration) = args.acceleration {
                cfg.acceleration = acceleration;
            }
            CodecConfig::Lz4(cfg)
        }
        CodecKind::Zstd => {
            let mut cfg = match base {
                CodecConfig::Zstd(cfg) => cfg,
                _ => ZstdConfig::default(),
            };
            if let Some(level) = args.level {
                cfg.level = level;
            }
            CodecConfig::Zstd(cfg)
        }
        CodecKind::WebP | CodecKind::NumPy => base,
    };

    let accepts = |flag: &str| match flag {
        "acceleration" => kind == CodecKind::Lz4,
        "level" => kind == CodecKind::Zstd,
        "quality" => kind == CodecKind::Jpeg,
        _ => matches!(kind, CodecKind::Png | CodecKind::Jpeg),
    };
    for (flag, set) in [
        ("acceleration", args.acceleration.is_some()),
        ("level", args.level.is_some()),
        ("quality", args.quality.is_some()),
        ("single-channel", args.single_channel.is_some()),
    ] {
        if set && !accepts(flag) {
            return Err(unused_flag(flag, name));
        }
    }
    Ok(config)
}

fn open_codec(args: &CodecArgs) -> anyhow::Result<Compressor> {
    let config = resolve_config(args)?;
    log::debug!("resolved options for '{}': {:?}", args.codec, config);
    Ok(get_compressor(&args.codec, config)?)
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_codecs() {
    for name in supported_names() {
        if let Some(kind) = CodecKind::from_name(name) {
            println!("  {:<8} {}", name, kind.family());
        }
    }
}

fn run_compress(input: &Path, output: &Path, args: &CodecArgs) -> anyhow::Result<()> {
    let codec = open_codec(args)?;
    let source = fs::read(input).with_context(|| format!("reading input file {:?}", input))?;

    let t0 = Instant::now();
    let compressed = if args.raw {
        let Some(bytes) = codec.as_byte_codec() else {
            bail!("--raw needs a byte-stream codec, '{}' works on arrays", codec.name());
        };
        bytes.compress_bytes(&source)?
    } else {
        let array = from_npy(&source, codec.name())
            .with_context(|| format!("{:?} is not a .npy file (use --raw for plain bytes)", input))?;
        log::debug!("compressing {} array of shape {:?}", array.dtype(), array.shape());
        codec.compress(&array)?
    };
    let elapsed = t0.elapsed();

    fs::write(output, &compressed).with_context(|| format!("writing output file {:?}", output))?;

    let ratio = source.len() as f64 / compressed.len().max(1) as f64;
    eprintln!("  codec       : {}", codec.name());
    eprintln!("  input size  : {}", human_bytes(source.len() as u64));
    eprintln!("  compressed  : {}", human_bytes(compressed.len() as u64));
    eprintln!("  ratio       : {:.2}x", ratio);
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decompress(input: &Path, output: &Path, args: &CodecArgs) -> anyhow::Result<()> {
    let codec = open_codec(args)?;
    let compressed = fs::read(input).with_context(|| format!("reading input file {:?}", input))?;

    let t0 = Instant::now();
    let restored = if args.raw {
        let Some(bytes) = codec.as_byte_codec() else {
            bail!("--raw needs a byte-stream codec, '{}' works on arrays", codec.name());
        };
        bytes.decompress_bytes(&compressed)?
    } else {
        let array = codec.decompress(&compressed)?;
        eprintln!("  array       : {} {:?}", array.dtype(), array.shape());
        to_npy(&array)
    };
    let elapsed = t0.elapsed();

    fs::write(output, &restored).with_context(|| format!("writing output file {:?}", output))?;

    eprintln!("  codec       : {}", codec.name());
    eprintln!("  output size : {}", human_bytes(restored.len() as u64));
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Codecs => {
            run_codecs();
            Ok(())
        }
        Commands::Compress {
            input,
            output,
            codec,
        } => run_compress(&input, &output, &codec),
        Commands::Decompress {
            input,
            output,
            codec,
        } => run_decompress(&input, &output, &codec),
    }
}
