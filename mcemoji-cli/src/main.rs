//! MCEmoji CLI Tool
//!
//! Command-line interface for packing PNG emojis into `.mcemoji` files and
//! inspecting packaged emojis.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use mcemoji_core::{FormatVariant, RecordDefaults, Store};
use mcemoji_decoder::{DecodedEmoji, EmojiSet};
use mcemoji_encoder::{export_to, import_pngs, DirectorySink, EncoderConfig, Manifest};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

mod logs;

#[derive(Parser, Debug)]
#[command(name = "mcemoji")]
#[command(about = "MCEmoji - pack PNG emojis for Minecraft servers")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v warn, -vv info, -vvv debug, -vvvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack PNG files into .mcemoji files
    Pack {
        /// PNG files, or directories containing PNG files
        inputs: Vec<PathBuf>,

        /// JSON manifest listing emojis and their metrics
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Output directory for the .mcemoji files
        #[arg(short, long)]
        output: PathBuf,

        /// Binary layout (current or legacy)
        #[arg(long, default_value_t = FormatVariant::Current)]
        format: FormatVariant,

        /// Ascent given to emojis without an explicit one
        #[arg(long)]
        ascent: Option<u32>,

        /// Height given to emojis without an explicit one
        #[arg(long)]
        height: Option<u32>,

        /// Use the older editor's default metrics (7/7) instead of 8/9
        #[arg(long)]
        legacy_metrics: bool,
    },

    /// Show the contents of .mcemoji files
    Inspect {
        /// A .mcemoji file or a directory of them
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let logs_on = logs::from_env();
    let cli = Cli::parse();

    if logs_on {
        if cli.verbose > 0 {
            warn!("ignoring -v, RUST_LOG is set");
        }
    } else {
        logs::from_verbosity(cli.verbose);
    }
    debug!(?cli, "got arguments");

    match cli.command {
        Commands::Pack {
            inputs,
            manifest,
            output,
            format,
            ascent,
            height,
            legacy_metrics,
        } => {
            let config = encoder_config(format, ascent, height, legacy_metrics);
            pack_emojis(&inputs, manifest.as_deref(), &output, &config)?
        }

        Commands::Inspect { input } => inspect_emojis(&input)?,
    }

    Ok(())
}

fn encoder_config(
    variant: FormatVariant,
    ascent: Option<u32>,
    height: Option<u32>,
    legacy_metrics: bool,
) -> EncoderConfig {
    let base = if legacy_metrics {
        RecordDefaults::LEGACY
    } else {
        RecordDefaults::default()
    };

    EncoderConfig {
        variant,
        defaults: RecordDefaults {
            ascent: ascent.unwrap_or(base.ascent),
            height: height.unwrap_or(base.height),
        },
    }
}

fn pack_emojis(
    inputs: &[PathBuf],
    manifest: Option<&Path>,
    output: &Path,
    config: &EncoderConfig,
) -> Result<()> {
    if inputs.is_empty() && manifest.is_none() {
        bail!("Nothing to pack, give some PNG files or a manifest");
    }

    let mut store = Store::new();

    if let Some(manifest_path) = manifest {
        println!("Reading manifest: {}", manifest_path.display());
        let manifest = Manifest::open(manifest_path).context("Failed to read manifest")?;
        let base_dir = manifest_path.parent().unwrap_or(Path::new("."));
        manifest
            .populate(&mut store, base_dir, config.defaults)
            .context("Failed to load manifest emojis")?;
    }

    let files = collect_inputs(inputs)?;
    let report = import_pngs(&mut store, &files, config.defaults);
    if !report.is_clean() {
        println!("{} errors occurred", report.rejected.len());
        for (_, err) in &report.rejected {
            println!("  {err}");
        }
    }

    for (index, record) in store.live_entries() {
        debug!(index, name = %record.name, size = record.image_len(), "queued emoji");
    }

    println!(
        "Packing {} emojis ({} layout) into {}",
        store.live_count(),
        config.variant,
        output.display()
    );

    let sink = DirectorySink::create(output).context("Failed to create output directory")?;
    let written = export_to(&store, config, sink).context("Failed to export emojis")?;

    println!("Successfully wrote {} files", written.len());
    Ok(())
}

/// Expands directories into the PNG files they contain
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?
            {
                let path = entry?.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "png") {
                    found.push(path);
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn inspect_emojis(input: &Path) -> Result<()> {
    let set = if input.is_dir() {
        EmojiSet::load_dir(input).context("Failed to read emoji directory")?
    } else {
        let emoji = DecodedEmoji::open(input).context("Failed to read emoji file")?;
        EmojiSet::new(vec![emoji])
    };

    print_info(&set);
    Ok(())
}

fn print_info(set: &EmojiSet) {
    println!("\n=== MCEmoji Information ===");
    println!("Emojis: {}", set.len());
    println!(
        "Total image size: {} bytes ({:.2} KB)",
        set.total_image_size(),
        set.total_image_size() as f64 / 1024.0
    );

    println!("\n=== Emojis (render order) ===");
    for emoji in set.emojis() {
        let record = &emoji.record;
        let priority = emoji
            .priority()
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let dimensions = match emoji.image_dimensions() {
            Ok(Some((w, h))) => format!("{w}x{h}"),
            Ok(None) => "no image".to_string(),
            Err(err) => format!("unreadable image ({err})"),
        };

        println!(
            "  {} [{}]: height {}, ascent {}, priority {}, {} bytes, {}",
            record.name,
            record.variant,
            record.height,
            record.ascent,
            priority,
            record.image.len(),
            dimensions
        );
        if record.padding > 0 {
            println!("    ({} padding bytes after the record)", record.padding);
        }
    }
}
