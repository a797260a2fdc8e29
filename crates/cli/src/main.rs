//! despeckle CLI - speckle filter comparison for grayscale images

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use despeckle_algorithms::compare::{
    difference, difference_stats, morphology_strategies, ComparisonSummary, CompositeParams,
    FailureSummary, FilterBank, FilterStrategy,
};
use despeckle_algorithms::intensity::{auto_invert, invert};
use despeckle_algorithms::smoothing::{from_gray_image, to_gray_image};
use despeckle_algorithms::speckle::{speckle_filter_with, CrimminsParams, PassSchedule};
use despeckle_core::PixelBuffer;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "despeckle")]
#[command(author, version, about = "Speckle removal and filter comparison", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show size and intensity statistics of an image
    Info {
        /// Input image
        input: PathBuf,
    },
    /// Run every filter strategy and write outputs plus difference images
    Compare {
        /// Input images
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output directory
        #[arg(short, long, default_value = "despeckle_out")]
        out_dir: PathBuf,
        /// JSON file with the strategy list (overrides the tuning flags)
        #[arg(long)]
        strategies: Option<PathBuf>,
        /// Write a JSON report of difference statistics
        #[arg(long)]
        report: Option<PathBuf>,
        /// Polarity handling: never, always, auto (invert bright backgrounds)
        #[arg(long, default_value = "never")]
        invert: String,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Apply the Crimmins speckle filter alone
    Crimmins {
        /// Input image
        input: PathBuf,
        /// Output image
        output: PathBuf,
        /// Number of dark+light steps
        #[arg(short = 'n', long, default_value = "3")]
        iterations: usize,
        /// Direction schedule: sequential, accumulated
        #[arg(short, long, default_value = "sequential")]
        schedule: String,
    },
    /// Write the normalized absolute difference of two images
    Diff {
        /// First image
        a: PathBuf,
        /// Second image
        b: PathBuf,
        /// Output image
        output: PathBuf,
    },
    /// Pick a reproducible random sample of images from a directory
    Pick {
        /// Directory to sample from
        dir: PathBuf,
        /// Number of images
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,
        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Parameters of the default strategy set
#[derive(clap::Args, Debug, Clone)]
struct Tuning {
    /// Median window side
    #[arg(long, default_value = "5")]
    median_kernel: usize,
    /// Bilateral window diameter
    #[arg(long, default_value = "15")]
    bilateral_kernel: usize,
    /// Bilateral sigma in intensity space
    #[arg(long, default_value = "75")]
    sigma_color: f32,
    /// Bilateral sigma in pixel space
    #[arg(long, default_value = "15")]
    sigma_space: f32,
    /// Crimmins iterations (speckle and composite)
    #[arg(short = 'n', long, default_value = "3")]
    iterations: usize,
    /// Composite opening element side
    #[arg(long, default_value = "3")]
    opening_kernel: usize,
    /// Composite closing element side
    #[arg(long, default_value = "3")]
    closing_kernel: usize,
    /// Also run erosion, dilation, opening, closing, top-hat and inverted closing
    #[arg(long)]
    morphology: bool,
    /// Square element side for the morphology set
    #[arg(long, default_value = "3")]
    morphology_kernel: usize,
    /// Disk radius of the line-enhancing top-hat
    #[arg(long, default_value = "3")]
    tophat_radius: usize,
}

impl Tuning {
    fn bank(&self) -> Result<FilterBank> {
        let mut bank = FilterBank::new(vec![
            FilterStrategy::median(self.median_kernel),
            FilterStrategy::bilateral(self.bilateral_kernel, self.sigma_color, self.sigma_space),
            FilterStrategy::speckle(self.iterations),
            FilterStrategy::composite(&CompositeParams {
                iterations: self.iterations,
                opening_kernel: self.opening_kernel,
                closing_kernel: self.closing_kernel,
            }),
        ]);
        if self.morphology {
            for strategy in morphology_strategies(self.morphology_kernel)? {
                bank.push(strategy);
            }
            bank.push(FilterStrategy::line_tophat(self.tophat_radius));
            bank.push(FilterStrategy::inverted_closing(self.morphology_kernel));
        }
        Ok(bank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvertMode {
    Never,
    Always,
    Auto,
}

/// Per-image section of the JSON report
#[derive(Serialize)]
struct ImageReport {
    input: PathBuf,
    inverted: bool,
    strategies: Vec<ComparisonSummary>,
    failures: Vec<FailureSummary>,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_gray(path: &Path) -> Result<PixelBuffer> {
    let pb = spinner("Reading image...");
    let image = image::open(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?
        .to_luma8();
    let buffer = from_gray_image(image).context("Failed to convert image")?;
    pb.finish_and_clear();
    info!("Input: {} x {} ({})", buffer.cols(), buffer.rows(), path.display());
    Ok(buffer)
}

fn write_gray(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    to_gray_image(buffer)
        .context("Failed to convert buffer")?
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_schedule(s: &str) -> Result<PassSchedule> {
    match s.to_lowercase().as_str() {
        "sequential" | "seq" => Ok(PassSchedule::Sequential),
        "accumulated" | "acc" | "snapshot" => Ok(PassSchedule::Accumulated),
        _ => anyhow::bail!("Unknown schedule: {}. Use sequential or accumulated.", s),
    }
}

fn parse_invert(s: &str) -> Result<InvertMode> {
    match s.to_lowercase().as_str() {
        "never" | "no" => Ok(InvertMode::Never),
        "always" | "yes" => Ok(InvertMode::Always),
        "auto" => Ok(InvertMode::Auto),
        _ => anyhow::bail!("Unknown invert mode: {}. Use never, always, or auto.", s),
    }
}

fn load_bank(strategies: Option<&Path>, tuning: &Tuning) -> Result<FilterBank> {
    match strategies {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid strategy file {}", path.display()))
        }
        None => tuning.bank(),
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn compare_one(
    input: &Path,
    bank: &FilterBank,
    mode: InvertMode,
    out_dir: &Path,
) -> Result<ImageReport> {
    let buffer = read_gray(input)?;
    let (buffer, inverted) = match mode {
        InvertMode::Never => (buffer, false),
        InvertMode::Always => (invert(&buffer), true),
        InvertMode::Auto => auto_invert(&buffer),
    };
    if inverted {
        info!("Inverted {} before filtering", input.display());
    }

    let pb = spinner("Filtering...");
    let start = Instant::now();
    let report = bank.compare(&buffer).context("Failed to compare filters")?;
    pb.finish_and_clear();
    let elapsed = start.elapsed();

    let stem = file_stem(input);
    for entry in report.entries() {
        write_gray(&entry.output, &out_dir.join(format!("{}_{}.png", stem, entry.label)))?;
        write_gray(
            &entry.difference,
            &out_dir.join(format!("{}_{}_diff.png", stem, entry.label)),
        )?;
        println!(
            "  {:<12} changed {:>6.2}%  mean |diff| {:>7.3}  max |diff| {:>3}",
            entry.label,
            100.0 * entry.stats.changed_fraction(),
            entry.stats.mean,
            entry.stats.max
        );
    }
    for (label, err) in report.failures() {
        warn!("{} skipped: {}", label, err);
    }
    println!("  Processing time: {:.2?}", elapsed);

    Ok(ImageReport {
        input: input.to_path_buf(),
        inverted,
        strategies: report.summaries(),
        failures: report.failure_summaries(),
    })
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            let buffer = read_gray(&input)?;
            let stats = buffer.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} pixels)", buffer.cols(), buffer.rows(), buffer.len());
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
        }

        Commands::Compare {
            inputs,
            out_dir,
            strategies,
            report,
            invert,
            tuning,
        } => {
            let mode = parse_invert(&invert)?;
            let bank = load_bank(strategies.as_deref(), &tuning)?;
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("Cannot create {}", out_dir.display()))?;
            info!("Running {} strategies", bank.strategies().len());

            let mut reports = Vec::with_capacity(inputs.len());
            for input in &inputs {
                println!("{}", input.display());
                reports.push(compare_one(input, &bank, mode, &out_dir)?);
            }

            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&reports)?;
                fs::write(&path, json)
                    .with_context(|| format!("Failed to write report {}", path.display()))?;
                println!("Report saved to: {}", path.display());
            }
            println!("Outputs written to: {}", out_dir.display());
        }

        Commands::Crimmins {
            input,
            output,
            iterations,
            schedule,
        } => {
            let params = CrimminsParams {
                iterations,
                schedule: parse_schedule(&schedule)?,
            };
            let buffer = read_gray(&input)?;
            let start = Instant::now();
            let result =
                speckle_filter_with(&buffer, &params).context("Failed to apply Crimmins filter")?;
            let elapsed = start.elapsed();
            write_gray(&result, &output)?;
            done("Crimmins", &output, elapsed);
        }

        Commands::Diff { a, b, output } => {
            let a = read_gray(&a)?;
            let b = read_gray(&b)?;
            let start = Instant::now();
            let result = difference(&a, &b).context("Failed to compute difference")?;
            let stats = difference_stats(&a, &b)?;
            let elapsed = start.elapsed();
            write_gray(&result, &output)?;
            println!(
                "Changed pixels: {} of {}, mean |diff| {:.3}, max |diff| {}",
                stats.changed, stats.total, stats.mean, stats.max
            );
            done("Difference", &output, elapsed);
        }

        Commands::Pick { dir, count, seed } => {
            let mut files: Vec<PathBuf> = fs::read_dir(&dir)
                .with_context(|| format!("Cannot read directory {}", dir.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            files.sort();
            if files.len() < count {
                anyhow::bail!(
                    "Requested {} images but {} only has {}",
                    count,
                    dir.display(),
                    files.len()
                );
            }

            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };
            for path in files.choose_multiple(&mut rng, count) {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schedule() {
        assert_eq!(parse_schedule("Sequential").unwrap(), PassSchedule::Sequential);
        assert_eq!(parse_schedule("acc").unwrap(), PassSchedule::Accumulated);
        assert!(parse_schedule("random").is_err());
    }

    #[test]
    fn test_parse_invert() {
        assert_eq!(parse_invert("auto").unwrap(), InvertMode::Auto);
        assert!(parse_invert("sometimes").is_err());
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("a/b/scan.PNG")));
        assert!(is_image(Path::new("x.jpeg")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("noext")));
    }

    #[test]
    fn test_default_tuning_matches_library_defaults() {
        let cli = Cli::parse_from(["despeckle", "compare", "in.png"]);
        let Commands::Compare { tuning, .. } = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(tuning.bank().unwrap(), FilterBank::default());
    }

    #[test]
    fn test_morphology_flag_extends_bank() {
        let cli = Cli::parse_from(["despeckle", "compare", "in.png", "--morphology"]);
        let Commands::Compare { tuning, .. } = cli.command else {
            panic!("expected compare");
        };
        let labels: Vec<_> = tuning
            .bank()
            .unwrap()
            .strategies()
            .iter()
            .map(|s| s.label.clone())
            .collect();
        assert_eq!(labels.len(), 10);
        assert!(labels.contains(&"tophat".to_string()));
        assert!(labels.contains(&"inverted-closing".to_string()));
    }
}
