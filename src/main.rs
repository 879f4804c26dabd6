// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use ekgcheckr::cli::{format_json, format_report, summary_line};
use ekgcheckr::core::visualization::{render_waveform, WaveformConfig};
use ekgcheckr::{
    config, PipelineConfig, Screener, Screening, ScreeningOptions, UploadFormat, Verdict,
};

#[derive(Parser, Debug)]
#[command(name = "ekgcheckr")]
#[command(about = "Screen EKG waveform uploads for anomalies via reconstruction error")]
struct Args {
    /// Input files or directories (csv, tsv, json, txt, dat)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Declared sample rate of the uploads in Hz
    #[arg(short, long, default_value = "250")]
    rate: f64,

    /// Reconstruction-error threshold (defaults to the calibrated pipeline value)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Arm the calibrated feature overrides (hybrid mode)
    #[arg(long)]
    hybrid: bool,

    /// Path to the model artifact
    #[arg(short, long, env = "EKGCHECKR_MODEL")]
    model: Option<PathBuf>,

    /// Path to the calibration bounds document
    #[arg(short, long, env = "EKGCHECKR_CALIBRATION")]
    calibration: Option<PathBuf>,

    /// Emit JSON reports instead of terminal output
    #[arg(long)]
    json: bool,

    /// Render a waveform plot per screened file
    #[arg(short, long)]
    plot: bool,

    /// Output directory for waveform plots
    #[arg(short, long, default_value = "plots")]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let files = collect_ekg_files(&args.inputs)?;
    if files.is_empty() {
        println!("{}", "No EKG files found!".red());
        return Ok(());
    }

    if args.plot {
        std::fs::create_dir_all(&args.output)
            .with_context(|| format!("cannot create plot directory {}", args.output.display()))?;
    }

    let model_path = args.model.clone().unwrap_or_else(config::default_model_path);
    let calibration_path = args
        .calibration
        .clone()
        .unwrap_or_else(config::default_calibration_path);
    let screener = Screener::new(PipelineConfig::default(), model_path, calibration_path);
    let opts = ScreeningOptions {
        input_rate: args.rate,
        threshold: args.threshold,
        use_hybrid: args.hybrid,
    };

    println!("Found {} EKG file(s)\n", files.len());

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let results: Vec<(PathBuf, Result<Screening>)> = files
        .par_iter()
        .progress_with(bar)
        .map(|path| (path.clone(), screen_file(&screener, path, &opts, &args)))
        .collect();

    let mut screened = 0;
    let mut abnormal = 0;
    let mut failed = 0;
    for (path, outcome) in &results {
        let display = path.display().to_string();
        match outcome {
            Ok(screening) => {
                screened += 1;
                if screening.result == Verdict::Abnormal {
                    abnormal += 1;
                }
                if args.json {
                    println!("{}", format_json(screening));
                } else {
                    println!("{}", format_report(&display, screening, args.verbose));
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {e:#}", "✗".red(), display.cyan());
            }
        }
    }

    println!("{}", summary_line(screened, abnormal, failed));

    if screened == 0 && failed > 0 {
        anyhow::bail!("all {failed} file(s) failed to screen");
    }
    Ok(())
}

fn screen_file(
    screener: &Screener,
    path: &Path,
    opts: &ScreeningOptions,
    args: &Args,
) -> Result<Screening> {
    let payload =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let format = UploadFormat::from_path(path)?;
    let (screening, conditioned) = screener.screen_detailed(&payload, format.name(), opts)?;

    if args.plot {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("trace");
        let plot_path = args.output.join(format!("{stem}.png"));
        render_waveform(
            &conditioned.filtered,
            conditioned.rate,
            &screening.window_errors,
            screening.threshold,
            screener.config().win_len(),
            screener.config().step_len(),
            &WaveformConfig::default(),
            &plot_path,
        )
        .with_context(|| format!("cannot render {}", plot_path.display()))?;
        log::info!("waveform plot saved to {}", plot_path.display());
    }

    Ok(screening)
}

fn collect_ekg_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let ekg_extensions = ["csv", "tsv", "json", "txt", "dat"];

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if let Some(ext) = path.extension() {
                    if ekg_extensions.contains(&ext.to_str().unwrap_or("").to_lowercase().as_str())
                    {
                        files.push(path.to_path_buf());
                    }
                }
            }
        } else {
            anyhow::bail!("input {} does not exist", input.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
