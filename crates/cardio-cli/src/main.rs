use anyhow::{bail, Context, Result};
use cardio_lib::{
    config::PipelineConfig,
    generator::generate,
    io::text as text_io,
    metrics::hrv::analyze,
    pipeline::{BatchReport, EcgPipeline},
    signal::Sample,
};
use clap::{Parser, Subcommand};
use csv::WriterBuilder;
use log::info;
use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "cardio",
    version,
    about = "Synthetic ECG beat detection and HRV workload"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and process synthetic ECG batches, printing the final summary as JSON
    Run {
        #[arg(long, default_value_t = 50)]
        iterations: u64,
        #[arg(long, default_value_t = 2048)]
        batch_size: usize,
        /// Global sample index of the first generated sample
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Log a progress line every N batches (0 disables)
        #[arg(long, default_value_t = 10)]
        report_every: u64,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write one CSV row per batch
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print synthetic ECG amplitudes, one per line
    Generate {
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long, default_value_t = 2048)]
        count: u64,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run one batch over newline-delimited amplitudes read from stdin or --input file
    Detect {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compute heart metrics from newline-delimited RR intervals (ms)
    Hrv {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            iterations,
            batch_size,
            offset,
            report_every,
            config,
            csv,
        } => cmd_run(
            iterations,
            batch_size,
            offset,
            report_every,
            config.as_deref(),
            csv.as_deref(),
        )?,
        Commands::Generate {
            offset,
            count,
            config,
        } => cmd_generate(offset, count, config.as_deref())?,
        Commands::Detect { input, config } => cmd_detect(input.as_deref(), config.as_deref())?,
        Commands::Hrv { input } => cmd_hrv(input.as_deref())?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn cmd_run(
    iterations: u64,
    batch_size: usize,
    offset: u64,
    report_every: u64,
    config: Option<&Path>,
    csv_out: Option<&Path>,
) -> Result<()> {
    let cfg = load_config(config)?;
    let mut pipeline = EcgPipeline::new(cfg)?;
    info!(
        "sampling rate {} Hz, buffer {} samples, {} iterations",
        cfg.sampling_rate, cfg.buffer_capacity, iterations
    );

    let mut writer = match csv_out {
        Some(path) => Some(
            WriterBuilder::new()
                .from_path(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => None,
    };

    for iteration in 0..iterations {
        let start = match (batch_size as u64)
            .checked_mul(iteration)
            .and_then(|skip| skip.checked_add(offset))
            .filter(|start| start.checked_add(batch_size as u64).is_some())
        {
            Some(start) => start,
            None => bail!(
                "batch {} runs past the last sample index (offset {}, batch size {})",
                iteration,
                offset,
                batch_size
            ),
        };
        let (_, report) = pipeline.run_synthetic_batch(start, batch_size);
        if let Some(writer) = writer.as_mut() {
            writer.serialize(BatchRow::from(&report))?;
        }
        if report_every > 0 && (iteration + 1) % report_every == 0 {
            info!(
                "iteration {}/{}: HR={} BPM, RR={} ms, HRV={}, arrhythmia={}",
                iteration + 1,
                iterations,
                report.metrics.heart_rate,
                report.metrics.rr_interval,
                report.metrics.hrv,
                if report.metrics.arrhythmia {
                    "DETECTED"
                } else {
                    "normal"
                }
            );
        }
    }

    if let Some(mut writer) = writer {
        writer.flush()?;
    }
    println!("{}", serde_json::to_string(&pipeline.summary())?);
    Ok(())
}

/// Flattened `BatchReport` for CSV export.
#[derive(serde::Serialize)]
struct BatchRow {
    batch: u64,
    offset: u64,
    samples: usize,
    beats_detected: usize,
    beats_recorded: usize,
    dropped_beats: usize,
    dropped_intervals: usize,
    implausible_intervals: usize,
    heart_rate: u64,
    rr_interval: u64,
    hrv: u64,
    arrhythmia: bool,
}

impl From<&BatchReport> for BatchRow {
    fn from(r: &BatchReport) -> Self {
        Self {
            batch: r.batch,
            offset: r.offset,
            samples: r.samples,
            beats_detected: r.beats_detected,
            beats_recorded: r.beats_recorded,
            dropped_beats: r.dropped_beats,
            dropped_intervals: r.dropped_intervals,
            implausible_intervals: r.implausible_intervals,
            heart_rate: r.metrics.heart_rate,
            rr_interval: r.metrics.rr_interval,
            hrv: r.metrics.hrv,
            arrhythmia: r.metrics.arrhythmia,
        }
    }
}

fn cmd_generate(offset: u64, count: u64, config: Option<&Path>) -> Result<()> {
    let cfg = load_config(config)?;
    let Some(end) = offset.checked_add(count) else {
        bail!("offset {} plus count {} exceeds the sample index range", offset, count);
    };
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for index in offset..end {
        writeln!(out, "{}", generate(index, cfg.sampling_rate))?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_detect(input: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let cfg = load_config(config)?;
    let amplitudes = match input {
        Some(path) => text_io::read_amplitude_series(path)?,
        None => text_io::parse_amplitude_series(&read_stdin()?)?,
    };
    let period = cfg.sample_period_ms();
    let mut samples: Vec<Sample> = amplitudes
        .into_iter()
        .enumerate()
        .map(|(i, a)| Sample::new(a, (i as u64).saturating_mul(period)))
        .collect();
    let mut pipeline = EcgPipeline::new(cfg)?;
    let report = pipeline.process_batch(0, &mut samples);
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn cmd_hrv(input: Option<&Path>) -> Result<()> {
    let rr = match input {
        Some(path) => text_io::read_rr_series(path)?,
        None => text_io::parse_rr_series(&read_stdin()?)?,
    };
    let metrics = analyze(&rr);
    println!("{}", serde_json::to_string(&metrics)?);
    Ok(())
}
