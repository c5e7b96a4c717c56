#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vocal_affect_core::config::{
    Baseline, WindowConfig, DEFAULT_HOP_SECS, DEFAULT_TOP_N, DEFAULT_WINDOW_SECS,
};
use vocal_affect_core::emotion::EmotionScorer;
use vocal_affect_core::features::extract_features;
use vocal_affect_core::session::summarize;
use vocal_affect_core::streaming::StreamingAnalyzer;

#[derive(Parser, Debug)]
#[command(name = "vocal-affect")]
#[command(about = "Prosody-based vocal emotion analysis (pitch/energy/pauses -> emotion)")]
struct Args {
    /// Input WAV file.
    file: PathBuf,

    /// Number of words spoken in the clip; enables speaking-rate estimation.
    #[arg(long)]
    word_count: Option<u32>,

    /// How many ranked emotions to report.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// Reference pitch override (Hz); auto-calibrated from the clip when absent.
    #[arg(long)]
    baseline_pitch: Option<f64>,

    /// Reference energy override.
    #[arg(long)]
    baseline_energy: Option<f64>,

    /// Replay the clip chunk by chunk through the streaming analyzer.
    #[arg(long)]
    stream: bool,

    #[arg(long, default_value_t = DEFAULT_WINDOW_SECS)]
    window_secs: f64,

    #[arg(long, default_value_t = DEFAULT_HOP_SECS)]
    hop_secs: f64,

    /// Chunk size for --stream replay, in milliseconds.
    #[arg(long, default_value_t = 250)]
    chunk_ms: u64,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let (samples, sample_rate) = load_wav(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    tracing::info!(
        samples = samples.len(),
        sample_rate,
        duration_secs = samples.len() as f64 / f64::from(sample_rate),
        "clip loaded"
    );

    if args.stream {
        run_stream(&args, &samples, sample_rate)
    } else {
        run_batch(args, samples, sample_rate).await
    }
}

/// One-shot analysis of the whole clip on a blocking worker.
async fn run_batch(args: Args, samples: Vec<f32>, sample_rate: u32) -> anyhow::Result<()> {
    let report = tokio::task::spawn_blocking(move || {
        let features = extract_features(&samples, sample_rate, args.word_count)?;
        let auto = Baseline::calibrated(features.pitch_mean, Baseline::default().energy);
        let baseline = Baseline::new(
            args.baseline_pitch.unwrap_or(auto.pitch_hz),
            args.baseline_energy.unwrap_or(auto.energy),
        )?;
        Ok::<_, anyhow::Error>(EmotionScorer::new(baseline).report(&features, args.top_n.max(1)))
    })
    .await
    .context("analysis worker failed")??;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Replays the clip through the sliding-window analyzer, printing one JSON
/// line per completed window and the session summary at the end.
fn run_stream(args: &Args, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    let config = WindowConfig::new(sample_rate, args.window_secs, args.hop_secs)?;
    let mut analyzer = StreamingAnalyzer::new(config);

    let chunk_len = ((args.chunk_ms as f64 / 1000.0 * f64::from(sample_rate)) as usize).max(1);
    for chunk in samples.chunks(chunk_len) {
        if let Some(report) = analyzer.ingest(chunk) {
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    tracing::info!(
        windows = analyzer.history().len(),
        trend = %analyzer.trend(5),
        "stream replay finished"
    );
    let summary = summarize(analyzer.history());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Reads a WAV file into normalized mono f32 samples.
fn load_wav(path: &Path) -> anyhow::Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels);
    anyhow::ensure!(channels > 0, "wav file declares zero channels");

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0f32 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    Ok((downmix(&interleaved, channels), spec.sample_rate))
}

fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}
