use anyhow::{bail, Context, Result};
use clap::Parser;
use morse_analyzer::{morse, AnalyzerConfig, Band, FilterOptions, StftConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "morse-decode",
    version,
    about = "Decode Morse code audio recordings via spectrogram analysis"
)]
struct Cli {
    /// Audio file containing a keyed Morse tone
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Decode a hand-typed Morse string instead of an audio file
    #[arg(long, value_name = "MORSE", conflicts_with = "file")]
    text: Option<String>,

    /// FFT size in samples
    #[arg(long, default_value_t = 1024)]
    n_fft: usize,

    /// Analysis window length in samples
    #[arg(long, default_value_t = 512)]
    win_length: usize,

    /// Hop between consecutive windows in samples
    #[arg(long, default_value_t = 256)]
    hop_length: usize,

    /// Force cells below this dB level to -80 (flag alone uses -80)
    #[arg(long, value_name = "DB", num_args = 0..=1, default_missing_value = "-80")]
    threshold_db: Option<f32>,

    /// Keep only frequencies at or above this bound (Hz)
    #[arg(long, value_name = "HZ")]
    freq_band_min: Option<f64>,

    /// Keep only frequencies below this bound (Hz)
    #[arg(long, value_name = "HZ")]
    freq_band_max: Option<f64>,

    /// Keep only audio at or after this time (seconds)
    #[arg(long, value_name = "SECS")]
    time_band_min: Option<f64>,

    /// Keep only audio before this time (seconds)
    #[arg(long, value_name = "SECS")]
    time_band_max: Option<f64>,

    /// JSON config file with "stft" and "filters" sections; overrides the
    /// individual flags
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show spectrogram details alongside the decode results
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG controls pipeline logging.
    env_logger::try_init().ok();

    if let Some(text) = &cli.text {
        println!("{}", morse::decode(text));
        return Ok(());
    }

    let file = match &cli.file {
        Some(file) => file,
        None => bail!("no input file specified; see --help"),
    };
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }

    let config = build_config(&cli)?;
    config.stft.validate()?;

    let outcome = morse_analyzer::decode_file(file, &config.stft, &config.filters)
        .with_context(|| format!("failed to decode {}", file.display()))?;

    println!("Sample rate: {} Hz", outcome.sample_rate);
    println!("Bin size: {:.2} Hz", outcome.bin_size);
    if cli.verbose {
        println!(
            "Spectrogram: {} bins x {} frames",
            outcome.num_bins, outcome.num_frames
        );
    }
    println!("Status: {}", outcome.status.join(" | "));
    println!("Code: {}", outcome.code);
    println!("Text: {}", outcome.text);

    Ok(())
}

fn build_config(cli: &Cli) -> Result<AnalyzerConfig> {
    if let Some(path) = &cli.config {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open config {}", path.display()))?;
        let config: AnalyzerConfig = serde_json::from_reader(file)
            .with_context(|| format!("cannot parse config {}", path.display()))?;
        return Ok(config);
    }

    let band = |min: Option<f64>, max: Option<f64>| {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Band { min, max })
        }
    };

    Ok(AnalyzerConfig {
        stft: StftConfig {
            n_fft: cli.n_fft,
            win_length: cli.win_length,
            hop_length: cli.hop_length,
        },
        filters: FilterOptions {
            threshold_db: cli.threshold_db,
            freq_band: band(cli.freq_band_min, cli.freq_band_max),
            time_band: band(cli.time_band_min, cli.time_band_max),
        },
    })
}
