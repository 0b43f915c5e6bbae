//! End-to-end decoding entry points.
//!
//! Transform, filter, solve, and table-decode in one pass. Every stage is
//! also callable on its own (e.g. to re-filter an existing spectrogram
//! with different bands); these helpers just wire the common path.

use crate::audio::loader;
use crate::dsp::{decoder, filter, mapping, stft};
use crate::error::Result;
use crate::morse;
use crate::types::{AudioData, FilterOptions, StftConfig};
use std::path::Path;

/// Everything a front end needs to display after one decode pass.
#[derive(Clone, Debug)]
pub struct DecodeOutcome {
    pub sample_rate: u32,
    /// Hz per frequency bin for the configuration used.
    pub bin_size: f64,
    pub num_bins: usize,
    pub num_frames: usize,
    /// Ordered diagnostic trace from the symbol decoder.
    pub status: Vec<String>,
    /// Recovered Morse string; empty on a decode dead end.
    pub code: String,
    /// Plain-text decoding of `code`.
    pub text: String,
}

/// Run the full pipeline over an in-memory recording.
pub fn decode_samples(
    audio: &AudioData,
    cfg: &StftConfig,
    opts: &FilterOptions,
) -> Result<DecodeOutcome> {
    let spectrogram = stft::compute_spectrogram(audio, cfg)?;
    let spectrogram = filter::apply_filters(&spectrogram, cfg, opts);
    let solved = decoder::solve(&spectrogram, cfg);
    log::info!("decode: {}", solved.status_line());

    let text = morse::decode(&solved.code);
    Ok(DecodeOutcome {
        sample_rate: audio.sample_rate,
        bin_size: mapping::bin_size(audio.sample_rate, cfg),
        num_bins: spectrogram.num_bins,
        num_frames: spectrogram.num_frames(),
        status: solved.status,
        code: solved.code,
        text,
    })
}

/// Load an audio file and run the full pipeline over it.
pub fn decode_file(path: &Path, cfg: &StftConfig, opts: &FilterOptions) -> Result<DecodeOutcome> {
    let audio = loader::load_file(path)?;
    decode_samples(&audio, cfg, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthesize a keyed sine tone from a Morse string using standard
    /// timing (dash 3 units, symbol gap 1, letter gap 3, word gap 7).
    fn keyed_tone(code: &str, sample_rate: u32, freq: f64, unit_secs: f64) -> AudioData {
        let unit = (sample_rate as f64 * unit_secs) as usize;
        let mut segments: Vec<(bool, usize)> = vec![(false, 3 * unit)];
        for (wi, word) in code.split('/').enumerate() {
            if wi > 0 {
                segments.push((false, 7 * unit));
            }
            for (li, letter) in word.split(' ').enumerate() {
                if li > 0 {
                    segments.push((false, 3 * unit));
                }
                for (si, symbol) in letter.chars().enumerate() {
                    if si > 0 {
                        segments.push((false, unit));
                    }
                    let len = if symbol == '-' { 3 * unit } else { unit };
                    segments.push((true, len));
                }
            }
        }
        segments.push((false, 3 * unit));

        let mut samples = Vec::new();
        for (on, len) in segments {
            if on {
                let start = samples.len();
                for i in 0..len {
                    let t = (start + i) as f64 / sample_rate as f64;
                    samples.push((2.0 * std::f64::consts::PI * freq * t).sin() as f32);
                }
            } else {
                samples.extend(std::iter::repeat(0.0f32).take(len));
            }
        }

        AudioData {
            duration_secs: samples.len() as f64 / sample_rate as f64,
            samples,
            sample_rate,
            channels: 1,
        }
    }

    fn test_cfg() -> StftConfig {
        StftConfig {
            n_fft: 256,
            win_length: 256,
            hop_length: 64,
        }
    }

    #[test]
    fn test_end_to_end_sos_sos() {
        let code = "... --- .../... --- ...";
        let audio = keyed_tone(code, 8000, 1000.0, 0.08);
        let outcome = decode_samples(&audio, &test_cfg(), &FilterOptions::default()).unwrap();

        assert_eq!(outcome.code, code);
        assert_eq!(outcome.text, "SOS SOS");
        assert_eq!(outcome.sample_rate, 8000);
        assert!((outcome.bin_size - 8000.0 / 256.0).abs() < 1e-9);
        assert!(outcome.status.iter().any(|s| s.starts_with("Dot:")));
    }

    #[test]
    fn test_end_to_end_with_band_filter() {
        use crate::types::Band;

        let code = ".... ../.... ..";
        let audio = keyed_tone(code, 8000, 1000.0, 0.08);
        let opts = FilterOptions {
            threshold_db: Some(-40.0),
            freq_band: Some(Band {
                min: Some(800.0),
                max: Some(1200.0),
            }),
            time_band: None,
        };
        let outcome = decode_samples(&audio, &test_cfg(), &opts).unwrap();

        assert_eq!(outcome.code, code);
        assert_eq!(outcome.text, "HI HI");
    }

    #[test]
    fn test_silence_reports_dead_end() {
        let audio = AudioData {
            samples: vec![0.0; 16_000],
            sample_rate: 8000,
            channels: 1,
            duration_secs: 2.0,
        };
        let outcome = decode_samples(&audio, &test_cfg(), &FilterOptions::default()).unwrap();
        assert_eq!(outcome.code, "");
        assert_eq!(outcome.text, "");
        assert!(outcome
            .status
            .iter()
            .any(|s| s.contains("dash/dot symbols")));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let audio = keyed_tone(".", 8000, 1000.0, 0.08);
        let cfg = StftConfig {
            n_fft: 0,
            win_length: 0,
            hop_length: 0,
        };
        assert!(decode_samples(&audio, &cfg, &FilterOptions::default()).is_err());
    }
}
