use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// A decoded recording: mono samples rescaled to [-1, 1].
#[derive(Clone, Debug)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source file before downmixing.
    pub channels: u32,
    pub duration_secs: f64,
}

/// One STFT frame: dB values for bins `0..=n_fft/2`.
#[derive(Clone, Debug)]
pub struct SpectrogramColumn {
    pub values_db: Vec<f32>,
    /// Center-of-window time of this frame, in seconds.
    pub time_offset: f64,
}

/// Log-power spectrogram, one column per time frame.
///
/// Values are normalized to a 0 dB peak and floored at -80 dB. A filter
/// stage replaces the whole grid rather than mutating it, so a
/// `Spectrogram` handed downstream never changes underneath the caller.
#[derive(Clone, Debug)]
pub struct Spectrogram {
    pub columns: Vec<SpectrogramColumn>,
    pub num_bins: usize,
    /// Hz per frequency bin (`sample_rate / n_fft`).
    pub freq_resolution: f64,
    /// Seconds per frame hop.
    pub time_resolution: f64,
    pub sample_rate: u32,
}

impl Spectrogram {
    pub fn num_frames(&self) -> usize {
        self.columns.len()
    }

    /// Minimum and maximum cell values over the whole grid.
    pub fn value_range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for col in &self.columns {
            for &v in &col.values_db {
                min = min.min(v);
                max = max.max(v);
            }
        }
        (min, max)
    }
}

/// Short-time Fourier transform parameters.
///
/// The same instance must be used for the transform and for every
/// frame/bin conversion against the spectrogram it produced; mixing
/// configurations silently skews the axis mappings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StftConfig {
    pub n_fft: usize,
    pub win_length: usize,
    pub hop_length: usize,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            n_fft: 1024,
            win_length: 512,
            hop_length: 256,
        }
    }
}

impl StftConfig {
    /// Reject nonsensical parameters before any frame math runs.
    pub fn validate(&self) -> Result<()> {
        if self.n_fft == 0 || self.win_length == 0 || self.hop_length == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "n_fft, win_length, and hop_length must be positive".into(),
            ));
        }
        if self.win_length > self.n_fft {
            return Err(AnalyzerError::InvalidConfig(format!(
                "win_length {} exceeds n_fft {}",
                self.win_length, self.n_fft
            )));
        }
        if self.hop_length > self.win_length {
            return Err(AnalyzerError::InvalidConfig(format!(
                "hop_length {} exceeds win_length {} (negative window overlap)",
                self.hop_length, self.win_length
            )));
        }
        Ok(())
    }
}

/// Optional bounds in physical units (seconds or Hz).
///
/// An absent bound extends to the grid edge. Bounds are explicit options,
/// never sentinel values, so "no bound" and "zero bound" stay distinct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Filter stage toggles. `None` leaves the corresponding filter off.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Cells below this dB level are forced to -80.
    pub threshold_db: Option<f32>,
    /// Keep only bins inside this Hz band.
    pub freq_band: Option<Band>,
    /// Keep only frames inside this time band (seconds).
    pub time_band: Option<Band>,
}

/// Complete pipeline configuration, as accepted from a JSON config file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub stft: StftConfig,
    #[serde(default)]
    pub filters: FilterOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(StftConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_hop_rejected() {
        let cfg = StftConfig {
            n_fft: 1024,
            win_length: 512,
            hop_length: 0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(AnalyzerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_window_longer_than_fft_rejected() {
        let cfg = StftConfig {
            n_fft: 256,
            win_length: 512,
            hop_length: 128,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_negative_overlap_rejected() {
        let cfg = StftConfig {
            n_fft: 1024,
            win_length: 256,
            hop_length: 512,
        };
        assert!(cfg.validate().is_err());
    }
}
