//! Conversions between sample index, time, spectral bin, and frequency.
//!
//! Every function is parameterized by the sample rate and the
//! [`StftConfig`] that produced the grid being indexed. The filter stage,
//! the decoder's reporting, and any external plotting all share these
//! functions so the axis semantics stay identical everywhere.

use crate::types::{Band, StftConfig};

/// Frame index to sample index, using the center-of-window offset
/// `frame * hop_length + n_fft / 2`. Accepts fractional frames (cluster
/// centroids); the result is truncated to an integer sample.
pub fn frames_to_samples(frames: f64, cfg: &StftConfig) -> i64 {
    (frames * cfg.hop_length as f64 + (cfg.n_fft / 2) as f64) as i64
}

/// Inverse of [`frames_to_samples`] via floor division. Samples before the
/// first window center map to negative frames; callers clamp.
pub fn samples_to_frames(samples: i64, cfg: &StftConfig) -> i64 {
    (samples - (cfg.n_fft / 2) as i64).div_euclid(cfg.hop_length as i64)
}

pub fn samples_to_time(samples: i64, sample_rate: u32) -> f64 {
    samples as f64 / sample_rate as f64
}

pub fn time_to_samples(time: f64, sample_rate: u32) -> i64 {
    (time * sample_rate as f64) as i64
}

pub fn frames_to_time(frames: f64, sample_rate: u32, cfg: &StftConfig) -> f64 {
    samples_to_time(frames_to_samples(frames, cfg), sample_rate)
}

pub fn time_to_frames(time: f64, sample_rate: u32, cfg: &StftConfig) -> i64 {
    samples_to_frames(time_to_samples(time, sample_rate), cfg)
}

/// Width of one frequency bin in Hz.
pub fn bin_size(sample_rate: u32, cfg: &StftConfig) -> f64 {
    sample_rate as f64 / cfg.n_fft as f64
}

pub fn bin_to_freq(bin: f64, sample_rate: u32, cfg: &StftConfig) -> f64 {
    bin * bin_size(sample_rate, cfg)
}

pub fn freq_to_bin(freq: f64, sample_rate: u32, cfg: &StftConfig) -> i64 {
    (freq / bin_size(sample_rate, cfg)) as i64
}

/// Resolve optional time/frequency bounds to clamped index ranges over a
/// grid of `num_bins` rows by `num_frames` columns. Returns
/// `((time_min, time_max), (freq_min, freq_max))` as half-open ranges; an
/// absent bound extends to the corresponding edge.
pub fn resolve_domains(
    num_bins: usize,
    num_frames: usize,
    sample_rate: u32,
    cfg: &StftConfig,
    time_band: &Band,
    freq_band: &Band,
) -> ((usize, usize), (usize, usize)) {
    let time_min = match time_band.min {
        None => 0,
        Some(t) => time_to_frames(t, sample_rate, cfg).max(0) as usize,
    };
    let time_max = match time_band.max {
        None => num_frames,
        Some(t) => (time_to_frames(t, sample_rate, cfg).max(0) as usize).min(num_frames),
    };

    let freq_min = match freq_band.min {
        None => 0,
        Some(f) => freq_to_bin(f, sample_rate, cfg).max(0) as usize,
    };
    let freq_max = match freq_band.max {
        None => num_bins,
        Some(f) => (freq_to_bin(f, sample_rate, cfg).max(0) as usize).min(num_bins),
    };

    ((time_min, time_max), (freq_min, freq_max))
}
