//! Short-time Fourier transform and log-power conversion.

use crate::dsp::mapping;
use crate::error::Result;
use crate::types::{AudioData, Spectrogram, SpectrogramColumn, StftConfig};
use realfft::RealFftPlanner;
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static FFT_PLANNER: RefCell<RealFftPlanner<f32>> = RefCell::new(RealFftPlanner::new());
    static HANN_CACHE: RefCell<HashMap<usize, Vec<f32>>> = RefCell::new(HashMap::new());
}

/// Power floor before the log, so silence never produces -inf.
const AMIN: f32 = 1e-10;
/// Retained dynamic range below the 0 dB peak.
const TOP_DB: f32 = 80.0;

fn hann_window(size: usize) -> Vec<f32> {
    HANN_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .entry(size)
            .or_insert_with(|| {
                (0..size)
                    .map(|i| {
                        0.5 * (1.0
                            - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
                    })
                    .collect()
            })
            .clone()
    })
}

/// Compute a log-power spectrogram from audio data using a Short-Time
/// Fourier Transform (STFT).
///
/// Uses a Hann window of `win_length` samples zero-padded to `n_fft` FFT
/// points, hop `hop_length`. Power is compressed to dB, normalized so the
/// loudest cell sits at 0 dB, and floored 80 dB below the peak, giving
/// every spectrogram the same value range regardless of input loudness.
pub fn compute_spectrogram(audio: &AudioData, cfg: &StftConfig) -> Result<Spectrogram> {
    cfg.validate()?;

    let fft = FFT_PLANNER.with(|p| p.borrow_mut().plan_fft_forward(cfg.n_fft));
    let window = hann_window(cfg.win_length);
    let num_bins = cfg.n_fft / 2 + 1;

    // Pre-allocate FFT buffers once and reuse across frames. The FFT uses
    // the input as scratch space, so the zero-padded tail beyond
    // win_length is re-cleared on every frame.
    let mut input = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();

    let mut magnitudes: Vec<Vec<f32>> = Vec::new();
    let mut pos = 0;
    while pos + cfg.win_length <= audio.samples.len() {
        for (inp, (&s, &w)) in input
            .iter_mut()
            .zip(audio.samples[pos..pos + cfg.win_length].iter().zip(window.iter()))
        {
            *inp = s * w;
        }
        input[cfg.win_length..].iter_mut().for_each(|v| *v = 0.0);

        fft.process(&mut input, &mut spectrum).expect("FFT failed");
        magnitudes.push(spectrum.iter().map(|c| c.norm()).collect());

        pos += cfg.hop_length;
    }

    // Reference for the 0 dB peak: the largest magnitude anywhere.
    let max_magnitude = magnitudes
        .iter()
        .flat_map(|m| m.iter())
        .copied()
        .fold(0.0f32, f32::max);
    let ref_db = 10.0 * (max_magnitude * max_magnitude).max(AMIN).log10();

    let mut columns: Vec<SpectrogramColumn> = magnitudes
        .into_iter()
        .enumerate()
        .map(|(frame, mags)| SpectrogramColumn {
            values_db: mags
                .into_iter()
                .map(|m| 10.0 * (m * m).max(AMIN).log10() - ref_db)
                .collect(),
            time_offset: mapping::frames_to_time(frame as f64, audio.sample_rate, cfg),
        })
        .collect();

    // Clip to a fixed dynamic range below the grid's own peak.
    let grid_max = columns
        .iter()
        .flat_map(|c| c.values_db.iter())
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    if grid_max.is_finite() {
        let floor = grid_max - TOP_DB;
        for col in &mut columns {
            for v in &mut col.values_db {
                *v = v.max(floor);
            }
        }
    }

    log::debug!(
        "STFT: {} frames x {} bins ({} samples at {} Hz)",
        columns.len(),
        num_bins,
        audio.samples.len(),
        audio.sample_rate
    );

    Ok(Spectrogram {
        columns,
        num_bins,
        freq_resolution: mapping::bin_size(audio.sample_rate, cfg),
        time_resolution: cfg.hop_length as f64 / audio.sample_rate as f64,
        sample_rate: audio.sample_rate,
    })
}
