//! Threshold and band filters over a spectrogram.
//!
//! Each filter forces rejected cells to the -80 dB floor and leaves the
//! rest untouched. Filters compose in a fixed order (threshold, then
//! frequency band, then time band) and always return a new grid of the
//! same shape as the input.

use crate::dsp::mapping;
use crate::types::{FilterOptions, Spectrogram, StftConfig};

/// Threshold used when the caller enables the filter without a level.
pub const DEFAULT_THRESHOLD_DB: f32 = -80.0;

/// Value assigned to every suppressed cell. Filtered grids stay within
/// -80..=0 dB, so downstream consumers may assume i8-representable values.
const FLOOR_DB: f32 = -80.0;

/// Apply the enabled filters, returning a new spectrogram of identical
/// shape. With every option off this is a plain copy.
pub fn apply_filters(spec: &Spectrogram, cfg: &StftConfig, opts: &FilterOptions) -> Spectrogram {
    let mut out = spec.clone();

    if let Some(threshold) = opts.threshold_db {
        for col in &mut out.columns {
            for v in &mut col.values_db {
                if *v < threshold {
                    *v = FLOOR_DB;
                }
            }
        }
    }

    if let Some(freq_band) = &opts.freq_band {
        let (_, (freq_min, freq_max)) = mapping::resolve_domains(
            out.num_bins,
            out.num_frames(),
            out.sample_rate,
            cfg,
            &Default::default(),
            freq_band,
        );
        for col in &mut out.columns {
            for (bin, v) in col.values_db.iter_mut().enumerate() {
                if bin < freq_min || bin >= freq_max {
                    *v = FLOOR_DB;
                }
            }
        }
        log::debug!("frequency band filter kept bins {freq_min}..{freq_max}");
    }

    if let Some(time_band) = &opts.time_band {
        let ((time_min, time_max), _) = mapping::resolve_domains(
            out.num_bins,
            out.num_frames(),
            out.sample_rate,
            cfg,
            time_band,
            &Default::default(),
        );
        for (frame, col) in out.columns.iter_mut().enumerate() {
            if frame < time_min || frame >= time_max {
                col.values_db.iter_mut().for_each(|v| *v = FLOOR_DB);
            }
        }
        log::debug!("time band filter kept frames {time_min}..{time_max}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Band, SpectrogramColumn};

    /// Grid whose cell (bin, frame) holds a distinct value derived from
    /// its coordinates, within the usual -80..0 range.
    fn test_grid(num_bins: usize, num_frames: usize, sample_rate: u32) -> Spectrogram {
        let columns = (0..num_frames)
            .map(|frame| SpectrogramColumn {
                values_db: (0..num_bins)
                    .map(|bin| -(((bin + frame) % 80) as f32))
                    .collect(),
                time_offset: frame as f64 * 0.01,
            })
            .collect();
        Spectrogram {
            columns,
            num_bins,
            freq_resolution: sample_rate as f64 / (2 * (num_bins - 1)) as f64,
            time_resolution: 0.01,
            sample_rate,
        }
    }

    // n_fft 200 at 1 kHz gives an exact 5 Hz bin size and 101 bins.
    fn cfg() -> StftConfig {
        StftConfig {
            n_fft: 200,
            win_length: 200,
            hop_length: 50,
        }
    }

    #[test]
    fn test_no_options_is_identity() {
        let spec = test_grid(101, 100, 1000);
        let out = apply_filters(&spec, &cfg(), &FilterOptions::default());
        for (a, b) in spec.columns.iter().zip(out.columns.iter()) {
            assert_eq!(a.values_db, b.values_db);
        }
    }

    #[test]
    fn test_threshold_replaces_below() {
        let spec = test_grid(101, 100, 1000);
        let opts = FilterOptions {
            threshold_db: Some(-40.0),
            ..Default::default()
        };
        let out = apply_filters(&spec, &cfg(), &opts);
        for (frame, col) in out.columns.iter().enumerate() {
            for (bin, &v) in col.values_db.iter().enumerate() {
                let original = -(((bin + frame) % 80) as f32);
                if original < -40.0 {
                    assert_eq!(v, -80.0);
                } else {
                    assert_eq!(v, original);
                }
            }
        }
    }

    #[test]
    fn test_threshold_idempotent() {
        let spec = test_grid(101, 100, 1000);
        let opts = FilterOptions {
            threshold_db: Some(-33.0),
            ..Default::default()
        };
        let once = apply_filters(&spec, &cfg(), &opts);
        let twice = apply_filters(&once, &cfg(), &opts);
        for (a, b) in once.columns.iter().zip(twice.columns.iter()) {
            assert_eq!(a.values_db, b.values_db);
        }
    }

    #[test]
    fn test_freq_band_masks_rows() {
        let spec = test_grid(101, 100, 1000);
        // 5 Hz per bin: 50..100 Hz selects bins [10, 20).
        let opts = FilterOptions {
            freq_band: Some(Band {
                min: Some(50.0),
                max: Some(100.0),
            }),
            ..Default::default()
        };
        let out = apply_filters(&spec, &cfg(), &opts);
        for (frame, col) in out.columns.iter().enumerate() {
            for (bin, &v) in col.values_db.iter().enumerate() {
                if (10..20).contains(&bin) {
                    assert_eq!(v, -(((bin + frame) % 80) as f32), "bin {bin} changed");
                } else {
                    assert_eq!(v, -80.0, "bin {bin} not masked");
                }
            }
        }
    }

    #[test]
    fn test_time_band_masks_columns() {
        let spec = test_grid(101, 100, 1000);
        let t0 = mapping::frames_to_time(20.0, 1000, &cfg());
        let t1 = mapping::frames_to_time(40.0, 1000, &cfg());
        let opts = FilterOptions {
            time_band: Some(Band {
                min: Some(t0),
                max: Some(t1),
            }),
            ..Default::default()
        };
        let out = apply_filters(&spec, &cfg(), &opts);
        for (frame, col) in out.columns.iter().enumerate() {
            if (20..40).contains(&frame) {
                for (bin, &v) in col.values_db.iter().enumerate() {
                    assert_eq!(v, -(((bin + frame) % 80) as f32), "frame {frame} changed");
                }
            } else {
                assert!(col.values_db.iter().all(|&v| v == -80.0), "frame {frame}");
            }
        }
    }

    #[test]
    fn test_filters_compose() {
        let spec = test_grid(101, 100, 1000);
        let opts = FilterOptions {
            threshold_db: Some(-20.0),
            freq_band: Some(Band {
                min: Some(50.0),
                max: Some(100.0),
            }),
            time_band: None,
        };
        let out = apply_filters(&spec, &cfg(), &opts);
        for (frame, col) in out.columns.iter().enumerate() {
            for (bin, &v) in col.values_db.iter().enumerate() {
                let original = -(((bin + frame) % 80) as f32);
                let expected = if !(10..20).contains(&bin) || original < -20.0 {
                    -80.0
                } else {
                    original
                };
                assert_eq!(v, expected);
            }
        }
    }

    #[test]
    fn test_shape_preserved() {
        let spec = test_grid(101, 37, 1000);
        let opts = FilterOptions {
            threshold_db: Some(-10.0),
            freq_band: Some(Band {
                min: None,
                max: Some(100.0),
            }),
            time_band: Some(Band {
                min: Some(0.1),
                max: None,
            }),
        };
        let out = apply_filters(&spec, &cfg(), &opts);
        assert_eq!(out.num_frames(), 37);
        assert_eq!(out.num_bins, 101);
        for col in &out.columns {
            assert_eq!(col.values_db.len(), 101);
        }
    }
}
