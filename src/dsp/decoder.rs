//! Dominant-tone on/off segmentation and Morse symbol recovery.
//!
//! The decoder assumes the keyed tone occupies a single frequency bin
//! that is either "on" or "off". It normalizes the grid, picks the bin
//! with the highest time-averaged energy, binarizes that bin's series,
//! and clusters the resulting on/off run lengths into dot/dash and
//! symbol/letter/word spacings without any hand-tuned duration
//! thresholds.

use crate::dsp::{kmeans, mapping};
use crate::types::{Spectrogram, StftConfig};

/// Normalized level above which the dominant bin counts as tone-on.
const TONE_THRESHOLD: f32 = 0.85;

const NO_SYMBOLS_MSG: &str = "!Could not find any dash/dot symbols!";
const NO_SPACING_MSG: &str = "!Could not find spacing between symbols!";

/// Result of a decode attempt: the Morse string (empty on a dead end)
/// and the ordered diagnostic trace explaining what was measured.
#[derive(Clone, Debug, Default)]
pub struct Solved {
    pub code: String,
    pub status: Vec<String>,
}

impl Solved {
    /// The trace as a single display line.
    pub fn status_line(&self) -> String {
        self.status.join(" | ")
    }

    fn dead_end(mut status: Vec<String>, msg: &str) -> Self {
        status.push(msg.to_string());
        Solved {
            code: String::new(),
            status,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GapKind {
    Symbol,
    Letter,
    Word,
}

/// Recover the Morse code string from a (possibly filtered) spectrogram.
///
/// Dead ends (no pulses, or a single pulse with no gaps) are reported
/// through the status trace with an empty code string; they are normal
/// terminal outcomes, not errors.
pub fn solve(spec: &Spectrogram, cfg: &StftConfig) -> Solved {
    let mut status = Vec::new();

    if spec.columns.is_empty() {
        return Solved::dead_end(status, NO_SYMBOLS_MSG);
    }

    // Rescale the grid to [0, 1] by its own extremes.
    let (min, max) = spec.value_range();
    let range = max - min;
    let normalize = move |v: f32| {
        if range > 0.0 {
            (v - min) / range
        } else {
            0.0
        }
    };

    // The tone is persistent while noise is transient, so the mean over
    // time peaks at the tone's bin.
    let num_frames = spec.num_frames();
    let mut bin_means = vec![0.0f64; spec.num_bins];
    for col in &spec.columns {
        for (bin, &v) in col.values_db.iter().enumerate() {
            bin_means[bin] += normalize(v) as f64;
        }
    }

    let mut dominant = 0usize;
    let mut dominant_mean = f64::NEG_INFINITY;
    for (bin, &sum) in bin_means.iter().enumerate() {
        let mean = sum / num_frames as f64;
        if mean > dominant_mean {
            dominant_mean = mean;
            dominant = bin;
        }
    }
    status.push(format!(
        "Dominant frequency found between: {:.2} Hz and {:.2} Hz",
        mapping::bin_to_freq(dominant as f64, spec.sample_rate, cfg),
        mapping::bin_to_freq((dominant + 1) as f64, spec.sample_rate, cfg),
    ));

    let binary: Vec<u8> = spec
        .columns
        .iter()
        .map(|col| u8::from(normalize(col.values_db[dominant]) > TONE_THRESHOLD))
        .collect();

    // Transition positions: index of the frame before each edge, so a
    // pulse spanning frames a+1..=b yields rising a and falling b.
    let mut rising: Vec<i64> = Vec::new();
    let mut falling: Vec<i64> = Vec::new();
    for i in 1..binary.len() {
        match binary[i] as i8 - binary[i - 1] as i8 {
            1 => rising.push((i - 1) as i64),
            -1 => falling.push((i - 1) as i64),
            _ => {}
        }
    }
    log::debug!(
        "dominant bin {dominant}: {} rising / {} falling edges over {num_frames} frames",
        rising.len(),
        falling.len()
    );

    // A recording may begin or end mid-pulse; synthesize the missing
    // boundary edge so every on-interval is reconstructed.
    let first_rise = rising.first().copied();
    if let Some(first_fall) = falling.first().copied() {
        if first_rise.map_or(true, |r| first_fall < r) {
            rising.insert(0, -1);
        }
    }
    let last_fall = falling.last().copied();
    if let Some(last_rise) = rising.last().copied() {
        if last_fall.map_or(true, |f| last_rise > f) {
            falling.push(binary.len() as i64 - 1);
        }
    }

    let pulses = rising.len().min(falling.len());
    let on_frames: Vec<f64> = (0..pulses).map(|i| (falling[i] - rising[i]) as f64).collect();
    let off_frames: Vec<f64> = (1..pulses)
        .map(|i| (rising[i] - falling[i - 1]) as f64)
        .collect();

    if on_frames.is_empty() {
        return Solved::dead_end(status, NO_SYMBOLS_MSG);
    }
    if off_frames.is_empty() {
        return Solved::dead_end(status, NO_SPACING_MSG);
    }

    // Dot/dash split: smaller centroid is the dot.
    let symbol_fit = kmeans::fit(&on_frames, 2);
    let order = kmeans::sorted_order(&symbol_fit.centroids);
    let (dot_label, dash_label) = (order[0], order[1]);
    status.push(format!(
        "Dot: {:.0} ms, Dash: {:.0} ms",
        1000.0 * mapping::frames_to_time(symbol_fit.centroids[dot_label], spec.sample_rate, cfg),
        1000.0 * mapping::frames_to_time(symbol_fit.centroids[dash_label], spec.sample_rate, cfg),
    ));

    let symbols: Vec<char> = symbol_fit
        .labels
        .iter()
        .map(|&l| if l == dot_label { '.' } else { '-' })
        .collect();

    // Gap split: ascending centroids map to symbol, letter, word spacing.
    let spacing_fit = kmeans::fit(&off_frames, 3);
    let order = kmeans::sorted_order(&spacing_fit.centroids);
    let (symbol_label, letter_label, word_label) = (order[0], order[1], order[2]);
    status.push(format!(
        "Symbol spacing: {:.0} ms, Letter spacing: {:.0} ms, Word spacing: {:.0} ms",
        1000.0
            * mapping::frames_to_time(spacing_fit.centroids[symbol_label], spec.sample_rate, cfg),
        1000.0
            * mapping::frames_to_time(spacing_fit.centroids[letter_label], spec.sample_rate, cfg),
        1000.0 * mapping::frames_to_time(spacing_fit.centroids[word_label], spec.sample_rate, cfg),
    ));

    let gaps: Vec<GapKind> = spacing_fit
        .labels
        .iter()
        .map(|&l| {
            if l == word_label {
                GapKind::Word
            } else if l == letter_label {
                GapKind::Letter
            } else {
                GapKind::Symbol
            }
        })
        .collect();

    Solved {
        code: assemble(&symbols, &gaps),
        status,
    }
}

/// Join symbols into the coded string. `gaps[i]` separates `symbols[i]`
/// from `symbols[i + 1]`: letter and word gaps both end the current
/// letter, and word gaps also end the current word. Letters join with a
/// space, words with '/'.
fn assemble(symbols: &[char], gaps: &[GapKind]) -> String {
    let mut letter_breaks: Vec<usize> = Vec::new();
    let mut remaining: Vec<GapKind> = Vec::new();
    for (i, &gap) in gaps.iter().enumerate() {
        if gap != GapKind::Symbol {
            letter_breaks.push(i + 1);
            remaining.push(gap);
        }
    }
    let mut word_breaks: Vec<usize> = Vec::new();
    for (i, &gap) in remaining.iter().enumerate() {
        if gap == GapKind::Word {
            word_breaks.push(i + 1);
        }
    }

    let mut letters: Vec<String> = Vec::new();
    let mut start = 0;
    for &end in letter_breaks.iter().chain(std::iter::once(&symbols.len())) {
        letters.push(symbols[start..end].iter().collect());
        start = end;
    }

    let mut words: Vec<String> = Vec::new();
    let mut start = 0;
    for &end in word_breaks.iter().chain(std::iter::once(&letters.len())) {
        words.push(letters[start..end].join(" "));
        start = end;
    }

    words.join("/")
}
