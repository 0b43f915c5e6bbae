//! Spectrogram-based Morse code decoding.
//!
//! The pipeline turns a finite audio recording into text: a Hann-windowed
//! STFT produces a log-power spectrogram, optional threshold/band filters
//! isolate the keyed tone, the symbol decoder binarizes the dominant
//! frequency bin and clusters on/off run lengths into dot/dash and
//! symbol/letter/word spacings, and the Morse table maps the resulting
//! code string to plain text.
//!
//! Each stage consumes its input by reference and returns a new value, so
//! re-filtering or re-decoding with different options never depends on
//! hidden state.

pub mod audio;
pub mod dsp;
pub mod error;
pub mod morse;
pub mod pipeline;
pub mod types;

pub use error::{AnalyzerError, Result};
pub use pipeline::{decode_file, decode_samples, DecodeOutcome};
pub use types::{
    AnalyzerConfig, AudioData, Band, FilterOptions, Spectrogram, SpectrogramColumn, StftConfig,
};
