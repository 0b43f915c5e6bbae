//! Audio file decoding to a mono [-1, 1] sample buffer.
//!
//! WAV goes through hound, FLAC through claxon, Ogg Vorbis through
//! lewton, and everything else (mp3, m4a, aac, alac) through a symphonia
//! probe. Multi-channel input is averaged to mono, then the buffer is
//! linearly rescaled so its extremes land exactly on [-1, 1].

use crate::error::{AnalyzerError, Result};
use crate::types::AudioData;
use std::fs::File;
use std::path::Path;

/// Load and decode an audio file into a mono, [-1, 1]-rescaled buffer.
pub fn load_file(path: &Path) -> Result<AudioData> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let (interleaved, sample_rate, channels) = match ext.as_deref() {
        Some("wav") => decode_wav(path)?,
        Some("flac") => decode_flac(path)?,
        Some("ogg") | Some("oga") => decode_ogg(path)?,
        _ => decode_with_symphonia(path)?,
    };

    if sample_rate == 0 || channels == 0 {
        return Err(AnalyzerError::AudioDecode(format!(
            "{}: no usable stream parameters",
            path.display()
        )));
    }

    let samples = rescale(downmix(&interleaved, channels));
    let duration_secs = samples.len() as f64 / sample_rate as f64;
    log::info!(
        "loaded {}: {} samples at {} Hz ({} channel(s), {:.2}s)",
        path.display(),
        samples.len(),
        sample_rate,
        channels,
        duration_secs
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels: channels as u32,
        duration_secs,
    })
}

fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32, usize)> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| AnalyzerError::AudioDecode(e.to_string()))?;
    let spec = reader.spec();

    let samples: std::result::Result<Vec<f32>, hound::Error> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect(),
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect()
        }
    };
    let samples = samples.map_err(|e| AnalyzerError::AudioDecode(e.to_string()))?;

    Ok((samples, spec.sample_rate, spec.channels as usize))
}

fn decode_flac(path: &Path) -> Result<(Vec<f32>, u32, usize)> {
    let mut reader =
        claxon::FlacReader::open(path).map_err(|e| AnalyzerError::AudioDecode(e.to_string()))?;
    let info = reader.streaminfo();
    let scale = (1i64 << (info.bits_per_sample - 1)) as f32;

    let mut samples = Vec::new();
    for sample in reader.samples() {
        let v = sample.map_err(|e| AnalyzerError::AudioDecode(e.to_string()))?;
        samples.push(v as f32 / scale);
    }

    Ok((samples, info.sample_rate, info.channels as usize))
}

fn decode_ogg(path: &Path) -> Result<(Vec<f32>, u32, usize)> {
    let file = File::open(path)?;
    let mut reader = lewton::inside_ogg::OggStreamReader::new(file)
        .map_err(|e| AnalyzerError::AudioDecode(e.to_string()))?;
    let sample_rate = reader.ident_hdr.audio_sample_rate;
    let channels = reader.ident_hdr.audio_channels as usize;

    let mut samples = Vec::new();
    while let Some(packet) = reader
        .read_dec_packet_itl()
        .map_err(|e| AnalyzerError::AudioDecode(e.to_string()))?
    {
        samples.extend(packet.iter().map(|&v| v as f32 / 32768.0));
    }

    Ok((samples, sample_rate, channels))
}

fn decode_with_symphonia(path: &Path) -> Result<(Vec<f32>, u32, usize)> {
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::DecoderOptions;
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalyzerError::UnsupportedFormat(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| AnalyzerError::UnsupportedFormat("no default audio track".into()))?;
    let track_id = track.id;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalyzerError::UnsupportedFormat(e.to_string()))?;

    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AnalyzerError::AudioDecode(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if sample_buf.is_none() {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count();
                    sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            // Recoverable: skip the corrupt packet and keep going.
            Err(SymphoniaError::DecodeError(e)) => log::warn!("skipping bad packet: {e}"),
            Err(e) => return Err(AnalyzerError::AudioDecode(e.to_string())),
        }
    }

    if samples.is_empty() {
        return Err(AnalyzerError::AudioDecode(format!(
            "{}: no decodable audio packets",
            path.display()
        )));
    }

    Ok((samples, sample_rate, channels))
}

/// Average interleaved channels into a mono buffer.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linearly map the buffer's own min/max onto [-1, 1]. A constant buffer
/// (including digital silence) maps to all zeros.
fn rescale(mut samples: Vec<f32>) -> Vec<f32> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &s in &samples {
        min = min.min(s);
        max = max.max(s);
    }
    if !(max > min) {
        samples.iter_mut().for_each(|s| *s = 0.0);
        return samples;
    }
    let scale = 2.0 / (max - min);
    for s in &mut samples {
        *s = (*s - min) * scale - 1.0;
    }
    samples
}
