use base64::Engine;
use rubato::{FastFixedIn, PolynomialDegree, Resampler};

/// The fixed sample rate the speech service produces and consumes, in Hz.
pub const SERVICE_SAMPLE_RATE: u32 = 24_000;

const BYTES_PER_SAMPLE: usize = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio buffer of {0} bytes is not aligned to 16-bit samples")]
    Misaligned(usize),
    #[error("sample rates must be positive, got {input} -> {output}")]
    InvalidRate { input: u32, output: u32 },
    #[error("base64 audio payload is invalid: {0}")]
    Base64(String),
    #[error("resampling failed: {0}")]
    Resample(String),
}

/// Resamples a buffer of mono 16-bit little-endian PCM from `in_rate` to
/// `out_rate`, returning a freshly allocated buffer.
///
/// Each call builds and discards its own resampler context; the interpolation
/// is cubic, not bare decimation, because the client rate is negotiated per
/// connection and can sit far from the service's fixed rate.
pub fn resample(input: &[u8], in_rate: u32, out_rate: u32) -> Result<Vec<u8>, AudioError> {
    if in_rate == 0 || out_rate == 0 {
        return Err(AudioError::InvalidRate {
            input: in_rate,
            output: out_rate,
        });
    }
    let samples = pcm16_to_f32(input)?;
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    if in_rate == out_rate {
        return Ok(input.to_vec());
    }

    let ratio = f64::from(out_rate) / f64::from(in_rate);
    let mut resampler =
        FastFixedIn::<f32>::new(ratio, 1.0, PolynomialDegree::Cubic, samples.len(), 1)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
    let mut output = resampler
        .process(&[samples], None)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    match output.pop() {
        Some(channel) => Ok(f32_to_pcm16(&channel)),
        None => Ok(Vec::new()),
    }
}

/// Interprets little-endian PCM16 bytes as normalized f32 samples.
pub fn pcm16_to_f32(bytes: &[u8]) -> Result<Vec<f32>, AudioError> {
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(AudioError::Misaligned(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|chunk| {
            let v = i16::from_le_bytes([chunk[0], chunk[1]]);
            (f32::from(v) / f32::from(i16::MAX)).clamp(-1.0, 1.0)
        })
        .collect())
}

/// Converts normalized f32 samples back to little-endian PCM16 bytes.
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&sample| {
            let v = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
            v.to_le_bytes()
        })
        .collect()
}

/// Decodes a base64 audio payload into raw PCM16 bytes.
pub fn decode_base64_pcm(payload: &str) -> Result<Vec<u8>, AudioError> {
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| AudioError::Base64(e.to_string()))
}

/// Encodes raw PCM16 bytes as a base64 audio payload.
pub fn encode_base64_pcm(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
