//! Audio primitives for the relay: PCM16 conversion, one-shot resampling
//! and base64 payload handling.

pub mod audio;
