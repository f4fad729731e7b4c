//! Binary frame protocol on the human-facing socket.
//!
//! Every client-to-server frame starts with a one-byte tag. In the other
//! direction audio travels as raw PCM16 with no tag; the only tagged
//! downstream frame marks the end of the scripted opening arguments.

pub const SPEECH_STARTED: u8 = 0;
pub const SPEECH_ENDED: u8 = 1;
pub const AUDIO_RECV: u8 = 2;
pub const OPENING_ARGS_END: u8 = 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("unrecognized frame tag {0}")]
    UnknownTag(u8),
    #[error("speech-started frame carries {0} payload bytes, expected 4")]
    BadTimestamp(usize),
}

/// A decoded client-to-server frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// The human started speaking; the payload is milliseconds of audio
    /// played since the current response began, which becomes the
    /// truncation point for the interrupted persona.
    SpeechStarted { elapsed_ms: u32 },
    SpeechEnded,
    /// Raw PCM16 at the client's negotiated sample rate.
    Audio(Vec<u8>),
}

impl ClientFrame {
    pub fn decode(frame: &[u8]) -> Result<Self, FrameError> {
        let (&tag, payload) = frame.split_first().ok_or(FrameError::Empty)?;
        match tag {
            SPEECH_STARTED => {
                let bytes: [u8; 4] = payload
                    .try_into()
                    .map_err(|_| FrameError::BadTimestamp(payload.len()))?;
                Ok(ClientFrame::SpeechStarted {
                    elapsed_ms: u32::from_le_bytes(bytes),
                })
            }
            SPEECH_ENDED => Ok(ClientFrame::SpeechEnded),
            AUDIO_RECV => Ok(ClientFrame::Audio(payload.to_vec())),
            other => Err(FrameError::UnknownTag(other)),
        }
    }

    /// Encodes the client-side representation, mostly for tests and tools.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ClientFrame::SpeechStarted { elapsed_ms } => {
                let mut frame = vec![SPEECH_STARTED];
                frame.extend_from_slice(&elapsed_ms.to_le_bytes());
                frame
            }
            ClientFrame::SpeechEnded => vec![SPEECH_ENDED],
            ClientFrame::Audio(pcm) => {
                let mut frame = vec![AUDIO_RECV];
                frame.extend_from_slice(pcm);
                frame
            }
        }
    }
}

/// Server-to-client frame marking the end of scripted opening content.
pub fn opening_args_end() -> Vec<u8> {
    vec![OPENING_ARGS_END]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_started_round_trips_elapsed_ms() {
        let frame = ClientFrame::SpeechStarted { elapsed_ms: 1500 };
        let decoded = ClientFrame::decode(&frame.encode()).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn speech_ended_is_a_bare_tag() {
        assert_eq!(
            ClientFrame::decode(&[SPEECH_ENDED]).unwrap(),
            ClientFrame::SpeechEnded
        );
    }

    #[test]
    fn audio_payload_survives() {
        let pcm = vec![1u8, 2, 3, 4];
        let mut frame = vec![AUDIO_RECV];
        frame.extend_from_slice(&pcm);
        assert_eq!(
            ClientFrame::decode(&frame).unwrap(),
            ClientFrame::Audio(pcm)
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            ClientFrame::decode(&[9, 0, 0]),
            Err(FrameError::UnknownTag(9))
        );
    }

    #[test]
    fn empty_frame_is_rejected() {
        assert_eq!(ClientFrame::decode(&[]), Err(FrameError::Empty));
    }

    #[test]
    fn short_timestamp_is_rejected() {
        assert_eq!(
            ClientFrame::decode(&[SPEECH_STARTED, 1, 2]),
            Err(FrameError::BadTimestamp(2))
        );
    }

    #[test]
    fn opening_args_end_is_a_single_tag_byte() {
        assert_eq!(opening_args_end(), vec![OPENING_ARGS_END]);
    }
}
