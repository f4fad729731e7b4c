use debate_relay_utils::audio::AudioError;

use crate::frame::FrameError;

/// Failure classes for a relay session.
///
/// `Bootstrap` and `Socket` always tear the whole session down; the
/// decode-class variants (`Frame`, `Event`, `Audio`) drop the offending
/// message and leave the session running. `Service` mirrors an error event
/// reported by the speech service, which may recover on its own.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("malformed service event: {0}")]
    Event(#[from] serde_json::Error),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("socket failed: {0}")]
    Socket(String),

    #[error("service reported an error: {message}")]
    Service {
        code: Option<String>,
        message: String,
    },
}

impl RelayError {
    /// Whether the whole session must come down, or the offending message
    /// can simply be dropped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RelayError::Bootstrap(_) | RelayError::Socket(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_bootstrap_and_socket_are_fatal() {
        assert!(RelayError::Bootstrap("no dial".into()).is_fatal());
        assert!(RelayError::Socket("reset".into()).is_fatal());
        assert!(!RelayError::Frame(FrameError::Empty).is_fatal());
        assert!(!RelayError::Service {
            code: None,
            message: "overloaded".into()
        }
        .is_fatal());
        assert!(!RelayError::Audio(AudioError::Misaligned(3)).is_fatal());
    }
}
