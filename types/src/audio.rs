use serde::{Deserialize, Serialize};

/// Voices the speech service can synthesize.
///
/// The relay deals three of these to the personas at session start; the
/// palette is larger than the table so repeat sessions don't all sound alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Ash,
    Ballad,
    Coral,
    Echo,
    Shimmer,
    Verse,
}

impl Voice {
    pub const PALETTE: [Voice; 7] = [
        Voice::Alloy,
        Voice::Ash,
        Voice::Ballad,
        Voice::Coral,
        Voice::Echo,
        Voice::Shimmer,
        Voice::Verse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Ash => "ash",
            Voice::Ballad => "ballad",
            Voice::Coral => "coral",
            Voice::Echo => "echo",
            Voice::Shimmer => "shimmer",
            Voice::Verse => "verse",
        }
    }
}

/// Input-audio transcription settings carried by `session.update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    model: String,
}

impl TranscriptionSettings {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }

    pub fn whisper() -> Self {
        Self::new("whisper-1")
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Turn-detection configuration.
///
/// The relay never enables this: an explicit `"turn_detection": null` on the
/// session tells the service to keep its voice-activity detector out of the
/// conversation, because turn-taking is decided on this side of the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TurnDetection {
    #[serde(rename = "server_vad")]
    ServerVad {
        threshold: f32,
        prefix_padding_ms: u32,
        silence_duration_ms: u32,
    },
}
