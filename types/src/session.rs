use crate::audio::{TranscriptionSettings, TurnDetection, Voice};

/// Session configuration carried by `session.update`.
///
/// `turn_detection` is serialized even when unset — the service reads an
/// explicit null as "voice activity detection off", which every persona
/// session in this system requires.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    /// The set of modalities the model can respond with.
    modalities: Vec<String>,

    /// System instructions prepended to model calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,

    /// The voice the model uses to respond. Cannot be changed once the model
    /// has responded with audio at least once.
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<Voice>,

    turn_detection: Option<TurnDetection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    input_audio_transcription: Option<TranscriptionSettings>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn voice(&self) -> Option<Voice> {
        self.voice
    }

    pub fn transcription(&self) -> Option<&TranscriptionSettings> {
        self.input_audio_transcription.as_ref()
    }
}

pub struct SessionBuilder {
    session: Session,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            session: Session {
                modalities: vec!["text".to_string(), "audio".to_string()],
                instructions: None,
                voice: None,
                turn_detection: None,
                input_audio_transcription: None,
            },
        }
    }

    pub fn with_modalities(mut self, modalities: Vec<String>) -> Self {
        self.session.modalities = modalities;
        self
    }

    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.session.instructions = Some(instructions.to_string());
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.session.voice = Some(voice);
        self
    }

    pub fn with_turn_detection(mut self, turn_detection: TurnDetection) -> Self {
        self.session.turn_detection = Some(turn_detection);
        self
    }

    pub fn with_transcription(mut self, settings: TranscriptionSettings) -> Self {
        self.session.input_audio_transcription = Some(settings);
        self
    }

    pub fn build(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_detection_null_is_always_on_the_wire() {
        let session = Session::builder()
            .with_instructions("You are the moderator.")
            .with_voice(Voice::Coral)
            .build();
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.as_object().unwrap().contains_key("turn_detection"));
        assert!(json["turn_detection"].is_null());
        assert_eq!(json["voice"], "coral");
        assert_eq!(json["modalities"][0], "text");
        assert_eq!(json["modalities"][1], "audio");
    }

    #[test]
    fn unset_optionals_are_omitted() {
        let session = Session::builder().build();
        let json = serde_json::to_value(&session).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("instructions"));
        assert!(!object.contains_key("voice"));
        assert!(!object.contains_key("input_audio_transcription"));
    }

    #[test]
    fn transcription_settings_round_trip() {
        let session = Session::builder()
            .with_transcription(TranscriptionSettings::whisper())
            .build();
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.transcription().map(|t| t.model().to_string()),
            Some("whisper-1".to_string())
        );
    }
}
