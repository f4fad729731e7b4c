//! Payloads of the events the speech service emits.
//!
//! The relay acts on a handful of these; the rest carry only their envelope
//! fields so the protocol stays fully decodable without modeling resource
//! bodies nothing reads.

/// Details attached to an `error` event.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
    message: String,
    param: Option<String>,
}

impl ErrorDetails {
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// `error` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorEvent {
    #[serde(default)]
    event_id: Option<String>,
    error: ErrorDetails,
}

impl ErrorEvent {
    pub fn error(&self) -> &ErrorDetails {
        &self.error
    }
}

/// Response envelope carried by `response.created` and `response.done`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseResource {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

impl ResponseResource {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// `response.created` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseCreatedEvent {
    event_id: String,
    response: ResponseResource,
}

impl ResponseCreatedEvent {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn response(&self) -> &ResponseResource {
        &self.response
    }
}

/// `response.done` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseDoneEvent {
    event_id: String,
    response: ResponseResource,
}

impl ResponseDoneEvent {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn response(&self) -> &ResponseResource {
        &self.response
    }
}

/// `response.audio.delta` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseAudioDeltaEvent {
    event_id: String,
    item_id: String,
    /// Base64-encoded PCM16 at the service's fixed sample rate.
    delta: String,
}

impl ResponseAudioDeltaEvent {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn delta(&self) -> &str {
        &self.delta
    }
}

/// `response.audio_transcript.done` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseAudioTranscriptDoneEvent {
    event_id: String,
    transcript: String,
}

impl ResponseAudioTranscriptDoneEvent {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }
}

macro_rules! envelope_only_events {
    ($($(#[$doc:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
            pub struct $name {
                event_id: String,
            }

            impl $name {
                pub fn event_id(&self) -> &str {
                    &self.event_id
                }
            }
        )+
    };
}

envelope_only_events! {
    /// `session.created` event
    SessionCreatedEvent,
    /// `session.updated` event
    SessionUpdatedEvent,
    /// `conversation.created` event
    ConversationCreatedEvent,
    /// `conversation.item.created` event
    ConversationItemCreatedEvent,
    /// `conversation.item.truncated` event
    ConversationItemTruncatedEvent,
    /// `conversation.item.deleted` event
    ConversationItemDeletedEvent,
    /// `conversation.item.input_audio_transcription.completed` event
    ConversationItemInputAudioTranscriptionCompletedEvent,
    /// `conversation.item.input_audio_transcription.failed` event
    ConversationItemInputAudioTranscriptionFailedEvent,
    /// `input_audio_buffer.committed` event
    InputAudioBufferCommittedEvent,
    /// `input_audio_buffer.cleared` event
    InputAudioBufferClearedEvent,
    /// `input_audio_buffer.speech_started` event
    InputAudioBufferSpeechStartedEvent,
    /// `input_audio_buffer.speech_stopped` event
    InputAudioBufferSpeechStoppedEvent,
    /// `response.output_item.added` event
    ResponseOutputItemAddedEvent,
    /// `response.output_item.done` event
    ResponseOutputItemDoneEvent,
    /// `response.content_part.added` event
    ResponseContentPartAddedEvent,
    /// `response.content_part.done` event
    ResponseContentPartDoneEvent,
    /// `response.text.delta` event
    ResponseTextDeltaEvent,
    /// `response.text.done` event
    ResponseTextDoneEvent,
    /// `response.audio_transcript.delta` event
    ResponseAudioTranscriptDeltaEvent,
    /// `response.audio.done` event
    ResponseAudioDoneEvent,
    /// `response.function_call_arguments.delta` event
    ResponseFunctionCallArgumentsDeltaEvent,
    /// `response.function_call_arguments.done` event
    ResponseFunctionCallArgumentsDoneEvent,
    /// `rate_limits.updated` event
    RateLimitsUpdatedEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_event_tolerates_missing_optionals() {
        let json = r#"{
            "event_id": "event_1",
            "error": {"type": "invalid_request_error", "code": null, "message": "bad", "param": null}
        }"#;
        let event: ErrorEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.error().message(), "bad");
        assert_eq!(event.error().code(), None);
        assert_eq!(event.error().kind(), Some("invalid_request_error"));
    }

    #[test]
    fn unknown_payload_fields_are_ignored() {
        let json = r#"{
            "event_id": "event_2",
            "item_id": "item_1",
            "delta": "UFBQ",
            "response_id": "resp_1",
            "output_index": 0,
            "content_index": 0
        }"#;
        let event: ResponseAudioDeltaEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.delta(), "UFBQ");
    }
}
