pub mod client;
pub mod server;

pub use client::*;
pub use server::*;

/// Events this side sends to the speech service.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "session.update")]
    SessionUpdate(SessionUpdateEvent),
    #[serde(rename = "input_audio_buffer.append")]
    InputAudioBufferAppend(InputAudioBufferAppendEvent),
    #[serde(rename = "input_audio_buffer.commit")]
    InputAudioBufferCommit(InputAudioBufferCommitEvent),
    #[serde(rename = "input_audio_buffer.clear")]
    InputAudioBufferClear(InputAudioBufferClearEvent),
    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate(ConversationItemCreateEvent),
    #[serde(rename = "conversation.item.truncate")]
    ConversationItemTruncate(ConversationItemTruncateEvent),
    #[serde(rename = "conversation.item.delete")]
    ConversationItemDelete(ConversationItemDeleteEvent),
    #[serde(rename = "response.create")]
    ResponseCreate(ResponseCreateEvent),
    #[serde(rename = "response.cancel")]
    ResponseCancel(ResponseCancelEvent),
}

/// Events the speech service sends back.
///
/// Every defined type decodes; an unlisted discriminator is a decode error
/// rather than a silent skip, so protocol drift surfaces in the logs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "error")]
    Error(ErrorEvent),
    #[serde(rename = "session.created")]
    SessionCreated(SessionCreatedEvent),
    #[serde(rename = "session.updated")]
    SessionUpdated(SessionUpdatedEvent),
    #[serde(rename = "conversation.created")]
    ConversationCreated(ConversationCreatedEvent),
    #[serde(rename = "conversation.item.created")]
    ConversationItemCreated(ConversationItemCreatedEvent),
    #[serde(rename = "conversation.item.truncated")]
    ConversationItemTruncated(ConversationItemTruncatedEvent),
    #[serde(rename = "conversation.item.deleted")]
    ConversationItemDeleted(ConversationItemDeletedEvent),
    #[serde(rename = "conversation.item.input_audio_transcription.completed")]
    ConversationItemInputAudioTranscriptionCompleted(
        ConversationItemInputAudioTranscriptionCompletedEvent,
    ),
    #[serde(rename = "conversation.item.input_audio_transcription.failed")]
    ConversationItemInputAudioTranscriptionFailed(
        ConversationItemInputAudioTranscriptionFailedEvent,
    ),
    #[serde(rename = "input_audio_buffer.committed")]
    InputAudioBufferCommitted(InputAudioBufferCommittedEvent),
    #[serde(rename = "input_audio_buffer.cleared")]
    InputAudioBufferCleared(InputAudioBufferClearedEvent),
    #[serde(rename = "input_audio_buffer.speech_started")]
    InputAudioBufferSpeechStarted(InputAudioBufferSpeechStartedEvent),
    #[serde(rename = "input_audio_buffer.speech_stopped")]
    InputAudioBufferSpeechStopped(InputAudioBufferSpeechStoppedEvent),
    #[serde(rename = "response.created")]
    ResponseCreated(ResponseCreatedEvent),
    #[serde(rename = "response.done")]
    ResponseDone(ResponseDoneEvent),
    #[serde(rename = "response.output_item.added")]
    ResponseOutputItemAdded(ResponseOutputItemAddedEvent),
    #[serde(rename = "response.output_item.done")]
    ResponseOutputItemDone(ResponseOutputItemDoneEvent),
    #[serde(rename = "response.content_part.added")]
    ResponseContentPartAdded(ResponseContentPartAddedEvent),
    #[serde(rename = "response.content_part.done")]
    ResponseContentPartDone(ResponseContentPartDoneEvent),
    #[serde(rename = "response.text.delta")]
    ResponseTextDelta(ResponseTextDeltaEvent),
    #[serde(rename = "response.text.done")]
    ResponseTextDone(ResponseTextDoneEvent),
    #[serde(rename = "response.audio_transcript.delta")]
    ResponseAudioTranscriptDelta(ResponseAudioTranscriptDeltaEvent),
    #[serde(rename = "response.audio_transcript.done")]
    ResponseAudioTranscriptDone(ResponseAudioTranscriptDoneEvent),
    #[serde(rename = "response.audio.delta")]
    ResponseAudioDelta(ResponseAudioDeltaEvent),
    #[serde(rename = "response.audio.done")]
    ResponseAudioDone(ResponseAudioDoneEvent),
    #[serde(rename = "response.function_call_arguments.delta")]
    ResponseFunctionCallArgumentsDelta(ResponseFunctionCallArgumentsDeltaEvent),
    #[serde(rename = "response.function_call_arguments.done")]
    ResponseFunctionCallArgumentsDone(ResponseFunctionCallArgumentsDoneEvent),
    #[serde(rename = "rate_limits.updated")]
    RateLimitsUpdated(RateLimitsUpdatedEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Session;

    #[test]
    fn commit_serializes_to_bare_type() {
        let event = ClientEvent::InputAudioBufferCommit(InputAudioBufferCommitEvent::new());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"input_audio_buffer.commit"}"#);
    }

    #[test]
    fn session_update_carries_session() {
        let session = Session::builder().with_instructions("debate").build();
        let event = ClientEvent::SessionUpdate(SessionUpdateEvent::new(session));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session.update");
        assert_eq!(json["session"]["instructions"], "debate");
    }

    #[test]
    fn truncate_carries_cut_point() {
        let event = ClientEvent::ConversationItemTruncate(ConversationItemTruncateEvent::new(
            "resp_77", 0, 1500,
        ));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "conversation.item.truncate");
        assert_eq!(json["item_id"], "resp_77");
        assert_eq!(json["content_index"], 0);
        assert_eq!(json["audio_end_ms"], 1500);
    }

    #[test]
    fn response_create_instructions_are_optional() {
        let bare = ClientEvent::ResponseCreate(ResponseCreateEvent::new());
        assert_eq!(
            serde_json::to_string(&bare).unwrap(),
            r#"{"type":"response.create"}"#
        );

        let scripted = ClientEvent::ResponseCreate(
            ResponseCreateEvent::new().with_instructions("Read the opening."),
        );
        let json = serde_json::to_value(&scripted).unwrap();
        assert_eq!(json["response"]["instructions"], "Read the opening.");
    }

    #[test]
    fn response_created_decodes_response_id() {
        let json = r#"{
            "type": "response.created",
            "event_id": "event_1",
            "response": {"id": "resp_42", "status": "in_progress"}
        }"#;
        match serde_json::from_str::<ServerEvent>(json).unwrap() {
            ServerEvent::ResponseCreated(event) => assert_eq!(event.response().id(), "resp_42"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn audio_delta_decodes_payload() {
        let json = r#"{
            "type": "response.audio.delta",
            "event_id": "event_2",
            "item_id": "item_9",
            "delta": "AAAA"
        }"#;
        match serde_json::from_str::<ServerEvent>(json).unwrap() {
            ServerEvent::ResponseAudioDelta(event) => {
                assert_eq!(event.delta(), "AAAA");
                assert_eq!(event.item_id(), "item_9");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn bookkeeping_events_decode() {
        let json = r#"{"type":"rate_limits.updated","event_id":"event_3"}"#;
        assert!(matches!(
            serde_json::from_str::<ServerEvent>(json).unwrap(),
            ServerEvent::RateLimitsUpdated(_)
        ));

        let json = r#"{"type":"input_audio_buffer.committed","event_id":"event_4","item_id":"item_1"}"#;
        assert!(matches!(
            serde_json::from_str::<ServerEvent>(json).unwrap(),
            ServerEvent::InputAudioBufferCommitted(_)
        ));
    }

    #[test]
    fn unknown_event_type_is_a_decode_error() {
        let json = r#"{"type":"response.reticulated","event_id":"event_5"}"#;
        assert!(serde_json::from_str::<ServerEvent>(json).is_err());
    }
}
