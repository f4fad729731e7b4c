//! Dispatch for one persona's service session.

use debate_relay_types::events::ConversationItemCreateEvent;
use debate_relay_types::{ClientEvent, Item, ServerEvent};
use debate_relay_utils::audio;

use super::actor::{Dispatch, Switchboard};
use crate::error::RelayError;
use crate::state::{Persona, Speaker, TurnState};

pub(crate) struct PersonaDispatch {
    persona: Persona,
}

impl PersonaDispatch {
    pub fn new(persona: Persona) -> Self {
        Self { persona }
    }
}

impl Dispatch for PersonaDispatch {
    async fn dispatch(
        &mut self,
        raw: &[u8],
        state: &TurnState,
        board: &Switchboard,
    ) -> Result<(), RelayError> {
        let event: ServerEvent = serde_json::from_slice(raw)?;
        match event {
            ServerEvent::Error(event) => Err(RelayError::Service {
                code: event.error().code().map(str::to_string),
                message: event.error().message().to_string(),
            }),

            // A response started streaming from this session; record its id
            // so a barge-in knows what to truncate. The floor-holder was
            // already decided when the response was requested.
            ServerEvent::ResponseCreated(event) => {
                board
                    .publish(TurnState {
                        active_response_id: Some(event.response().id().to_string()),
                        speaker: state.speaker,
                        client_sample_rate: state.client_sample_rate,
                    })
                    .await
            }

            ServerEvent::ResponseDone(_) => {
                board
                    .publish(TurnState {
                        active_response_id: None,
                        speaker: Speaker::None,
                        client_sample_rate: state.client_sample_rate,
                    })
                    .await
            }

            ServerEvent::ResponseAudioDelta(event) => {
                let pcm = audio::decode_base64_pcm(event.delta())?;
                let resampled =
                    audio::resample(&pcm, audio::SERVICE_SAMPLE_RATE, state.client_sample_rate)?;
                board.send_client(resampled).await
            }

            // The finished spoken response, as text. Mirror it into the
            // other two personas' conversations so their context keeps up
            // without replaying audio.
            ServerEvent::ResponseAudioTranscriptDone(event) => {
                let create = ClientEvent::ConversationItemCreate(ConversationItemCreateEvent::new(
                    Item::assistant_text(event.transcript()),
                ));
                for sibling in self.persona.others() {
                    board.send_to(sibling, create.clone()).await?;
                }
                Ok(())
            }

            // Service-side bookkeeping: decoded so drift is caught, nothing
            // to do for turn-taking or client audio.
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use debate_relay_types::{ItemContent, ItemRole};

    use super::*;

    struct Harness {
        board: Switchboard,
        personas: [mpsc::Receiver<ClientEvent>; 3],
        client: mpsc::Receiver<Vec<u8>>,
        transcriber: mpsc::Receiver<Vec<u8>>,
        states: mpsc::Receiver<TurnState>,
    }

    impl Harness {
        fn new() -> Self {
            let (moderator_tx, moderator_rx) = mpsc::channel(32);
            let (innovate_tx, innovate_rx) = mpsc::channel(32);
            let (safety_tx, safety_rx) = mpsc::channel(32);
            let (client_tx, client_rx) = mpsc::channel(32);
            let (audio_tx, audio_rx) = mpsc::channel(32);
            let (state_tx, state_rx) = mpsc::channel(32);
            Self {
                board: Switchboard::new(
                    [moderator_tx, innovate_tx, safety_tx],
                    client_tx,
                    audio_tx,
                    state_tx,
                ),
                personas: [moderator_rx, innovate_rx, safety_rx],
                client: client_rx,
                transcriber: audio_rx,
                states: state_rx,
            }
        }

        fn assert_all_quiet(&mut self) {
            for rx in &mut self.personas {
                assert!(rx.try_recv().is_err());
            }
            assert!(self.client.try_recv().is_err());
            assert!(self.transcriber.try_recv().is_err());
            assert!(self.states.try_recv().is_err());
        }
    }

    fn state_with(speaker: Speaker, response_id: Option<&str>) -> TurnState {
        TurnState {
            active_response_id: response_id.map(str::to_string),
            speaker,
            client_sample_rate: audio::SERVICE_SAMPLE_RATE,
        }
    }

    #[tokio::test]
    async fn response_created_records_id_and_preserves_speaker() {
        let mut harness = Harness::new();
        let mut dispatch = PersonaDispatch::new(Persona::Innovate);
        let raw = br#"{"type":"response.created","event_id":"e1","response":{"id":"resp_9"}}"#;

        dispatch
            .dispatch(raw, &state_with(Speaker::Innovate, None), &harness.board)
            .await
            .unwrap();

        let published = harness.states.try_recv().unwrap();
        assert_eq!(published.active_response_id.as_deref(), Some("resp_9"));
        assert_eq!(published.speaker, Speaker::Innovate);
        harness.assert_all_quiet();
    }

    #[tokio::test]
    async fn response_done_releases_the_floor() {
        let mut harness = Harness::new();
        let mut dispatch = PersonaDispatch::new(Persona::Safety);
        let raw = br#"{"type":"response.done","event_id":"e2","response":{"id":"resp_9"}}"#;

        dispatch
            .dispatch(
                raw,
                &state_with(Speaker::Safety, Some("resp_9")),
                &harness.board,
            )
            .await
            .unwrap();

        let published = harness.states.try_recv().unwrap();
        assert_eq!(published.active_response_id, None);
        assert_eq!(published.speaker, Speaker::None);
        harness.assert_all_quiet();
    }

    #[tokio::test]
    async fn audio_delta_reaches_the_client_as_pcm() {
        let mut harness = Harness::new();
        let mut dispatch = PersonaDispatch::new(Persona::Moderator);
        let pcm: Vec<u8> = vec![1, 0, 2, 0, 3, 0, 4, 0];
        let delta = audio::encode_base64_pcm(&pcm);
        let raw = format!(
            r#"{{"type":"response.audio.delta","event_id":"e3","item_id":"item_1","delta":"{delta}"}}"#
        );

        // client rate equals the service rate here, so bytes pass through
        dispatch
            .dispatch(
                raw.as_bytes(),
                &state_with(Speaker::Moderator, Some("resp_1")),
                &harness.board,
            )
            .await
            .unwrap();

        assert_eq!(harness.client.try_recv().unwrap(), pcm);
        harness.assert_all_quiet();
    }

    #[tokio::test]
    async fn transcript_done_mirrors_to_the_other_two() {
        let mut harness = Harness::new();
        let mut dispatch = PersonaDispatch::new(Persona::Innovate);
        let raw = br#"{"type":"response.audio_transcript.done","event_id":"e4","transcript":"We must build faster."}"#;

        dispatch
            .dispatch(raw, &state_with(Speaker::Innovate, None), &harness.board)
            .await
            .unwrap();

        // Moderator and Safety each get the item; Innovate itself does not.
        for persona in Persona::Innovate.others() {
            match harness.personas[persona.index()].try_recv().unwrap() {
                ClientEvent::ConversationItemCreate(event) => {
                    let Item::Message(message) = event.item();
                    assert_eq!(message.role, ItemRole::Assistant);
                    assert_eq!(
                        message.content[0],
                        ItemContent::InputText {
                            text: "We must build faster.".to_string()
                        }
                    );
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(harness.personas[Persona::Innovate.index()].try_recv().is_err());
        harness.assert_all_quiet();
    }

    #[tokio::test]
    async fn bookkeeping_events_are_inert() {
        let mut harness = Harness::new();
        let mut dispatch = PersonaDispatch::new(Persona::Moderator);
        let quiet_events = [
            r#"{"type":"rate_limits.updated","event_id":"e5"}"#,
            r#"{"type":"session.created","event_id":"e6"}"#,
            r#"{"type":"response.text.delta","event_id":"e7"}"#,
            r#"{"type":"input_audio_buffer.speech_started","event_id":"e8"}"#,
        ];

        for raw in quiet_events {
            dispatch
                .dispatch(
                    raw.as_bytes(),
                    &state_with(Speaker::None, None),
                    &harness.board,
                )
                .await
                .unwrap();
        }
        harness.assert_all_quiet();
    }

    #[tokio::test]
    async fn service_error_is_nonfatal() {
        let mut harness = Harness::new();
        let mut dispatch = PersonaDispatch::new(Persona::Safety);
        let raw = br#"{"type":"error","event_id":"e9","error":{"type":"server_error","code":"overloaded","message":"try later","param":null}}"#;

        let err = dispatch
            .dispatch(raw, &state_with(Speaker::None, None), &harness.board)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Service { .. }));
        assert!(!err.is_fatal());
        harness.assert_all_quiet();
    }

    #[tokio::test]
    async fn garbage_is_a_droppable_decode_error() {
        let mut harness = Harness::new();
        let mut dispatch = PersonaDispatch::new(Persona::Moderator);

        let err = dispatch
            .dispatch(b"not json", &state_with(Speaker::None, None), &harness.board)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Event(_)));
        assert!(!err.is_fatal());

        // the processor keeps going: a valid event still lands
        let raw = br#"{"type":"response.done","event_id":"e10","response":{"id":"resp_2"}}"#;
        dispatch
            .dispatch(raw, &state_with(Speaker::Moderator, None), &harness.board)
            .await
            .unwrap();
        assert!(harness.states.try_recv().is_ok());
    }
}
