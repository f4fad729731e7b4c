//! Dispatch for the human-facing socket: the turn-taking state machine.

use debate_relay_types::events::{
    ConversationItemTruncateEvent, InputAudioBufferAppendEvent, InputAudioBufferCommitEvent,
    ResponseCreateEvent,
};
use debate_relay_types::ClientEvent;
use debate_relay_utils::audio;

use super::actor::{Dispatch, Switchboard};
use crate::error::RelayError;
use crate::frame::ClientFrame;
use crate::state::{Persona, Speaker, TurnState};

#[derive(Default)]
pub(crate) struct ClientDispatch;

impl ClientDispatch {
    pub fn new() -> Self {
        Self
    }

    /// Barge-in: cut the in-flight response off at the point the human
    /// actually heard, then take the floor for the client.
    async fn on_speech_started(
        &self,
        elapsed_ms: u32,
        state: &TurnState,
        board: &Switchboard,
    ) -> Result<(), RelayError> {
        if let Some(interrupted) = state.speaker.persona() {
            let item_id = state.active_response_id.clone().unwrap_or_default();
            let truncate = ClientEvent::ConversationItemTruncate(
                ConversationItemTruncateEvent::new(&item_id, 0, elapsed_ms),
            );
            board.send_to(interrupted, truncate).await?;
        }
        board
            .publish(TurnState {
                active_response_id: None,
                speaker: Speaker::Client,
                client_sample_rate: state.client_sample_rate,
            })
            .await
    }

    /// The utterance is complete: close the input segment on all three
    /// sessions, then hand the floor to one persona at random.
    async fn on_speech_ended(
        &self,
        state: &TurnState,
        board: &Switchboard,
    ) -> Result<(), RelayError> {
        let commit = ClientEvent::InputAudioBufferCommit(InputAudioBufferCommitEvent::new());
        board.send_to_all(&commit).await?;

        let next = Persona::choose(&mut rand::thread_rng());
        board
            .send_to(next, ClientEvent::ResponseCreate(ResponseCreateEvent::new()))
            .await?;
        board
            .publish(TurnState {
                active_response_id: None,
                speaker: next.into(),
                client_sample_rate: state.client_sample_rate,
            })
            .await
    }

    /// Live microphone audio: every persona hears the user, and the
    /// transcription collaborator gets a raw copy.
    async fn on_audio(
        &self,
        pcm: &[u8],
        state: &TurnState,
        board: &Switchboard,
    ) -> Result<(), RelayError> {
        let resampled =
            audio::resample(pcm, state.client_sample_rate, audio::SERVICE_SAMPLE_RATE)?;
        let append = ClientEvent::InputAudioBufferAppend(InputAudioBufferAppendEvent::new(
            audio::encode_base64_pcm(&resampled),
        ));
        board.send_to_all(&append).await?;
        board.send_transcriber(resampled).await
    }
}

impl Dispatch for ClientDispatch {
    async fn dispatch(
        &mut self,
        raw: &[u8],
        state: &TurnState,
        board: &Switchboard,
    ) -> Result<(), RelayError> {
        match ClientFrame::decode(raw)? {
            ClientFrame::SpeechStarted { elapsed_ms } => {
                self.on_speech_started(elapsed_ms, state, board).await
            }
            ClientFrame::SpeechEnded => self.on_speech_ended(state, board).await,
            ClientFrame::Audio(pcm) => self.on_audio(&pcm, state, board).await,
        }
    }
}
