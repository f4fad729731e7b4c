//! Scripted opening arguments, played before the event processors start.
//!
//! Each scripted persona is told to read its line verbatim; the audio comes
//! back through the normal response stream and is relayed to the client.
//! With or without a script, the client always receives the end marker so
//! its UI can unlock the microphone.

use std::path::Path;

use axum::extract::ws::{Message as ClientMessage, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use debate_relay_types::events::ResponseCreateEvent;
use debate_relay_types::{ClientEvent, ServerEvent};
use debate_relay_utils::audio;

use crate::bootstrap::{PersonaSession, ServiceSocket};
use crate::error::RelayError;
use crate::frame;
use crate::state::Persona;

pub(crate) struct OpeningScript {
    entries: Vec<(Persona, String)>,
}

impl OpeningScript {
    /// Loads per-persona opening lines from `dir`. Absent files just mean
    /// that persona has no scripted line.
    pub fn load(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self {
                entries: Vec::new(),
            };
        };
        let files = [
            (Persona::Moderator, "moderator_intro.txt"),
            (Persona::Safety, "safety_opening.txt"),
            (Persona::Innovate, "innovate_opening.txt"),
        ];
        let mut entries = Vec::new();
        for (persona, name) in files {
            let path = dir.join(name);
            match std::fs::read_to_string(&path) {
                Ok(text) => entries.push((persona, text.trim().to_string())),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "no opening script")
                }
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Plays each scripted line through its persona, relaying the audio to the
/// client, then marks the end of openings.
pub(crate) async fn run(
    sessions: &mut [PersonaSession; 3],
    client: &mut WebSocket,
    client_sample_rate: u32,
    script: &OpeningScript,
) -> Result<(), RelayError> {
    for (persona, text) in &script.entries {
        let create = ClientEvent::ResponseCreate(
            ResponseCreateEvent::new()
                .with_instructions(&format!("Please respond with the following: \"{text}\"")),
        );
        let json = serde_json::to_string(&create)?;
        let socket = &mut sessions[persona.index()].socket;
        socket
            .send(Message::Text(json))
            .await
            .map_err(|e| RelayError::Socket(format!("{} write: {e}", persona.name())))?;
        relay_reply(socket, client, client_sample_rate).await?;
    }

    client
        .send(ClientMessage::Binary(frame::opening_args_end()))
        .await
        .map_err(|e| RelayError::Socket(format!("client write: {e}")))
}

/// Streams one response's audio to the client, returning once the service
/// reports the response done.
async fn relay_reply(
    socket: &mut ServiceSocket,
    client: &mut WebSocket,
    client_sample_rate: u32,
) -> Result<(), RelayError> {
    while let Some(message) = socket.next().await {
        let message = message.map_err(|e| RelayError::Socket(format!("service read: {e}")))?;
        let Message::Text(text) = message else {
            continue;
        };
        let event = match serde_json::from_str::<ServerEvent>(&text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed service event");
                continue;
            }
        };
        match event {
            ServerEvent::ResponseAudioDelta(event) => {
                let chunk = audio::decode_base64_pcm(event.delta())
                    .and_then(|pcm| {
                        audio::resample(&pcm, audio::SERVICE_SAMPLE_RATE, client_sample_rate)
                    });
                match chunk {
                    Ok(chunk) => client
                        .send(ClientMessage::Binary(chunk))
                        .await
                        .map_err(|e| RelayError::Socket(format!("client write: {e}")))?,
                    Err(e) => tracing::warn!(error = %e, "dropping unplayable audio delta"),
                }
            }
            ServerEvent::ResponseDone(_) => return Ok(()),
            ServerEvent::Error(event) => {
                tracing::warn!(message = event.error().message(), "service error during opening");
            }
            _ => {}
        }
    }
    Err(RelayError::Socket(
        "service stream ended during opening".into(),
    ))
}
