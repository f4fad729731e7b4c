//! The generic per-connection event processor.
//!
//! All four connections (three personas, one client) run the same loop: a
//! select over "next inbound message" and "next turn-state snapshot". Only
//! the decode-and-dispatch step differs, so it is the pluggable part.

use tokio::sync::{broadcast, mpsc};

use debate_relay_types::ClientEvent;

use crate::error::RelayError;
use crate::state::{Persona, TurnState};

/// Routes outbound traffic from one processor to its sibling connections.
///
/// Several processors may enqueue to the same sibling; the sibling's queue
/// serializes delivery, and a full queue blocks the sender, which is the
/// session's only backpressure mechanism.
#[derive(Clone)]
pub(crate) struct Switchboard {
    personas: [mpsc::Sender<ClientEvent>; 3],
    client: mpsc::Sender<Vec<u8>>,
    transcriber: mpsc::Sender<Vec<u8>>,
    states: mpsc::Sender<TurnState>,
}

impl Switchboard {
    pub fn new(
        personas: [mpsc::Sender<ClientEvent>; 3],
        client: mpsc::Sender<Vec<u8>>,
        transcriber: mpsc::Sender<Vec<u8>>,
        states: mpsc::Sender<TurnState>,
    ) -> Self {
        Self {
            personas,
            client,
            transcriber,
            states,
        }
    }

    pub async fn send_to(&self, persona: Persona, event: ClientEvent) -> Result<(), RelayError> {
        self.personas[persona.index()]
            .send(event)
            .await
            .map_err(|_| {
                RelayError::Socket(format!("{} outbound queue closed", persona.name()))
            })
    }

    pub async fn send_to_all(&self, event: &ClientEvent) -> Result<(), RelayError> {
        for persona in Persona::ALL {
            self.send_to(persona, event.clone()).await?;
        }
        Ok(())
    }

    pub async fn send_client(&self, frame: Vec<u8>) -> Result<(), RelayError> {
        self.client
            .send(frame)
            .await
            .map_err(|_| RelayError::Socket("client outbound queue closed".into()))
    }

    pub async fn send_transcriber(&self, audio: Vec<u8>) -> Result<(), RelayError> {
        self.transcriber
            .send(audio)
            .await
            .map_err(|_| RelayError::Socket("transcription queue closed".into()))
    }

    /// Publishes a new turn-state snapshot. The relay fans it back out to
    /// every processor, this one included.
    pub async fn publish(&self, state: TurnState) -> Result<(), RelayError> {
        self.states
            .send(state)
            .await
            .map_err(|_| RelayError::Socket("turn-state channel closed".into()))
    }
}

/// Connection-specific decode and dispatch; the loop around it is shared.
pub(crate) trait Dispatch {
    async fn dispatch(
        &mut self,
        raw: &[u8],
        state: &TurnState,
        board: &Switchboard,
    ) -> Result<(), RelayError>;
}

pub(crate) struct Actor<D> {
    dispatch: D,
    inbound: mpsc::Receiver<Vec<u8>>,
    states: broadcast::Receiver<TurnState>,
    state: TurnState,
    board: Switchboard,
}

impl<D: Dispatch> Actor<D> {
    pub fn new(
        dispatch: D,
        inbound: mpsc::Receiver<Vec<u8>>,
        states: broadcast::Receiver<TurnState>,
        state: TurnState,
        board: Switchboard,
    ) -> Self {
        Self {
            dispatch,
            inbound,
            states,
            state,
            board,
        }
    }

    /// Runs until the inbound queue closes or a fatal error escalates.
    /// Decode-class failures drop the message and keep the loop alive.
    pub async fn run(self) -> Result<(), RelayError> {
        let Actor {
            mut dispatch,
            mut inbound,
            mut states,
            mut state,
            board,
        } = self;

        loop {
            tokio::select! {
                raw = inbound.recv() => {
                    let Some(raw) = raw else { return Ok(()) };
                    if let Err(e) = dispatch.dispatch(&raw, &state, &board).await {
                        if e.is_fatal() {
                            return Err(e);
                        }
                        tracing::warn!(error = %e, "dropping message");
                    }
                }
                next = states.recv() => match next {
                    Ok(next) => state = next,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Snapshots are idempotent; only the latest matters.
                        tracing::warn!(skipped, "turn-state inbox lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return Ok(()),
                },
            }
        }
    }
}
