//! One relay session: the wiring between a human connection, three persona
//! sessions, four event processors and the turn-state fan-out, plus the
//! teardown that takes all of it down together.

mod actor;
mod client;
mod opening;
mod persona;

use axum::extract::ws::{Message as ClientMessage, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tokio_tungstenite::tungstenite::Message;

use debate_relay_types::ClientEvent;

use crate::bootstrap::{self, PersonaSession, ServiceSocket};
use crate::config::Config;
use crate::error::RelayError;
use crate::state::{Persona, TurnState};
use crate::transcribe::{self, TranscriptionSink};
use actor::{Actor, Switchboard};
use client::ClientDispatch;
use opening::OpeningScript;
use persona::PersonaDispatch;

/// Capacity of each connection's bounded queues. A full sibling queue
/// blocks the sender, which is the session's backpressure.
const EVENT_QUEUE: usize = 64;
const STATE_QUEUE: usize = 16;

/// Runs one relay session to completion. Returns when the client
/// disconnects, any socket fails, or bootstrap cannot produce all three
/// persona sessions; in every case the whole session is gone by the time
/// this returns.
pub async fn run(
    mut client_socket: WebSocket,
    client_sample_rate: u32,
    config: &Config,
    sink: Box<dyn TranscriptionSink>,
) -> Result<(), RelayError> {
    let mut sessions = bootstrap::open_sessions(config).await?;

    let script = OpeningScript::load(config.opening_dir());
    if !script.is_empty() {
        tracing::info!("playing scripted opening arguments");
    }
    opening::run(&mut sessions, &mut client_socket, client_sample_rate, &script).await?;

    let initial = TurnState::new(client_sample_rate);
    let mut tasks: JoinSet<Result<(), RelayError>> = JoinSet::new();

    // Turn-state plumbing: processors publish into one queue; the fan-out
    // task re-broadcasts every snapshot to all four processors, the
    // originator included.
    let (state_tx, mut state_inbox) = mpsc::channel::<TurnState>(STATE_QUEUE);
    let (state_fanout, _) = broadcast::channel::<TurnState>(STATE_QUEUE);

    let (client_tx, client_rx) = mpsc::channel::<Vec<u8>>(EVENT_QUEUE);
    let (moderator_tx, moderator_rx) = mpsc::channel::<ClientEvent>(EVENT_QUEUE);
    let (innovate_tx, innovate_rx) = mpsc::channel::<ClientEvent>(EVENT_QUEUE);
    let (safety_tx, safety_rx) = mpsc::channel::<ClientEvent>(EVENT_QUEUE);
    let (audio_tx, audio_rx) = mpsc::channel::<Vec<u8>>(EVENT_QUEUE);

    let board = Switchboard::new(
        [moderator_tx, innovate_tx, safety_tx],
        client_tx,
        audio_tx,
        state_tx,
    );

    {
        let fanout = state_fanout.clone();
        tasks.spawn(async move {
            while let Some(state) = state_inbox.recv().await {
                // an error just means every subscriber is already gone
                let _ = fanout.send(state);
            }
            Ok(())
        });
    }

    tasks.spawn(async move {
        transcribe::run(audio_rx, sink).await;
        Ok(())
    });

    let [moderator, innovate, safety] = sessions;
    spawn_persona(&mut tasks, moderator, moderator_rx, &board, &state_fanout, &initial);
    spawn_persona(&mut tasks, innovate, innovate_rx, &board, &state_fanout, &initial);
    spawn_persona(&mut tasks, safety, safety_rx, &board, &state_fanout, &initial);

    let (client_write, client_read) = client_socket.split();
    let (client_in_tx, client_in_rx) = mpsc::channel::<Vec<u8>>(EVENT_QUEUE);
    tasks.spawn(read_client(client_read, client_in_tx));
    tasks.spawn(write_client(client_write, client_rx));
    tasks.spawn(
        Actor::new(
            ClientDispatch::new(),
            client_in_rx,
            state_fanout.subscribe(),
            initial,
            board,
        )
        .run(),
    );

    // The first task to finish, for whatever reason, ends the session:
    // partial closure is not a state this relay can be in.
    match tasks.join_next().await {
        Some(Ok(Ok(()))) => tracing::info!("relay task finished, tearing down session"),
        Some(Ok(Err(e))) => tracing::warn!(error = %e, "relay task failed, tearing down session"),
        Some(Err(e)) => tracing::error!(error = %e, "relay task panicked"),
        None => {}
    }
    tasks.shutdown().await;
    Ok(())
}

fn spawn_persona(
    tasks: &mut JoinSet<Result<(), RelayError>>,
    session: PersonaSession,
    outbound: mpsc::Receiver<ClientEvent>,
    board: &Switchboard,
    fanout: &broadcast::Sender<TurnState>,
    initial: &TurnState,
) {
    let PersonaSession {
        persona, socket, ..
    } = session;
    let (write, read) = socket.split();
    let (in_tx, in_rx) = mpsc::channel::<Vec<u8>>(EVENT_QUEUE);
    tasks.spawn(read_service(persona, read, in_tx));
    tasks.spawn(write_service(persona, write, outbound));
    tasks.spawn(
        Actor::new(
            PersonaDispatch::new(persona),
            in_rx,
            fanout.subscribe(),
            initial.clone(),
            board.clone(),
        )
        .run(),
    );
}

async fn read_service(
    persona: Persona,
    mut read: SplitStream<ServiceSocket>,
    inbound: mpsc::Sender<Vec<u8>>,
) -> Result<(), RelayError> {
    while let Some(message) = read.next().await {
        let message =
            message.map_err(|e| RelayError::Socket(format!("{} read: {e}", persona.name())))?;
        match message {
            Message::Text(text) => {
                if inbound.send(text.into_bytes()).await.is_err() {
                    break;
                }
            }
            Message::Close(reason) => {
                tracing::info!(persona = persona.name(), ?reason, "service closed the session");
                break;
            }
            Message::Binary(bin) => {
                tracing::warn!(
                    persona = persona.name(),
                    bytes = bin.len(),
                    "unexpected binary message from service"
                );
            }
            _ => {}
        }
    }
    Ok(())
}

async fn write_service(
    persona: Persona,
    mut write: SplitSink<ServiceSocket, Message>,
    mut outbound: mpsc::Receiver<ClientEvent>,
) -> Result<(), RelayError> {
    while let Some(event) = outbound.recv().await {
        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize event");
                continue;
            }
        };
        write
            .send(Message::Text(text))
            .await
            .map_err(|e| RelayError::Socket(format!("{} write: {e}", persona.name())))?;
    }
    Ok(())
}

async fn read_client(
    mut read: SplitStream<WebSocket>,
    inbound: mpsc::Sender<Vec<u8>>,
) -> Result<(), RelayError> {
    while let Some(message) = read.next().await {
        let message = message.map_err(|e| RelayError::Socket(format!("client read: {e}")))?;
        match message {
            ClientMessage::Binary(frame) => {
                if inbound.send(frame).await.is_err() {
                    break;
                }
            }
            ClientMessage::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}

async fn write_client(
    mut write: SplitSink<WebSocket, ClientMessage>,
    mut outbound: mpsc::Receiver<Vec<u8>>,
) -> Result<(), RelayError> {
    while let Some(frame) = outbound.recv().await {
        write
            .send(ClientMessage::Binary(frame))
            .await
            .map_err(|e| RelayError::Socket(format!("client write: {e}")))?;
    }
    Ok(())
}
