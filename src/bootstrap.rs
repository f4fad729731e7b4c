//! Opens and configures the three persona sessions against the speech
//! service. Bootstrap is atomic: if any dial or configure send fails, every
//! socket that already opened is closed and the whole attempt fails.

use futures_util::SinkExt;
use rand::seq::SliceRandom;
use secrecy::ExposeSecret;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use debate_relay_types::events::SessionUpdateEvent;
use debate_relay_types::{ClientEvent, Session, TranscriptionSettings, Voice};

use crate::config::Config;
use crate::error::RelayError;
use crate::state::Persona;

pub type ServiceSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const AUTHORIZATION_HEADER: &str = "Authorization";
const REALTIME_BETA_HEADER: &str = "OpenAI-Beta";
const REALTIME_BETA_VALUE: &str = "realtime=v1";

const MODERATOR_INSTRUCTIONS: &str = "You are engaging in a debate on AI. You are the moderator. \
     The user may ask you to ask a question to the debaters.";

const INNOVATE_INSTRUCTIONS: &str = "You are engaging in a debate around AI and are arguing that \
     we should accelerate the pace of innovation.";

const SAFETY_INSTRUCTIONS: &str = "You are engaging in a debate on AI. You are arguing that we \
     need to have a greater concern for safety as we develop AI.";

/// One persona's configured upstream session.
pub struct PersonaSession {
    pub persona: Persona,
    pub voice: Voice,
    pub socket: ServiceSocket,
}

pub fn instructions(persona: Persona) -> &'static str {
    match persona {
        Persona::Moderator => MODERATOR_INSTRUCTIONS,
        Persona::Innovate => INNOVATE_INSTRUCTIONS,
        Persona::Safety => SAFETY_INSTRUCTIONS,
    }
}

/// Opens all three sessions concurrently, deals out voices and sends each
/// session its configuration.
pub async fn open_sessions(config: &Config) -> Result<[PersonaSession; 3], RelayError> {
    let (moderator, innovate, safety) = tokio::join!(dial(config), dial(config), dial(config));

    let mut sockets = match (moderator, innovate, safety) {
        (Ok(m), Ok(i), Ok(s)) => [m, i, s],
        (m, i, s) => {
            let mut reasons = Vec::new();
            for outcome in [m, i, s] {
                match outcome {
                    Ok(mut open) => {
                        let _ = open.close(None).await;
                    }
                    Err(e) => reasons.push(e.to_string()),
                }
            }
            return Err(RelayError::Bootstrap(format!(
                "failed to open persona sessions: {}",
                reasons.join("; ")
            )));
        }
    };

    let voices = assign_voices(&mut rand::thread_rng());

    for persona in Persona::ALL {
        let voice = voices[persona.index()];
        let update =
            ClientEvent::SessionUpdate(SessionUpdateEvent::new(session_config(persona, voice)));
        let text = match serde_json::to_string(&update) {
            Ok(text) => text,
            Err(e) => {
                close_all(&mut sockets).await;
                return Err(RelayError::Bootstrap(format!(
                    "failed to serialize session update: {e}"
                )));
            }
        };
        if let Err(e) = sockets[persona.index()].send(Message::Text(text)).await {
            close_all(&mut sockets).await;
            return Err(RelayError::Bootstrap(format!(
                "failed to configure {} session: {e}",
                persona.name()
            )));
        }
        tracing::debug!(
            persona = persona.name(),
            voice = voice.as_str(),
            "persona session configured"
        );
    }

    let [m, i, s] = sockets;
    Ok([
        PersonaSession {
            persona: Persona::Moderator,
            voice: voices[0],
            socket: m,
        },
        PersonaSession {
            persona: Persona::Innovate,
            voice: voices[1],
            socket: i,
        },
        PersonaSession {
            persona: Persona::Safety,
            voice: voices[2],
            socket: s,
        },
    ])
}

async fn dial(config: &Config) -> Result<ServiceSocket, RelayError> {
    let request = build_request(config)?;
    let (socket, _) = connect_async(request)
        .await
        .map_err(|e| RelayError::Bootstrap(format!("dial failed: {e}")))?;
    Ok(socket)
}

async fn close_all(sockets: &mut [ServiceSocket; 3]) {
    for socket in sockets {
        let _ = socket.close(None).await;
    }
}

fn build_request(config: &Config) -> Result<Request, RelayError> {
    let mut request = format!("{}?model={}", config.base_url(), config.model())
        .into_client_request()
        .map_err(|e| RelayError::Bootstrap(format!("bad service endpoint: {e}")))?;
    let auth = format!("Bearer {}", config.api_key().expose_secret());
    request.headers_mut().insert(
        AUTHORIZATION_HEADER,
        auth.parse()
            .map_err(|_| RelayError::Bootstrap("API key is not a valid header value".into()))?,
    );
    request.headers_mut().insert(
        REALTIME_BETA_HEADER,
        REALTIME_BETA_VALUE
            .parse()
            .map_err(|_| RelayError::Bootstrap("bad beta header value".into()))?,
    );
    Ok(request)
}

/// Deals three distinct voices from the palette, one per persona, in
/// `Persona::ALL` order.
fn assign_voices<R: rand::Rng + ?Sized>(rng: &mut R) -> [Voice; 3] {
    let mut palette = Voice::PALETTE;
    palette.shuffle(rng);
    [palette[0], palette[1], palette[2]]
}

/// Session configuration for one persona. Turn detection stays unset — the
/// resulting null on the wire switches the service's VAD off, because the
/// relay decides the turns. Only the moderator transcribes incoming audio.
fn session_config(persona: Persona, voice: Voice) -> Session {
    let builder = Session::builder()
        .with_instructions(instructions(persona))
        .with_voice(voice);
    match persona {
        Persona::Moderator => builder
            .with_transcription(TranscriptionSettings::whisper())
            .build(),
        Persona::Innovate | Persona::Safety => builder.build(),
    }
}
