pub mod audio;
pub mod events;
pub mod item;
pub mod session;

pub use audio::{TranscriptionSettings, TurnDetection, Voice};
pub use events::{ClientEvent, ServerEvent};
pub use item::{Item, ItemContent, ItemRole};
pub use session::Session;

/// Audio data encoded as base64
pub type Base64EncodedAudioBytes = String;
