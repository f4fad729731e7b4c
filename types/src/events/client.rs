use crate::item::Item;
use crate::session::Session;
use crate::Base64EncodedAudioBytes;

/// `session.update` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionUpdateEvent {
    session: Session,
}

impl SessionUpdateEvent {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// `input_audio_buffer.append` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InputAudioBufferAppendEvent {
    audio: Base64EncodedAudioBytes,
}

impl InputAudioBufferAppendEvent {
    pub fn new(audio: Base64EncodedAudioBytes) -> Self {
        Self { audio }
    }

    pub fn audio(&self) -> &Base64EncodedAudioBytes {
        &self.audio
    }
}

/// `input_audio_buffer.commit` event
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct InputAudioBufferCommitEvent {}

impl InputAudioBufferCommitEvent {
    pub fn new() -> Self {
        Self {}
    }
}

/// `input_audio_buffer.clear` event
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct InputAudioBufferClearEvent {}

impl InputAudioBufferClearEvent {
    pub fn new() -> Self {
        Self {}
    }
}

/// `conversation.item.create` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConversationItemCreateEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_item_id: Option<String>,
    item: Item,
}

impl ConversationItemCreateEvent {
    pub fn new(item: Item) -> Self {
        Self {
            previous_item_id: None,
            item,
        }
    }

    pub fn with_previous_item_id(mut self, previous_item_id: &str) -> Self {
        self.previous_item_id = Some(previous_item_id.to_string());
        self
    }

    pub fn item(&self) -> &Item {
        &self.item
    }
}

/// `conversation.item.truncate` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConversationItemTruncateEvent {
    item_id: String,
    content_index: u32,
    /// Inclusive duration up to which audio is kept, in milliseconds.
    audio_end_ms: u32,
}

impl ConversationItemTruncateEvent {
    pub fn new(item_id: &str, content_index: u32, audio_end_ms: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            content_index,
            audio_end_ms,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn audio_end_ms(&self) -> u32 {
        self.audio_end_ms
    }
}

/// `conversation.item.delete` event
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConversationItemDeleteEvent {
    item_id: String,
}

impl ConversationItemDeleteEvent {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
        }
    }
}

/// `response.create` event
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ResponseCreateEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<ResponseDirectives>,
}

impl ResponseCreateEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-off instructions for this response only, used for scripted lines.
    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.response = Some(ResponseDirectives {
            instructions: instructions.to_string(),
        });
        self
    }

    pub fn instructions(&self) -> Option<&str> {
        self.response.as_ref().map(|r| r.instructions.as_str())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseDirectives {
    instructions: String,
}

/// `response.cancel` event
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ResponseCancelEvent {}

impl ResponseCancelEvent {
    pub fn new() -> Self {
        Self {}
    }
}
