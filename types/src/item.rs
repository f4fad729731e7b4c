use serde::{Deserialize, Serialize};

use crate::Base64EncodedAudioBytes;

/// A conversation item carried by `conversation.item.create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Item {
    #[serde(rename = "message")]
    Message(MessageItem),
}

impl Item {
    /// An assistant-role text item. Used to mirror one persona's finished
    /// spoken response into the other personas' conversations without
    /// replaying the audio.
    pub fn assistant_text(text: &str) -> Self {
        Item::Message(MessageItem {
            role: ItemRole::Assistant,
            content: vec![ItemContent::InputText {
                text: text.to_string(),
            }],
        })
    }

    pub fn user_text(text: &str) -> Self {
        Item::Message(MessageItem {
            role: ItemRole::User,
            content: vec![ItemContent::InputText {
                text: text.to_string(),
            }],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageItem {
    pub role: ItemRole,
    pub content: Vec<ItemContent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ItemContent {
    #[serde(rename = "input_text")]
    InputText { text: String },
    #[serde(rename = "input_audio")]
    InputAudio { audio: Base64EncodedAudioBytes },
    #[serde(rename = "text")]
    Text { text: String },
}
