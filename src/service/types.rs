//! Wire types for the messages endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST {base_url}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens in the reply.
    pub max_tokens: u32,
    /// Conversation turns; a generation sends a single user turn.
    pub messages: Vec<Message>,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// `user` or `assistant`.
    pub role: String,
    /// Turn text.
    pub content: String,
}

/// Response body from the messages endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// Content blocks in order.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Why the model stopped, if reported.
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// A content block. Only text blocks carry itinerary payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block type, e.g. `text`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Block text for text blocks.
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesRequest {
    /// Creates a request with a single user turn.
    #[must_use]
    pub fn user(model: impl Into<String>, max_tokens: u32, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages: vec![Message {
                role: String::from("user"),
                content: prompt.into(),
            }],
        }
    }
}

impl MessagesResponse {
    /// Concatenates the text of every block, in order.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}
