//! Conversation Messages
//!
//! Input events delivered by the front end and the render instructions the
//! bot hands back.

use serde::{Deserialize, Serialize};

/// Identity of the user who triggered an event
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event emitted by the conversational front end
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Slash command such as `/start` (leading slash optional)
    Command { name: String },

    /// A button was pressed; carries the button's opaque token
    ChoiceSelected { token: String },

    /// Free-form text typed by the user
    FreeText { text: String },
}

impl InputEvent {
    pub fn command(name: impl Into<String>) -> Self {
        Self::Command { name: name.into() }
    }

    pub fn choice(token: impl Into<String>) -> Self {
        Self::ChoiceSelected { token: token.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::FreeText { text: text.into() }
    }
}

/// An event together with the identity that triggered it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncomingEvent {
    pub user_id: UserId,
    pub event: InputEvent,
}

/// A selectable option rendered alongside a reply
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Button label shown to the user
    pub label: String,

    /// Opaque token returned in `InputEvent::ChoiceSelected`
    pub token: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Render instruction: message text plus an ordered list of choices
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,

    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Reply {
    /// Plain text reply without choices
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// Append a choice
    pub fn with_choice(mut self, label: impl Into<String>, token: impl Into<String>) -> Self {
        self.choices.push(Choice::new(label, token));
        self
    }

    /// Tokens of all choices, in display order
    pub fn tokens(&self) -> Vec<&str> {
        self.choices.iter().map(|c| c.token.as_str()).collect()
    }
}
