//! Conversation data model: users, messages and their editable fields.
//!
//! Messages point at their author and at the message they quote by
//! *position* (`user_index`, `mention_index`), not by id. Those positions are
//! only meaningful against the collections they were taken from; see
//! [`crate::thread`] for how stale positions are tolerated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collection::Editable;
use crate::error::EditorError;

/// Free-form colour string attached to a user (usually `#rrggbb`).
///
/// Edits never validate the colour; decoding happens only when something
/// needs actual channel values.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct HexColor(String);

static HEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$")
        .expect("hex colour regex pattern is valid")
});

impl HexColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode `#rrggbb` / `rrggbb` into channel values.
    pub fn to_rgb(&self) -> Option<[u8; 3]> {
        let caps = HEX_RE.captures(self.0.trim())?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();
        Some([channel(1)?, channel(2)?, channel(3)?])
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HexColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HexColor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A participant of the mock conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub cellphone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub color: HexColor,
}

/// Treat empty strings the same as missing values.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl User {
    pub fn new(cellphone: impl Into<String>, color: impl Into<HexColor>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cellphone: cellphone.into(),
            saved_name: None,
            original_name: None,
            picture: None,
            color: color.into(),
        }
    }

    pub fn with_saved_name(mut self, name: impl Into<String>) -> Self {
        self.saved_name = Some(name.into());
        self
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    pub fn with_picture(mut self, url: impl Into<String>) -> Self {
        self.picture = Some(url.into());
        self
    }

    /// Name shown above a message: the saved contact name, else the number.
    pub fn primary_label(&self) -> &str {
        present(&self.saved_name).unwrap_or(&self.cellphone)
    }

    /// The "~name" hint, only for contacts that are not saved.
    pub fn secondary_label(&self) -> Option<&str> {
        match present(&self.saved_name) {
            Some(_) => None,
            None => present(&self.original_name),
        }
    }

    /// Label used when picking a message author in the editor.
    pub fn picker_label(&self) -> &str {
        present(&self.saved_name)
            .or_else(|| present(&self.original_name))
            .unwrap_or(&self.cellphone)
    }
}

/// Editable fields of a [`User`]. The id is deliberately absent.
#[derive(Clone, Debug, PartialEq)]
pub enum UserField {
    Cellphone(String),
    SavedName(Option<String>),
    OriginalName(Option<String>),
    Picture(Option<String>),
    Color(HexColor),
}

fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl Editable for User {
    type Field = UserField;

    fn id(&self) -> Uuid {
        self.id
    }

    fn with_field(&self, field: UserField) -> Self {
        let mut next = self.clone();
        match field {
            UserField::Cellphone(v) => next.cellphone = v,
            UserField::SavedName(v) => next.saved_name = v,
            UserField::OriginalName(v) => next.original_name = v,
            UserField::Picture(v) => next.picture = v,
            UserField::Color(v) => next.color = v,
        }
        next
    }

    fn parse_field(name: &str, value: &str) -> Result<UserField, EditorError> {
        match name {
            "cellphone" => Ok(UserField::Cellphone(value.to_string())),
            "savedName" | "saved_name" => Ok(UserField::SavedName(optional_text(value))),
            "originalName" | "original_name" => {
                Ok(UserField::OriginalName(optional_text(value)))
            }
            "picture" => Ok(UserField::Picture(optional_text(value))),
            "color" => Ok(UserField::Color(HexColor::new(value))),
            other => Err(EditorError::UnknownField(other.to_string())),
        }
    }

    fn with_fresh_id(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

/// An emoji reaction and how many people left it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Reaction {
    pub value: String,
    pub amount: u32,
}

/// One chat bubble.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub contents: String,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    /// ISO-8601 timestamp, kept as entered.
    pub timestamp: String,
    /// Position of the author in the users collection; `None` is a draft.
    #[serde(with = "draft_index")]
    pub user_index: Option<usize>,
    /// Position of an earlier message this one quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention_index: Option<usize>,
}

impl Message {
    pub fn new(contents: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            contents: contents.into(),
            reactions: Vec::new(),
            timestamp: timestamp.into(),
            user_index: None,
            mention_index: None,
        }
    }

    pub fn by(mut self, user_index: usize) -> Self {
        self.user_index = Some(user_index);
        self
    }

    pub fn mentioning(mut self, mention_index: usize) -> Self {
        self.mention_index = Some(mention_index);
        self
    }

    pub fn is_draft(&self) -> bool {
        self.user_index.is_none()
    }
}

/// Editable fields of a [`Message`].
#[derive(Clone, Debug, PartialEq)]
pub enum MessageField {
    Contents(String),
    Timestamp(String),
    UserIndex(Option<usize>),
    MentionIndex(Option<usize>),
}

/// Parse an index typed into a text field. Blank or negative means "none".
fn parse_index(field: &'static str, value: &str) -> Result<Option<usize>, EditorError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(|raw| usize::try_from(raw).ok())
        .map_err(|_| EditorError::InvalidValue {
            field,
            value: value.to_string(),
        })
}

impl Editable for Message {
    type Field = MessageField;

    fn id(&self) -> Uuid {
        self.id
    }

    fn with_field(&self, field: MessageField) -> Self {
        let mut next = self.clone();
        match field {
            MessageField::Contents(v) => next.contents = v,
            MessageField::Timestamp(v) => next.timestamp = v,
            MessageField::UserIndex(v) => next.user_index = v,
            MessageField::MentionIndex(v) => next.mention_index = v,
        }
        next
    }

    fn parse_field(name: &str, value: &str) -> Result<MessageField, EditorError> {
        match name {
            "contents" => Ok(MessageField::Contents(value.to_string())),
            "timestamp" => Ok(MessageField::Timestamp(value.to_string())),
            "userIndex" | "user_index" => {
                parse_index("userIndex", value).map(MessageField::UserIndex)
            }
            "mentionIndex" | "mention_index" => {
                parse_index("mentionIndex", value).map(MessageField::MentionIndex)
            }
            other => Err(EditorError::UnknownField(other.to_string())),
        }
    }

    fn with_fresh_id(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

/// `userIndex` travels as a plain integer where `-1` marks a draft.
mod draft_index {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => s.serialize_u64(*index as u64),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(d)?;
        Ok(usize::try_from(raw).ok())
    }
}
