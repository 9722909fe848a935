//! Bot API wire types.
//!
//! Narrow mirrors of the Telegram Bot API objects this crate actually
//! touches. Every response field the crate does not read is simply left out;
//! serde ignores unknown fields on deserialization, so these structs keep
//! working as Telegram grows its payloads.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API call comes back in.
///
/// No field defaults here: they would put a `Default` bound on the result
/// type, and absent `Option` fields decode to `None` regardless.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

/// Extra failure details Telegram attaches to some errors.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResponseParameters {
    #[serde(default)]
    pub migrate_to_chat_id: Option<i64>,
    #[serde(default)]
    pub retry_after: Option<u64>,
}

/// A Telegram user or bot account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// `@username` when set, otherwise the first name.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.username
            .as_ref()
            .map_or_else(|| self.first_name.clone(), |name| format!("@{name}"))
    }
}

/// A chat of any kind: private, group, supergroup or channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub invite_link: Option<String>,
}

/// One resolution of a photo Telegram stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub file_size: Option<i64>,
}

/// An animation (GIF or soundless MP4) attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Animation {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
    pub duration: i64,
}

/// An incoming or sent message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    #[serde(default)]
    pub animation: Option<Animation>,
}

impl Message {
    /// File id of the first photo size, reusable for later sends.
    #[must_use]
    pub fn photo_file_id(&self) -> Option<&str> {
        self.photo.first().map(|photo| photo.file_id.as_str())
    }

    /// File id of the attached animation, reusable for later sends.
    #[must_use]
    pub fn animation_file_id(&self) -> Option<&str> {
        self.animation
            .as_ref()
            .map(|animation| animation.file_id.as_str())
    }
}

/// A button press on an inline keyboard.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// One update from `getUpdates` or an incoming webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// Parses a webhook request body into an update.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the body is not a valid
    /// update object.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// Membership record returned by `getChatMember`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMember {
    pub user: User,
    pub status: String,
    #[serde(default)]
    pub until_date: Option<i64>,
}

impl ChatMember {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.status == "administrator" || self.status == "creator"
    }
}

/// The permission set used when restricting or unrestricting a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPermissions {
    pub can_send_messages: bool,
    pub can_send_media_messages: bool,
    pub can_send_other_messages: bool,
    pub can_add_web_page_previews: bool,
}

impl ChatPermissions {
    /// Everything this crate manages switched on; used to lift a mute.
    #[must_use]
    pub const fn allow_all() -> Self {
        Self {
            can_send_messages: true,
            can_send_media_messages: true,
            can_send_other_messages: true,
            can_add_web_page_previews: true,
        }
    }

    /// Everything switched off; used to mute a member.
    #[must_use]
    pub const fn deny_all() -> Self {
        Self {
            can_send_messages: false,
            can_send_media_messages: false,
            can_send_other_messages: false,
            can_add_web_page_previews: false,
        }
    }
}

/// An invite link created for a chat.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatInviteLink {
    pub invite_link: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub expire_date: Option<i64>,
    #[serde(default)]
    pub member_limit: Option<i64>,
    #[serde(default)]
    pub creates_join_request: bool,
}

/// One button of an inline keyboard.
///
/// Exactly one of `callback_data` and `url` should be set; Telegram rejects
/// buttons carrying both or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineKeyboardButton {
    /// A button that sends `data` back as a callback query when pressed.
    #[must_use]
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            url: None,
        }
    }

    /// A button that opens `url` when pressed.
    #[must_use]
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }
}

/// Inline keyboard attached below a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    #[must_use]
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }
}

/// Text formatting mode for message bodies and captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    #[serde(rename = "HTML")]
    Html,
}
