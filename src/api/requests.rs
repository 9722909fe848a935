//! Request payloads for Bot API methods.
//!
//! Each struct serializes straight into the JSON body of its method call.
//! Optional fields are plain `Option`s skipped when unset, so the wire
//! payload only carries what the caller actually chose. Setters consume and
//! return the payload, builder style.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::types::{InlineKeyboardMarkup, ParseMode};

/// A file to send: an id Telegram already knows, a URL it should fetch, or
/// raw bytes uploaded with the request.
///
/// Only the bytes variant forces a multipart upload; the other two travel as
/// plain strings inside the JSON payload.
#[derive(Debug, Clone)]
pub enum InputFile {
    FileId(String),
    Url(String),
    Bytes { file_name: String, data: Vec<u8> },
}

impl InputFile {
    #[must_use]
    pub fn file_id(id: impl Into<String>) -> Self {
        Self::FileId(id.into())
    }

    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    #[must_use]
    pub fn bytes(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self::Bytes {
            file_name: file_name.into(),
            data,
        }
    }

    /// File name and contents when this is an upload, `None` otherwise.
    #[must_use]
    pub fn as_upload(&self) -> Option<(&str, &[u8])> {
        match self {
            Self::Bytes { file_name, data } => Some((file_name, data)),
            _ => None,
        }
    }
}

impl Serialize for InputFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::FileId(id) => serializer.serialize_str(id),
            Self::Url(url) => serializer.serialize_str(url),
            // Placeholder only; uploads are moved into a multipart part
            // under the field name before the payload is sent.
            Self::Bytes { file_name, .. } => {
                serializer.serialize_str(&format!("attach://{file_name}"))
            }
        }
    }
}

/// Payload for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendMessage {
    #[must_use]
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
            disable_notification: None,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }

    #[must_use]
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_silent_notification(mut self) -> Self {
        self.disable_notification = Some(true);
        self
    }

    #[must_use]
    pub fn with_reply_to(mut self, message_id: i64) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }

    #[must_use]
    pub fn with_reply_markup(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}

/// Payload for `sendPhoto`.
#[derive(Debug, Clone, Serialize)]
pub struct SendPhoto {
    pub chat_id: i64,
    pub photo: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendPhoto {
    #[must_use]
    pub fn new(chat_id: i64, photo: InputFile) -> Self {
        Self {
            chat_id,
            photo,
            caption: None,
            parse_mode: None,
            reply_markup: None,
        }
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_reply_markup(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}

/// Payload for `sendAnimation`.
#[derive(Debug, Clone, Serialize)]
pub struct SendAnimation {
    pub chat_id: i64,
    pub animation: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendAnimation {
    #[must_use]
    pub fn new(chat_id: i64, animation: InputFile) -> Self {
        Self {
            chat_id,
            animation,
            caption: None,
            parse_mode: None,
            reply_markup: None,
        }
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_reply_markup(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}

/// Payload for `editMessageText`.
#[derive(Debug, Clone, Serialize)]
pub struct EditMessageText {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl EditMessageText {
    #[must_use]
    pub fn new(chat_id: i64, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    #[must_use]
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_reply_markup(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}

/// Payload for `editMessageCaption`.
#[derive(Debug, Clone, Serialize)]
pub struct EditMessageCaption {
    pub chat_id: i64,
    pub message_id: i64,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl EditMessageCaption {
    #[must_use]
    pub fn new(chat_id: i64, message_id: i64, caption: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_id,
            caption: caption.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    #[must_use]
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_reply_markup(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}

/// Payload for `answerCallbackQuery`.
///
/// Without text the press is acknowledged silently; with text Telegram shows
/// a toast, or a modal alert when [`with_alert`](Self::with_alert) is set.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerCallbackQuery {
    pub callback_query_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_alert: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_time: Option<u64>,
}

impl AnswerCallbackQuery {
    #[must_use]
    pub fn new(callback_query_id: impl Into<String>) -> Self {
        Self {
            callback_query_id: callback_query_id.into(),
            text: None,
            show_alert: None,
            cache_time: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_alert(mut self) -> Self {
        self.show_alert = Some(true);
        self
    }

    #[must_use]
    pub fn with_cache_time(mut self, seconds: u64) -> Self {
        self.cache_time = Some(seconds);
        self
    }
}

/// Payload for `createChatInviteLink`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateChatInviteLink {
    pub chat_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creates_join_request: Option<bool>,
}

impl CreateChatInviteLink {
    #[must_use]
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            name: None,
            expire_date: None,
            member_limit: None,
            creates_join_request: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_expire_at(mut self, expire: DateTime<Utc>) -> Self {
        self.expire_date = Some(expire.timestamp());
        self
    }

    #[must_use]
    pub fn with_member_limit(mut self, limit: i64) -> Self {
        self.member_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_join_request(mut self, required: bool) -> Self {
        self.creates_join_request = Some(required);
        self
    }
}

/// Payload for `getUpdates` long polling.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
}

impl GetUpdates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Long poll timeout in seconds; `0` means short polling.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_allowed_updates(mut self, kinds: &[&str]) -> Self {
        self.allowed_updates = Some(kinds.iter().map(|kind| (*kind).to_owned()).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::InlineKeyboardButton;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_send_message_minimal_payload() {
        let payload = serde_json::to_value(SendMessage::new(7, "hi")).unwrap();
        assert_eq!(payload, json!({"chat_id": 7, "text": "hi"}));
    }

    #[test]
    fn test_send_message_full_payload() {
        let markup = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "Go",
            "p:home;d:",
        )]]);
        let payload = serde_json::to_value(
            SendMessage::new(7, "hi")
                .with_parse_mode(ParseMode::Html)
                .with_silent_notification()
                .with_reply_to(99)
                .with_reply_markup(markup),
        )
        .unwrap();
        assert_eq!(
            payload,
            json!({
                "chat_id": 7,
                "text": "hi",
                "parse_mode": "HTML",
                "disable_notification": true,
                "reply_to_message_id": 99,
                "reply_markup": {
                    "inline_keyboard": [[{"text": "Go", "callback_data": "p:home;d:"}]]
                }
            })
        );
    }

    #[test]
    fn test_input_file_serialization_forms() {
        assert_eq!(
            serde_json::to_value(InputFile::file_id("abc")).unwrap(),
            json!("abc")
        );
        assert_eq!(
            serde_json::to_value(InputFile::url("https://example.org/cat.png")).unwrap(),
            json!("https://example.org/cat.png")
        );
        assert_eq!(
            serde_json::to_value(InputFile::bytes("cat.png", vec![1, 2])).unwrap(),
            json!("attach://cat.png")
        );
    }

    #[test]
    fn test_input_file_as_upload() {
        assert!(InputFile::file_id("abc").as_upload().is_none());
        let upload = InputFile::bytes("cat.png", vec![9, 9]);
        let (name, data) = upload.as_upload().unwrap();
        assert_eq!(name, "cat.png");
        assert_eq!(data, [9, 9]);
    }

    #[test]
    fn test_answer_callback_query_alert() {
        let payload =
            serde_json::to_value(AnswerCallbackQuery::new("q1").with_text("boom").with_alert())
                .unwrap();
        assert_eq!(
            payload,
            json!({"callback_query_id": "q1", "text": "boom", "show_alert": true})
        );
    }

    #[test]
    fn test_create_invite_link_expiry_timestamp() {
        let expire = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let payload = serde_json::to_value(
            CreateChatInviteLink::new(-100)
                .with_name("trial")
                .with_expire_at(expire)
                .with_member_limit(5),
        )
        .unwrap();
        assert_eq!(
            payload,
            json!({
                "chat_id": -100,
                "name": "trial",
                "expire_date": 1_735_689_600,
                "member_limit": 5
            })
        );
    }

    #[test]
    fn test_get_updates_defaults_to_empty_object() {
        assert_eq!(serde_json::to_value(GetUpdates::new()).unwrap(), json!({}));
    }

    #[test]
    fn test_get_updates_with_fields() {
        let payload = serde_json::to_value(
            GetUpdates::new()
                .with_offset(101)
                .with_timeout(30)
                .with_allowed_updates(&["message", "callback_query"]),
        )
        .unwrap();
        assert_eq!(
            payload,
            json!({
                "offset": 101,
                "timeout": 30,
                "allowed_updates": ["message", "callback_query"]
            })
        );
    }
}
