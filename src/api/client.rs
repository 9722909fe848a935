//! Telegram Bot API client.
//!
//! A thin wrapper over the HTTP API: every call posts a JSON (or multipart)
//! payload to `{api_root}/bot{token}/{method}` and unwraps Telegram's
//! response envelope. Message sends and edits share one [`RateLimiter`]
//! across all clones of the client; queries go out unpaced.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use super::rate_limiter::RateLimiter;
use super::requests::{
    AnswerCallbackQuery, CreateChatInviteLink, EditMessageCaption, EditMessageText, GetUpdates,
    SendAnimation, SendMessage, SendPhoto,
};
use super::types::{ApiResponse, Chat, ChatInviteLink, Message, Update, User};

/// Hosted Bot API endpoint, used unless the builder overrides it.
pub const DEFAULT_API_ROOT: &str = "https://api.telegram.org";

/// Extra HTTP time a long poll gets on top of its own timeout.
const LONG_POLL_MARGIN: Duration = Duration::from_secs(10);

/// Errors from Bot API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failed before Telegram produced an answer.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A request payload could not be encoded.
    #[error("Failed to encode request payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// Telegram answered with `ok: false`.
    #[error("Telegram API error {error_code}: {description}")]
    Telegram {
        error_code: i64,
        description: String,
        retry_after: Option<u64>,
        migrate_to_chat_id: Option<i64>,
    },

    /// Telegram answered `ok: true` but sent no result payload.
    #[error("Telegram reported success without a result")]
    MissingResult,
}

impl ApiError {
    /// Seconds Telegram asked to wait before retrying, for flood errors.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Telegram { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// True when the bot was kicked from the chat it tried to reach.
    #[must_use]
    pub fn is_bot_kicked(&self) -> bool {
        self.description_contains("bot was kicked")
    }

    /// True when the target group chat was deleted.
    #[must_use]
    pub fn is_chat_deleted(&self) -> bool {
        self.description_contains("the group chat was deleted")
    }

    /// True when an edit changed nothing; usually safe to ignore.
    #[must_use]
    pub fn is_message_not_modified(&self) -> bool {
        self.description_contains("message is not modified")
    }

    fn description_contains(&self, needle: &str) -> bool {
        match self {
            Self::Telegram { description, .. } => description.contains(needle),
            _ => false,
        }
    }
}

/// Builder for [`Bot`].
#[derive(Clone)]
pub struct BotBuilder {
    token: String,
    api_root: String,
    timeout: Duration,
    send_interval: Duration,
}

impl BotBuilder {
    fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_root: DEFAULT_API_ROOT.to_owned(),
            // getUpdates long polls extend this per request.
            timeout: Duration::from_secs(30),
            send_interval: Duration::ZERO,
        }
    }

    /// Overrides the API endpoint, e.g. for a local Bot API server or a
    /// mock in tests.
    #[must_use]
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_owned();
        self
    }

    /// Overrides the HTTP request timeout.
    ///
    /// `getUpdates` long polls extend it per request; everything else
    /// uses it as-is.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Minimum interval between message sends and edits. Zero (the default)
    /// disables pacing.
    #[must_use]
    pub fn with_send_interval(mut self, interval: Duration) -> Self {
        self.send_interval = interval;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed, e.g.
    /// because the TLS backend fails to initialize.
    pub fn build(self) -> Result<Bot, ApiError> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(Bot {
            token: self.token,
            api_root: self.api_root,
            http,
            rate_limiter: Arc::new(RateLimiter::new(self.send_interval)),
        })
    }
}

impl fmt::Debug for BotBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotBuilder")
            .field("token", &mask_token(&self.token))
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

/// Bot API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the send rate
/// limiter.
#[derive(Clone)]
pub struct Bot {
    token: String,
    api_root: String,
    http: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
}

impl Bot {
    /// Creates a client against the hosted Bot API with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder(token).build()
    }

    /// Starts a builder for a customized client.
    #[must_use]
    pub fn builder(token: impl Into<String>) -> BotBuilder {
        BotBuilder::new(token)
    }

    /// Identifies the bot account behind the token.
    pub async fn get_me(&self) -> Result<User, ApiError> {
        self.execute("getMe", &json!({})).await
    }

    /// Fetches up-to-date information about a chat.
    pub async fn get_chat(&self, chat_id: i64) -> Result<Chat, ApiError> {
        self.execute("getChat", &json!({"chat_id": chat_id})).await
    }

    /// Long polls for incoming updates.
    ///
    /// The HTTP timeout of this call tracks the request's poll timeout
    /// plus a margin, so a long poll is never cut off client-side before
    /// Telegram answers.
    pub async fn get_updates(&self, request: GetUpdates) -> Result<Vec<Update>, ApiError> {
        debug!("Calling getUpdates");
        let mut builder = self.http.post(self.method_url("getUpdates")).json(&request);
        if let Some(seconds) = request.timeout {
            builder =
                builder.timeout(Duration::from_secs(seconds).saturating_add(LONG_POLL_MARGIN));
        }
        let response = builder.send().await?;
        let response: ApiResponse<Vec<Update>> = response.json().await?;
        unwrap_response("getUpdates", response)
    }

    /// Sends a text message.
    pub async fn send_message(&self, request: SendMessage) -> Result<Message, ApiError> {
        self.execute_send("sendMessage", &request).await
    }

    /// Sends a text message and deletes it again after `after`.
    ///
    /// The deletion runs in a background task; its failure (e.g. when a
    /// moderator deleted the message first) is logged and otherwise
    /// ignored.
    pub async fn send_message_auto_delete(
        &self,
        request: SendMessage,
        after: Duration,
    ) -> Result<Message, ApiError> {
        let chat_id = request.chat_id;
        let message = self.send_message(request).await?;
        let message_id = message.message_id;
        let client = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if let Err(error) = client.delete_message(chat_id, message_id).await {
                debug!("Auto-delete of message {message_id} failed: {error}");
            }
        });
        Ok(message)
    }

    /// Sends a photo; raw bytes go out as a multipart upload.
    pub async fn send_photo(&self, request: SendPhoto) -> Result<Message, ApiError> {
        self.acquire_send_slot().await;
        let result = match request.photo.as_upload() {
            Some((file_name, data)) => {
                self.execute_upload("sendPhoto", &request, "photo", file_name, data.to_vec())
                    .await
            }
            None => self.execute("sendPhoto", &request).await,
        };
        self.note_send_outcome(result).await
    }

    /// Sends an animation; raw bytes go out as a multipart upload.
    pub async fn send_animation(&self, request: SendAnimation) -> Result<Message, ApiError> {
        self.acquire_send_slot().await;
        let result = match request.animation.as_upload() {
            Some((file_name, data)) => {
                self.execute_upload("sendAnimation", &request, "animation", file_name, data.to_vec())
                    .await
            }
            None => self.execute("sendAnimation", &request).await,
        };
        self.note_send_outcome(result).await
    }

    /// Replaces the text and keyboard of an existing message.
    pub async fn edit_message_text(&self, request: EditMessageText) -> Result<Message, ApiError> {
        self.execute_send("editMessageText", &request).await
    }

    /// Replaces the caption and keyboard of an existing media message.
    pub async fn edit_message_caption(
        &self,
        request: EditMessageCaption,
    ) -> Result<Message, ApiError> {
        self.execute_send("editMessageCaption", &request).await
    }

    /// Acknowledges a callback query, optionally with a toast or alert.
    ///
    /// Every callback query must be answered or the client keeps its
    /// loading spinner for up to a minute.
    pub async fn answer_callback_query(
        &self,
        request: AnswerCallbackQuery,
    ) -> Result<(), ApiError> {
        self.execute::<bool>("answerCallbackQuery", &request)
            .await
            .map(|_| ())
    }

    /// Pins a message in a chat.
    pub async fn pin_message(
        &self,
        chat_id: i64,
        message_id: i64,
        silent: bool,
    ) -> Result<(), ApiError> {
        let payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "disable_notification": silent,
        });
        self.execute::<bool>("pinChatMessage", &payload)
            .await
            .map(|_| ())
    }

    /// Deletes a message.
    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), ApiError> {
        let payload = json!({"chat_id": chat_id, "message_id": message_id});
        self.execute::<bool>("deleteMessage", &payload)
            .await
            .map(|_| ())
    }

    /// Rotates and returns the chat's primary invite link.
    pub async fn export_invite_link(&self, chat_id: i64) -> Result<String, ApiError> {
        self.execute("exportChatInviteLink", &json!({"chat_id": chat_id}))
            .await
    }

    /// Creates an additional invite link with its own name and limits.
    pub async fn create_invite_link(
        &self,
        request: CreateChatInviteLink,
    ) -> Result<ChatInviteLink, ApiError> {
        self.execute("createChatInviteLink", &request).await
    }

    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
    ) -> Result<T, ApiError> {
        debug!("Calling {method}");
        let response = self
            .http
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;
        let response: ApiResponse<T> = response.json().await?;
        unwrap_response(method, response)
    }

    async fn execute_send<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
    ) -> Result<T, ApiError> {
        self.acquire_send_slot().await;
        let result = self.execute(method, payload).await;
        self.note_send_outcome(result).await
    }

    /// Posts `payload` as multipart form fields with `data` attached under
    /// `field`, for file uploads.
    async fn execute_upload<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
        field: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<T, ApiError> {
        debug!("Calling {method} with a {} byte upload", data.len());
        let mut form = Form::new();
        if let serde_json::Value::Object(entries) = serde_json::to_value(payload)? {
            for (key, entry) in entries {
                if key == field {
                    continue;
                }
                let text = match entry {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                form = form.text(key, text);
            }
        }
        form = form.part(
            field.to_owned(),
            Part::bytes(data).file_name(file_name.to_owned()),
        );

        let response = self
            .http
            .post(self.method_url(method))
            .multipart(form)
            .send()
            .await?;
        let response: ApiResponse<T> = response.json().await?;
        unwrap_response(method, response)
    }

    async fn acquire_send_slot(&self) {
        let waited = self.rate_limiter.wait_and_acquire().await;
        if !waited.is_zero() {
            debug!("Send delayed {waited:?} by rate limiter");
        }
    }

    /// Feeds a flood error's `retry_after` back into the rate limiter so
    /// the following send waits it out.
    async fn note_send_outcome<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(error) = &result {
            if let Some(seconds) = error.retry_after() {
                self.rate_limiter
                    .penalize(Duration::from_secs(seconds))
                    .await;
            }
        }
        result
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_root, self.token, method)
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("token", &mask_token(&self.token))
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

fn unwrap_response<T>(method: &str, response: ApiResponse<T>) -> Result<T, ApiError> {
    if response.ok {
        response.result.ok_or(ApiError::MissingResult)
    } else {
        let parameters = response.parameters;
        let error = ApiError::Telegram {
            error_code: response.error_code.unwrap_or(0),
            description: response
                .description
                .unwrap_or_else(|| "unknown error".to_owned()),
            retry_after: parameters.and_then(|p| p.retry_after),
            migrate_to_chat_id: parameters.and_then(|p| p.migrate_to_chat_id),
        };
        warn!("{method} failed: {error}");
        Err(error)
    }
}

/// Masks the secret part of a bot token for logging.
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{bot_id}:***"),
        None => "***".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telegram_error(description: &str, retry_after: Option<u64>) -> ApiError {
        ApiError::Telegram {
            error_code: 403,
            description: description.to_owned(),
            retry_after,
            migrate_to_chat_id: None,
        }
    }

    #[test]
    fn test_mask_token_keeps_bot_id() {
        assert_eq!(mask_token("123456:AAE-secret-part"), "123456:***");
    }

    #[test]
    fn test_mask_token_without_separator() {
        assert_eq!(mask_token("opaque"), "***");
        assert_eq!(mask_token(""), "***");
    }

    #[test]
    fn test_method_url_format() {
        let bot = Bot::builder("123:ABC")
            .with_api_root("http://localhost:8081")
            .build()
            .unwrap();
        assert_eq!(
            bot.method_url("getMe"),
            "http://localhost:8081/bot123:ABC/getMe"
        );
    }

    #[test]
    fn test_api_root_trailing_slash_is_trimmed() {
        let bot = Bot::builder("123:ABC")
            .with_api_root("http://localhost:8081/")
            .build()
            .unwrap();
        assert_eq!(
            bot.method_url("getMe"),
            "http://localhost:8081/bot123:ABC/getMe"
        );
    }

    #[test]
    fn test_error_classification() {
        let kicked = telegram_error("Forbidden: bot was kicked from the supergroup chat", None);
        let deleted = telegram_error("Forbidden: the group chat was deleted", None);
        let unmodified = telegram_error("Bad Request: message is not modified", None);

        assert!(kicked.is_bot_kicked());
        assert!(!kicked.is_chat_deleted());
        assert!(deleted.is_chat_deleted());
        assert!(!deleted.is_bot_kicked());
        assert!(unmodified.is_message_not_modified());
        assert!(!unmodified.is_bot_kicked());
        assert!(!unmodified.is_chat_deleted());
    }

    #[test]
    fn test_retry_after_accessor() {
        assert_eq!(
            telegram_error("Too Many Requests: retry after 30", Some(30)).retry_after(),
            Some(30)
        );
        assert_eq!(ApiError::MissingResult.retry_after(), None);
    }

    #[test]
    fn test_debug_hides_token_secret() {
        let bot = Bot::builder("123456:AAE-secret-part").build().unwrap();
        let rendered = format!("{bot:?}");
        assert!(rendered.contains("123456:***"));
        assert!(!rendered.contains("AAE-secret-part"));
    }
}
