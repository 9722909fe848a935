//! Telegram Bot API integration.
//!
//! [`Bot`] is the HTTP client; the other modules supply the request
//! payloads and response types its methods exchange with Telegram.

mod client;
mod moderation;
mod rate_limiter;
mod requests;
mod types;

pub use client::{ApiError, Bot, BotBuilder, DEFAULT_API_ROOT};
pub use rate_limiter::RateLimiter;
pub use requests::{
    AnswerCallbackQuery, CreateChatInviteLink, EditMessageCaption, EditMessageText, GetUpdates,
    InputFile, SendAnimation, SendMessage, SendPhoto,
};
pub use types::{
    Animation, ApiResponse, CallbackQuery, Chat, ChatInviteLink, ChatMember, ChatPermissions,
    InlineKeyboardButton, InlineKeyboardMarkup, Message, ParseMode, PhotoSize, ResponseParameters,
    Update, User,
};
