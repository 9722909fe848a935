//! Group moderation pass-throughs.
//!
//! The restrict/ban family of Bot API methods, plus member queries. Timed
//! restrictions take a [`Duration`] that is translated into Telegram's
//! `until_date` timestamp; a zero duration maps to `0`, Telegram's sentinel
//! for "does not expire".

use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use super::client::{ApiError, Bot};
use super::types::{ChatMember, ChatPermissions};

impl Bot {
    /// Takes away a member's right to send anything for `duration`; zero
    /// mutes until [`unmute_member`](Self::unmute_member) is called.
    pub async fn mute_member(
        &self,
        chat_id: i64,
        user_id: i64,
        duration: Duration,
    ) -> Result<(), ApiError> {
        let payload = json!({
            "chat_id": chat_id,
            "user_id": user_id,
            "permissions": ChatPermissions::deny_all(),
            "until_date": until_timestamp(duration),
        });
        self.execute::<bool>("restrictChatMember", &payload)
            .await
            .map(|_| ())
    }

    /// Gives a muted member their messaging rights back.
    pub async fn unmute_member(&self, chat_id: i64, user_id: i64) -> Result<(), ApiError> {
        let payload = json!({
            "chat_id": chat_id,
            "user_id": user_id,
            "permissions": ChatPermissions::allow_all(),
        });
        self.execute::<bool>("restrictChatMember", &payload)
            .await
            .map(|_| ())
    }

    /// Bans a member for `duration`; zero bans until explicitly unbanned.
    pub async fn ban_member(
        &self,
        chat_id: i64,
        user_id: i64,
        duration: Duration,
    ) -> Result<(), ApiError> {
        let payload = json!({
            "chat_id": chat_id,
            "user_id": user_id,
            "until_date": until_timestamp(duration),
        });
        self.execute::<bool>("banChatMember", &payload)
            .await
            .map(|_| ())
    }

    /// Lifts a ban. With `only_if_banned` false Telegram also removes the
    /// user from the chat if they are currently a member.
    pub async fn unban_member(
        &self,
        chat_id: i64,
        user_id: i64,
        only_if_banned: bool,
    ) -> Result<(), ApiError> {
        let payload = json!({
            "chat_id": chat_id,
            "user_id": user_id,
            "only_if_banned": only_if_banned,
        });
        self.execute::<bool>("unbanChatMember", &payload)
            .await
            .map(|_| ())
    }

    /// Removes a member but lets them rejoin through an invite link: a ban
    /// followed by an immediate unban.
    pub async fn kick_member(&self, chat_id: i64, user_id: i64) -> Result<(), ApiError> {
        self.ban_member(chat_id, user_id, Duration::ZERO).await?;
        self.unban_member(chat_id, user_id, false).await
    }

    /// Fetches one member's status in a chat.
    pub async fn get_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<ChatMember, ApiError> {
        let payload = json!({"chat_id": chat_id, "user_id": user_id});
        self.execute("getChatMember", &payload).await
    }

    /// Lists the administrators of a chat.
    pub async fn get_chat_administrators(&self, chat_id: i64) -> Result<Vec<ChatMember>, ApiError> {
        self.execute("getChatAdministrators", &json!({"chat_id": chat_id}))
            .await
    }

    /// Counts the members of a chat.
    pub async fn get_chat_member_count(&self, chat_id: i64) -> Result<i64, ApiError> {
        self.execute("getChatMemberCount", &json!({"chat_id": chat_id}))
            .await
    }

    /// Makes the bot leave a chat.
    pub async fn leave_chat(&self, chat_id: i64) -> Result<(), ApiError> {
        self.execute::<bool>("leaveChat", &json!({"chat_id": chat_id}))
            .await
            .map(|_| ())
    }
}

/// `until_date` value for a restriction starting now and lasting
/// `duration`; zero becomes the forever sentinel.
fn until_timestamp(duration: Duration) -> i64 {
    if duration.is_zero() {
        return 0;
    }
    let seconds = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
    Utc::now().timestamp().saturating_add(seconds)
}
