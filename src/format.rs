//! Small text helpers for message bodies.
//!
//! Link and mention snippets in Markdown and HTML parse modes. Callers are
//! responsible for escaping user-supplied text according to the parse mode
//! they send with.

/// `[text](url)` for Markdown parse modes.
#[must_use]
pub fn markdown_link(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

/// Inline code span; Telegram clients copy it to the clipboard on tap.
#[must_use]
pub fn markdown_code(text: &str) -> String {
    format!("`{text}`")
}

/// `<a>` tag for the HTML parse mode.
#[must_use]
pub fn html_link(text: &str, url: &str) -> String {
    format!("<a href='{url}'>{text}</a>")
}

/// Deep link mentioning a user by id, clickable even without a username.
#[must_use]
pub fn user_link(user_id: i64) -> String {
    format!("tg://user?id={user_id}")
}

/// Public profile link for a username (without the `@`).
#[must_use]
pub fn username_link(username: &str) -> String {
    format!("https://t.me/{username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_link() {
        assert_eq!(
            markdown_link("docs", "https://example.org"),
            "[docs](https://example.org)"
        );
    }

    #[test]
    fn test_markdown_code() {
        assert_eq!(markdown_code("p:home;d:"), "`p:home;d:`");
    }

    #[test]
    fn test_html_link() {
        assert_eq!(
            html_link("docs", "https://example.org"),
            "<a href='https://example.org'>docs</a>"
        );
    }

    #[test]
    fn test_user_links() {
        assert_eq!(user_link(42), "tg://user?id=42");
        assert_eq!(username_link("eva"), "https://t.me/eva");
    }
}
