//! Navigation state carried inside callback data.
//!
//! A menu bot has no per-user session on the server side. Everything needed
//! to rebuild a screen travels inside the callback payload of the button the
//! user pressed: the breadcrumb path of menu levels plus a small list of data
//! fields (page number, selected id, and so on). Pressing a button hands the
//! bot a complete [`NavState`]; the bot decodes it, derives the follow-up
//! states for the next keyboard, and forgets it.

use std::fmt;

use tracing::debug;

/// Decoded navigation state: a breadcrumb path plus positional data fields.
///
/// The wire form is `p:<path>;d:<data>` where both lists are comma joined,
/// for example `p:home,settings,lang;d:2,en`. The delimiters `,`, `;` and
/// `:` are reserved; segments and fields are expected to be short
/// identifier-like tokens that avoid them (callback data is capped at 64
/// bytes by Telegram anyway), and nothing here validates or escapes.
///
/// All transition methods take `&self` and return a new state, so one decoded
/// state can fan out into every button of the next keyboard without clones at
/// the call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    path: Vec<String>,
    data: Vec<String>,
}

impl NavState {
    /// Creates a state at a root screen with the given data fields.
    ///
    /// An empty `root` produces an empty path, which encodes to `p:;d:...`
    /// and decodes back to depth zero.
    #[must_use]
    pub fn new(root: &str, data: &[&str]) -> Self {
        let path = if root.is_empty() {
            Vec::new()
        } else {
            vec![root.to_owned()]
        };
        Self {
            path,
            data: to_owned_fields(data),
        }
    }

    /// Parses a callback payload.
    ///
    /// Decoding never fails: unknown keys are ignored, parts without a `:`
    /// are skipped, and a missing `p` or `d` part leaves the corresponding
    /// list empty. A stale or foreign payload yields an empty state that the
    /// bot can treat as "go to the root screen".
    #[must_use]
    pub fn decode(payload: &str) -> Self {
        let mut state = Self::default();
        for part in payload.split(';') {
            let Some((key, value)) = part.split_once(':') else {
                if !part.is_empty() {
                    debug!("ignoring callback payload part without a key: {part:?}");
                }
                continue;
            };
            match key {
                "p" => state.path = split_fields(value),
                "d" => state.data = split_fields(value),
                _ => {}
            }
        }
        state
    }

    /// Serializes the state back into callback payload form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("p:{};d:{}", self.path.join(","), self.data.join(","))
    }

    /// Returns a state one level deeper, with the data fields replaced.
    ///
    /// An empty `segment` leaves the path untouched but still replaces the
    /// data, which lets a screen refresh its own fields in place.
    #[must_use]
    pub fn push(&self, segment: &str, data: &[&str]) -> Self {
        let mut next = self.clone();
        if !segment.is_empty() {
            next.path.push(segment.to_owned());
        }
        next.data = to_owned_fields(data);
        next
    }

    /// Returns a state one level up, with the data fields replaced.
    ///
    /// The root segment is never removed: at depth one (or zero) the path
    /// stays as it is and only the data changes.
    #[must_use]
    pub fn pop(&self, data: &[&str]) -> Self {
        let mut next = self.clone();
        if next.path.len() > 1 {
            next.path.pop();
        }
        next.data = to_owned_fields(data);
        next
    }

    /// Returns a state holding only the root segment, with the data replaced.
    #[must_use]
    pub fn pop_to_root(&self, data: &[&str]) -> Self {
        let mut next = self.clone();
        next.path.truncate(1);
        next.data = to_owned_fields(data);
        next
    }

    /// Returns a state truncated after the deepest occurrence of `segment`.
    ///
    /// The path is scanned from the end; everything after the match is
    /// dropped and the match itself becomes the current screen. When the
    /// segment does not occur the path is kept whole. Data is replaced
    /// either way.
    #[must_use]
    pub fn pop_to(&self, segment: &str, data: &[&str]) -> Self {
        let mut next = self.clone();
        if let Some(index) = next.path.iter().rposition(|s| s == segment) {
            next.path.truncate(index + 1);
        }
        next.data = to_owned_fields(data);
        next
    }

    /// Returns the same screen with the data fields replaced.
    #[must_use]
    pub fn with_data(&self, data: &[&str]) -> Self {
        Self {
            path: self.path.clone(),
            data: to_owned_fields(data),
        }
    }

    /// Current page number, read from the first data field.
    ///
    /// A missing or non-numeric field counts as page `0`, so a freshly built
    /// state without pagination data steps to page `1` on the first
    /// [`next_page`](Self::next_page).
    #[must_use]
    pub fn page(&self) -> i64 {
        self.data
            .first()
            .and_then(|field| field.parse().ok())
            .unwrap_or(0)
    }

    /// Returns the state for the following page.
    ///
    /// The data becomes `[page + 1, extra...]`; previous trailing fields are
    /// dropped, so a caller that wants a filter token to survive paging must
    /// pass it again in `extra`.
    #[must_use]
    pub fn next_page(&self, extra: &[&str]) -> Self {
        self.with_page(self.page().saturating_add(1), extra)
    }

    /// Returns the state for the preceding page, never going below page `1`.
    #[must_use]
    pub fn prev_page(&self, extra: &[&str]) -> Self {
        let page = self.page();
        let page = if page > 1 { page - 1 } else { 1 };
        self.with_page(page, extra)
    }

    fn with_page(&self, page: i64, extra: &[&str]) -> Self {
        let mut data = Vec::with_capacity(extra.len() + 1);
        data.push(page.to_string());
        data.extend(extra.iter().map(|field| (*field).to_owned()));
        Self {
            path: self.path.clone(),
            data,
        }
    }

    /// The current screen, i.e. the last path segment.
    ///
    /// Empty string when the path is empty.
    #[must_use]
    pub fn action(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// The root screen, i.e. the first path segment.
    ///
    /// Empty string when the path is empty.
    #[must_use]
    pub fn root(&self) -> &str {
        self.path.first().map_or("", String::as_str)
    }

    /// Number of path segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// All path segments, root first.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// All data fields in positional order.
    #[must_use]
    pub fn data(&self) -> &[String] {
        &self.data
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn to_owned_fields(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| (*field).to_owned()).collect()
}

fn split_fields(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        Vec::new()
    } else {
        joined.split(',').map(str::to_owned).collect()
    }
}
