//! Keyboard assembly on top of [`NavState`].
//!
//! These helpers turn a decoded state into the standard furniture of a menu
//! screen: a back/home row wired to `pop` and `pop_to_root`, and a prev/next
//! control row for paginated lists. Labels and extra data fields come from
//! closures so callers only pay for the buttons that actually appear.

use crate::api::InlineKeyboardButton;

use super::state::NavState;

/// One rendered entry of a paginated screen.
///
/// A list mixes plain lines (joined into the message body) with buttons
/// (each becoming its own keyboard row); both kinds keep their relative
/// order from the source items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Text(String),
    Button(InlineKeyboardButton),
}

/// Output of [`paginated_list`]: body lines plus keyboard rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginatedList {
    pub text_lines: Vec<String>,
    pub button_rows: Vec<Vec<InlineKeyboardButton>>,
}

/// A button that navigates one level up from `state`.
#[must_use]
pub fn back_button(state: &NavState, label: impl Into<String>, extra: &[&str]) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, state.pop(extra).encode())
}

/// A button that navigates back to the root screen of `state`.
#[must_use]
pub fn root_button(state: &NavState, label: impl Into<String>, extra: &[&str]) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, state.pop_to_root(extra).encode())
}

/// Builds the navigation row for the bottom of a screen.
///
/// Deeper than two levels the row is `[back, home]`; at the root or one
/// level below it only `[home]`, since back and home would land on the same
/// screen. Each closure returns the button label and the data fields for the
/// target state, and is only invoked when its button is part of the row.
#[must_use]
pub fn back_row<B, R>(state: &NavState, back: B, to_root: R) -> Vec<InlineKeyboardButton>
where
    B: FnOnce() -> (String, Vec<String>),
    R: FnOnce() -> (String, Vec<String>),
{
    let mut row = Vec::with_capacity(2);
    if state.depth() > 2 {
        let (label, extra) = back();
        row.push(back_button(state, label, &field_refs(&extra)));
    }
    let (label, extra) = to_root();
    row.push(root_button(state, label, &field_refs(&extra)));
    row
}

/// Same buttons as [`back_row`], but one per keyboard row.
#[must_use]
pub fn back_rows<B, R>(state: &NavState, back: B, to_root: R) -> Vec<Vec<InlineKeyboardButton>>
where
    B: FnOnce() -> (String, Vec<String>),
    R: FnOnce() -> (String, Vec<String>),
{
    back_row(state, back, to_root)
        .into_iter()
        .map(|button| vec![button])
        .collect()
}

/// Renders one page of items and appends pagination controls.
///
/// `render` maps each item to a [`ListItem`]; text goes to `text_lines`,
/// buttons each get their own row. With more than one page a control row is
/// appended: `[next]` on the first page, `[prev]` on the last, `[prev,
/// next]` in between. `controls` supplies the two buttons as `(prev, next)`
/// and is only invoked when a control row is needed.
#[must_use]
pub fn paginated_list<T, F, C>(
    items: &[T],
    page: i64,
    total_pages: i64,
    mut render: F,
    controls: C,
) -> PaginatedList
where
    F: FnMut(usize, &T) -> ListItem,
    C: FnOnce() -> (InlineKeyboardButton, InlineKeyboardButton),
{
    let mut list = PaginatedList::default();
    for (index, item) in items.iter().enumerate() {
        match render(index, item) {
            ListItem::Text(line) => list.text_lines.push(line),
            ListItem::Button(button) => list.button_rows.push(vec![button]),
        }
    }

    if total_pages > 1 {
        let (prev, next) = controls();
        let row = if page == 1 {
            vec![next]
        } else if page == total_pages {
            vec![prev]
        } else {
            vec![prev, next]
        };
        list.button_rows.push(row);
    }

    list
}

fn field_refs(fields: &[String]) -> Vec<&str> {
    fields.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn labeled(label: &str) -> impl FnOnce() -> (String, Vec<String>) {
        let label = label.to_owned();
        move || (label, Vec::new())
    }

    #[test]
    fn test_back_row_shallow_has_only_home() {
        let state = NavState::decode("p:home,list;d:2");
        let row = back_row(&state, labeled("Back"), labeled("Home"));
        assert_eq!(row.len(), 1);
        assert_eq!(row[0].text, "Home");
        assert_eq!(row[0].callback_data.as_deref(), Some("p:home;d:"));
    }

    #[test]
    fn test_back_row_deep_has_back_then_home() {
        let state = NavState::decode("p:home,list,detail;d:2,x");
        let row = back_row(&state, labeled("Back"), labeled("Home"));
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].text, "Back");
        assert_eq!(row[0].callback_data.as_deref(), Some("p:home,list;d:"));
        assert_eq!(row[1].text, "Home");
        assert_eq!(row[1].callback_data.as_deref(), Some("p:home;d:"));
    }

    #[test]
    fn test_back_row_passes_extra_fields() {
        let state = NavState::decode("p:home,list,detail;d:");
        let row = back_row(
            &state,
            || ("Back".to_owned(), vec!["3".to_owned(), "q".to_owned()]),
            || ("Home".to_owned(), vec!["1".to_owned()]),
        );
        assert_eq!(row[0].callback_data.as_deref(), Some("p:home,list;d:3,q"));
        assert_eq!(row[1].callback_data.as_deref(), Some("p:home;d:1"));
    }

    #[test]
    fn test_back_row_skips_unused_label_closure() {
        let state = NavState::decode("p:home,list;d:");
        let back_called = Cell::new(false);
        let row = back_row(
            &state,
            || {
                back_called.set(true);
                (String::new(), Vec::new())
            },
            labeled("Home"),
        );
        assert_eq!(row.len(), 1);
        assert!(!back_called.get());
    }

    #[test]
    fn test_back_rows_puts_each_button_on_its_own_row() {
        let state = NavState::decode("p:home,a,b;d:");
        let rows = back_rows(&state, labeled("Back"), labeled("Home"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[0][0].text, "Back");
        assert_eq!(rows[1][0].text, "Home");
    }

    #[test]
    fn test_back_and_root_buttons_encode_transitions() {
        let state = NavState::decode("p:home,a,b;d:5");
        let back = back_button(&state, "Up", &["4"]);
        let root = root_button(&state, "Top", &[]);
        assert_eq!(back.callback_data.as_deref(), Some("p:home,a;d:4"));
        assert_eq!(root.callback_data.as_deref(), Some("p:home;d:"));
    }

    fn page_controls() -> (InlineKeyboardButton, InlineKeyboardButton) {
        (
            InlineKeyboardButton::callback("Prev", "p:l;d:1"),
            InlineKeyboardButton::callback("Next", "p:l;d:3"),
        )
    }

    #[test]
    fn test_paginated_single_page_has_no_controls() {
        let controls_called = Cell::new(false);
        let list = paginated_list(
            &["a", "b"],
            1,
            1,
            |_, item| ListItem::Text((*item).to_owned()),
            || {
                controls_called.set(true);
                page_controls()
            },
        );
        assert_eq!(list.text_lines, ["a", "b"]);
        assert!(list.button_rows.is_empty());
        assert!(!controls_called.get());
    }

    #[test]
    fn test_paginated_first_page_has_next_only() {
        let list = paginated_list(
            &["a"],
            1,
            3,
            |_, item| ListItem::Text((*item).to_owned()),
            page_controls,
        );
        let controls = list.button_rows.last().unwrap();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].text, "Next");
    }

    #[test]
    fn test_paginated_last_page_has_prev_only() {
        let list = paginated_list(
            &["a"],
            3,
            3,
            |_, item| ListItem::Text((*item).to_owned()),
            page_controls,
        );
        let controls = list.button_rows.last().unwrap();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].text, "Prev");
    }

    #[test]
    fn test_paginated_middle_page_has_prev_then_next() {
        let list = paginated_list(
            &["a"],
            2,
            3,
            |_, item| ListItem::Text((*item).to_owned()),
            page_controls,
        );
        let controls = list.button_rows.last().unwrap();
        assert_eq!(controls.len(), 2);
        assert_eq!(controls[0].text, "Prev");
        assert_eq!(controls[1].text, "Next");
    }

    #[test]
    fn test_paginated_routes_text_and_buttons_in_order() {
        let list = paginated_list(
            &["alpha", "beta", "gamma"],
            1,
            1,
            |index, item| {
                if index == 1 {
                    ListItem::Button(InlineKeyboardButton::callback(*item, "p:l,beta;d:"))
                } else {
                    ListItem::Text(format!("- {item}"))
                }
            },
            page_controls,
        );
        assert_eq!(list.text_lines, ["- alpha", "- gamma"]);
        assert_eq!(list.button_rows.len(), 1);
        assert_eq!(list.button_rows[0][0].text, "beta");
    }

    #[test]
    fn test_paginated_empty_page_still_gets_controls() {
        let list = paginated_list(
            &[] as &[&str],
            2,
            4,
            |_, item| ListItem::Text((*item).to_owned()),
            page_controls,
        );
        assert!(list.text_lines.is_empty());
        assert_eq!(list.button_rows.len(), 1);
        assert_eq!(list.button_rows[0].len(), 2);
    }
}
