//! Stateless navigation for inline keyboard menus.
//!
//! The navigation model keeps no session storage: the full position of a
//! user inside the menu tree is encoded into each button's callback data and
//! decoded again when the button is pressed. [`NavState`] is that position;
//! the keyboard helpers derive back rows and pagination controls from it.

mod keyboard;
mod state;

pub use keyboard::{
    ListItem, PaginatedList, back_button, back_row, back_rows, paginated_list, root_button,
};
pub use state::NavState;
