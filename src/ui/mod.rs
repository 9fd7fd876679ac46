mod browser;
mod connection_list;
mod popup;

pub use browser::draw_browser;
pub use connection_list::draw_connection_list;
pub use popup::{draw_connecting_popup, draw_error_popup, draw_info_popup};
