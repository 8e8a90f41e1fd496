//! Reusable UI widgets

mod log_view;
mod menu_list;
mod spinner;

pub use log_view::LogView;
pub use menu_list::{MenuItem, MenuList};
pub use spinner::Spinner;
