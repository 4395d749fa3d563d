pub mod api_utils;
pub mod components;
pub mod date_utils;
pub mod icons;
pub mod list_view;
pub mod notifications;
pub mod page_frame;
pub mod page_standard;
pub mod state_cell;
pub mod ui_error;
pub mod view_scope;
