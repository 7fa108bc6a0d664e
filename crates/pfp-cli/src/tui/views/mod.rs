pub mod list;
pub mod quick_view;
