pub mod help_bar;
pub mod search_input;
