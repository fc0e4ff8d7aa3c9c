pub mod filter_bar;
pub mod footer;
pub mod table;
pub mod tag_select;
pub mod text_input;
