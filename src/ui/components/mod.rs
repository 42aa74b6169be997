pub mod data_table;
pub mod filter_panel;
pub mod grid;
pub mod pager;
pub mod search_box;
