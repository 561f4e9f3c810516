pub mod app_state;
pub mod sample_table;
pub mod theme;
