pub mod column_mapping_dialog;
pub mod grain_size_panel;
