pub mod edit_profile;
pub mod left_panel;
