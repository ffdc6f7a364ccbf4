pub mod color;
pub mod dashboard;
pub mod editor;
pub mod feedback_view;
pub mod form;
pub mod help;
pub mod history;
pub mod picker;
pub mod settings_view;
pub mod sidebar;
pub mod status_bar;
pub mod tabs;
pub mod tags;
