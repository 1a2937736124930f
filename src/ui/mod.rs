//! GTK4/libadwaita presentation layer.

pub mod app;
pub mod board;
pub mod dialogs;
pub mod hud;
pub mod presenter;
pub mod timer;
