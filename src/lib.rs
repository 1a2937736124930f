pub mod assets;
pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod i18n;
pub mod logging;
pub mod ui;
