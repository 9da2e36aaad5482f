pub mod app;
pub mod artwork;
pub mod catalog;
pub mod config;
pub mod display;
pub mod drag;
pub mod error;
pub mod help_pad;
pub mod notice;
pub mod player;
pub mod transport;
pub mod tray;
pub mod volume;
pub mod window;
