//! Ratatui front end. The game runs in an engine task; the TUI only sends
//! commands and renders the latest table view.

pub mod app;
pub mod controller;
pub mod logger;
pub mod ui;
