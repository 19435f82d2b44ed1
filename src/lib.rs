//! Swipecade: a vertical feed of bite-sized arcade games for the terminal.

pub mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod event;
pub mod games;
pub mod host;
pub mod registry;
pub mod scheduler;
pub mod scores;
pub mod ui;
