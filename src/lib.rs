//! fakechat library.
//!
//! The editable-collection store and thread resolver behind the fakechat
//! window, plus the egui shell that drives them.

pub mod app;
pub mod collection;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod seed;
pub mod state;
pub mod thread;
pub mod ui;
