//! Application shell for the fakechat window.
//!
//! - `core`: `FakeChatApp` struct, startup and settings persistence
//! - `update`: the per-frame `eframe::App` implementation

pub mod core;
pub mod update;

pub use self::core::FakeChatApp;
