//! egui rendering for the fakechat window.
//!
//! - `editor`: users/messages tables, viewer picker and warning switch
//! - `preview`: the chat mock and its warning overlay
//! - `theme`: colours and global style

pub mod editor;
pub mod preview;
pub mod theme;

pub use editor::render_editor;
pub use preview::render_preview;
pub use theme::{apply_app_style, ChatTheme};
