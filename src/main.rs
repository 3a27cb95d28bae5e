//! fakechat: edit a chat conversation on the left, see it rendered as a
//! messaging-app screenshot on the right.
//!
//! Architecture:
//! - `state::Conversation` owns the users and messages tables
//! - the editor panel turns widget changes into `EditAction`s
//! - `thread::resolve_thread` derives the bubbles shown in the preview

use eframe::egui;

use fakechat::app::FakeChatApp;
use fakechat::logging;

fn main() -> eframe::Result<()> {
    logging::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting fakechat");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([720.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "fakechat",
        options,
        Box::new(|cc| Ok(Box::new(FakeChatApp::new(cc)))),
    )
}
