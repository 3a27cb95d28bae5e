//! Main update loop

use eframe::egui;

use super::FakeChatApp;
use crate::ui;

impl eframe::App for FakeChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        // Left panel: editable tables
        egui::SidePanel::left("editor")
            .resizable(true)
            .default_width(720.0)
            .min_width(360.0)
            .frame(
                egui::Frame::new()
                    .fill(self.theme.editor_bg)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                if let Some(err) = &self.last_error {
                    ui.colored_label(self.theme.error, err.as_str());
                }
                actions = ui::render_editor(ui, &self.conversation, &self.theme);
            });

        // Edits land before the preview is drawn so it never lags a frame.
        self.apply_edits(actions);

        let theme = self.theme.clone();
        let warning = self.conversation.warning;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.chat_bg).inner_margin(12.0))
            .show(ctx, |ui| {
                ui::render_preview(ui, self.conversation.thread(), warning, &theme);
            });
    }
}
