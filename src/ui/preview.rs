//! The chat mock: resolved messages drawn as bubbles over a dark wallpaper.

use eframe::egui::{self, Align, Align2, Color32, FontId, Layout, RichText};

use crate::thread::{AuthorLabel, MentionQuote, RenderedMessage, Thread};
use crate::ui::theme::{user_color, ChatTheme};

const GROUP_GAP: f32 = 12.0;
const CONTINUATION_GAP: f32 = 4.0;
const BUBBLE_MIN_WIDTH: f32 = 200.0;
const SIDE_MARGIN: f32 = 24.0;

pub fn render_preview(ui: &mut egui::Ui, thread: &Thread, warning: bool, theme: &ChatTheme) {
    let panel_rect = ui.max_rect();

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in &thread.messages {
                render_bubble(ui, message, theme);
            }
            ui.add_space(GROUP_GAP);
        });

    if warning {
        render_warning_overlay(ui, panel_rect, theme);
    }
}

fn render_author(ui: &mut egui::Ui, author: &AuthorLabel, theme: &ChatTheme) {
    ui.horizontal(|ui| {
        let name = ui.label(
            RichText::new(&author.primary)
                .strong()
                .color(user_color(&author.color)),
        );
        if let Some(picture) = &author.picture {
            name.on_hover_text(picture.as_str());
        }
        if let Some(secondary) = &author.secondary {
            ui.label(RichText::new(format!("~{secondary}")).color(theme.secondary_name));
        }
    });
}

fn render_bubble(ui: &mut egui::Ui, message: &RenderedMessage, theme: &ChatTheme) {
    ui.add_space(if message.starts_group {
        GROUP_GAP
    } else {
        CONTINUATION_GAP
    });

    let max_width = (ui.available_width() * 0.5).max(BUBBLE_MIN_WIDTH);
    let (layout, fill) = if message.is_viewer_message {
        (Layout::right_to_left(Align::Min), theme.bubble_mine)
    } else {
        (Layout::left_to_right(Align::Min), theme.bubble_theirs)
    };

    ui.with_layout(layout, |ui| {
        ui.add_space(SIDE_MARGIN);
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(5))
            .inner_margin(egui::Margin::symmetric(8, 4))
            .show(ui, |ui| {
                ui.set_min_width(BUBBLE_MIN_WIDTH);
                ui.set_max_width(max_width);
                ui.with_layout(Layout::top_down(Align::Min), |ui| {
                    render_author(ui, &message.author, theme);
                    if let Some(quote) = &message.mention {
                        render_quote(ui, quote, message.is_viewer_message, theme);
                    }
                    ui.label(RichText::new(&message.contents).color(theme.bubble_text));
                    if !message.reactions.is_empty() {
                        ui.horizontal_wrapped(|ui| {
                            for reaction in &message.reactions {
                                ui.label(format!("{} {}", reaction.value, reaction.amount));
                            }
                        });
                    }
                    ui.with_layout(Layout::top_down(Align::Max), |ui| {
                        ui.label(
                            RichText::new(&message.time)
                                .size(12.0)
                                .color(theme.timestamp),
                        );
                    });
                });
            });
    });
}

fn render_quote(ui: &mut egui::Ui, quote: &MentionQuote, mine: bool, theme: &ChatTheme) {
    let fill = if mine {
        theme.quote_mine
    } else {
        theme.quote_theirs
    };
    let accent = user_color(&quote.author.color);

    let inner = egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(5))
        .inner_margin(egui::Margin {
            left: 10,
            right: 8,
            top: 4,
            bottom: 4,
        })
        .show(ui, |ui| {
            render_author(ui, &quote.author, theme);
            ui.label(RichText::new(&quote.contents).color(theme.quote_text));
        });

    let rect = inner.response.rect;
    ui.painter().rect_filled(
        egui::Rect::from_min_size(rect.min, egui::vec2(4.0, rect.height())),
        egui::CornerRadius {
            nw: 5,
            ne: 0,
            sw: 5,
            se: 0,
        },
        accent,
    );
}

fn render_warning_overlay(ui: &egui::Ui, rect: egui::Rect, theme: &ChatTheme) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.warning_tint);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "FAKE NEWS",
        FontId::proportional(72.0),
        Color32::WHITE,
    );
}
