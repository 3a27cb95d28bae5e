//! Editing side panel: the warning switch, viewer picker, and the users and
//! messages tables.
//!
//! Nothing here mutates the conversation. Every widget that changes reports
//! an [`EditAction`] which the caller applies after the panel is drawn.

use std::hash::Hash;

use chrono::Local;
use eframe::egui::{self, RichText};
use uuid::Uuid;

use crate::collection::Editable;
use crate::model::{User, UserField};
use crate::seed::palette_hex;
use crate::state::{Conversation, EditAction};
use crate::thread::{author_options, format_time, mention_targets};
use crate::ui::theme::{user_color, ChatTheme};

/// Longest excerpt of a message shown in the mention picker.
const MENTION_PREVIEW_CHARS: usize = 24;

pub fn render_editor(ui: &mut egui::Ui, convo: &Conversation, theme: &ChatTheme) -> Vec<EditAction> {
    let mut actions = Vec::new();

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            let mut warning = convo.warning;
            if ui.checkbox(&mut warning, "Set fake news warning").changed() {
                actions.push(EditAction::SetWarning(warning));
            }

            ui.horizontal(|ui| {
                ui.label("Viewer");
                render_viewer_picker(ui, convo, &mut actions);
            });

            ui.add_space(12.0);
            ui.heading("Users");
            render_users_table(ui, convo, theme, &mut actions);
            if ui.button("New user").clicked() {
                actions.push(EditAction::AppendUser);
            }

            ui.add_space(24.0);
            ui.heading("Messages");
            render_messages_table(ui, convo, theme, &mut actions);
            if ui.button("New message").clicked() {
                actions.push(EditAction::AppendMessage);
            }
        });

    actions
}

/// Widget id salt for one table cell. Keyed on the row's id, not its
/// position, so focus stays with the row when an earlier row is deleted.
fn cell_salt<T: Editable>(item: &T, column: &'static str) -> (&'static str, Uuid) {
    (column, item.id())
}

/// Single-line input showing `value`; returns the new text if it was edited.
fn text_cell(ui: &mut egui::Ui, salt: impl Hash, value: &str, width: f32) -> Option<String> {
    let mut buffer = value.to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut buffer)
            .id_salt(salt)
            .desired_width(width),
    );
    let response = if value.is_empty() {
        response
    } else {
        response.on_hover_text(value)
    };
    response.changed().then_some(buffer)
}

fn render_viewer_picker(ui: &mut egui::Ui, convo: &Conversation, actions: &mut Vec<EditAction>) {
    let selected = convo
        .users()
        .get(convo.viewer_index)
        .map_or("(nobody)", User::picker_label);

    egui::ComboBox::from_id_salt("viewer")
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for (index, label, color) in author_options(convo.users().as_slice()) {
                let text = RichText::new(label).color(user_color(color));
                if ui.selectable_label(index == convo.viewer_index, text).clicked() {
                    actions.push(EditAction::SetViewer(index));
                }
            }
        });
}

fn render_users_table(
    ui: &mut egui::Ui,
    convo: &Conversation,
    theme: &ChatTheme,
    actions: &mut Vec<EditAction>,
) {
    let palette = palette_hex();

    egui::Grid::new("users_grid")
        .striped(true)
        .num_columns(6)
        .show(ui, |ui| {
            for header in ["Cellphone", "Saved name", "Original name", "Picture", "Color", ""] {
                ui.label(RichText::new(header).strong().color(theme.text_primary));
            }
            ui.end_row();

            for (index, user) in convo.users().iter().enumerate() {
                let text_fields = [
                    ("cellphone", user.cellphone.as_str()),
                    ("savedName", user.saved_name.as_deref().unwrap_or_default()),
                    ("originalName", user.original_name.as_deref().unwrap_or_default()),
                    ("picture", user.picture.as_deref().unwrap_or_default()),
                ];
                for (name, value) in text_fields {
                    if let Some(value) = text_cell(ui, cell_salt(user, name), value, 110.0) {
                        actions.push(EditAction::SetUserText {
                            index,
                            name: name.to_string(),
                            value,
                        });
                    }
                }

                egui::ComboBox::from_id_salt(cell_salt(user, "color"))
                    .selected_text(
                        RichText::new(user.color.as_str()).color(user_color(&user.color)),
                    )
                    .show_ui(ui, |ui| {
                        for hex in &palette {
                            let text = RichText::new(hex.as_str()).color(user_color(hex));
                            if ui.selectable_label(*hex == user.color, text).clicked() {
                                actions.push(EditAction::SetUserField {
                                    index,
                                    field: UserField::Color(hex.clone()),
                                });
                            }
                        }
                    });

                if ui.button("Delete").clicked() {
                    actions.push(EditAction::RemoveUser(index));
                }
                ui.end_row();
            }
        });
}

fn excerpt(contents: &str) -> String {
    let mut chars = contents.chars();
    let head: String = chars.by_ref().take(MENTION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

fn render_messages_table(
    ui: &mut egui::Ui,
    convo: &Conversation,
    theme: &ChatTheme,
    actions: &mut Vec<EditAction>,
) {
    let users = convo.users().as_slice();
    let messages = convo.messages().as_slice();

    egui::Grid::new("messages_grid")
        .striped(true)
        .num_columns(5)
        .show(ui, |ui| {
            for header in ["Author", "Timestamp", "Contents", "Message mentioned", ""] {
                ui.label(RichText::new(header).strong().color(theme.text_primary));
            }
            ui.end_row();

            for (index, message) in messages.iter().enumerate() {
                let author_text = match message.user_index {
                    None => RichText::new("(none)"),
                    Some(i) => match users.get(i) {
                        Some(user) => RichText::new(user.picker_label()).color(user_color(&user.color)),
                        None => RichText::new(format!("(missing #{i})")).color(theme.error),
                    },
                };
                egui::ComboBox::from_id_salt(cell_salt(message, "userIndex"))
                    .selected_text(author_text)
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(message.user_index.is_none(), "(none)").clicked() {
                            actions.push(EditAction::SetMessageText {
                                index,
                                name: "userIndex".to_string(),
                                value: String::new(),
                            });
                        }
                        for (user_index, label, color) in author_options(users) {
                            let text = RichText::new(label).color(user_color(color));
                            let selected = message.user_index == Some(user_index);
                            if ui.selectable_label(selected, text).clicked() {
                                actions.push(EditAction::SetMessageText {
                                    index,
                                    name: "userIndex".to_string(),
                                    value: user_index.to_string(),
                                });
                            }
                        }
                    });

                ui.horizontal(|ui| {
                    if let Some(value) = text_cell(ui, cell_salt(message, "timestamp"), &message.timestamp, 170.0) {
                        actions.push(EditAction::SetMessageText {
                            index,
                            name: "timestamp".to_string(),
                            value,
                        });
                    }
                    if format_time(&message.timestamp, &Local).is_none() {
                        ui.colored_label(theme.error, "!")
                            .on_hover_text("Unrecognised timestamp, expected e.g. 2024-05-01T14:30");
                    }
                });

                if let Some(value) = text_cell(ui, cell_salt(message, "contents"), &message.contents, 200.0) {
                    actions.push(EditAction::SetMessageText {
                        index,
                        name: "contents".to_string(),
                        value,
                    });
                }

                let mention_text = match message.mention_index {
                    None => String::from("(none)"),
                    Some(i) => messages
                        .get(i)
                        .filter(|_| i < index)
                        .map_or_else(|| format!("(missing #{i})"), |m| excerpt(&m.contents)),
                };
                egui::ComboBox::from_id_salt(cell_salt(message, "mentionIndex"))
                    .selected_text(mention_text)
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(message.mention_index.is_none(), "(none)").clicked() {
                            actions.push(EditAction::SetMessageText {
                                index,
                                name: "mentionIndex".to_string(),
                                value: String::new(),
                            });
                        }
                        for (target, contents) in mention_targets(messages, index) {
                            let selected = message.mention_index == Some(target);
                            if ui.selectable_label(selected, excerpt(contents)).clicked() {
                                actions.push(EditAction::SetMessageText {
                                    index,
                                    name: "mentionIndex".to_string(),
                                    value: target.to_string(),
                                });
                            }
                        }
                    });

                if ui.button("Delete").clicked() {
                    actions.push(EditAction::RemoveMessage(index));
                }
                ui.end_row();
            }
        });
}
