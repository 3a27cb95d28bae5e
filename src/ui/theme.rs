//! Colours and global style for the editor and the chat mock.
//!
//! The mock panel imitates a dark messaging app, so its palette is fixed;
//! the editor side follows the selected dark/light theme.

use eframe::egui::{self, Color32, FontFamily, FontId, TextStyle};
use std::collections::BTreeMap;

use crate::model::HexColor;

/// Theme palette shared by every panel.
#[derive(Clone, Debug)]
pub struct ChatTheme {
    pub name: String,
    /// Editor background.
    pub editor_bg: Color32,
    pub text_primary: Color32,
    pub error: Color32,
    /// Chat wallpaper behind the bubbles.
    pub chat_bg: Color32,
    pub bubble_mine: Color32,
    pub bubble_theirs: Color32,
    pub quote_mine: Color32,
    pub quote_theirs: Color32,
    pub bubble_text: Color32,
    pub quote_text: Color32,
    pub secondary_name: Color32,
    pub timestamp: Color32,
    pub warning_tint: Color32,
}

impl ChatTheme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            editor_bg: Color32::from_rgb(0, 92, 75),
            text_primary: Color32::WHITE,
            error: Color32::from_rgb(240, 71, 71),
            chat_bg: Color32::from_rgb(11, 20, 26),
            bubble_mine: Color32::from_rgb(0, 92, 75),
            bubble_theirs: Color32::from_rgb(32, 44, 51),
            quote_mine: Color32::from_rgb(2, 81, 68),
            quote_theirs: Color32::from_rgb(29, 40, 47),
            bubble_text: Color32::WHITE,
            quote_text: Color32::from_rgb(165, 169, 172),
            secondary_name: Color32::from_rgb(117, 127, 132),
            timestamp: Color32::from_rgb(144, 149, 154),
            warning_tint: Color32::from_rgba_unmultiplied(255, 0, 0, 26),
        }
    }

    /// Light editor; the chat mock keeps its dark look.
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            editor_bg: Color32::from_rgb(246, 246, 247),
            text_primary: Color32::from_rgb(6, 6, 7),
            ..Self::dark()
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

/// Neutral grey used for colours that cannot be decoded.
pub const FALLBACK_COLOR: Color32 = Color32::from_rgb(144, 149, 154);

/// Convert a user's colour for drawing.
pub fn user_color(color: &HexColor) -> Color32 {
    color
        .to_rgb()
        .map(|[r, g, b]| Color32::from_rgb(r, g, b))
        .unwrap_or(FALLBACK_COLOR)
}

pub fn configure_text_styles() -> BTreeMap<TextStyle, FontId> {
    use FontFamily::{Monospace, Proportional};

    [
        (TextStyle::Small, FontId::new(11.0, Proportional)),
        (TextStyle::Body, FontId::new(14.0, Proportional)),
        (TextStyle::Button, FontId::new(13.0, Proportional)),
        (TextStyle::Heading, FontId::new(20.0, Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, Monospace)),
    ]
    .into()
}

/// Apply spacing, text sizes and widget styling to the egui context.
pub fn apply_app_style(ctx: &egui::Context, theme: &ChatTheme) {
    let mut style = (*ctx.style()).clone();

    style.text_styles = configure_text_styles();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);

    for widget in [
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        widget.corner_radius = egui::CornerRadius::same(6);
    }
    style.visuals.override_text_color = Some(theme.text_primary);

    ctx.set_style(style);
}
