//! Core FakeChatApp struct definition and initialization.

use eframe::egui;
use tracing::{info, warn};

use crate::config::{load_settings, save_settings, Settings};
use crate::seed::{self, load_seed, Seed};
use crate::state::{Conversation, EditAction};
use crate::ui::{self, ChatTheme};

pub struct FakeChatApp {
    pub conversation: Conversation,
    pub settings: Settings,
    pub theme: ChatTheme,

    /// Most recent rejected edit, shown under the editor.
    pub last_error: Option<String>,

    /// Write settings back on exit (off for headless construction).
    persist: bool,
}

fn initial_seed(settings: &Settings) -> Seed {
    let Some(path) = &settings.seed_path else {
        return seed::example();
    };
    match load_seed(path) {
        Ok(seed) => {
            info!(path = %path.display(), "loaded seed conversation");
            seed
        }
        Err(err) => {
            warn!(%err, "falling back to the built-in conversation");
            seed::example()
        }
    }
}

impl FakeChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = load_settings().unwrap_or_else(|err| {
            info!(%err, "using default settings");
            Settings::default()
        });

        match settings.theme.as_str() {
            "light" => cc.egui_ctx.set_visuals(egui::Visuals::light()),
            _ => cc.egui_ctx.set_visuals(egui::Visuals::dark()),
        }

        let mut app = Self::with_settings(settings);
        ui::apply_app_style(&cc.egui_ctx, &app.theme);
        app.persist = true;
        app
    }

    /// Build the app state without a window.
    pub fn with_settings(settings: Settings) -> Self {
        let mut conversation = Conversation::from_seed(initial_seed(&settings));
        conversation.viewer_index = settings.viewer_index;
        conversation.warning = settings.show_warning;

        Self {
            conversation,
            theme: ChatTheme::by_name(&settings.theme),
            settings,
            last_error: None,
            persist: false,
        }
    }

    /// Apply the edits collected while drawing one frame.
    pub fn apply_edits(&mut self, actions: Vec<EditAction>) {
        if actions.is_empty() {
            return;
        }
        let failed = self.conversation.apply_all(actions);
        for (action, err) in &failed {
            warn!(?action, %err, "edit rejected");
        }
        if let Some((_, err)) = failed.last() {
            self.last_error = Some(err.to_string());
        } else {
            self.last_error = None;
        }
    }

    /// Settings reflecting the current viewer and warning selection.
    pub fn current_settings(&self) -> Settings {
        Settings {
            viewer_index: self.conversation.viewer_index,
            show_warning: self.conversation.warning,
            ..self.settings.clone()
        }
    }
}

impl Drop for FakeChatApp {
    fn drop(&mut self) {
        if !self.persist {
            return;
        }
        if let Err(err) = save_settings(&self.current_settings()) {
            warn!(%err, "failed to save settings");
        }
    }
}
