//! The theme controller: resolve, apply and toggle.
//!
//! Two sources of truth are consulted, each with its own `Light` default:
//!
//! - [`ThemeController::read_persisted_theme`] reads the preference store and
//!   is used once, when the page becomes ready.
//! - [`ThemeController::read_displayed_theme`] reads the document marker and is
//!   used on every toggle.
//!
//! They normally agree. If something else rewrites the marker after startup,
//! toggling follows the marker, not the store; that asymmetry is kept as-is.

use crate::store::PreferenceStore;
use crate::surface::{ThemeSurface, ToggleControl};
use crate::theme::Theme;

pub struct ThemeController<S, P> {
    surface: S,
    store: P,
    storage_key: String,
}

impl<S: ThemeSurface, P: PreferenceStore> ThemeController<S, P> {
    pub fn new(surface: S, store: P, storage_key: impl Into<String>) -> Self {
        Self {
            surface,
            store,
            storage_key: storage_key.into(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn into_parts(self) -> (S, P) {
        (self.surface, self.store)
    }

    pub fn read_persisted_theme(&self) -> Theme {
        let stored = self.store.get(&self.storage_key);
        match stored.as_deref().and_then(Theme::parse) {
            Some(theme) => theme,
            None => {
                if let Some(value) = stored {
                    tracing::debug!(key = %self.storage_key, %value, "unrecognized stored theme; using light");
                }
                Theme::default()
            }
        }
    }

    pub fn read_displayed_theme(&self) -> Theme {
        Theme::from_stored(self.surface.marker().as_deref())
    }

    pub fn resolve_initial_theme(&self) -> Theme {
        self.read_persisted_theme()
    }

    pub fn apply_theme(&mut self, theme: Theme) {
        self.surface.set_marker(theme);
        self.surface.set_body_dark_class(theme.is_dark());

        let controls = self.surface.list_toggle_controls();
        let count = controls.len();
        for mut control in controls {
            control.set_icon_class(theme.control_icon_class());
            control.set_label_text(theme.control_label());
        }
        tracing::debug!(%theme, controls = count, "applied theme");
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.read_displayed_theme().flipped();
        self.store.set(&self.storage_key, next.as_str());
        self.apply_theme(next);
        tracing::info!(theme = %next, "toggled theme");
        next
    }
}
