//! Light/dark theme switch persisted in browser storage

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::info;

pub const THEME_KEY: &str = "theme";
pub const SWITCH_POSITION_KEY: &str = "switchPosition";

/// Key/value preference storage (`localStorage` in the browser)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory preferences
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Theme after a toggle, given the attribute currently on the document
    ///
    /// Only an explicit `dark` flips to light; anything else becomes dark.
    pub fn toggled_from(current: Option<&str>) -> Self {
        if current == Some(Self::Dark.as_str()) {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

/// Preferences restored at page load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedTheme {
    /// Applied verbatim to the theme attribute
    pub theme: Option<String>,
    pub switch_on: Option<bool>,
}

impl SavedTheme {
    pub fn restore(store: &impl PreferenceStore) -> Self {
        let theme = store.get(THEME_KEY).filter(|t| !t.is_empty());
        let switch_on = store
            .get(SWITCH_POSITION_KEY)
            .filter(|p| !p.is_empty())
            .map(|p| p == "true");
        Self { theme, switch_on }
    }
}

/// Flip the theme and persist both the theme and the switch position
pub fn toggle(store: &impl PreferenceStore, current: Option<&str>, switch_on: bool) -> Theme {
    let theme = Theme::toggled_from(current);
    store.set(THEME_KEY, theme.as_str());
    store.set(SWITCH_POSITION_KEY, if switch_on { "true" } else { "false" });
    info!("theme switched to {}", theme.as_str());
    theme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_dark_to_light() {
        let store = MemoryPreferences::new();
        let theme = toggle(&store, Some("dark"), false);
        assert_eq!(theme, Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(store.get(SWITCH_POSITION_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_toggle_anything_else_to_dark() {
        let store = MemoryPreferences::new();
        assert_eq!(toggle(&store, Some("light"), true), Theme::Dark);
        assert_eq!(toggle(&store, None, true), Theme::Dark);
        assert_eq!(store.get(SWITCH_POSITION_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn test_restore() {
        let store = MemoryPreferences::new();
        assert_eq!(SavedTheme::restore(&store), SavedTheme::default());

        store.set(THEME_KEY, "dark");
        store.set(SWITCH_POSITION_KEY, "true");
        let saved = SavedTheme::restore(&store);
        assert_eq!(saved.theme.as_deref(), Some("dark"));
        assert_eq!(saved.switch_on, Some(true));

        store.set(SWITCH_POSITION_KEY, "false");
        assert_eq!(SavedTheme::restore(&store).switch_on, Some(false));
    }
}
