use syncify_dashboard::PreferenceStore;
use tracing::warn;
use web_sys::{window, Storage};

/// Preferences kept in the browser's `localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalPreferences;

fn local_storage() -> Option<Storage> {
    window().and_then(|w| w.local_storage().ok().flatten())
}

impl PreferenceStore for LocalPreferences {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match local_storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    warn!("localStorage rejected {key}");
                }
            }
            None => warn!("localStorage unavailable, {key} not persisted"),
        }
    }
}
