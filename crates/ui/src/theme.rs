use syncify_dashboard::{theme, PreferenceStore, SavedTheme};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

/// Restore the saved theme and hook the theme switch
pub fn bind_theme_switch<P>(
    doc: &Document,
    switch_id: &str,
    attribute: &str,
    prefs: P,
) -> Result<(), JsValue>
where
    P: PreferenceStore + 'static,
{
    let root = doc.document_element().ok_or("No document element")?;
    let switch = doc
        .get_element_by_id(switch_id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());

    let saved = SavedTheme::restore(&prefs);
    if let (Some(switch), Some(on)) = (switch.as_ref(), saved.switch_on) {
        switch.set_checked(on);
    }
    if let Some(name) = saved.theme.as_deref() {
        root.set_attribute(attribute, name)?;
    }

    let Some(switch) = switch else {
        warn!("theme switch #{switch_id} not found");
        return Ok(());
    };

    let attribute = attribute.to_string();
    let toggle_switch = switch.clone();
    let cb = Closure::wrap(Box::new(move || {
        let current = root.get_attribute(&attribute);
        let next = theme::toggle(&prefs, current.as_deref(), toggle_switch.checked());
        let _ = root.set_attribute(&attribute, next.as_str());
    }) as Box<dyn FnMut()>);
    switch.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    cb.forget();

    Ok(())
}
