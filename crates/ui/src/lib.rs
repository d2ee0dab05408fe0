//! Syncify dashboard browser frontend
//!
//! Loads the page configuration, connects to the backend over Socket.IO and
//! binds the playlist table, edit dialogs, settings dialog and theme switch.

mod app;
mod dom;
mod logging;
mod socket;
mod storage;
mod theme;

use std::rc::Rc;

use syncify_dashboard::DashboardConfig;
use syncify_protocol::endpoint_url;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::socket::{EventHandler, SocketLink};
use crate::storage::LocalPreferences;

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or("no global `window` exists")?;
    let document = window.document().ok_or("should have a document on window")?;

    // 1. Configuration and logging
    let (config, config_error) = load_config(&window);
    logging::init(config.log_level());
    if let Some(e) = config_error {
        warn!("SYNCIFY_CONFIG ignored: {e}");
    }

    // 2. Theme
    theme::bind_theme_switch(
        &document,
        &config.elements.theme_switch,
        &config.theme_attribute,
        LocalPreferences,
    )?;

    // 3. Controller and page controls
    let ws_url = get_ws_url(&window, &config.socket_path)?;
    info!("backend at {ws_url}");
    let link = SocketLink::new(ws_url);
    let app = App::new(config, Rc::clone(&link));
    app.bind_controls()?;

    // 4. Backend connection
    let events = Rc::clone(&app);
    let on_event: EventHandler = Rc::new(move |event| events.handle_server_event(event));
    socket::connect(&link, &on_event)?;

    Ok(())
}

/// Read the optional `window.SYNCIFY_CONFIG` object
fn load_config(window: &web_sys::Window) -> (DashboardConfig, Option<serde_json::Error>) {
    let raw = js_sys::Reflect::get(window, &"SYNCIFY_CONFIG".into())
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .and_then(|v| js_sys::JSON::stringify(&v).ok())
        .and_then(|s| s.as_string());

    DashboardConfig::load_or_default(raw.as_deref())
}

fn get_ws_url(window: &web_sys::Window, socket_path: &str) -> Result<String, JsValue> {
    let location = js_sys::Reflect::get(window, &"location".into())?;

    let host = js_sys::Reflect::get(&location, &"host".into())?
        .as_string()
        .unwrap_or_else(|| "localhost:5000".to_string());

    let protocol = js_sys::Reflect::get(&location, &"protocol".into())?
        .as_string()
        .unwrap_or_else(|| "http:".to_string());

    Ok(endpoint_url(&protocol, &host, socket_path))
}
