//! Page-level wiring between the controller and the DOM

use std::cell::RefCell;
use std::rc::Rc;

use syncify_dashboard::{
    Dashboard, DashboardConfig, DialogIds, EditForm, Notice, NoticeTarget, Refresh, RowAction,
};
use syncify_protocol::{PlaylistId, ServerEvent, SettingsUpdate};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom::{self, get_document};
use crate::socket::SocketLink;

/// Shared page state, constructed once on load
pub struct App {
    config: DashboardConfig,
    dashboard: RefCell<Dashboard<Rc<SocketLink>>>,
}

impl App {
    pub fn new(config: DashboardConfig, link: Rc<SocketLink>) -> Rc<Self> {
        let dashboard = Dashboard::new(link, config.notices);
        Rc::new(Self {
            config,
            dashboard: RefCell::new(dashboard),
        })
    }

    pub fn handle_server_event(&self, event: ServerEvent) {
        let refresh = self.dashboard.borrow_mut().handle_event(event);
        match refresh {
            Refresh::Nothing => {}
            Refresh::Playlists => self.refresh_playlists(),
            Refresh::SettingsForm(form) => self.fill_settings_form(&form),
        }
    }

    /// Rebuild the table and every edit dialog
    fn refresh_playlists(&self) {
        self.render_table();
        self.render_dialogs();
    }

    fn render_table(&self) {
        let Some(doc) = get_document() else { return };
        let table = self.dashboard.borrow().table();
        if let Err(e) = dom::render_table(&doc, &self.config.elements.sync_list, &table) {
            warn!("table render failed: {e:?}");
        }
    }

    fn render_dialogs(&self) {
        let Some(doc) = get_document() else { return };
        let dialogs = self.dashboard.borrow().edit_dialogs();
        if let Err(e) = dom::render_dialogs(&doc, &self.config.elements.edit_dialogs, &dialogs) {
            warn!("dialog render failed: {e:?}");
        }
    }

    fn handle_row_action(&self, action: RowAction, id: &PlaylistId) {
        match action {
            RowAction::Delete => self.remove_playlist(id),
            RowAction::Save => self.save_playlist(id),
        }
    }

    fn add_playlist(&self) {
        self.dashboard.borrow_mut().add_playlist();
        self.refresh_playlists();
    }

    fn remove_playlist(&self, id: &PlaylistId) {
        let removed = self.dashboard.borrow_mut().remove_playlist(id);
        match removed {
            Ok(_) => self.refresh_playlists(),
            Err(e) => warn!("delete ignored: {e}"),
        }
    }

    fn save_playlist(&self, id: &PlaylistId) {
        let ids = DialogIds::for_playlist(id);
        let form = EditForm {
            name: dom::input_value(&ids.name_input),
            link: dom::input_value(&ids.link_input),
            sleep: dom::input_value(&ids.sleep_input),
        };
        let saved = self.dashboard.borrow_mut().save_playlist(id, &form);
        match saved {
            Ok(notice) => {
                self.show(&notice);
                // The dialog stays open, so only the table is redrawn
                self.render_table();
            }
            Err(e) => warn!("save ignored: {e}"),
        }
    }

    fn save_all(&self) {
        let notice = self.dashboard.borrow().save_all();
        self.show(&notice);
    }

    fn open_settings(&self) {
        self.dashboard.borrow_mut().open_settings();
    }

    fn save_settings(&self) {
        let ids = &self.config.elements;
        let form = SettingsUpdate {
            sync_start_times: dom::input_value(&ids.sync_start_times),
            media_server_addresses: dom::input_value(&ids.media_server_addresses),
            media_server_tokens: dom::input_value(&ids.media_server_tokens),
            media_server_library_name: dom::input_value(&ids.media_server_library_name),
            spotify_client_id: dom::input_value(&ids.spotify_client_id),
            spotify_client_secret: dom::input_value(&ids.spotify_client_secret),
        };
        let notice = self.dashboard.borrow().update_settings(form);
        self.show(&notice);
    }

    fn fill_settings_form(&self, form: &SettingsUpdate) {
        let ids = &self.config.elements;
        dom::set_input_value(&ids.sync_start_times, &form.sync_start_times);
        dom::set_input_value(&ids.media_server_addresses, &form.media_server_addresses);
        dom::set_input_value(&ids.media_server_tokens, &form.media_server_tokens);
        dom::set_input_value(&ids.media_server_library_name, &form.media_server_library_name);
        dom::set_input_value(&ids.spotify_client_id, &form.spotify_client_id);
        dom::set_input_value(&ids.spotify_client_secret, &form.spotify_client_secret);
    }

    fn show(&self, notice: &Notice) {
        let element_id = match &notice.target {
            NoticeTarget::PlaylistDialog(id) => DialogIds::for_playlist(id).message,
            NoticeTarget::Settings => self.config.elements.save_message.clone(),
            NoticeTarget::SyncList => self.config.elements.save_sync_list_msg.clone(),
        };
        dom::show_notice(&element_id, notice);
    }

    /// Hook the static page controls
    pub fn bind_controls(self: &Rc<Self>) -> Result<(), JsValue> {
        let ids = &self.config.elements;

        let app = Rc::clone(self);
        listen(&ids.add_playlist, "click", move || app.add_playlist())?;

        let app = Rc::clone(self);
        listen(&ids.save_sync_list, "click", move || app.save_all())?;

        // Bootstrap fires this just before the configuration dialog shows
        let app = Rc::clone(self);
        listen(&ids.config_modal, "show.bs.modal", move || app.open_settings())?;

        let app = Rc::clone(self);
        listen(&ids.save_changes_button, "click", move || app.save_settings())?;

        // Row and dialog buttons are rebuilt on every render; one listener
        // per container serves all of them
        let doc = get_document().ok_or("No document")?;
        match doc.get_element_by_id(&ids.sync_list) {
            Some(body) => {
                let app = Rc::clone(self);
                dom::delegate_clicks(&body, move |action, id| app.handle_row_action(action, &id))?;
            }
            None => warn!("element #{} not found, delete buttons not bound", ids.sync_list),
        }
        let dialogs = dom::dialog_container(&doc, &ids.edit_dialogs)?;
        let app = Rc::clone(self);
        dom::delegate_clicks(&dialogs, move |action, id| app.handle_row_action(action, &id))?;

        self.refresh_playlists();
        Ok(())
    }
}

/// Attach a listener to an element by id; missing elements are skipped
fn listen(id: &str, event: &str, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let Some(el) = get_document().and_then(|doc| doc.get_element_by_id(id)) else {
        warn!("element #{id} not found, '{event}' not bound");
        return Ok(());
    };
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
    el.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}
