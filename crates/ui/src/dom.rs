use syncify_dashboard::{DialogPlan, EditDialogView, Notice, RowAction, TableView};
use syncify_protocol::PlaylistId;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, Event, HtmlElement, HtmlInputElement};

/// Get document helper
pub fn get_document() -> Option<Document> {
    window().and_then(|w| w.document())
}

/// Set connection status indicator (connected/connecting/disconnected)
pub fn set_status(status: &str) {
    if let Some(doc) = get_document() {
        if let Some(el) = doc.document_element() {
            let _ = el.set_attribute("data-sync-status", status);
        }
    }
}

/// Current value of an `<input>`, empty when missing
pub fn input_value(id: &str) -> String {
    get_document()
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

pub fn set_input_value(id: &str, value: &str) {
    if let Some(input) = get_document()
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(value);
    }
}

/// Show a success indicator, then hide it once its window passes
///
/// The hide timer is never cancelled.
pub fn show_notice(element_id: &str, notice: &Notice) {
    let Some(el) = get_document()
        .and_then(|doc| doc.get_element_by_id(element_id))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };

    let _ = el.style().set_property("display", notice.target.display());
    if let Some(text) = notice.text {
        el.set_text_content(Some(text));
    }

    let clear_text = notice.text.is_some();
    let callback = Closure::once(Box::new(move || {
        if clear_text {
            el.set_text_content(Some(""));
        }
        let _ = el.style().set_property("display", "none");
    }) as Box<dyn FnOnce()>);

    if let Some(win) = window() {
        #[allow(clippy::cast_possible_wrap)]
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            notice.duration_ms as i32,
        );
    }
    callback.forget();
}

/// Create an element with attributes and optional text
fn node(
    doc: &Document,
    tag: &str,
    attrs: &[(&str, &str)],
    text: Option<&str>,
) -> Result<Element, JsValue> {
    let el = doc.create_element(tag)?;
    for (name, value) in attrs {
        el.set_attribute(name, value)?;
    }
    if let Some(text) = text {
        el.set_text_content(Some(text));
    }
    Ok(el)
}

/// One click listener on `container` for every `data-action` button inside
/// it, bound once so rebuilt rows need no listeners of their own
pub fn delegate_clicks(
    container: &Element,
    handler: impl Fn(RowAction, PlaylistId) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::wrap(Box::new(move |e: Event| {
        let Some(button) = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&format!("[{}]", RowAction::ATTRIBUTE)).ok().flatten())
        else {
            return;
        };
        let action = button
            .get_attribute(RowAction::ATTRIBUTE)
            .and_then(|a| RowAction::parse(&a));
        let id = button.get_attribute(RowAction::ID_ATTRIBUTE);
        if let (Some(action), Some(id)) = (action, id) {
            handler(action, PlaylistId::new(id));
        }
    }) as Box<dyn FnMut(_)>);
    container.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Clear and rebuild the playlist table body
pub fn render_table(doc: &Document, body_id: &str, table: &TableView) -> Result<(), JsValue> {
    let body = doc
        .get_element_by_id(body_id)
        .ok_or("No playlist table")?;
    body.set_inner_html("");

    for row in &table.rows {
        let tr = doc.create_element("tr")?;
        tr.append_child(&node(doc, "td", &[], Some(row.name.as_str()))?.into())?;
        tr.append_child(&node(doc, "td", &[], Some(row.last_synced.as_str()))?.into())?;
        tr.append_child(&node(doc, "td", &[], Some(row.song_count.as_str()))?.into())?;

        let actions = doc.create_element("td")?;
        let edit = node(
            doc,
            "button",
            &[
                ("class", "btn btn-sm btn-primary custom-button-width"),
                ("data-bs-toggle", "modal"),
                ("data-bs-target", row.dialog_target.as_str()),
            ],
            Some("Edit"),
        )?;
        actions.append_child(&edit)?;

        let delete = node(
            doc,
            "button",
            &[
                ("class", "btn btn-sm btn-warning custom-button-width"),
                (RowAction::ATTRIBUTE, RowAction::Delete.as_str()),
                (RowAction::ID_ATTRIBUTE, row.id.as_str()),
            ],
            Some("Delete"),
        )?;
        actions.append_child(&delete)?;

        tr.append_child(&actions)?;
        body.append_child(&tr)?;
    }

    Ok(())
}

/// Container holding the edit dialogs, created under `<body>` if missing
pub fn dialog_container(doc: &Document, container_id: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(container_id) {
        return Ok(el);
    }
    let el = node(doc, "div", &[("id", container_id)], None)?;
    doc.body().ok_or("No body")?.append_child(&el)?;
    Ok(el)
}

/// Bring the edit dialogs in line with the list
///
/// A dialog Bootstrap is currently showing stays in place; removing it
/// would orphan the backdrop.
pub fn render_dialogs(
    doc: &Document,
    container_id: &str,
    dialogs: &[EditDialogView],
) -> Result<(), JsValue> {
    let container = dialog_container(doc, container_id)?;

    let children = container.children();
    let mut existing = Vec::with_capacity(children.length() as usize);
    let mut shown = None;
    for i in 0..children.length() {
        let Some(child) = children.item(i) else { continue };
        if child.class_list().contains("show") {
            shown = Some(child.id());
        }
        existing.push(child.id());
    }

    let plan = DialogPlan::reconcile(&existing, shown.as_deref(), dialogs);
    for modal in &plan.remove {
        if let Some(el) = doc.get_element_by_id(modal) {
            el.remove();
        }
    }
    for &index in &plan.build {
        container.append_child(&edit_dialog(doc, &dialogs[index])?.into())?;
    }

    Ok(())
}

fn form_group(
    doc: &Document,
    class: &str,
    label: &str,
    input_id: &str,
    input_attrs: &[(&str, &str)],
) -> Result<Element, JsValue> {
    let group = node(doc, "div", &[("class", class)], None)?;
    group.append_child(&node(doc, "label", &[("for", input_id)], Some(label))?.into())?;

    let mut attrs = vec![("class", "form-control"), ("id", input_id)];
    attrs.extend_from_slice(input_attrs);
    group.append_child(&node(doc, "input", &attrs, None)?.into())?;
    Ok(group)
}

fn edit_dialog(doc: &Document, dialog: &EditDialogView) -> Result<Element, JsValue> {
    let ids = &dialog.ids;

    let modal = node(
        doc,
        "div",
        &[
            ("class", "modal fade"),
            ("id", ids.modal.as_str()),
            ("tabindex", "-1"),
            ("role", "dialog"),
            ("aria-labelledby", ids.title.as_str()),
            ("aria-hidden", "true"),
        ],
        None,
    )?;
    let frame = node(doc, "div", &[("class", "modal-dialog"), ("role", "document")], None)?;
    let content = node(doc, "div", &[("class", "modal-content")], None)?;

    // Header
    let header = node(doc, "div", &[("class", "modal-header")], None)?;
    header.append_child(&node(
        doc,
        "h5",
        &[("class", "modal-title"), ("id", ids.title.as_str())],
        Some("Edit Playlist"),
    )?.into())?;
    header.append_child(&node(
        doc,
        "button",
        &[
            ("type", "button"),
            ("class", "btn-close"),
            ("data-bs-dismiss", "modal"),
            ("aria-label", "Close"),
        ],
        None,
    )?.into())?;

    // Body
    let body = node(doc, "div", &[("class", "modal-body")], None)?;
    body.append_child(&node(
        doc,
        "div",
        &[
            ("id", ids.message.as_str()),
            ("class", "alert alert-success mt-3"),
            ("style", "display: none;"),
        ],
        Some("Settings saved successfully."),
    )?.into())?;
    let form = doc.create_element("form")?;
    form.append_child(&form_group(
        doc,
        "form-group",
        "Playlist Name:",
        &ids.name_input,
        &[("type", "text"), ("value", dialog.name.as_str())],
    )?.into())?;
    form.append_child(&form_group(
        doc,
        "form-group my-4",
        "Playlist Link:",
        &ids.link_input,
        &[("type", "text"), ("value", dialog.link.as_str())],
    )?.into())?;
    form.append_child(&form_group(
        doc,
        "form-group",
        "Sleep Interval between downloads (Seconds):",
        &ids.sleep_input,
        &[("type", "number"), ("min", "0"), ("value", dialog.sleep.as_str())],
    )?.into())?;
    body.append_child(&form)?;

    // Footer
    let footer = node(doc, "div", &[("class", "modal-footer")], None)?;
    footer.append_child(&node(
        doc,
        "button",
        &[
            ("type", "button"),
            ("class", "btn btn-secondary"),
            ("data-bs-dismiss", "modal"),
        ],
        Some("Close"),
    )?.into())?;
    footer.append_child(&node(
        doc,
        "button",
        &[
            ("type", "button"),
            ("class", "btn btn-primary"),
            (RowAction::ATTRIBUTE, RowAction::Save.as_str()),
            (RowAction::ID_ATTRIBUTE, dialog.id.as_str()),
        ],
        Some("Save Changes"),
    )?.into())?;

    content.append_child(&header)?;
    content.append_child(&body)?;
    content.append_child(&footer)?;
    frame.append_child(&content)?;
    modal.append_child(&frame)?;
    Ok(modal)
}
