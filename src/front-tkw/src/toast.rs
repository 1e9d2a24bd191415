use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, console};

const TOAST_MS: i32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastKind {
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Info => "toast toast-info",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Error => "toast toast-error",
        }
    }
}

/// Shows a notification in the corner; it can be closed and goes away by itself after a few seconds.
pub fn show_toast(document: &Document, message: &str, kind: ToastKind) {
    if let Err(e) = try_show_toast(document, message, kind) {
        console::error_1(&e);
    }
}

fn try_show_toast(document: &Document, message: &str, kind: ToastKind) -> Result<(), JsValue> {
    let Some(host) = document.get_element_by_id("toasts") else {
        return Ok(());
    };

    let toast = document.create_element("div")?;
    toast.set_class_name(kind.class());
    toast.set_attribute("role", "status")?;

    let text = document.create_element("span")?;
    text.set_text_content(Some(message));

    let close = document.create_element("button")?;
    close.set_class_name("toast-close");
    close.set_attribute("aria-label", "Close")?;
    close.set_text_content(Some("\u{00d7}"));

    toast.append_child(&text)?;
    toast.append_child(&close)?;
    host.append_child(&toast)?;

    let dismissed = toast.clone();
    let on_close = Closure::once_into_js(move || dismissed.remove());
    close.add_event_listener_with_callback("click", on_close.unchecked_ref())?;

    // Removing an already removed element is a no-op
    let expired = toast.clone();
    let on_timeout = Closure::once_into_js(move || expired.remove());
    if let Some(window) = web_sys::window() {
        window.set_timeout_with_callback_and_timeout_and_arguments_0(on_timeout.unchecked_ref(), TOAST_MS)?;
    }

    Ok(())
}
