//! Shared chrome: nav highlighting, the mobile menu, and toast
//! notifications.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

const TOAST_LIFETIME_MS: i32 = 2000;

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))
}

/// Toggle the mobile menu open/closed.
#[wasm_bindgen(js_name = toggleMenu)]
pub fn toggle_menu() -> Result<(), JsValue> {
    if let Some(menu) = document()?.get_element_by_id("nav-menu") {
        menu.class_list().toggle("active")?;
    }
    Ok(())
}

/// Mark the nav link matching the current page as active.
#[wasm_bindgen(js_name = highlightActiveNav)]
pub fn highlight_active_nav() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let path = window.location().pathname()?;
    let current = path.rsplit('/').next().unwrap_or("");
    let current = if current.is_empty() {
        "index.html"
    } else {
        current
    };

    let links = document()?.query_selector_all(".nav-link")?;
    for i in 0..links.length() {
        let Some(node) = links.item(i) else { continue };
        let Ok(link) = node.dyn_into::<Element>() else {
            continue;
        };
        let href = link.get_attribute("href").unwrap_or_default();
        if href == current {
            link.class_list().add_1("active")?;
        } else {
            link.class_list().remove_1("active")?;
        }
    }
    Ok(())
}

/// Show a toast in the corner for a couple of seconds. `kind` is
/// "success" or "error" and only affects styling.
#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: &str, kind: &str) -> Result<(), JsValue> {
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("No body"))?;

    let background = if kind == "error" {
        "var(--color-danger, #c0392b)"
    } else {
        "var(--color-success, #52b548)"
    };

    let toast = document.create_element("div")?;
    toast.set_class_name("toast-notification");
    toast.set_text_content(Some(message));
    toast.set_attribute(
        "style",
        &format!(
            "position: fixed; top: 100px; right: 20px; background: {}; \
             color: white; padding: 1rem 1.5rem; border-radius: 0.5rem; \
             box-shadow: 0 4px 6px rgba(0,0,0,0.1); z-index: 10000;",
            background
        ),
    )?;
    body.append_child(&toast)?;

    let remove = Closure::once(move || {
        toast.remove();
    });
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("No window"))?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            remove.as_ref().unchecked_ref(),
            TOAST_LIFETIME_MS,
        )?;
    remove.forget();

    Ok(())
}
