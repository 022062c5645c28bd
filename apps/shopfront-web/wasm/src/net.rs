//! Fetch and timer plumbing shared by the page controllers.
//!
//! Fetches are split into start/read halves so a page can kick off
//! several requests before awaiting any of them; the underlying
//! Promises run concurrently either way.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window"))
}

/// Start a GET request and return the in-flight future.
pub(crate) fn start_fetch(url: &str) -> Result<JsFuture, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)?;
    Ok(JsFuture::from(window()?.fetch_with_request(&request)))
}

/// Await an in-flight fetch and read the body as text. Non-2xx
/// statuses are errors.
pub(crate) async fn read_text(pending: JsFuture) -> Result<String, JsValue> {
    let response: Response = pending.await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "Request failed: {}",
            response.status()
        )));
    }

    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("Response body was not text"))
}

/// GET a URL and return the body as text.
pub(crate) async fn fetch_text(url: &str) -> Result<String, JsValue> {
    read_text(start_fetch(url)?).await
}

/// Resolve after `ms` milliseconds via setTimeout.
pub(crate) async fn sleep(ms: i32) -> Result<(), JsValue> {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Ok(win) = window() {
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    JsFuture::from(promise).await?;
    Ok(())
}
