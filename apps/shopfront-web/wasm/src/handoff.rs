//! Cart handoff between pages via localStorage.
//!
//! The catalog and product pages write the cart snapshot here before
//! navigating to checkout; the checkout page reads it exactly once at
//! load and clears it after a successful order.

use shopfront_core::{Cart, CartItem};
use wasm_bindgen::prelude::*;
use web_sys::Storage;

const HANDOFF_KEY: &str = "checkoutCart";

fn local_storage() -> Result<Storage, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    window
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("No localStorage"))
}

/// Snapshot the cart for the checkout page.
pub(crate) fn store_cart(cart: &Cart) -> Result<(), JsValue> {
    let json =
        serde_json::to_string(cart.items()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    local_storage()?.set_item(HANDOFF_KEY, &json)?;
    Ok(())
}

/// Read the handed-off cart. Missing or unparseable data is an empty
/// cart, which the checkout page renders as the empty state.
pub(crate) fn load_cart() -> Result<Vec<CartItem>, JsValue> {
    let json = local_storage()?.get_item(HANDOFF_KEY)?;
    Ok(json
        .and_then(|j| serde_json::from_str(&j).ok())
        .unwrap_or_default())
}

/// Drop the handoff after the order settles.
pub(crate) fn clear_cart() -> Result<(), JsValue> {
    local_storage()?.remove_item(HANDOFF_KEY)?;
    Ok(())
}
