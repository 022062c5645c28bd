//! Checkout page controller.

use shopfront_core::{compute_totals, settle, AlwaysApprove, CartItem};
use wasm_bindgen::prelude::*;

use crate::home::element_by_id;
use crate::{handoff, net, render};

const ORDER_DELAY_MS: i32 = 1500;

/// Checkout state: the handed-off cart, read once at load.
#[wasm_bindgen]
pub struct CheckoutPage {
    items: Vec<CartItem>,
}

impl Default for CheckoutPage {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl CheckoutPage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Read the handoff and render either the order summary or the
    /// empty state.
    #[wasm_bindgen]
    pub fn load(&mut self) -> Result<(), JsValue> {
        self.items = handoff::load_cart()?;

        let summary = element_by_id("order-summary")?;
        if self.items.is_empty() {
            handoff::clear_cart()?;
            summary.set_inner_html(&render::empty_checkout());
        } else {
            let totals = compute_totals(&self.items);
            summary.set_inner_html(&render::order_summary(&self.items, &totals));
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = itemCount)]
    pub fn item_count(&self) -> u32 {
        self.items.len() as u32
    }

    /// Check the contact form fields before the order may settle.
    /// Returns the first problem as an error message.
    #[wasm_bindgen(js_name = validateContact)]
    pub fn validate_contact(&self, name: &str, email: &str, address: &str) -> Result<(), JsValue> {
        if name.trim().is_empty() {
            return Err(JsValue::from_str("Please enter your name."));
        }
        if !email.contains('@') || email.trim().len() < 3 {
            return Err(JsValue::from_str("Please enter a valid email address."));
        }
        if address.trim().is_empty() {
            return Err(JsValue::from_str("Please enter a shipping address."));
        }
        Ok(())
    }

    /// Settle the order: authorize payment, simulate the processing
    /// delay, clear the handoff, and render the confirmation. Returns
    /// the order id.
    #[wasm_bindgen(js_name = placeOrder)]
    pub async fn place_order(&mut self) -> Result<String, JsValue> {
        let confirmation = settle(&self.items, &mut AlwaysApprove)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        net::sleep(ORDER_DELAY_MS).await?;

        handoff::clear_cart()?;
        self.items.clear();

        let order_id = uuid::Uuid::new_v4().to_string();
        element_by_id("order-summary")?.set_inner_html(&render::order_confirmation(
            &order_id,
            confirmation.totals.total,
        ));
        Ok(order_id)
    }
}
