//! Shopfront - browser adapter
//!
//! Thin WASM layer over shopfront-core. Each page instantiates its
//! controller and wires DOM events to it:
//!
//! ```js
//! import init, { HomePage } from './pkg/shopfront_wasm.js';
//! await init();
//! const page = new HomePage();
//! await page.load();
//! ```

use wasm_bindgen::prelude::*;

pub mod checkout;
pub mod handoff;
pub mod home;
pub mod nav;
pub mod net;
pub mod product;
pub mod render;

pub use checkout::CheckoutPage;
pub use home::HomePage;
pub use nav::{highlight_active_nav, show_notification, toggle_menu};
pub use product::ProductPage;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Shopfront WASM initialized".into());
}
