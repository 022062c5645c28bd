//! Catalog page controller.

use shopfront_core::{find_product, merge_prices, parse_price_list, parse_products, Cart, Product};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::{handoff, nav, net, render};

const PRODUCTS_URL: &str = "data/products.json";
const PRICES_URL: &str = "data/prices.csv";

pub(crate) fn element_by_id(id: &str) -> Result<Element, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {}", id)))
}

pub(crate) fn redirect(url: &str) -> Result<(), JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("No window"))?
        .location()
        .set_href(url)
}

/// Fetch and assemble the catalog. Both requests start before either
/// is awaited. Any failure degrades to an empty catalog; the page
/// renders with no products rather than breaking.
pub(crate) async fn load_catalog() -> Vec<Product> {
    match try_load_catalog().await {
        Ok(products) => products,
        Err(err) => {
            web_sys::console::error_2(&"Failed to load catalog:".into(), &err);
            Vec::new()
        }
    }
}

async fn try_load_catalog() -> Result<Vec<Product>, JsValue> {
    let products_pending = net::start_fetch(PRODUCTS_URL)?;
    let prices_pending = net::start_fetch(PRICES_URL)?;

    let products_json = net::read_text(products_pending).await?;
    let prices_csv = net::read_text(prices_pending).await?;

    let mut products =
        parse_products(&products_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    merge_prices(&mut products, &parse_price_list(&prices_csv));
    Ok(products)
}

fn update_cart_badge(cart: &Cart) -> Result<(), JsValue> {
    if let Ok(badge) = element_by_id("cart-count") {
        badge.set_text_content(Some(&cart.len().to_string()));
        let display = if cart.is_empty() { "none" } else { "flex" };
        badge.set_attribute("style", &format!("display: {};", display))?;
    }
    Ok(())
}

/// Catalog page state: the merged catalog plus the session cart.
#[wasm_bindgen]
pub struct HomePage {
    products: Vec<Product>,
    cart: Cart,
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl HomePage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            cart: Cart::default(),
        }
    }

    /// Load the catalog and render the product grid.
    #[wasm_bindgen]
    pub async fn load(&mut self) -> Result<(), JsValue> {
        self.products = load_catalog().await;
        self.render_grid(&self.products)
    }

    fn render_grid(&self, products: &[Product]) -> Result<(), JsValue> {
        let grid = element_by_id("products-grid")?;
        grid.set_inner_html(&render::product_grid(products));
        Ok(())
    }

    /// Re-render the grid showing one category, or everything for
    /// "all".
    #[wasm_bindgen(js_name = filterCategory)]
    pub fn filter_category(&self, category: &str) -> Result<(), JsValue> {
        if category == "all" {
            return self.render_grid(&self.products);
        }
        let filtered: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        self.render_grid(&filtered)
    }

    /// Append a product to the cart (duplicates are separate lines)
    /// and return the new item count.
    #[wasm_bindgen(js_name = addToCart)]
    pub fn add_to_cart(&mut self, product_id: &str) -> Result<u32, JsValue> {
        let product = find_product(&self.products, product_id)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown product: {}", product_id)))?;
        self.cart.add(product);
        update_cart_badge(&self.cart)?;
        nav::show_notification("Added to cart!", "success")?;
        Ok(self.cart.len() as u32)
    }

    /// Render the cart contents into the modal and open it.
    #[wasm_bindgen(js_name = openCart)]
    pub fn open_cart(&self) -> Result<(), JsValue> {
        let list = element_by_id("cart-items-list")?;
        list.set_inner_html(&render::cart_items(self.cart.items()));

        let subtotal: f64 = self.cart.items().iter().map(|i| i.price).sum();
        element_by_id("cart-total-amount")?.set_text_content(Some(&format!("${:.2}", subtotal)));

        element_by_id("cart-modal")?.class_list().add_1("active")?;
        Ok(())
    }

    #[wasm_bindgen(js_name = closeCart)]
    pub fn close_cart(&self) -> Result<(), JsValue> {
        element_by_id("cart-modal")?.class_list().remove_1("active")?;
        Ok(())
    }

    /// Hand the cart to the checkout page and navigate there. An empty
    /// cart stays on this page with an error toast.
    #[wasm_bindgen(js_name = beginCheckout)]
    pub fn begin_checkout(&self) -> Result<(), JsValue> {
        if self.cart.is_empty() {
            nav::show_notification("Your cart is empty!", "error")?;
            return Ok(());
        }
        handoff::store_cart(&self.cart)?;
        redirect("checkout.html")
    }
}
