//! Product detail page controller: detail rendering plus the whole
//! review panel (sampled subset, pagination, helpful votes, submission).

use shopfront_core::{find_product, Cart, Product, ReviewEngine, Sanitizer};
use wasm_bindgen::prelude::*;
use web_sys::UrlSearchParams;

use crate::home::{element_by_id, load_catalog, redirect};
use crate::{nav, net, render};

const REVIEWS_URL: &str = "data/reviews.csv";
const SUBMIT_DELAY_MS: i32 = 800;

/// Detail page state. The review engine is seeded from the clock, so
/// each visit shows a different sample of the same underlying set.
#[wasm_bindgen]
pub struct ProductPage {
    products: Vec<Product>,
    product: Option<Product>,
    cart: Cart,
    engine: ReviewEngine,
}

impl Default for ProductPage {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ProductPage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            product: None,
            cart: Cart::default(),
            engine: ReviewEngine::new(Sanitizer::default(), js_sys::Date::now() as u64),
        }
    }

    /// Resolve the ?id= parameter, load the catalog and reviews, and
    /// render everything. A missing id goes back to the catalog page;
    /// an unknown id goes to the 404 page.
    #[wasm_bindgen]
    pub async fn load(&mut self) -> Result<(), JsValue> {
        let Some(product_id) = query_param("id")? else {
            return redirect("index.html");
        };

        self.products = load_catalog().await;
        let Some(product) = find_product(&self.products, &product_id).cloned() else {
            return redirect("404.html");
        };

        match net::fetch_text(REVIEWS_URL).await {
            Ok(csv) => self.engine.ingest(&csv),
            Err(err) => {
                web_sys::console::error_2(&"Failed to load reviews:".into(), &err);
            }
        }

        let review_count = product.review_count.unwrap_or(0) as usize;
        self.engine
            .initialize_for_product(review_count, product.rating_distribution.as_ref());

        self.render_detail(&product)?;
        self.product = Some(product);
        self.render_reviews()
    }

    fn render_detail(&self, product: &Product) -> Result<(), JsValue> {
        element_by_id("product-detail-name")?.set_text_content(Some(&product.name));
        element_by_id("product-detail-brand")?.set_text_content(Some(&product.brand));
        element_by_id("product-detail-price")?
            .set_text_content(Some(&format!("${:.2}", product.price)));
        element_by_id("product-detail-description")?.set_text_content(Some(&product.description));

        if let Some(rating) = product.rating {
            element_by_id("product-detail-stars")?.set_inner_html(&render::stars(rating));
        }
        if let Some(count) = product.review_count {
            element_by_id("product-detail-review-count")?
                .set_text_content(Some(&format!("({} reviews)", count)));
        }

        let gallery: String = product
            .images
            .iter()
            .enumerate()
            .map(|(i, src)| {
                format!(
                    r#"<img src="{}" alt="{} view {}" class="gallery-thumb" data-image-index="{}">"#,
                    src,
                    product.name,
                    i + 1,
                    i
                )
            })
            .collect();
        element_by_id("product-detail-gallery")?.set_inner_html(&gallery);

        Ok(())
    }

    /// Render the current review page, the breakdown bars, and the
    /// pagination controls. Resets the per-render helpful marks.
    fn render_reviews(&mut self) -> Result<(), JsValue> {
        self.engine.begin_render();

        let page = self.engine.current_page();
        let list = render::review_list(
            self.engine.page(page),
            page,
            shopfront_core::PAGE_SIZE,
        );
        element_by_id("reviews-list")?.set_inner_html(&list);

        element_by_id("rating-breakdown")?
            .set_inner_html(&render::rating_breakdown(&self.engine.rating_breakdown()));

        element_by_id("review-pagination")?.set_inner_html(&render::pagination(
            page,
            self.engine.page_count(),
            self.engine.at_display_cap(),
        ));
        Ok(())
    }

    #[wasm_bindgen(js_name = goToReviewPage)]
    pub fn go_to_review_page(&mut self, page: u32) -> Result<(), JsValue> {
        self.engine.go_to_page(page as usize);
        self.render_reviews()
    }

    /// Count a helpful vote. Returns the new count, or nothing when
    /// this review was already marked since the last render; the
    /// caller updates the button label only on Some.
    #[wasm_bindgen(js_name = markHelpful)]
    pub fn mark_helpful(&mut self, index: u32) -> Option<u32> {
        self.engine.mark_helpful(index as usize)
    }

    /// The displayed subset is capped; asking for more surfaces a
    /// transient error instead of fetching.
    #[wasm_bindgen(js_name = requestMoreReviews)]
    pub fn request_more_reviews(&self) -> Result<(), JsValue> {
        nav::show_notification(
            "Failed to fetch additional reviews. Please try again later.",
            "error",
        )
    }

    /// Validate a submission, then simulate the round trip. The review
    /// is acknowledged but never persisted.
    #[wasm_bindgen(js_name = submitReview)]
    pub async fn submit_review(&self, title: &str, body: &str) -> Result<JsValue, JsValue> {
        if let Err(err) = self.engine.validate_submission(title, body) {
            return Err(JsValue::from_str(&err.to_string()));
        }

        net::sleep(SUBMIT_DELAY_MS).await?;

        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"success".into(), &true.into())?;
        js_sys::Reflect::set(
            &result,
            &"message".into(),
            &"Thank you for your review! It will appear after moderation.".into(),
        )?;
        Ok(result.into())
    }

    /// Add the current product to the cart and return the item count.
    #[wasm_bindgen(js_name = addToCart)]
    pub fn add_to_cart(&mut self) -> Result<u32, JsValue> {
        let product = self
            .product
            .as_ref()
            .ok_or_else(|| JsValue::from_str("No product loaded"))?;
        self.cart.add(product);
        nav::show_notification("Added to cart!", "success")?;
        Ok(self.cart.len() as u32)
    }

    /// Hand the cart to checkout, as on the catalog page.
    #[wasm_bindgen(js_name = beginCheckout)]
    pub fn begin_checkout(&self) -> Result<(), JsValue> {
        if self.cart.is_empty() {
            nav::show_notification("Your cart is empty!", "error")?;
            return Ok(());
        }
        crate::handoff::store_cart(&self.cart)?;
        redirect("checkout.html")
    }
}

fn query_param(name: &str) -> Result<Option<String>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let search = window.location().search()?;
    let params = UrlSearchParams::new_with_str(&search)?;
    Ok(params.get(name).filter(|v| !v.is_empty()))
}
