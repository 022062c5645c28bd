//! Storefront domain logic
//!
//! This crate holds everything about the storefront that can be computed
//! without a DOM: catalog loading and price merging, the cart and checkout
//! totals, and the review pipeline (delimited-record parsing, text
//! sanitization, distribution-weighted sampling, pagination).
//!
//! The browser adapter lives in the shopfront-wasm crate; it owns fetch,
//! localStorage, and rendering, and calls into this crate for every
//! decision. Nothing here touches web-sys, so the whole crate tests
//! natively.

pub mod cart;
pub mod catalog;
pub mod delimited;
pub mod error;
pub mod review;
pub mod sanitizer;

pub use cart::{
    compute_totals, settle, AlwaysApprove, Cart, CartItem, CheckoutError, OrderConfirmation,
    PaymentGateway, Totals,
};
pub use catalog::{find_product, merge_prices, parse_price_list, parse_products, Product};
pub use error::StoreError;
pub use review::{RatingDistribution, Review, ReviewEngine, DISPLAY_CAP, PAGE_SIZE};
pub use sanitizer::{Sanitizer, Validation};
