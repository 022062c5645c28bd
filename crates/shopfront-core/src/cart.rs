//! Cart state, checkout totals, and the simulated payment seam.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;

pub const TAX_RATE: f64 = 0.08;
pub const FREE_SHIPPING_THRESHOLD: f64 = 50.0;
pub const FLAT_SHIPPING: f64 = 9.99;

/// Reduced snapshot of a product for the checkout hand-off. Volatile and
/// heavy fields (rating distribution) are deliberately left behind to
/// keep the persisted payload small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub model: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            model: product.model.clone(),
            price: product.price,
            images: product.images.clone(),
            category: product.category.clone(),
        }
    }
}

/// Ordered, append-only list of selected items for one page session.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Append a snapshot of the product. Adding the same product twice
    /// yields two line items.
    pub fn add(&mut self, product: &Product) {
        self.items.push(CartItem::from(product));
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Unrounded checkout totals. Rounding happens at display time only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
}

impl Totals {
    pub fn shipping_is_free(&self) -> bool {
        self.shipping == 0.0
    }
}

/// Pure totals computation: 8% tax, flat shipping waived above the
/// free-shipping threshold.
pub fn compute_totals(items: &[CartItem]) -> Totals {
    let subtotal: f64 = items.iter().map(|item| item.price).sum();
    let tax = subtotal * TAX_RATE;
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        0.0
    } else {
        FLAT_SHIPPING
    };
    Totals {
        subtotal,
        tax,
        shipping,
        total: subtotal + tax + shipping,
    }
}

/// Checkout failure taxonomy. The current gateway always approves, but
/// the seam exists so a real decline can be injected without reshaping
/// the flow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Payment declined: {reason}")]
    Declined { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub item_count: usize,
    pub totals: Totals,
}

/// Authorization seam for the simulated checkout.
pub trait PaymentGateway {
    fn authorize(&mut self, totals: &Totals) -> Result<(), CheckoutError>;
}

/// The storefront's only gateway: approves everything.
#[derive(Debug, Default)]
pub struct AlwaysApprove;

impl PaymentGateway for AlwaysApprove {
    fn authorize(&mut self, _totals: &Totals) -> Result<(), CheckoutError> {
        Ok(())
    }
}

/// Settle an order against a gateway. Callers clear the cart and the
/// persisted hand-off only after this succeeds.
pub fn settle(
    items: &[CartItem],
    gateway: &mut impl PaymentGateway,
) -> Result<OrderConfirmation, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let totals = compute_totals(items);
    gateway.authorize(&totals)?;
    Ok(OrderConfirmation {
        item_count: items.len(),
        totals,
    })
}
