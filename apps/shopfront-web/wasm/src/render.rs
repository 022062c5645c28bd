//! HTML fragment builders for the page controllers.
//!
//! Everything here is a pure string function so it tests natively.
//! User-supplied text goes through [`escape_html`] before it reaches
//! markup; catalog fields are trusted (they ship with the site).

use shopfront_core::{CartItem, Product, Review, Totals};

const AVATAR_COLORS: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    "#F8B739", "#52B788",
];

const PLACEHOLDER_IMAGE: &str = "assets/images/placeholder.jpg";

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Star row for a rating. A fractional part of 0.5 or more renders a
/// half star; the same rule applies everywhere a rating is shown.
pub(crate) fn stars(rating: f64) -> String {
    let full = rating.floor() as usize;
    let half = rating.fract() >= 0.5;
    let empty = 5usize.saturating_sub(full + usize::from(half));

    let mut out = String::from("<div class=\"stars\">");
    for _ in 0..full {
        out.push_str("<span class=\"star filled\">★</span>");
    }
    if half {
        out.push_str("<span class=\"star half\">★</span>");
    }
    for _ in 0..empty {
        out.push_str("<span class=\"star\">☆</span>");
    }
    out.push_str("</div>");
    out
}

fn first_image(images: &[String]) -> &str {
    images.first().map(String::as_str).unwrap_or(PLACEHOLDER_IMAGE)
}

pub(crate) fn product_card(product: &Product) -> String {
    let rating_row = match (product.rating, product.review_count) {
        (Some(rating), Some(count)) => format!(
            r#"<div class="product-rating">
            <span class="rating-stars">{}</span>
            <span class="rating-count">({})</span>
          </div>"#,
            stars(rating),
            count
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="product-card">
      <a href="product.html?id={id}" class="product-image">
        <img src="{image}" alt="{name}" loading="lazy">
      </a>
      <div class="product-info">
        <div class="product-category">{category}</div>
        <a href="product.html?id={id}">
          <h3 class="product-name">{name}</h3>
        </a>
        {rating_row}
        <div class="product-price">${price:.2}</div>
        <button class="btn btn-primary" data-product-id="{id}">Add to Cart</button>
      </div>
    </div>"#,
        id = product.id,
        image = first_image(&product.images),
        name = product.name,
        category = product.category,
        rating_row = rating_row,
        price = product.price,
    )
}

pub(crate) fn product_grid(products: &[Product]) -> String {
    products.iter().map(product_card).collect()
}

/// Two-letter avatar initials: first and last word initials, or the
/// first two characters of a single-word name.
pub(crate) fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match (parts.first(), parts.last()) {
        (Some(first), Some(last)) if parts.len() >= 2 => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
        _ => name.chars().take(2).collect::<String>().to_uppercase(),
    }
}

/// Stable palette pick for a name. Matches the JS string hash
/// (h = c + (h << 5) - h, on a wrapping i32) so avatars keep their
/// colors across sessions.
pub(crate) fn avatar_color(name: &str) -> &'static str {
    let mut hash: i32 = 0;
    for ch in name.encode_utf16() {
        hash = (ch as i32).wrapping_add((hash << 5).wrapping_sub(hash));
    }
    AVATAR_COLORS[hash.unsigned_abs() as usize % AVATAR_COLORS.len()]
}

/// One review entry. `index` is the position in the displayed subset;
/// the helpful button carries it so clicks can be routed back.
pub(crate) fn review_item(review: &Review, index: usize) -> String {
    let verified_badge = if review.verified {
        r#"<span class="verified-badge">Verified Buyer</span>"#
    } else {
        ""
    };
    let helpful_suffix = if review.helpful > 0 {
        format!(" ({})", review.helpful)
    } else {
        String::new()
    };

    format!(
        r#"<div class="review-item">
        <div class="review-avatar" style="background-color: {color};">{initials}</div>
        <div class="review-content">
            <div class="review-header">
                <div class="review-author-info">
                    <strong class="review-author-name">{author}</strong>
                    {verified_badge}
                </div>
                <div class="review-meta">{stars}</div>
            </div>
            <div class="review-date">{date}</div>
            <div class="review-title">{title}</div>
            <div class="review-text">{text}</div>
            <div class="review-helpful">
                <button class="helpful-btn" data-review-index="{index}">Helpful{helpful_suffix}</button>
            </div>
        </div>
    </div>"#,
        color = avatar_color(&review.author),
        initials = initials(&review.author),
        author = escape_html(&review.author),
        verified_badge = verified_badge,
        stars = stars(review.rating),
        date = escape_html(&review.date),
        title = escape_html(&review.title),
        text = escape_html(&review.body),
        index = index,
        helpful_suffix = helpful_suffix,
    )
}

pub(crate) fn review_list(reviews: &[Review], page: usize, page_size: usize) -> String {
    let offset = (page.max(1) - 1) * page_size;
    reviews
        .iter()
        .enumerate()
        .map(|(i, review)| review_item(review, offset + i))
        .collect()
}

/// Pagination controls. One page renders nothing; at the display cap
/// the last page offers "Load More", which the controller answers with
/// a transient error.
pub(crate) fn pagination(current: usize, page_count: usize, at_cap: bool) -> String {
    if page_count <= 1 {
        return String::new();
    }

    let mut out = String::from(r#"<div class="pagination-controls">"#);
    if current > 1 {
        out.push_str(&format!(
            r#"<button class="pagination-btn" data-page="{}">← Previous</button>"#,
            current - 1
        ));
    }
    out.push_str(&format!(
        r#"<span class="page-info">Page {} of {}</span>"#,
        current, page_count
    ));
    if current < page_count {
        out.push_str(&format!(
            r#"<button class="pagination-btn" data-page="{}">Next →</button>"#,
            current + 1
        ));
    } else if at_cap {
        out.push_str(r#"<button class="pagination-btn" data-load-more>Load More</button>"#);
    }
    out.push_str("</div>");
    out
}

/// Percentage bars for the star breakdown, 5 stars down to 1.
pub(crate) fn rating_breakdown(percentages: &[u32; 5]) -> String {
    let mut out = String::from(r#"<div class="rating-breakdown">"#);
    for star in (1..=5).rev() {
        let pct = percentages[star - 1];
        let label = if star == 1 { "star" } else { "stars" };
        out.push_str(&format!(
            r#"<div class="rating-bar-row">
                <span class="rating-label">{star} {label}</span>
                <div class="rating-bar-container">
                    <div class="rating-bar-fill" style="width: {pct}%"></div>
                </div>
                <span class="rating-percentage">{pct}%</span>
            </div>"#,
        ));
    }
    out.push_str("</div>");
    out
}

pub(crate) fn cart_items(items: &[CartItem]) -> String {
    if items.is_empty() {
        return r#"<div class="cart-empty">Your cart is empty</div>"#.to_string();
    }
    items
        .iter()
        .map(|item| {
            format!(
                r#"<div class="cart-item">
          <img src="{image}" alt="{name}" class="cart-item-image">
          <div class="cart-item-info">
            <div class="cart-item-name">{name}</div>
            <div class="cart-item-price">${price:.2}</div>
          </div>
        </div>"#,
                image = first_image(&item.images),
                name = item.name,
                price = item.price,
            )
        })
        .collect()
}

/// Checkout order summary: line items plus subtotal, tax, shipping
/// ("FREE" above the threshold), and total.
pub(crate) fn order_summary(items: &[CartItem], totals: &Totals) -> String {
    let lines: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<div class="summary-item">
                <img src="{image}" alt="{name}">
                <div class="summary-item-info">
                    <div class="summary-item-name">{name}</div>
                    <div class="summary-item-price">${price:.2}</div>
                </div>
            </div>"#,
                image = first_image(&item.images),
                name = item.name,
                price = item.price,
            )
        })
        .collect();

    let shipping = if totals.shipping_is_free() {
        "FREE".to_string()
    } else {
        format!("${:.2}", totals.shipping)
    };

    format!(
        r#"<div class="order-summary-items">{lines}</div>
        <div class="summary-row"><span>Subtotal</span><span>${subtotal:.2}</span></div>
        <div class="summary-row"><span>Tax</span><span>${tax:.2}</span></div>
        <div class="summary-row"><span>Shipping</span><span>{shipping}</span></div>
        <div class="summary-row summary-total"><span>Total</span><span>${total:.2}</span></div>"#,
        lines = lines,
        subtotal = totals.subtotal,
        tax = totals.tax,
        shipping = shipping,
        total = totals.total,
    )
}

pub(crate) fn empty_checkout() -> String {
    r#"<div class="checkout-empty">
        <p>Your cart is empty.</p>
        <a href="index.html" class="btn btn-primary">Continue Shopping</a>
    </div>"#
        .to_string()
}

/// Order confirmation panel shown after a successful settlement.
pub(crate) fn order_confirmation(order_id: &str, total: f64) -> String {
    format!(
        r#"<div class="order-confirmation">
        <h2>Thank you for your order!</h2>
        <p>Order <strong>{order_id}</strong> has been placed.</p>
        <p>Total charged: <strong>${total:.2}</strong></p>
        <a href="index.html" class="btn btn-primary">Back to Home</a>
    </div>"#,
    )
}
