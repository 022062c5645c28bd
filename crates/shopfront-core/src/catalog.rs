//! Product catalog model and price-list merging.
//!
//! The catalog is a JSON product list plus a CSV price override list.
//! A product whose id appears in the price map takes the CSV price;
//! everything else keeps its embedded price.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::review::RatingDistribution;

lazy_static! {
    // A price row is `id,description,price` where the description may
    // itself contain commas, so the price is the final well-formed
    // decimal field rather than the result of a naive split.
    static ref PRICE_ROW: Regex = Regex::new(r"^([^,]+),(.+),(\d+\.\d+)$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub model: Option<String>,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub rating_distribution: Option<RatingDistribution>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub price: f64,
}

/// Parse the product JSON source.
pub fn parse_products(json: &str) -> Result<Vec<Product>, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::Parse(format!("product catalog: {}", e)))
}

/// Parse the CSV price override list. The header row and any malformed
/// row are skipped; this source degrades quietly by design.
pub fn parse_price_list(csv: &str) -> HashMap<String, f64> {
    let mut prices = HashMap::new();
    for line in csv.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = PRICE_ROW.captures(line) {
            if let Ok(price) = caps[3].parse::<f64>() {
                prices.insert(caps[1].trim().to_string(), price);
            }
        }
    }
    prices
}

/// Overwrite embedded prices with CSV overrides where present.
pub fn merge_prices(products: &mut [Product], prices: &HashMap<String, f64>) {
    for product in products.iter_mut() {
        if let Some(&price) = prices.get(&product.id) {
            product.price = price;
        }
    }
}

/// Look up a product by id.
pub fn find_product<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            brand: "Brand".to_string(),
            model: None,
            category: "Kitchen".to_string(),
            description: "A product".to_string(),
            rating: None,
            review_count: None,
            rating_distribution: None,
            images: vec![],
            price,
        }
    }

    #[test]
    fn test_price_row_with_embedded_commas() {
        let prices = parse_price_list("id,description,price\nX,\"Name, with comma\",12.50\n");
        assert_eq!(prices.get("X"), Some(&12.50));
    }

    #[test]
    fn test_price_override_wins_over_embedded() {
        let mut products = vec![product("X", 10.00), product("Y", 20.00)];
        let prices = parse_price_list("id,description,price\nX,\"Name, with comma\",12.50\n");
        merge_prices(&mut products, &prices);
        assert_eq!(products[0].price, 12.50);
        assert_eq!(products[1].price, 20.00); // no override row, embedded kept
    }

    #[test]
    fn test_malformed_price_rows_skipped() {
        let csv = "id,description,price\nA,no price here\nB,missing decimal,12\nC,ok,5.99\n";
        let prices = parse_price_list(csv);
        assert_eq!(prices.len(), 1);
        assert_eq!(prices.get("C"), Some(&5.99));
    }

    #[test]
    fn test_header_row_not_treated_as_data() {
        let prices = parse_price_list("id,description,price\n");
        assert!(prices.is_empty());
    }

    #[test]
    fn test_parse_products_camel_case_fields() {
        let json = r#"[{
            "id": "kettle-1",
            "name": "Electric Kettle",
            "brand": "Acme",
            "model": "EK-100",
            "category": "Kitchen",
            "description": "Boils water",
            "rating": 4.6,
            "reviewCount": 1834,
            "ratingDistribution": {"5": 72, "4": 18, "3": 6, "2": 2, "1": 2},
            "images": ["a.jpg", "b.jpg"],
            "price": 39.99
        }]"#;
        let products = parse_products(json).unwrap();
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.review_count, Some(1834));
        let dist = p.rating_distribution.as_ref().unwrap();
        assert_eq!(dist.pct(5), 72.0);
        assert_eq!(p.images.len(), 2);
    }

    #[test]
    fn test_parse_products_optional_fields_absent() {
        let json = r#"[{
            "id": "plain-1",
            "name": "Plain",
            "brand": "Acme",
            "category": "Misc",
            "description": "No extras",
            "price": 5.00
        }]"#;
        let products = parse_products(json).unwrap();
        let p = &products[0];
        assert!(p.rating.is_none());
        assert!(p.rating_distribution.is_none());
        assert!(p.images.is_empty());
    }

    #[test]
    fn test_parse_products_malformed_is_error() {
        assert!(parse_products("not json").is_err());
    }

    #[test]
    fn test_find_product() {
        let products = vec![product("a", 1.0), product("b", 2.0)];
        assert!(find_product(&products, "b").is_some());
        assert!(find_product(&products, "zzz").is_none());
    }
}
