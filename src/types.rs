use serde::{Deserialize, Serialize};

/// One product listing scraped from a shopping results page.
///
/// Every string field is always populated, possibly with "".
/// `title` and `price_and_seller` hold markup, not plain text.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub title: String,
    pub image_link: String,
    pub price_and_seller: String,
    pub shipping_price: String,
    pub link: String,
    // Only set for blocks that carry a rating slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

/// Products extracted from one results page, tagged with the query that
/// produced it.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingResult {
    pub query: String,
    pub products: Vec<Product>,
    pub scraped_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_json_uses_camel_case() {
        let product = Product {
            title: "<b>Nike</b> Shoes".to_string(),
            image_link: "https://img.example/1.jpg".to_string(),
            price_and_seller: "$10 from Shop".to_string(),
            shipping_price: "Free shipping".to_string(),
            link: "https://shop.example/item".to_string(),
            rating: None,
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["imageLink"], "https://img.example/1.jpg");
        assert_eq!(json["priceAndSeller"], "$10 from Shop");
        assert_eq!(json["shippingPrice"], "Free shipping");
        assert_eq!(json["title"], "<b>Nike</b> Shoes");
        assert!(json.get("rating").is_none(), "absent rating should be omitted");
    }

    #[test]
    fn test_product_json_keeps_rating_when_present() {
        let product = Product {
            title: String::new(),
            image_link: String::new(),
            price_and_seller: String::new(),
            shipping_price: String::new(),
            link: String::new(),
            rating: Some("4.5 stars".to_string()),
        };

        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
