use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A storefront category as served by `GET /api/categories`.
///
/// The key is not part of the body; it is the map key of [`Categories`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: String,
    /// Style descriptor (a CSS gradient on the web storefront).
    pub theme: String,
}

/// Category key -> category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories(pub BTreeMap<String, Category>);

impl Categories {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.0.get(key)
    }

    /// `(key, category)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A product listing entry.
///
/// `final_price` is computed by the server and used as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub image: String,
    pub original_price: f64,
    /// Percentage off, 0-100.
    pub discount: u8,
    pub final_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub verified: bool,
    /// Social-media account products; credentials are delivered by email.
    #[serde(default)]
    pub is_account: bool,
}

impl Product {
    pub fn has_discount(&self) -> bool {
        self.discount > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_optional_flags_default_false() {
        let json = r#"{
            "id": "p1",
            "name": "Ring",
            "image": "https://img.example/ring.jpg",
            "original_price": 100.0,
            "discount": 0,
            "final_price": 100.0
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(!product.verified);
        assert!(!product.is_account);
        assert!(!product.has_discount());
        assert_eq!(product.category, None);
    }

    #[test]
    fn test_categories_iterate_in_key_order() {
        let json = r#"{
            "social": {"name": "Social", "description": "s", "theme": "t"},
            "aesthetic": {"name": "Aesthetic", "description": "a", "theme": "t"}
        }"#;
        let cats: Categories = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = cats.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["aesthetic", "social"]);
        assert_eq!(cats.get("social").unwrap().name, "Social");
    }
}
