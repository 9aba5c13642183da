//! Integration tests for JSON decoding of the storefront wire types.
//!
//! Fixtures mirror what the backend actually serves.

use luxe::types::*;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[test]
fn test_categories_decode() {
    let json = r#"{
        "aesthetic": {
            "name": "Aesthetic Products",
            "theme": "linear-gradient(135deg, #0f4c75 0%, #3282b8 50%, #bbe1fa 100%)",
            "description": "Luxury jewelry, watches, chains, bracelets, and glasses"
        },
        "clothes": {
            "name": "Designer Clothes",
            "theme": "linear-gradient(135deg, #3c1810 0%, #6b2c0e 50%, #a0652d 100%)",
            "description": "Premium fashion and designer apparel"
        },
        "social": {
            "name": "Social Media Growth",
            "theme": "linear-gradient(135deg, #6a4c93 0%, #9a8c98 50%, #f2e9e4 100%)",
            "description": "Instagram accounts and social media services"
        }
    }"#;

    let cats: Categories = serde_json::from_str(json).unwrap();
    assert_eq!(cats.len(), 3);
    assert_eq!(cats.get("clothes").unwrap().name, "Designer Clothes");
    assert!(cats.get("social").unwrap().theme.starts_with("linear-gradient"));
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[test]
fn test_products_decode_and_discount_invariant() {
    let json = r#"[
        {
            "id": "aes_001",
            "name": "Diamond Eternity Ring",
            "original_price": 185.5,
            "discount": 25,
            "final_price": 139.13,
            "image": "https://images.example/ring.jpg",
            "category": "aesthetic",
            "is_account": false,
            "verified": false
        },
        {
            "id": "soc_001",
            "name": "Instagram Account - 15K Followers (Verified)",
            "original_price": 150.0,
            "discount": 0,
            "final_price": 150.0,
            "image": "https://images.example/ig.jpg",
            "category": "social",
            "is_account": true,
            "verified": true
        }
    ]"#;

    let products: Vec<Product> = serde_json::from_str(json).unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].category.as_deref(), Some("aesthetic"));
    assert!(products[1].is_account);
    assert!(products[1].verified);

    for p in products.iter().filter(|p| p.has_discount()) {
        assert!(
            p.final_price < p.original_price,
            "{} final {} >= original {}",
            p.id,
            p.final_price,
            p.original_price
        );
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[test]
fn test_session_response_decode() {
    let json = r#"{"success": true, "session_token": "tok123", "message": "Login successful"}"#;
    let resp: SessionResponse = serde_json::from_str(json).unwrap();
    assert!(resp.success);
    assert_eq!(resp.session_token.as_deref(), Some("tok123"));
    assert!(!format!("{resp:?}").contains("tok123"));
}

#[test]
fn test_signup_response_without_message() {
    let resp: SignupResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.message, None);
}

#[test]
fn test_signup_request_field_names() {
    let req = SignupRequest {
        email: "a@b.com".into(),
        password: "x".into(),
        device_fingerprint: "f".into(),
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"email": "a@b.com", "password": "x", "device_fingerprint": "f"})
    );
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[test]
fn test_card_order_request_shape() {
    let req = OrderRequest {
        product_id: "p1".into(),
        payment_method: PaymentMethod::Card,
        card_info: Some(CardInfo {
            card_number: "4111111111111111".into(),
            expiry_month: "12".into(),
            expiry_year: "29".into(),
            cvv: "123".into(),
            cardholder_name: "Jane Doe".into(),
            save_card: true,
        }),
        affiliate_code: Some("LUX1234".into()),
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["payment_method"], "card");
    assert_eq!(value["card_info"]["expiry_year"], "29");
    assert_eq!(value["card_info"]["save_card"], true);
    assert_eq!(value["affiliate_code"], "LUX1234");
}

#[test]
fn test_order_response_decode() {
    let json = r#"{"success": true, "order_id": "3f1c", "message": "Order created successfully"}"#;
    let resp: OrderResponse = serde_json::from_str(json).unwrap();
    assert!(resp.success);
    assert_eq!(resp.order_id.as_deref(), Some("3f1c"));
}

// ---------------------------------------------------------------------------
// Affiliates
// ---------------------------------------------------------------------------

#[test]
fn test_affiliate_dashboard_decode() {
    let json = r#"{
        "affiliate_code": "LUX4821",
        "total_clicks": 40,
        "total_sales": 12,
        "commission_balance": 57.5,
        "current_commission_rate": 5.0,
        "withdrawal_history": []
    }"#;
    let dash: AffiliateDashboard = serde_json::from_str(json).unwrap();
    assert_eq!(dash.affiliate_code, "LUX4821");
    assert_eq!(dash.total_sales, 12);
    assert!((dash.current_commission_rate - 5.0).abs() < 1e-12);
    assert!(dash.withdrawal_history.is_empty());
}
