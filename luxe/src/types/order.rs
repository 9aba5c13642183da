use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Paypal => "paypal",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card details for a single order submission. Never persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub cardholder_name: String,
    pub save_card: bool,
}

impl Default for CardInfo {
    fn default() -> Self {
        Self {
            card_number: String::new(),
            expiry_month: String::new(),
            expiry_year: String::new(),
            cvv: String::new(),
            cardholder_name: String::new(),
            save_card: true,
        }
    }
}

impl CardInfo {
    /// Every field the order form requires is filled in.
    pub fn is_complete(&self) -> bool {
        [
            &self.card_number,
            &self.expiry_month,
            &self.expiry_year,
            &self.cvv,
            &self.cardholder_name,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Last four digits, for display.
    pub fn last4(&self) -> &str {
        let digits = self.card_number.trim();
        let start = digits
            .char_indices()
            .rev()
            .nth(3)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &digits[start..]
    }
}

impl std::fmt::Debug for CardInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardInfo")
            .field("card_number", &format_args!("****{}", self.last4()))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"***")
            .field("cardholder_name", &self.cardholder_name)
            .field("save_card", &self.save_card)
            .finish()
    }
}

/// `POST /api/order` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub product_id: String,
    pub payment_method: PaymentMethod,
    /// Present only for card payments; serialized as `null` otherwise.
    pub card_info: Option<CardInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
