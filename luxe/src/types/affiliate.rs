use serde::{Deserialize, Serialize};

/// `POST /api/affiliate/signup` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateSignupRequest {
    pub email: String,
    /// Payout address.
    pub paypal_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateSignupResponse {
    pub success: bool,
    #[serde(default)]
    pub affiliate_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/affiliate/{code}`.
///
/// Rates and balances are reported by the server; the client does not
/// derive them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateDashboard {
    pub affiliate_code: String,
    pub total_clicks: u64,
    pub total_sales: u64,
    pub commission_balance: f64,
    pub current_commission_rate: f64,
    #[serde(default)]
    pub withdrawal_history: Vec<serde_json::Value>,
}
