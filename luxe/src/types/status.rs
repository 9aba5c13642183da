use serde::{Deserialize, Serialize};

/// `GET /api/` banner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    pub message: String,
}
