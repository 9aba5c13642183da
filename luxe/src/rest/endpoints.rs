use crate::error::Result;
use crate::rest::LuxeHttpClient;
use crate::types::*;

impl LuxeHttpClient {
    // --- Status ---

    /// GET / - API banner.
    pub async fn get_status(&self) -> Result<ApiStatus> {
        self.get("/").await
    }

    // --- Catalog ---

    /// GET /categories - Category key -> category.
    pub async fn get_categories(&self) -> Result<Categories> {
        self.get("/categories").await
    }

    /// GET /products/{category} - Products in a category, in server order.
    pub async fn get_products(&self, category: &str) -> Result<Vec<Product>> {
        self.get_segments(&["products", category]).await
    }

    /// GET /product/{product_id} - A single product.
    pub async fn get_product(&self, product_id: &str) -> Result<Product> {
        self.get_segments(&["product", product_id]).await
    }

    // --- Auth ---

    /// POST /signup - Create an account and dispatch a verification email.
    pub async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse> {
        self.post("/signup", req).await
    }

    /// POST /login - Exchange credentials for a session token.
    pub async fn login(&self, req: &LoginRequest) -> Result<SessionResponse> {
        self.post("/login", req).await
    }

    /// POST /verify-email - Exchange a verification code for a session token.
    pub async fn verify_email(&self, req: &VerifyEmailRequest) -> Result<SessionResponse> {
        self.post("/verify-email", req).await
    }

    // --- Orders ---

    /// POST /order - Place an order.
    pub async fn create_order(&self, req: &OrderRequest) -> Result<OrderResponse> {
        self.post("/order", req).await
    }

    // --- Affiliates ---

    /// POST /affiliate/signup - Join the affiliate program.
    pub async fn affiliate_signup(
        &self,
        req: &AffiliateSignupRequest,
    ) -> Result<AffiliateSignupResponse> {
        self.post("/affiliate/signup", req).await
    }

    /// GET /affiliate/{code} - Affiliate dashboard.
    pub async fn get_affiliate(&self, code: &str) -> Result<AffiliateDashboard> {
        self.get_segments(&["affiliate", code]).await
    }
}
