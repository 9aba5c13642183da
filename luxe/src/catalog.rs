use std::sync::Arc;

use crate::config::CatalogFailureMode;
use crate::error::{LuxeError, Result};
use crate::rest::LuxeHttpClient;
use crate::types::{Categories, Product};

/// What a catalog view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView<T> {
    Loading,
    Loaded(T),
    Empty,
    Failed { message: String, retryable: bool },
}

impl<T> CatalogView<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            CatalogView::Loaded(v) => Some(v),
            _ => None,
        }
    }
}

/// Read-only access to categories and products.
///
/// No retry and no caching: every call hits the API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Arc<LuxeHttpClient>,
    failure_mode: CatalogFailureMode,
}

impl CatalogClient {
    pub fn new(http: Arc<LuxeHttpClient>, failure_mode: CatalogFailureMode) -> Self {
        Self { http, failure_mode }
    }

    pub fn failure_mode(&self) -> CatalogFailureMode {
        self.failure_mode
    }

    pub async fn list_categories(&self) -> Result<Categories> {
        self.http.get_categories().await
    }

    pub async fn list_products(&self, category_key: &str) -> Result<Vec<Product>> {
        self.http.get_products(category_key).await
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Product> {
        self.http.get_product(product_id).await
    }

    /// Landing view: fetch categories and map the outcome to a view.
    pub async fn load_categories(&self) -> CatalogView<Categories> {
        let res = self.list_categories().await;
        self.to_view(res, "categories", Categories::is_empty)
    }

    /// Product grid for one category.
    pub async fn load_products(&self, category_key: &str) -> CatalogView<Vec<Product>> {
        let res = self.list_products(category_key).await;
        self.to_view(res, category_key, |p: &Vec<Product>| p.is_empty())
    }

    fn to_view<T>(
        &self,
        res: Result<T>,
        what: &str,
        is_empty: impl Fn(&T) -> bool,
    ) -> CatalogView<T> {
        match res {
            Ok(v) if is_empty(&v) => CatalogView::Empty,
            Ok(v) => CatalogView::Loaded(v),
            Err(e) => {
                tracing::warn!(what, error = %e, kind = ?e.kind(), "catalog fetch failed");
                self.failure_view(&e)
            }
        }
    }

    fn failure_view<T>(&self, err: &LuxeError) -> CatalogView<T> {
        match self.failure_mode {
            CatalogFailureMode::Silent => CatalogView::Empty,
            CatalogFailureMode::Surface => CatalogView::Failed {
                message: err.user_message(),
                retryable: err.is_retryable(),
            },
        }
    }
}
