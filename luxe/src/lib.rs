pub mod affiliate;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod flow;
pub mod rest;
pub mod session;
pub mod types;

// ---- Top-level re-exports for ergonomic usage ----

// Client + config
pub use client::Luxe;
pub use config::{CatalogFailureMode, LuxeConfig};
pub use error::{ErrorKind, LuxeError, Result};

// REST client
pub use rest::LuxeHttpClient;

// Session
pub use session::{FileSessionStorage, MemorySessionStorage, Session, SessionStorage, SessionStore};

// Device signal
pub use device::{DeviceSource, DeviceSignal, SystemSource};

// Catalog
pub use catalog::{CatalogClient, CatalogView};

// Flows
pub use affiliate::{AffiliateFlow, AffiliateState};
pub use auth::{AuthFlow, AuthMode, AuthOutcome, AuthStage};
pub use checkout::{CheckoutFlow, CheckoutStatus, HostedCheckout, HostedPaymentWidget, PaypalHostedButton};
pub use flow::FlowScope;

// Wire types
pub use types::{
    AffiliateDashboard, ApiStatus, Categories, Category, CardInfo, OrderRequest, PaymentMethod,
    Product,
};
