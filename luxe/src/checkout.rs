//! Checkout flow for a single product.
//!
//! Card orders go through `POST /api/order`. PayPal is offered for exactly
//! one product and is handled entirely by a [`HostedPaymentWidget`]; the
//! internal submit path refuses it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::{LuxeError, Result};
use crate::flow::{run_cancellable, FlowScope, ScopeTicket, TicketState};
use crate::rest::LuxeHttpClient;
use crate::types::{CardInfo, OrderRequest, PaymentMethod, Product};

/// The only product sold through the hosted PayPal button.
pub const PAYPAL_HOSTED_PRODUCT_ID: &str = "aes_002";

pub const ORDER_SUCCESS_MESSAGE: &str =
    "Order placed successfully! You will receive confirmation shortly.";
pub const ACCOUNT_DELIVERY_SUFFIX: &str =
    " Check your email within 10 minutes for account credentials.";
pub const ORDER_FAILURE_MESSAGE: &str = "Transaction failed. Please try again.";

/// Whether `product_id` may be paid through the hosted PayPal button.
pub fn paypal_eligible(product_id: &str) -> bool {
    product_id == PAYPAL_HOSTED_PRODUCT_ID
}

/// Message shown after an accepted order.
pub fn success_message(product: &Product) -> String {
    let mut message = ORDER_SUCCESS_MESSAGE.to_string();
    if product.is_account {
        message.push_str(ACCOUNT_DELIVERY_SUFFIX);
    }
    message
}

/// What a hosted widget needs to render itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedCheckout {
    pub product_id: String,
    pub button_id: String,
    pub container_id: String,
    /// Script that renders the button.
    pub sdk_url: String,
    /// Standalone payment page for clients that cannot embed the script.
    pub payment_url: String,
}

/// Third-party payment widget that replaces the internal submit path.
///
/// It only learns which product is being purchased.
pub trait HostedPaymentWidget: Send + Sync + std::fmt::Debug {
    fn render(&self, product_id: &str) -> HostedCheckout;
}

/// PayPal hosted button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaypalHostedButton {
    pub client_id: String,
    pub button_id: String,
}

impl Default for PaypalHostedButton {
    fn default() -> Self {
        Self {
            client_id: "BAAg1n9aB94U3n9jboHwjCR9R59zKGCUhjhYx25JZ9ILR1mEjHS6QyUO3MuV22QQfix7sM_Vi_WypvhyEc"
                .into(),
            button_id: "BXKHDQEVHPVNC".into(),
        }
    }
}

impl HostedPaymentWidget for PaypalHostedButton {
    fn render(&self, product_id: &str) -> HostedCheckout {
        HostedCheckout {
            product_id: product_id.to_string(),
            button_id: self.button_id.clone(),
            container_id: format!("paypal-container-{}", self.button_id),
            sdk_url: format!(
                "https://www.paypal.com/sdk/js?client-id={}&components=hosted-buttons&disable-funding=venmo&currency=USD",
                self.client_id
            ),
            payment_url: format!("https://www.paypal.com/ncp/payment/{}", self.button_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStatus {
    Editing,
    Submitting,
    Succeeded { message: String },
    Failed { message: String },
}

impl CheckoutStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            CheckoutStatus::Succeeded { message } | CheckoutStatus::Failed { message } => {
                Some(message)
            }
            CheckoutStatus::Editing | CheckoutStatus::Submitting => None,
        }
    }
}

/// Point-in-time copy for rendering. Card fields are not included.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSnapshot {
    pub product: Product,
    pub payment_method: PaymentMethod,
    pub status: CheckoutStatus,
    /// Submit button state.
    pub can_submit: bool,
}

#[derive(Debug)]
struct Inner {
    payment_method: PaymentMethod,
    card: CardInfo,
    affiliate_code: Option<String>,
    status: CheckoutStatus,
    scope: FlowScope,
}

/// Checkout modal controller.
#[derive(Debug)]
pub struct CheckoutFlow {
    http: Arc<LuxeHttpClient>,
    product: Product,
    widget: Arc<dyn HostedPaymentWidget>,
    inner: Mutex<Inner>,
}

impl CheckoutFlow {
    pub fn new(http: Arc<LuxeHttpClient>, product: Product) -> Self {
        Self::with_widget(http, product, Arc::new(PaypalHostedButton::default()))
    }

    pub fn with_widget(
        http: Arc<LuxeHttpClient>,
        product: Product,
        widget: Arc<dyn HostedPaymentWidget>,
    ) -> Self {
        Self {
            http,
            product,
            widget,
            inner: Mutex::new(Inner {
                payment_method: PaymentMethod::default(),
                card: CardInfo::default(),
                affiliate_code: None,
                status: CheckoutStatus::Editing,
                scope: FlowScope::new(),
            }),
        }
    }

    /// Tie this flow's requests to `parent` as well.
    pub fn cancelled_with(self, parent: &CancellationToken) -> Self {
        self.lock().scope = FlowScope::child_of(parent);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.lock().payment_method
    }

    /// Payment methods offered for this product.
    pub fn available_methods(&self) -> Vec<PaymentMethod> {
        if paypal_eligible(&self.product.id) {
            vec![PaymentMethod::Card, PaymentMethod::Paypal]
        } else {
            vec![PaymentMethod::Card]
        }
    }

    /// Select a payment method. Returns whether the selection took effect;
    /// PayPal is ignored for every product but the hosted-button one.
    pub fn select_payment_method(&self, method: PaymentMethod) -> bool {
        if method == PaymentMethod::Paypal && !paypal_eligible(&self.product.id) {
            tracing::debug!(product_id = %self.product.id, "paypal not offered for product");
            return false;
        }
        self.lock().payment_method = method;
        true
    }

    /// Replace the card form.
    pub fn set_card(&self, card: CardInfo) {
        self.lock().card = card;
    }

    /// Referral code sent with the order.
    pub fn set_affiliate_code(&self, code: Option<String>) {
        self.lock().affiliate_code = code.filter(|c| !c.trim().is_empty());
    }

    /// Hosted widget description when PayPal is selected.
    pub fn hosted_checkout(&self) -> Option<HostedCheckout> {
        (self.payment_method() == PaymentMethod::Paypal)
            .then(|| self.widget.render(&self.product.id))
    }

    pub fn snapshot(&self) -> CheckoutSnapshot {
        let inner = self.lock();
        CheckoutSnapshot {
            product: self.product.clone(),
            payment_method: inner.payment_method,
            can_submit: inner.payment_method == PaymentMethod::Card
                && inner.status != CheckoutStatus::Submitting
                && inner.card.is_complete(),
            status: inner.status.clone(),
        }
    }

    /// Cancel any pending order request and discard the card form.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.scope.reset();
        inner.card = CardInfo::default();
        inner.status = CheckoutStatus::Editing;
        tracing::debug!(product_id = %self.product.id, "checkout closed");
    }

    /// Place a card order.
    ///
    /// The card form is consumed by the attempt whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `HostedPaymentOnly` when PayPal is selected; nothing is sent.
    /// - `Busy` while a previous submission is pending; nothing is sent.
    /// - `InvalidState` when a card field is blank; nothing is sent.
    /// - `Cancelled` if the flow was closed mid-request, or the parent scope
    ///   was cancelled (status back to `Editing`).
    /// - Any API error; status becomes `Failed` with the generic message.
    pub async fn submit_order(&self) -> Result<String> {
        let (req, ticket) = self.begin()?;
        tracing::info!(
            product_id = %req.product_id,
            payment_method = %req.payment_method,
            "submitting order"
        );

        let res = run_cancellable(ticket.token(), self.http.create_order(&req)).await;
        drop(req);

        let mut inner = self.lock();
        match inner.scope.check(&ticket) {
            TicketState::Live => {}
            TicketState::Closed => return Err(LuxeError::Cancelled),
            TicketState::Aborted => {
                tracing::info!(product_id = %self.product.id, "order aborted");
                inner.status = CheckoutStatus::Editing;
                return Err(LuxeError::Cancelled);
            }
        }
        let res = res.and_then(|resp| {
            if resp.success {
                Ok(resp.order_id)
            } else {
                Err(LuxeError::Rejected(resp.message))
            }
        });
        match res {
            Ok(order_id) => {
                tracing::info!(product_id = %self.product.id, ?order_id, "order placed");
                let message = success_message(&self.product);
                inner.status = CheckoutStatus::Succeeded {
                    message: message.clone(),
                };
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(
                    product_id = %self.product.id,
                    error = %e,
                    kind = ?e.kind(),
                    "order failed"
                );
                inner.status = CheckoutStatus::Failed {
                    message: ORDER_FAILURE_MESSAGE.to_string(),
                };
                Err(e)
            }
        }
    }

    fn begin(&self) -> Result<(OrderRequest, ScopeTicket)> {
        let mut inner = self.lock();
        if inner.payment_method == PaymentMethod::Paypal {
            return Err(LuxeError::HostedPaymentOnly(PaymentMethod::Paypal.as_str()));
        }
        if inner.status == CheckoutStatus::Submitting {
            return Err(LuxeError::Busy);
        }
        if !inner.card.is_complete() {
            return Err(LuxeError::InvalidState("card details required"));
        }
        inner.status = CheckoutStatus::Submitting;
        let card = std::mem::take(&mut inner.card);
        let req = OrderRequest {
            product_id: self.product.id.clone(),
            payment_method: inner.payment_method,
            card_info: Some(card),
            affiliate_code: inner.affiliate_code.clone(),
        };
        Ok((req, inner.scope.ticket()))
    }
}
