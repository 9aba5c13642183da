//! Affiliate program signup.
//!
//! Commission terms (4% base, +1% per 10 confirmed sales, 30-day cookie,
//! weekly payouts) are presentation copy. Actual rates come from the
//! dashboard endpoint; nothing here computes them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{LuxeError, Result};
use crate::flow::{run_cancellable, FlowScope, TicketState};
use crate::rest::LuxeHttpClient;
use crate::types::{AffiliateDashboard, AffiliateSignupRequest};

pub const COMMISSION_TERMS: [&str; 4] = [
    "4% base commission per sale",
    "+1% bonus for every 10 confirmed sales",
    "30-day cookie tracking",
    "Weekly payouts available",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AffiliateState {
    #[default]
    Idle,
    Submitting,
    Submitted { affiliate_code: String },
}

#[derive(Debug, Default)]
struct Inner {
    state: AffiliateState,
    message: Option<String>,
    scope: FlowScope,
}

/// Affiliate modal controller.
#[derive(Debug)]
pub struct AffiliateFlow {
    http: Arc<LuxeHttpClient>,
    inner: Mutex<Inner>,
}

impl AffiliateFlow {
    pub fn new(http: Arc<LuxeHttpClient>) -> Self {
        Self {
            http,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Tie this flow's requests to `parent` as well.
    pub fn cancelled_with(self, parent: &tokio_util::sync::CancellationToken) -> Self {
        self.lock().scope = FlowScope::child_of(parent);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> AffiliateState {
        self.lock().state.clone()
    }

    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    pub fn close(&self) {
        let mut inner = self.lock();
        inner.scope.reset();
        inner.state = AffiliateState::Idle;
        inner.message = None;
    }

    /// Join the program; returns the assigned affiliate code.
    pub async fn submit(
        &self,
        email: impl Into<String>,
        paypal_email: impl Into<String>,
    ) -> Result<String> {
        let (previous, ticket) = {
            let mut inner = self.lock();
            if inner.state == AffiliateState::Submitting {
                return Err(LuxeError::Busy);
            }
            let previous = std::mem::replace(&mut inner.state, AffiliateState::Submitting);
            (previous, inner.scope.ticket())
        };
        let req = AffiliateSignupRequest {
            email: email.into(),
            paypal_email: paypal_email.into(),
        };
        tracing::info!(email = %req.email, "affiliate signup");

        let res = run_cancellable(ticket.token(), self.http.affiliate_signup(&req)).await;

        let mut inner = self.lock();
        match inner.scope.check(&ticket) {
            TicketState::Live => {}
            TicketState::Closed => return Err(LuxeError::Cancelled),
            TicketState::Aborted => {
                inner.state = previous;
                return Err(LuxeError::Cancelled);
            }
        }

        let res = res.and_then(|resp| match (resp.success, resp.affiliate_code) {
            (true, Some(code)) => Ok(code),
            _ => Err(LuxeError::Rejected(resp.message)),
        });
        match res {
            Ok(code) => {
                inner.message = Some(format!("Success! Your affiliate code is: {code}"));
                inner.state = AffiliateState::Submitted {
                    affiliate_code: code.clone(),
                };
                Ok(code)
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "affiliate signup failed");
                inner.message = Some(e.user_message());
                inner.state = AffiliateState::Idle;
                Err(e)
            }
        }
    }

    /// Read an affiliate's dashboard.
    pub async fn dashboard(&self, code: &str) -> Result<AffiliateDashboard> {
        self.http.get_affiliate(code).await
    }
}
