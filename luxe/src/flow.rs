//! Lifetime scoping shared by the flow controllers.
//!
//! Every open flow instance owns a [`CancellationToken`]. Closing the flow
//! cancels it, so a request still pending for a closed view resolves as
//! [`LuxeError::Cancelled`] instead of writing into state nobody displays.
//!
//! A submission holds a [`ScopeTicket`]. When the response comes back the
//! flow re-checks the ticket while holding its state lock: a ticket from an
//! earlier generation means the flow was closed (state already reset), a
//! cancelled ticket of the current generation means the parent was
//! cancelled and the flow must undo its `Submitting` marker itself.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{LuxeError, Result};

/// Cancellation scope of one flow instance.
#[derive(Debug, Default)]
pub struct FlowScope {
    parent: Option<CancellationToken>,
    token: CancellationToken,
    generation: u64,
}

/// Handle on the scope generation a submission started in.
#[derive(Debug, Clone)]
pub struct ScopeTicket {
    token: CancellationToken,
    generation: u64,
}

impl ScopeTicket {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// How a finished request relates to the flow that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketState {
    /// Still the live submission; apply the outcome.
    Live,
    /// The flow was closed; its state is already reset.
    Closed,
    /// The parent scope was cancelled; the flow is otherwise untouched.
    Aborted,
}

impl FlowScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope cancelled together with `parent` (e.g. process shutdown).
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self {
            parent: Some(parent.clone()),
            token: parent.child_token(),
            generation: 0,
        }
    }

    pub fn ticket(&self) -> ScopeTicket {
        ScopeTicket {
            token: self.token.clone(),
            generation: self.generation,
        }
    }

    /// Classify `ticket`; call with the flow state locked.
    pub fn check(&self, ticket: &ScopeTicket) -> TicketState {
        if ticket.generation != self.generation {
            TicketState::Closed
        } else if ticket.is_cancelled() {
            TicketState::Aborted
        } else {
            TicketState::Live
        }
    }

    /// Cancel this scope and start a fresh one for the next instance.
    pub fn reset(&mut self) {
        self.token.cancel();
        self.generation += 1;
        self.token = match &self.parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
    }
}

/// Drive `fut` unless `token` is cancelled first.
pub async fn run_cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(LuxeError::Cancelled),
        res = fut => res,
    }
}
