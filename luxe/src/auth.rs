//! Signup / verification / login flow.
//!
//! ```text
//! Anonymous(signup) --submit--> Submitting(Signup) --ok--> AwaitingVerification
//! AwaitingVerification --submit--> Submitting(Verify) --ok--> Authenticated
//! Anonymous(login) --submit--> Submitting(Login) --ok--> Authenticated
//! ```
//!
//! A failed submission returns to the stage it started from with the error
//! message set. Only verification and login write to the [`SessionStore`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::device::DeviceSignal;
use crate::error::{LuxeError, Result};
use crate::flow::{run_cancellable, FlowScope, ScopeTicket, TicketState};
use crate::rest::LuxeHttpClient;
use crate::session::SessionStore;
use crate::types::{LoginRequest, SessionResponse, SignupRequest, VerifyEmailRequest};

pub const VERIFICATION_SENT_MESSAGE: &str = "Check your email for verification code";

/// Which form the anonymous user is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Signup,
    Login,
}

/// Request currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Signup,
    Verify,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Anonymous(AuthMode),
    Submitting(AuthAction),
    AwaitingVerification,
    Authenticated,
}

impl Default for AuthStage {
    fn default() -> Self {
        AuthStage::Anonymous(AuthMode::default())
    }
}

/// Form fields shared by every stage.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub verification_code: String,
}

impl std::fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("verification_code", &self.verification_code)
            .finish()
    }
}

/// Point-in-time copy of the flow for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub visible: bool,
    pub stage: AuthStage,
    pub form: AuthForm,
    pub message: Option<String>,
}

/// Result of a successful [`AuthFlow::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    VerificationSent,
    Authenticated,
}

#[derive(Debug, Default)]
struct Inner {
    visible: bool,
    stage: AuthStage,
    form: AuthForm,
    message: Option<String>,
    scope: FlowScope,
}

/// Auth modal controller.
#[derive(Debug)]
pub struct AuthFlow {
    http: Arc<LuxeHttpClient>,
    session: Arc<SessionStore>,
    device: Arc<DeviceSignal>,
    inner: Mutex<Inner>,
}

impl AuthFlow {
    pub fn new(
        http: Arc<LuxeHttpClient>,
        session: Arc<SessionStore>,
        device: Arc<DeviceSignal>,
    ) -> Self {
        Self {
            http,
            session,
            device,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Flow whose requests are also cancelled when `parent` is.
    pub fn with_parent(
        http: Arc<LuxeHttpClient>,
        session: Arc<SessionStore>,
        device: Arc<DeviceSignal>,
        parent: &CancellationToken,
    ) -> Self {
        let flow = Self::new(http, session, device);
        flow.lock().scope = FlowScope::child_of(parent);
        flow
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock, dropping a stale `Authenticated` stage once the session has
    /// been cleared elsewhere (e.g. logout).
    fn synced(&self) -> MutexGuard<'_, Inner> {
        let mut inner = self.lock();
        if inner.stage == AuthStage::Authenticated && !self.session.is_authenticated() {
            tracing::debug!("session gone, auth flow back to anonymous");
            inner.stage = AuthStage::default();
        }
        inner
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        let inner = self.synced();
        AuthSnapshot {
            visible: inner.visible,
            stage: inner.stage,
            form: inner.form.clone(),
            message: inner.message.clone(),
        }
    }

    pub fn stage(&self) -> AuthStage {
        self.synced().stage
    }

    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    /// Show the flow.
    pub fn open(&self) {
        self.synced().visible = true;
    }

    /// Hide the flow, cancel any pending request and discard form state.
    ///
    /// The session is untouched.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.scope.reset();
        inner.visible = false;
        inner.form = AuthForm::default();
        inner.message = None;
        if inner.stage != AuthStage::Authenticated || !self.session.is_authenticated() {
            inner.stage = AuthStage::default();
        }
        tracing::debug!("auth flow closed");
    }

    /// Switch between login and signup; only meaningful while anonymous.
    pub fn toggle_mode(&self) {
        let mut inner = self.synced();
        if let AuthStage::Anonymous(mode) = inner.stage {
            inner.stage = AuthStage::Anonymous(match mode {
                AuthMode::Signup => AuthMode::Login,
                AuthMode::Login => AuthMode::Signup,
            });
        }
    }

    /// Jump straight to code entry for an account created earlier.
    pub fn resume_verification(&self, email: impl Into<String>) -> Result<()> {
        let mut inner = self.synced();
        match inner.stage {
            AuthStage::Anonymous(_) | AuthStage::AwaitingVerification => {
                inner.form.email = email.into();
                inner.stage = AuthStage::AwaitingVerification;
                inner.visible = true;
                Ok(())
            }
            AuthStage::Submitting(_) => Err(LuxeError::Busy),
            AuthStage::Authenticated => Err(LuxeError::InvalidState("already authenticated")),
        }
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.lock().form.email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        self.lock().form.password = password.into();
    }

    pub fn set_verification_code(&self, code: impl Into<String>) {
        self.lock().form.verification_code = code.into();
    }

    /// Submit whatever the current stage asks for.
    ///
    /// # Errors
    ///
    /// - `Busy` if a submission is already pending (no request is issued).
    /// - `Cancelled` if the flow was closed while the request was pending
    ///   (the flow state is left as `close` set it) or the parent scope was
    ///   cancelled (the stage reverts).
    /// - Any API error; the stage reverts and the message is set.
    pub async fn submit(&self) -> Result<AuthOutcome> {
        let (action, form, ticket) = self.begin()?;
        tracing::info!(?action, email = %form.email, "auth submit");

        let res = run_cancellable(ticket.token(), self.send(action, &form)).await;

        let mut inner = self.lock();
        match inner.scope.check(&ticket) {
            TicketState::Live => {}
            TicketState::Closed => return Err(LuxeError::Cancelled),
            TicketState::Aborted => {
                tracing::info!(?action, "auth submit aborted");
                inner.stage = restore_stage(action);
                return Err(LuxeError::Cancelled);
            }
        }
        match res {
            Ok(Sent::VerificationSent) => {
                inner.stage = AuthStage::AwaitingVerification;
                inner.message = Some(VERIFICATION_SENT_MESSAGE.to_string());
                Ok(AuthOutcome::VerificationSent)
            }
            Ok(Sent::Token(session_token)) => {
                if let Err(e) = self.session.set(session_token) {
                    inner.stage = restore_stage(action);
                    inner.message = Some(e.user_message());
                    return Err(e);
                }
                inner.stage = AuthStage::Authenticated;
                inner.visible = false;
                inner.message = None;
                inner.form = AuthForm::default();
                tracing::info!(?action, "authenticated");
                Ok(AuthOutcome::Authenticated)
            }
            Err(e) => {
                tracing::warn!(?action, error = %e, kind = ?e.kind(), "auth submit failed");
                inner.stage = restore_stage(action);
                inner.message = Some(e.user_message());
                Err(e)
            }
        }
    }

    fn begin(&self) -> Result<(AuthAction, AuthForm, ScopeTicket)> {
        let mut inner = self.synced();
        let action = match inner.stage {
            AuthStage::Anonymous(AuthMode::Signup) => AuthAction::Signup,
            AuthStage::Anonymous(AuthMode::Login) => AuthAction::Login,
            AuthStage::AwaitingVerification => AuthAction::Verify,
            AuthStage::Submitting(_) => return Err(LuxeError::Busy),
            AuthStage::Authenticated => {
                return Err(LuxeError::InvalidState("already authenticated"))
            }
        };
        inner.stage = AuthStage::Submitting(action);
        Ok((action, inner.form.clone(), inner.scope.ticket()))
    }

    async fn send(&self, action: AuthAction, form: &AuthForm) -> Result<Sent> {
        match action {
            AuthAction::Signup => {
                let req = SignupRequest {
                    email: form.email.clone(),
                    password: form.password.clone(),
                    device_fingerprint: self.device.generate(),
                };
                let resp = self.http.signup(&req).await?;
                if !resp.success {
                    return Err(LuxeError::Rejected(resp.message));
                }
                Ok(Sent::VerificationSent)
            }
            AuthAction::Login => {
                let req = LoginRequest {
                    email: form.email.clone(),
                    password: form.password.clone(),
                    device_fingerprint: self.device.generate(),
                };
                token_from(self.http.login(&req).await?)
            }
            AuthAction::Verify => {
                let req = VerifyEmailRequest {
                    email: form.email.clone(),
                    verification_code: form.verification_code.trim().to_string(),
                };
                token_from(self.http.verify_email(&req).await?)
            }
        }
    }
}

enum Sent {
    VerificationSent,
    Token(String),
}

fn token_from(resp: SessionResponse) -> Result<Sent> {
    match (resp.success, resp.session_token) {
        (true, Some(token)) if !token.is_empty() => Ok(Sent::Token(token)),
        (_, _) => Err(LuxeError::Rejected(resp.message)),
    }
}

fn restore_stage(action: AuthAction) -> AuthStage {
    match action {
        AuthAction::Signup => AuthStage::Anonymous(AuthMode::Signup),
        AuthAction::Login => AuthStage::Anonymous(AuthMode::Login),
        AuthAction::Verify => AuthStage::AwaitingVerification,
    }
}
