//! Login and Registration Flows

use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::api::{status_message, WarehouseApi};
use crate::error::ApiError;
use crate::models::Subject;
use crate::session::{Session, SessionGuard};
use crate::validation::{LoginForm, RegisterForm};
use crate::view::{Alert, AlertSink, AlertSlot, Surface};

const BAD_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthFlow {
    api: Rc<WarehouseApi>,
    alerts: Rc<dyn AlertSink>,
}

impl AuthFlow {
    pub fn new(api: Rc<WarehouseApi>, alerts: Rc<dyn AlertSink>) -> Self {
        Self { api, alerts }
    }

    fn guard(&self) -> &Rc<SessionGuard> {
        self.api.gateway().guard()
    }

    /// Entry check of the login and register pages. `false` means the page
    /// is leaving for the main surface.
    pub fn enter(&self, now: DateTime<Utc>) -> bool {
        !self.guard().redirect_if_authenticated(now)
    }

    fn error(&self, slot: AlertSlot, message: impl Into<String>) {
        let timeout = self.api.config().alert_timeout_ms;
        self.alerts.show_alert(slot, Alert::error(message, timeout));
    }

    /// Returns `true` once the session is stored and the redirect scheduled.
    pub async fn login(&self, form: &LoginForm) -> bool {
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.error(AlertSlot::Login, e.to_string());
                return false;
            }
        };

        let data = match self.api.login(&request).await {
            Ok(data) => data,
            Err(ApiError::Domain { status, message }) => {
                let message = if message == status_message(status) {
                    BAD_CREDENTIALS.to_string()
                } else {
                    message
                };
                self.error(AlertSlot::Login, message);
                return false;
            }
            Err(e) => {
                warn!("login request failed: {e}");
                self.error(AlertSlot::Login, e.user_message());
                return false;
            }
        };

        let session = Session::from_credential(data.token).with_subject(Subject {
            username: data.username,
            role: data.role,
        });
        if let Err(e) = self.guard().store().save(&session) {
            warn!("failed to store session: {e}");
            self.error(AlertSlot::Login, format!("Could not save the session: {e}"));
            return false;
        }

        info!("logged in as {}", request.username);
        let config = self.api.config();
        self.alerts.show_alert(
            AlertSlot::Login,
            Alert::success("Signed in. Redirecting...", config.alert_timeout_ms),
        );
        self.guard()
            .navigator()
            .redirect_after(Surface::Main, config.login_redirect_delay_ms);
        true
    }

    pub async fn register(&self, form: &RegisterForm) -> bool {
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.error(AlertSlot::Register, e.to_string());
                return false;
            }
        };

        if let Err(e) = self.api.register(&request).await {
            warn!("registration failed: {e}");
            self.error(AlertSlot::Register, e.user_message());
            return false;
        }

        info!("registered {} as {}", request.username, request.role);
        let config = self.api.config();
        self.alerts.show_alert(
            AlertSlot::Register,
            Alert::success(
                "Registration successful. Redirecting to sign in...",
                config.success_alert_timeout_ms,
            ),
        );
        self.guard()
            .navigator()
            .redirect_after(Surface::Login, config.register_redirect_delay_ms);
        true
    }
}
