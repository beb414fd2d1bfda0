//! Session Guard
//!
//! One classification function shared by every surface, so the login page and
//! the main page can never disagree about whether a session is usable.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::{Session, TokenStore};
use crate::models::Subject;
use crate::view::{Navigator, Surface};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unchecked,
    Valid(Session),
    Expired,
    Absent,
}

impl SessionState {
    pub fn is_valid(&self) -> bool {
        matches!(self, SessionState::Valid(_))
    }
}

pub fn classify(store: &dyn TokenStore, now: DateTime<Utc>) -> SessionState {
    match store.load() {
        None => SessionState::Absent,
        Some(session) if session.is_expired(now) => SessionState::Expired,
        Some(session) => SessionState::Valid(session),
    }
}

pub struct SessionGuard {
    store: Rc<dyn TokenStore>,
    navigator: Rc<dyn Navigator>,
    state: RefCell<SessionState>,
    redirected: Cell<bool>,
}

impl SessionGuard {
    pub fn new(store: Rc<dyn TokenStore>, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            state: RefCell::new(SessionState::Unchecked),
            redirected: Cell::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn store(&self) -> &Rc<dyn TokenStore> {
        &self.store
    }

    pub fn navigator(&self) -> &Rc<dyn Navigator> {
        &self.navigator
    }

    /// Has this page already been sent away?
    pub fn has_redirected(&self) -> bool {
        self.redirected.get()
    }

    /// Entry check of the main surface. `None` means the page is leaving and
    /// must not issue any request.
    pub fn require_session(&self, now: DateTime<Utc>) -> Option<Session> {
        let state = classify(self.store.as_ref(), now);
        debug!("session check on main surface: {:?}", StateName(&state));
        match state {
            SessionState::Valid(session) => {
                *self.state.borrow_mut() = SessionState::Valid(session.clone());
                Some(session)
            }
            other => {
                self.leave(other);
                None
            }
        }
    }

    /// Entry check of the login and register surfaces. Returns `true` when the
    /// page was sent to the main surface.
    pub fn redirect_if_authenticated(&self, now: DateTime<Utc>) -> bool {
        let state = classify(self.store.as_ref(), now);
        debug!("session check on public surface: {:?}", StateName(&state));
        match state {
            SessionState::Valid(session) => {
                *self.state.borrow_mut() = SessionState::Valid(session);
                self.navigate_once(Surface::Main)
            }
            SessionState::Expired => {
                self.store.clear();
                *self.state.borrow_mut() = SessionState::Expired;
                false
            }
            other => {
                *self.state.borrow_mut() = other;
                false
            }
        }
    }

    /// The server rejected the credential, or there is none to send.
    pub fn invalidate(&self) {
        self.leave(SessionState::Absent);
    }

    /// Cache a subject resolved after page load.
    pub fn remember_subject(&self, subject: Subject) {
        let mut state = self.state.borrow_mut();
        if let SessionState::Valid(session) = &mut *state {
            session.subject = Some(subject);
            if let Err(e) = self.store.save(session) {
                log::warn!("failed to cache profile: {e}");
            }
        }
    }

    fn leave(&self, state: SessionState) {
        self.store.clear();
        {
            let mut current = self.state.borrow_mut();
            if !matches!(*current, SessionState::Expired) {
                *current = state;
            }
        }
        self.navigate_once(Surface::Login);
    }

    fn navigate_once(&self, surface: Surface) -> bool {
        if self.redirected.replace(true) {
            debug!("redirect to {surface:?} suppressed, already navigating");
            return true;
        }
        info!("redirecting to {surface:?}");
        self.navigator.redirect(surface);
        true
    }
}

/// Debug form without the credential.
struct StateName<'a>(&'a SessionState);

impl std::fmt::Debug for StateName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self.0 {
            SessionState::Unchecked => "Unchecked",
            SessionState::Valid(_) => "Valid",
            SessionState::Expired => "Expired",
            SessionState::Absent => "Absent",
        })
    }
}
