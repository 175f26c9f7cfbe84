//! What a strategy may touch while handling an event.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use horizon_select_core::logging::targets;
use horizon_select_core::{TimerId, TimerManager};

use crate::config::SelectConfig;
use crate::platform::Environment;
use crate::source::SourceList;
use crate::ui::{FocusHost, FocusTarget, SelectUi};

/// Why a session timer was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// Marks the control unfocused after a blur that was not followed by a focus.
    BlurDebounce,
    /// Clears the typeahead buffer after idle time.
    TypeaheadReset,
}

/// Liveness flag of one broker session.
///
/// Revoked on unmount and on strategy swap; anything still holding a clone
/// can tell its session is gone.
#[derive(Debug, Clone)]
pub struct SessionToken(Arc<AtomicBool>);

impl SessionToken {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Payload of a timer owned by a broker session.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    pub purpose: TimerPurpose,
    pub token: SessionToken,
}

/// Per-session state shared by every strategy.
#[derive(Debug)]
pub struct SessionState {
    pub(crate) open: bool,
    pub(crate) focused: bool,
    /// Focus to re-assert on the next [`advance`](crate::broker::Broker::advance).
    pub(crate) pending_focus: Option<FocusTarget>,
    pub(crate) token: SessionToken,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            open: false,
            focused: false,
            pending_focus: None,
            token: SessionToken::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn pending_focus(&self) -> Option<FocusTarget> {
        self.pending_focus
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}

/// Borrowed view of the broker handed to strategy callbacks.
pub struct BrokerContext<'a> {
    pub list: &'a SourceList,
    pub ui: &'a mut dyn SelectUi,
    pub focus: &'a mut dyn FocusHost,
    pub session: &'a mut SessionState,
    pub timers: &'a mut TimerManager<SessionTimer>,
    pub env: &'a Environment,
    pub config: &'a SelectConfig,
    /// Time of the event being handled.
    pub now: Instant,
}

impl BrokerContext<'_> {
    pub fn is_open(&self) -> bool {
        self.session.open
    }

    pub fn is_focused(&self) -> bool {
        self.session.focused
    }

    /// Record the open state and show or hide the dropdown.
    pub fn set_open(&mut self, open: bool) {
        if self.session.open != open {
            tracing::trace!(target: targets::BROKER, open, "open state changed");
        }
        self.session.open = open;
        self.ui.set_open(open);
    }

    /// Record the focus state and update the focus indication.
    pub fn set_focus(&mut self, focused: bool) {
        self.session.focused = focused;
        self.ui.set_focus(focused);
    }

    /// Start a timer for `purpose`, replacing any pending one.
    ///
    /// Returns `None` if the deadline is out of range; the timer then never
    /// fires.
    pub fn start_timer(&mut self, purpose: TimerPurpose, duration: Duration) -> Option<TimerId> {
        self.cancel_timer(purpose);
        let timer = SessionTimer {
            purpose,
            token: self.session.token.clone(),
        };
        match self.timers.start_one_shot(self.now, duration, timer) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(target: targets::BROKER, ?purpose, ?duration, %err, "session timer not started");
                None
            }
        }
    }

    /// Cancel the pending timer for `purpose`. Returns whether one existed.
    pub fn cancel_timer(&mut self, purpose: TimerPurpose) -> bool {
        self.timers.stop_where(|timer| timer.purpose == purpose) > 0
    }

    /// Re-assert focus on `target` once pending platform events settled.
    pub fn request_focus_intent(&mut self, target: FocusTarget) {
        self.session.pending_focus = Some(target);
    }

    /// Move platform focus to `target` unless it is already there.
    pub fn ensure_focus(&mut self, target: FocusTarget) {
        if self.focus.focused() != Some(target) {
            self.focus.focus(target);
        }
    }
}
