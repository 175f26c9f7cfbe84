//! Per-instance coordinator owning the active behavior strategy.
//!
//! The [`Broker`] picks a strategy from its [`StrategyRegistry`], routes every
//! event to it with a [`BrokerContext`] and swaps it when the list's
//! capabilities change. It owns the session state (open, focused, pending
//! focus intent) and the session timers.
//!
//! # Sessions
//!
//! Each mounted strategy runs in a session identified by a [`SessionToken`].
//! Unmounting or swapping the strategy revokes the token and stops the
//! session's timers. A timer carrying a revoked token that still reaches
//! [`Broker::advance`] is dropped.
//!
//! # Focus intents
//!
//! Pointer-down handlers move focus synchronously and record a pending
//! focus intent. The host delivers the platform's blur/focus churn and then
//! calls [`Broker::advance`], which resolves the intent before firing timers,
//! so a blur caused by the pointer-down never closes the widget.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use horizon_select_core::logging::{span_names, targets};
use horizon_select_core::TimerManager;

use crate::accessibility::AttributeMap;
use crate::config::SelectConfig;
use crate::error::Result;
use crate::events::{DocumentEvent, EventDisposition, KeyPressEvent, UiEvent};
use crate::platform::Environment;
use crate::source::{MutationFilter, ObservedBatch, SourceList};
use crate::strategy::{
    BehaviorStrategy, BrokerContext, ManagedAriaUi, SessionState, SessionTimer, StrategyInit,
    StrategyKind, StrategyRegistry, TimerPurpose,
};
use crate::ui::{FocusHost, FocusTarget, SelectUi};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique widget instance id.
pub(crate) fn next_instance_id() -> u64 {
    NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

pub struct Broker {
    registry: StrategyRegistry,
    strategy: Option<Box<dyn BehaviorStrategy>>,
    session: SessionState,
    timers: TimerManager<SessionTimer>,
    list: SourceList,
    ui: Box<dyn SelectUi>,
    focus: Box<dyn FocusHost>,
    env: Environment,
    config: SelectConfig,
    instance: u64,
}

impl std::fmt::Debug for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("instance", &self.instance)
            .field("strategy", &self.active_kind())
            .field("session", &self.session)
            .field("timers", &self.timers.active_count())
            .finish_non_exhaustive()
    }
}

impl Broker {
    pub fn new(
        list: SourceList,
        ui: Box<dyn SelectUi>,
        focus: Box<dyn FocusHost>,
        env: Environment,
        config: SelectConfig,
        registry: StrategyRegistry,
    ) -> Self {
        Self {
            registry,
            strategy: None,
            session: SessionState::new(),
            timers: TimerManager::new(),
            list,
            ui,
            focus,
            env,
            config,
            instance: next_instance_id(),
        }
    }

    /// Run `f` against the active strategy. Returns `None` when unmounted.
    fn with_strategy<R>(
        &mut self,
        now: Instant,
        f: impl FnOnce(&mut dyn BehaviorStrategy, &mut BrokerContext<'_>) -> R,
    ) -> Option<R> {
        let strategy = self.strategy.as_deref_mut()?;
        let mut ctx = BrokerContext {
            list: &self.list,
            ui: self.ui.as_mut(),
            focus: self.focus.as_mut(),
            session: &mut self.session,
            timers: &mut self.timers,
            env: &self.env,
            config: &self.config,
            now,
        };
        Some(f(strategy, &mut ctx))
    }

    fn create_strategy(&self) -> Result<Box<dyn BehaviorStrategy>> {
        let descriptor = self
            .registry
            .select(self.list.capabilities(), &self.env)?;
        Ok((descriptor.create)(&StrategyInit {
            instance: self.instance,
            config: &self.config,
        }))
    }

    fn install(&mut self, strategy: Box<dyn BehaviorStrategy>, now: Instant) {
        tracing::debug!(
            target: targets::BROKER,
            instance = self.instance,
            kind = %strategy.kind(),
            "strategy mounted"
        );
        self.strategy = Some(strategy);
        self.with_strategy(now, |strategy, ctx| strategy.mount(ctx));
    }

    /// Unmount the active strategy and end its session.
    fn end_session(&mut self, now: Instant) {
        if let Some(kind) = self.active_kind() {
            self.with_strategy(now, |strategy, ctx| strategy.unmount(ctx));
            tracing::debug!(
                target: targets::BROKER,
                instance = self.instance,
                %kind,
                "strategy unmounted"
            );
        }
        self.strategy = None;
        self.session.token.revoke();
        let stopped = self.timers.stop_where(|_| true);
        if stopped > 0 {
            tracing::trace!(target: targets::BROKER, stopped, "session timers stopped");
        }
    }

    /// Select and mount the strategy matching the list's current capabilities.
    ///
    /// Fails if no registered strategy is compatible; the widget must not be
    /// used in that case.
    pub fn mount(&mut self, now: Instant) -> Result<StrategyKind> {
        let _span = tracing::debug_span!(span_names::BROKER, instance = self.instance).entered();
        if self.strategy.is_some() {
            self.end_session(now);
        }
        let strategy = self.create_strategy()?;
        let kind = strategy.kind();
        self.session = SessionState::new();
        self.install(strategy, now);
        Ok(kind)
    }

    /// Close the dropdown and unmount the active strategy, revoking its
    /// session.
    pub fn unmount(&mut self, now: Instant) {
        if self.session.open {
            self.set_open(false, now);
        }
        self.end_session(now);
        self.session.open = false;
        self.session.pending_focus = None;
    }

    /// Re-run strategy selection, swapping the strategy if its kind changed.
    ///
    /// Returns whether a swap happened. A swap closes the dropdown and starts
    /// a fresh session; the focus state carries over.
    pub fn reevaluate(&mut self, now: Instant) -> Result<bool> {
        let kind = self
            .registry
            .select(self.list.capabilities(), &self.env)?
            .kind;
        let previous = self.active_kind();
        if previous == Some(kind) {
            return Ok(false);
        }
        let _span =
            tracing::debug_span!(span_names::STRATEGY, instance = self.instance, to = %kind)
                .entered();

        let next = self.create_strategy()?;
        if self.session.open {
            self.set_open(false, now);
        }
        let focused = self.session.focused;
        let pending_blur = self
            .timers
            .deadline_where(|timer| timer.purpose == TimerPurpose::BlurDebounce);
        self.end_session(now);
        self.session = SessionState::new();
        self.session.focused = focused;

        tracing::debug!(
            target: targets::BROKER,
            instance = self.instance,
            from = ?previous,
            to = %kind,
            "strategy swapped"
        );
        self.install(next, now);
        if let Some(deadline) = pending_blur {
            self.rearm_blur(deadline, now);
        }
        Ok(true)
    }

    /// Carry a blur debounce that was pending before a swap into the current
    /// session, keeping its original deadline.
    fn rearm_blur(&mut self, deadline: Instant, now: Instant) {
        let timer = SessionTimer {
            purpose: TimerPurpose::BlurDebounce,
            token: self.session.token.clone(),
        };
        match self
            .timers
            .start_one_shot(now, deadline.saturating_duration_since(now), timer)
        {
            Ok(_) => tracing::trace!(target: targets::BROKER, ?deadline, "blur debounce carried over"),
            Err(err) => tracing::warn!(target: targets::BROKER, %err, "blur debounce dropped"),
        }
    }

    /// React to a drained batch of list mutations.
    ///
    /// Capability changes re-run strategy selection; otherwise the active
    /// strategy hears about the batch if it matches its filter. Returns
    /// whether the strategy was swapped.
    pub fn on_mutations(&mut self, batch: &ObservedBatch, now: Instant) -> Result<bool> {
        if self.strategy.is_none() || batch.is_empty() {
            return Ok(false);
        }
        if batch.matches(&MutationFilter::capability()) && self.reevaluate(now)? {
            return Ok(true);
        }
        let relevant = self
            .strategy
            .as_ref()
            .and_then(|strategy| strategy.mutation_filter())
            .is_some_and(|filter| batch.matches(&filter));
        if relevant {
            self.with_strategy(now, |strategy, ctx| strategy.on_mutations(ctx));
        }
        Ok(false)
    }

    pub fn set_open(&mut self, open: bool, now: Instant) {
        self.with_strategy(now, |strategy, ctx| strategy.set_open(ctx, open));
    }

    /// Update the focus indication directly, bypassing the blur debounce.
    pub fn set_focus(&mut self, focused: bool) {
        self.session.focused = focused;
        self.ui.set_focus(focused);
    }

    pub fn on_ui_event(&mut self, event: &UiEvent, now: Instant) -> EventDisposition {
        self.with_strategy(now, |strategy, ctx| strategy.on_ui_event(ctx, event))
            .unwrap_or_default()
    }

    pub fn on_change(&mut self, now: Instant) {
        self.with_strategy(now, |strategy, ctx| strategy.on_change(ctx));
    }

    pub fn on_focus(&mut self, now: Instant) {
        self.with_strategy(now, |strategy, ctx| strategy.on_focus(ctx));
    }

    pub fn on_blur(&mut self, now: Instant) {
        self.with_strategy(now, |strategy, ctx| strategy.on_blur(ctx));
    }

    pub fn on_key_down(&mut self, event: &KeyPressEvent, now: Instant) -> EventDisposition {
        self.with_strategy(now, |strategy, ctx| strategy.on_key_down(ctx, event))
            .unwrap_or_default()
    }

    pub fn on_document_event(&mut self, event: &DocumentEvent, now: Instant) -> EventDisposition {
        self.with_strategy(now, |strategy, ctx| {
            strategy.on_document_event(ctx, event)
        })
        .unwrap_or_default()
    }

    /// Resolve the pending focus intent, then fire every due timer.
    pub fn advance(&mut self, now: Instant) {
        if let Some(target) = self.session.pending_focus.take()
            && self
                .with_strategy(now, |strategy, ctx| strategy.resolve_focus_intent(ctx, target))
                .is_none()
        {
            tracing::warn!(target: targets::BROKER, ?target, "focus intent dropped without a strategy");
        }

        let _span = tracing::trace_span!(span_names::TIMER, instance = self.instance).entered();
        for (id, timer) in self.timers.process_expired(now) {
            if !timer.token.is_live() {
                tracing::warn!(
                    target: targets::BROKER,
                    ?id,
                    purpose = ?timer.purpose,
                    "stale session timer ignored"
                );
                continue;
            }
            tracing::trace!(target: targets::BROKER, purpose = ?timer.purpose, "session timer fired");
            self.with_strategy(now, |strategy, ctx| strategy.on_timer(ctx, timer.purpose));
        }
    }

    /// Time until the next session timer is due, if any.
    pub fn next_deadline(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    pub fn is_open(&self) -> bool {
        self.session.open
    }

    pub fn is_focused(&self) -> bool {
        self.session.focused
    }

    pub fn has_pending_focus(&self) -> bool {
        self.session.pending_focus.is_some()
    }

    pub fn active_kind(&self) -> Option<StrategyKind> {
        self.strategy.as_ref().map(|strategy| strategy.kind())
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn list(&self) -> &SourceList {
        &self.list
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// The host element's attributes as annotated by the active strategy.
    pub fn meta_attributes(&self, base: AttributeMap) -> AttributeMap {
        match &self.strategy {
            Some(strategy) => strategy.generate_meta_attributes(&self.env, base),
            None => base,
        }
    }

    pub fn aria_ui(&self) -> Option<&ManagedAriaUi> {
        self.strategy.as_ref().and_then(|strategy| strategy.aria_ui())
    }

    /// The element that should hold focus under the active strategy.
    pub fn focus_target(&self) -> FocusTarget {
        self.strategy
            .as_ref()
            .map_or(FocusTarget::NativeSelect, |strategy| strategy.focus_target())
    }
}
