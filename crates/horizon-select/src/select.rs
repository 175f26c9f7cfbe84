//! The select widget's composition root.
//!
//! [`Select`] wires the source list, the broker, the options view and the
//! button state together and is the single entry point for host events.
//! Every entry point finishes by draining the list observer, so mutations
//! caused by a handler are reconciled before it returns.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//!
//! use horizon_select::prelude::*;
//!
//! struct NoUi;
//!
//! impl SelectUi for NoUi {
//!     fn set_open(&mut self, _open: bool) {}
//!     fn set_focus(&mut self, _focused: bool) {}
//! }
//!
//! impl FocusHost for NoUi {
//!     fn focused(&self) -> Option<FocusTarget> {
//!         None
//!     }
//!     fn focus(&mut self, _target: FocusTarget) {}
//! }
//!
//! let list = SourceList::with_options(["Apple", "Banana", "Cherry"]);
//! let mut select = Select::new(
//!     list.clone(),
//!     Box::new(NoUi),
//!     Box::new(NoUi),
//!     Environment::default(),
//!     SelectConfig::default(),
//! )
//! .unwrap();
//!
//! select.mount(Instant::now()).unwrap();
//! assert_eq!(select.active_kind(), Some(StrategyKind::RichNative));
//! assert_eq!(select.button().label(), "Apple");
//! ```

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use horizon_select_core::Signal;
use horizon_select_core::logging::{span_names, targets};

use crate::accessibility::{AttributeDiff, AttributeMap, names};
use crate::broker::Broker;
use crate::button::ButtonState;
use crate::config::SelectConfig;
use crate::error::Result;
use crate::events::{
    DocumentEvent, DocumentEventKind, EventDisposition, KeyPressEvent, KeyboardModifiers,
    PointerTarget, UiEvent,
};
use crate::mirror::MirrorEffect;
use crate::options_view::OptionsView;
use crate::platform::Environment;
use crate::source::{ListObserver, MutationFilter, SourceList};
use crate::strategy::{ManagedAriaUi, StrategyKind, StrategyRegistry};
use crate::ui::{DropdownCoordinator, DropdownSettings, FocusHost, SelectUi, VerticalAlignment};

/// Style sheets a select needs, injected once per document.
pub const STYLE_SHEETS: &[&str] = &[
    "horizon-select",
    "horizon-select--button",
    "horizon-select--options",
    "horizon-select--ui",
];

/// Upper bound on drain rounds per turn; handlers writing to the list on
/// every change notification would otherwise never settle.
const MAX_FLUSH_ROUNDS: usize = 8;

/// Undrained mirror effects above which a warning is logged.
const EFFECT_BACKLOG_WARNING: usize = 4096;

/// Tracks which style sheets were injected into a document.
///
/// Owned by the embedding application, one per document.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    injected: BTreeSet<&'static str>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` injected. Returns `true` the first time only.
    pub fn register(&mut self, name: &'static str) -> bool {
        self.injected.insert(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.injected.contains(name)
    }

    pub fn len(&self) -> usize {
        self.injected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.injected.is_empty()
    }
}

/// Delivered once the select is initialized and again whenever the active
/// strategy changes its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyEvent {
    /// The complete attribute set for the root element.
    pub attributes: AttributeMap,
    /// Changes relative to the previously delivered set.
    pub diff: AttributeDiff,
}

pub struct Select {
    broker: Broker,
    observer: ListObserver,
    options: OptionsView,
    button: ButtonState,
    dropdown: Option<Box<dyn DropdownCoordinator>>,
    anchored: bool,
    alignment: Option<VerticalAlignment>,
    effects: Vec<MirrorEffect>,
    root_attributes: AttributeMap,
    delivered: AttributeMap,
    mounted: bool,
    /// Emitted with the root attributes after mount and strategy swaps.
    pub ready: Signal<ReadyEvent>,
}

impl std::fmt::Debug for Select {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Select")
            .field("broker", &self.broker)
            .field("options", &self.options)
            .field("button", &self.button)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl Select {
    /// Create a select over `list` with the standard strategy registry.
    pub fn new(
        list: SourceList,
        ui: Box<dyn SelectUi>,
        focus: Box<dyn FocusHost>,
        env: Environment,
        config: SelectConfig,
    ) -> Result<Self> {
        let registry = StrategyRegistry::standard(&config);
        Self::with_registry(list, ui, focus, env, config, registry)
    }

    /// Create a select with a custom strategy registry.
    pub fn with_registry(
        list: SourceList,
        ui: Box<dyn SelectUi>,
        focus: Box<dyn FocusHost>,
        env: Environment,
        config: SelectConfig,
        registry: StrategyRegistry,
    ) -> Result<Self> {
        config.validate()?;
        registry.validate()?;
        let observer = ListObserver::observe(&list);
        Ok(Self {
            broker: Broker::new(list, ui, focus, env, config, registry),
            observer,
            options: OptionsView::new(),
            button: ButtonState::new(),
            dropdown: None,
            anchored: false,
            alignment: None,
            effects: Vec::new(),
            root_attributes: AttributeMap::new(),
            delivered: AttributeMap::new(),
            mounted: false,
            ready: Signal::new(),
        })
    }

    /// Attach a dropdown coordinator.
    pub fn with_dropdown(mut self, dropdown: Box<dyn DropdownCoordinator>) -> Self {
        self.dropdown = Some(dropdown);
        self
    }

    /// Inject the select's style sheets into `registry`. Returns how many were
    /// new.
    pub fn register_styles(registry: &mut StyleRegistry) -> usize {
        STYLE_SHEETS
            .iter()
            .filter(|&&name| registry.register(name))
            .count()
    }

    /// Select a strategy, build the mirror and announce readiness.
    ///
    /// Fails if no strategy accepts the list; the select stays unmounted.
    pub fn mount(&mut self, now: Instant) -> Result<()> {
        let kind = self.broker.mount(now)?;
        self.observer.discard();

        let list = self.broker.list().clone();
        let effects = self.options.mount(&list);
        self.push_effects(effects);
        self.button.refresh(&list);
        self.mounted = true;

        tracing::debug!(
            target: targets::SELECT,
            instance = self.broker.instance(),
            %kind,
            options = list.len(),
            "select mounted"
        );
        self.announce_ready();
        self.sync_open_state();
        Ok(())
    }

    /// Close the dropdown and tear down the session. Pending timers become
    /// no-ops.
    pub fn unmount(&mut self, now: Instant) {
        if !self.mounted {
            return;
        }
        self.broker.unmount(now);
        self.options.unmount();
        self.observer.discard();
        self.sync_open_state();
        self.mounted = false;
        tracing::debug!(target: targets::SELECT, instance = self.broker.instance(), "select unmounted");
    }

    /// Deliver queued list mutations and change notifications.
    ///
    /// Called by every entry point; hosts call it after writing to the list
    /// from outside an event handler.
    pub fn flush(&mut self, now: Instant) -> Result<()> {
        if !self.mounted {
            self.observer.discard();
            return Ok(());
        }

        let list = self.broker.list().clone();
        for _ in 0..MAX_FLUSH_ROUNDS {
            let batch = self.observer.drain();
            if batch.is_empty() {
                return Ok(());
            }

            if self.broker.on_mutations(&batch, now)? {
                self.announce_ready();
            }
            if batch.matches(&MutationFilter::reconcile()) {
                let _span = tracing::trace_span!(
                    span_names::RECONCILE,
                    instance = self.broker.instance(),
                    records = batch.events.len()
                )
                .entered();
                let effects = self.options.sync(&list);
                self.push_effects(effects);
            }
            let changes = batch.change_count();
            if changes > 0 || batch.matches(&MutationFilter::button()) {
                self.button.refresh(&list);
            }
            for _ in 0..changes {
                self.broker.on_change(now);
                self.options.on_change(&list);
            }
            self.sync_open_state();
        }

        tracing::warn!(
            target: targets::SELECT,
            rounds = MAX_FLUSH_ROUNDS,
            "list kept changing while flushing; remaining events deferred"
        );
        Ok(())
    }

    /// Flush after an event handler; errors are logged, never returned.
    fn settle(&mut self, now: Instant) {
        if let Err(error) = self.flush(now) {
            tracing::warn!(target: targets::SELECT, %error, "flush after event failed");
        }
        self.sync_open_state();
    }

    fn push_effects(&mut self, effects: Vec<MirrorEffect>) {
        let before = self.effects.len();
        self.effects.extend(effects);
        if before < EFFECT_BACKLOG_WARNING && self.effects.len() >= EFFECT_BACKLOG_WARNING {
            tracing::warn!(
                target: targets::SELECT,
                pending = self.effects.len(),
                "mirror effects are not being drained"
            );
        }
    }

    /// Root attributes for the current strategy.
    fn compute_attributes(&self) -> AttributeMap {
        let mut base = AttributeMap::new().with(names::READY, "");
        if !self.broker.list().is_multiple() {
            base.set(names::SINGLE, "");
        }
        self.broker.meta_attributes(base)
    }

    fn announce_ready(&mut self) {
        let attributes = self.compute_attributes();
        let first = self.delivered.is_empty();
        let diff = attributes.diff(&self.delivered);
        if !first && diff.is_empty() {
            return;
        }
        if self.broker.config().standalone {
            self.root_attributes.apply(&diff);
        }
        tracing::debug!(
            target: targets::SELECT,
            attributes = %attributes,
            "ready"
        );
        self.delivered = attributes.clone();
        self.ready.emit(ReadyEvent { attributes, diff });
    }

    /// Mirror the broker's open state into the button and dropdown anchor.
    fn sync_open_state(&mut self) {
        let open = self.broker.is_open();
        self.button.set_open(open);
        if open == self.anchored {
            return;
        }
        self.anchored = open;
        if !open {
            self.alignment = None;
        }
        let Some(dropdown) = self.dropdown.as_mut() else {
            return;
        };
        if open {
            let config = self.broker.config();
            dropdown.set_anchor(&DropdownSettings {
                min_bottom_space: config.min_bottom_space,
                class_name: config.dropdown_class_name.clone(),
            });
        } else {
            dropdown.clear_anchor();
        }
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    pub fn set_open(&mut self, open: bool, now: Instant) {
        self.broker.set_open(open, now);
        self.settle(now);
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.broker.set_focus(focused);
    }

    pub fn on_ui_event(&mut self, event: &UiEvent, now: Instant) -> EventDisposition {
        let disposition = self.broker.on_ui_event(event, now);
        self.settle(now);
        disposition
    }

    pub fn on_key_down(&mut self, event: &KeyPressEvent, now: Instant) -> EventDisposition {
        let disposition = self.broker.on_key_down(event, now);
        self.settle(now);
        disposition
    }

    pub fn on_focus(&mut self, now: Instant) {
        self.broker.on_focus(now);
        self.settle(now);
    }

    pub fn on_blur(&mut self, now: Instant) {
        self.broker.on_blur(now);
        self.settle(now);
    }

    pub fn on_document_event(&mut self, event: &DocumentEvent, now: Instant) -> EventDisposition {
        if event.kind == DocumentEventKind::MouseUp {
            self.options.on_document_pointer_up();
        }
        let disposition = self.broker.on_document_event(event, now);
        self.settle(now);
        disposition
    }

    /// Pointer pressed over the options view. Returns whether the selection
    /// changed.
    pub fn on_pointer_down(
        &mut self,
        target: PointerTarget,
        modifiers: KeyboardModifiers,
        now: Instant,
    ) -> bool {
        let changed = self
            .options
            .on_pointer_down(self.broker.list(), target, modifiers);
        self.settle(now);
        changed
    }

    pub fn on_pointer_over(&mut self, target: PointerTarget, now: Instant) -> bool {
        let changed = self.options.on_pointer_over(self.broker.list(), target);
        self.settle(now);
        changed
    }

    pub fn on_pointer_up(&mut self, target: PointerTarget, now: Instant) -> bool {
        let changed = self.options.on_pointer_up(self.broker.list(), target);
        self.settle(now);
        changed
    }

    /// The dropdown coordinator picked a vertical placement.
    pub fn on_alignment_changed(&mut self, alignment: VerticalAlignment) {
        self.alignment = Some(alignment);
        self.button.set_opening_position(alignment);
    }

    /// Resolve pending focus intents and fire due timers.
    pub fn advance(&mut self, now: Instant) {
        self.broker.advance(now);
        self.settle(now);
    }

    /// Time until [`advance`](Self::advance) has work to do.
    pub fn next_deadline(&mut self, now: Instant) -> Option<Duration> {
        if self.broker.has_pending_focus() {
            return Some(Duration::ZERO);
        }
        self.broker.next_deadline(now)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn list(&self) -> &SourceList {
        self.broker.list()
    }

    pub fn broker(&self) -> &Broker {
        &self.broker
    }

    pub fn options_view(&self) -> &OptionsView {
        &self.options
    }

    pub fn button(&self) -> &ButtonState {
        &self.button
    }

    pub fn aria_ui(&self) -> Option<&ManagedAriaUi> {
        self.broker.aria_ui()
    }

    pub fn active_kind(&self) -> Option<StrategyKind> {
        self.broker.active_kind()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_open(&self) -> bool {
        self.broker.is_open()
    }

    pub fn is_focused(&self) -> bool {
        self.broker.is_focused()
    }

    /// The dropdown's current vertical placement while open.
    pub fn alignment(&self) -> Option<VerticalAlignment> {
        self.alignment
    }

    /// Attributes applied to the root in standalone mode.
    pub fn root_attributes(&self) -> &AttributeMap {
        &self.root_attributes
    }

    /// Mirror effects produced since the last call, in order.
    ///
    /// Effects accumulate until drained and are never coalesced. A host that
    /// renders the mirror must call this after every entry point.
    pub fn take_mirror_effects(&mut self) -> Vec<MirrorEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Index of the option to scroll into view, if any.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.options.take_scroll_request()
    }
}
