//! Behavior strategies and their registry.
//!
//! A [`BehaviorStrategy`] encodes one environment's interaction contract:
//! focus and blur handling, keyboard semantics, dropdown open/close timing
//! and typeahead. The [`StrategyRegistry`] picks exactly one strategy for a
//! list from its capabilities and the host [`Environment`].
//!
//! # Variants
//!
//! | Kind | Applies to |
//! |------|------------|
//! | [`StrategyKind::Disabled`] | disabled lists |
//! | [`StrategyKind::Multi`] | multi-selects |
//! | [`StrategyKind::ManagedAria`] | single-selects on desktop Firefox and macOS |
//! | [`StrategyKind::RichNative`] | everything else (catch-all) |

mod blur;
mod context;
mod disabled;
mod managed_aria;
mod multi;
mod registry;
mod rich_native;

use std::fmt;

pub use blur::BlurDebounce;
pub use context::{BrokerContext, SessionState, SessionTimer, SessionToken, TimerPurpose};
pub use disabled::DisabledStrategy;
pub use managed_aria::{AriaOption, ManagedAriaStrategy, ManagedAriaUi};
pub use multi::MultiStrategy;
pub use registry::{
    CompatibilityTest, StrategyDescriptor, StrategyFactory, StrategyInit, StrategyRegistry,
};
pub use rich_native::RichNativeStrategy;

use crate::accessibility::AttributeMap;
use crate::events::{DocumentEvent, EventDisposition, KeyPressEvent, UiEvent};
use crate::platform::Environment;
use crate::source::MutationFilter;
use crate::ui::FocusTarget;

/// Identifies a strategy variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Disabled,
    Multi,
    RichNative,
    ManagedAria,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Disabled => "disabled",
            StrategyKind::Multi => "multi",
            StrategyKind::RichNative => "rich-native",
            StrategyKind::ManagedAria => "managed-aria",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment-specific interaction contract of a select.
///
/// The broker owns exactly one active strategy and routes every event to it
/// with a [`BrokerContext`]. All hooks have no-op defaults except
/// [`set_open`](Self::set_open), which records the state and forwards it to
/// the UI, and [`on_timer`](Self::on_timer), which expires the blur debounce.
pub trait BehaviorStrategy: fmt::Debug {
    fn kind(&self) -> StrategyKind;

    /// The strategy became active.
    fn mount(&mut self, _ctx: &mut BrokerContext<'_>) {}

    /// The strategy is being replaced or the widget is going away.
    fn unmount(&mut self, _ctx: &mut BrokerContext<'_>) {}

    /// Open or close the dropdown.
    fn set_open(&mut self, ctx: &mut BrokerContext<'_>, open: bool) {
        ctx.set_open(open);
    }

    /// Pointer interaction with the widget's UI or dropdown.
    fn on_ui_event(&mut self, _ctx: &mut BrokerContext<'_>, _event: &UiEvent) -> EventDisposition {
        EventDisposition::IGNORED
    }

    /// The list announced a selection change.
    fn on_change(&mut self, _ctx: &mut BrokerContext<'_>) {}

    /// The control gained platform focus.
    fn on_focus(&mut self, _ctx: &mut BrokerContext<'_>) {}

    /// The control lost platform focus.
    fn on_blur(&mut self, _ctx: &mut BrokerContext<'_>) {}

    fn on_key_down(
        &mut self,
        _ctx: &mut BrokerContext<'_>,
        _event: &KeyPressEvent,
    ) -> EventDisposition {
        EventDisposition::IGNORED
    }

    /// An event observed at document level.
    fn on_document_event(
        &mut self,
        _ctx: &mut BrokerContext<'_>,
        _event: &DocumentEvent,
    ) -> EventDisposition {
        EventDisposition::IGNORED
    }

    /// A timer started by this strategy's session fired.
    ///
    /// By default an expired blur debounce only hides focus; it may have been
    /// carried over from the previous strategy.
    fn on_timer(&mut self, ctx: &mut BrokerContext<'_>, purpose: TimerPurpose) {
        if purpose == TimerPurpose::BlurDebounce {
            ctx.set_focus(false);
        }
    }

    /// List mutations this strategy wants to hear about.
    fn mutation_filter(&self) -> Option<MutationFilter> {
        None
    }

    /// A batch of mutations matched [`mutation_filter`](Self::mutation_filter).
    fn on_mutations(&mut self, _ctx: &mut BrokerContext<'_>) {}

    /// Second phase of a pointer-down: platform blur/focus churn has settled.
    fn resolve_focus_intent(&mut self, ctx: &mut BrokerContext<'_>, target: FocusTarget) {
        ctx.cancel_timer(TimerPurpose::BlurDebounce);
        ctx.ensure_focus(target);
    }

    /// The element that should hold focus while this strategy is active.
    fn focus_target(&self) -> FocusTarget {
        FocusTarget::NativeSelect
    }

    /// Annotate the host element's attributes.
    fn generate_meta_attributes(&self, _env: &Environment, base: AttributeMap) -> AttributeMap {
        base
    }

    /// The custom combobox UI, for strategies that render one.
    fn aria_ui(&self) -> Option<&ManagedAriaUi> {
        None
    }
}

/// Meta attributes of strategies that defer to native touch UIs.
pub(crate) fn touch_only_attributes(env: &Environment, base: &mut AttributeMap) -> bool {
    match env.touch_only_attribute_value() {
        Some(value) => {
            base.set(crate::accessibility::names::TOUCH_ONLY, value);
            true
        }
        None => false,
    }
}
