//! Strategy for multi-selects.
//!
//! The list is rendered inline, so there is no dropdown to manage. Only the
//! focus indication is handled, with a debounced blur.

use super::{
    BehaviorStrategy, BlurDebounce, BrokerContext, StrategyKind, TimerPurpose,
    touch_only_attributes,
};
use crate::accessibility::{AccessibleRole, AttributeMap};
use crate::events::{EventDisposition, UiEvent};
use crate::platform::Environment;
use crate::ui::FocusTarget;

#[derive(Debug, Default)]
pub struct MultiStrategy {
    blur: BlurDebounce,
}

impl BehaviorStrategy for MultiStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Multi
    }

    fn set_open(&mut self, _ctx: &mut BrokerContext<'_>, _open: bool) {}

    fn on_ui_event(&mut self, ctx: &mut BrokerContext<'_>, _event: &UiEvent) -> EventDisposition {
        ctx.ensure_focus(FocusTarget::NativeSelect);
        ctx.request_focus_intent(FocusTarget::NativeSelect);
        EventDisposition::IGNORED
    }

    fn on_focus(&mut self, ctx: &mut BrokerContext<'_>) {
        self.blur.focus(ctx);
    }

    fn on_blur(&mut self, ctx: &mut BrokerContext<'_>) {
        self.blur.blur(ctx);
    }

    fn on_timer(&mut self, ctx: &mut BrokerContext<'_>, purpose: TimerPurpose) {
        if purpose == TimerPurpose::BlurDebounce {
            self.blur.expire(ctx);
        }
    }

    fn generate_meta_attributes(&self, env: &Environment, mut base: AttributeMap) -> AttributeMap {
        if !touch_only_attributes(env, &mut base) {
            // NVDA only passes keys through to application regions.
            base.set_role(AccessibleRole::Application);
        }
        base
    }
}
