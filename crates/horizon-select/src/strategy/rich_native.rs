//! Strategy layering a custom dropdown over the native control.
//!
//! Focus stays on the native element, so native keyboard handling and
//! screen reader announcements keep working. The strategy adds the dropdown
//! toggles and closes it when focus truly leaves the widget.

use super::{
    BehaviorStrategy, BlurDebounce, BrokerContext, StrategyKind, TimerPurpose,
    touch_only_attributes,
};
use crate::accessibility::AttributeMap;
use crate::events::{
    DocumentEvent, DocumentEventKind, EventDisposition, Key, KeyPressEvent, UiEvent, UiEventKind,
};
use crate::platform::Environment;
use crate::selection::Navigation;
use crate::ui::FocusTarget;
use horizon_select_core::logging::targets;

#[derive(Debug, Default)]
pub struct RichNativeStrategy {
    blur: BlurDebounce,
}

impl RichNativeStrategy {
    fn close_dropdown(&mut self, ctx: &mut BrokerContext<'_>) {
        if ctx.is_open() {
            self.set_open(ctx, false);
        }
    }

    /// Plain Up/Down would pop up the native dropdown on this platform, so
    /// the selection is stepped directly instead.
    fn step_selection(&mut self, ctx: &mut BrokerContext<'_>, key: Key) {
        let step = if key == Key::ArrowUp {
            Navigation::Previous
        } else {
            Navigation::Next
        };
        let options = ctx.list.option_infos();
        let Some(target) = step.resolve(&options) else {
            return;
        };
        match ctx.list.set_selected(target.key, true) {
            Ok(()) => ctx.list.dispatch_change(),
            Err(error) => {
                tracing::warn!(target: targets::STRATEGY, %error, "arrow key selection dropped");
            }
        }
    }
}

impl BehaviorStrategy for RichNativeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RichNative
    }

    fn unmount(&mut self, ctx: &mut BrokerContext<'_>) {
        ctx.cancel_timer(TimerPurpose::BlurDebounce);
    }

    fn on_ui_event(&mut self, ctx: &mut BrokerContext<'_>, event: &UiEvent) -> EventDisposition {
        ctx.ensure_focus(FocusTarget::NativeSelect);

        let disposition = match event.kind {
            UiEventKind::Click => {
                if !event.target.is_ui() {
                    self.set_open(ctx, false);
                }
                EventDisposition::STOP_PROPAGATION
            }
            UiEventKind::MouseDown => {
                if !ctx.is_open() {
                    self.set_open(ctx, true);
                } else if event.target.is_ui() {
                    self.set_open(ctx, false);
                }
                EventDisposition::IGNORED
            }
            UiEventKind::TouchStart => EventDisposition::IGNORED,
        };

        // The platform blur caused by this press arrives after it.
        ctx.request_focus_intent(FocusTarget::NativeSelect);
        disposition
    }

    fn on_change(&mut self, ctx: &mut BrokerContext<'_>) {
        ctx.ensure_focus(FocusTarget::NativeSelect);
    }

    fn on_focus(&mut self, ctx: &mut BrokerContext<'_>) {
        self.blur.focus(ctx);
    }

    fn on_blur(&mut self, ctx: &mut BrokerContext<'_>) {
        self.blur.blur(ctx);
    }

    fn on_key_down(&mut self, ctx: &mut BrokerContext<'_>, event: &KeyPressEvent) -> EventDisposition {
        let open = ctx.is_open();
        let arrow = matches!(event.key, Key::ArrowUp | Key::ArrowDown);

        if arrow && !event.modifiers.alt && ctx.env.arrow_keys_open_native_popup() {
            self.step_selection(ctx, event.key);
            return EventDisposition::PREVENT_DEFAULT;
        }

        let toggle = match event.key {
            Key::Escape => open,
            Key::ArrowUp | Key::ArrowDown => event.modifiers.alt,
            Key::Space => !open,
            Key::Enter => true,
            _ => false,
        };
        if toggle {
            self.set_open(ctx, !open);
        }
        EventDisposition::IGNORED
    }

    fn on_document_event(
        &mut self,
        ctx: &mut BrokerContext<'_>,
        event: &DocumentEvent,
    ) -> EventDisposition {
        if event.kind == DocumentEventKind::Click {
            self.close_dropdown(ctx);
        }
        EventDisposition::IGNORED
    }

    fn on_timer(&mut self, ctx: &mut BrokerContext<'_>, purpose: TimerPurpose) {
        if purpose == TimerPurpose::BlurDebounce {
            self.blur.expire(ctx);
            self.close_dropdown(ctx);
        }
    }

    fn generate_meta_attributes(&self, env: &Environment, mut base: AttributeMap) -> AttributeMap {
        touch_only_attributes(env, &mut base);
        base
    }
}
