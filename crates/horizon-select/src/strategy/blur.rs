//! Debounced blur handling.
//!
//! A blur only takes effect if no focus or pointer interaction follows
//! within the configured debounce. Moving focus between parts of the widget
//! produces a blur and a focus in quick succession; the pair cancels out.

use super::context::{BrokerContext, TimerPurpose};

#[derive(Debug, Clone, Copy, Default)]
pub struct BlurDebounce;

impl BlurDebounce {
    /// Cancel any pending blur and show focus.
    pub fn focus(&self, ctx: &mut BrokerContext<'_>) {
        ctx.cancel_timer(TimerPurpose::BlurDebounce);
        ctx.set_focus(true);
    }

    /// Schedule the unfocus, restarting a pending one.
    pub fn blur(&self, ctx: &mut BrokerContext<'_>) {
        let delay = ctx.config.blur_debounce();
        ctx.start_timer(TimerPurpose::BlurDebounce, delay);
    }

    /// The debounce elapsed: hide focus.
    pub fn expire(&self, ctx: &mut BrokerContext<'_>) {
        ctx.set_focus(false);
    }
}
