//! Strategy for disabled lists.

use super::{BehaviorStrategy, BrokerContext, StrategyKind};

/// Accepts every event and never opens.
#[derive(Debug, Default)]
pub struct DisabledStrategy;

impl BehaviorStrategy for DisabledStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Disabled
    }

    fn set_open(&mut self, _ctx: &mut BrokerContext<'_>, _open: bool) {}
}
