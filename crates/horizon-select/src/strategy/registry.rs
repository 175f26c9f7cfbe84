//! Ordered strategy registry.

use std::fmt;

use horizon_select_core::logging::targets;

use super::{
    BehaviorStrategy, DisabledStrategy, ManagedAriaStrategy, MultiStrategy, RichNativeStrategy,
    StrategyKind,
};
use crate::config::SelectConfig;
use crate::error::{Result, SelectError};
use crate::platform::Environment;
use crate::source::Capabilities;

/// Decides whether a strategy can drive a list.
pub type CompatibilityTest = fn(&Capabilities, &Environment) -> bool;

/// Creates a fresh strategy instance.
pub type StrategyFactory = fn(&StrategyInit<'_>) -> Box<dyn BehaviorStrategy>;

/// Inputs available when a strategy is created.
#[derive(Debug, Clone, Copy)]
pub struct StrategyInit<'a> {
    /// Process-unique id of the select instance.
    pub instance: u64,
    pub config: &'a SelectConfig,
}

/// One registry entry.
#[derive(Clone, Copy)]
pub struct StrategyDescriptor {
    pub kind: StrategyKind,
    pub is_compatible: CompatibilityTest,
    pub create: StrategyFactory,
    /// Accepts every list; a registry needs at least one such entry.
    pub catch_all: bool,
}

impl fmt::Debug for StrategyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyDescriptor")
            .field("kind", &self.kind)
            .field("catch_all", &self.catch_all)
            .finish_non_exhaustive()
    }
}

impl StrategyDescriptor {
    pub fn disabled() -> Self {
        Self {
            kind: StrategyKind::Disabled,
            is_compatible: |caps, _| caps.disabled,
            create: |_| Box::new(DisabledStrategy),
            catch_all: false,
        }
    }

    pub fn multi() -> Self {
        Self {
            kind: StrategyKind::Multi,
            is_compatible: |caps, _| !caps.disabled && caps.multiple,
            create: |_| Box::new(MultiStrategy::default()),
            catch_all: false,
        }
    }

    /// Single-selects on desktop Firefox and macOS, whose native combobox
    /// semantics are not announced reliably.
    pub fn managed_aria() -> Self {
        Self {
            kind: StrategyKind::ManagedAria,
            is_compatible: |caps, env| {
                !caps.disabled
                    && !caps.multiple
                    && !env.is_touch_only()
                    && (env.firefox || env.mac_os_x)
            },
            create: |init| Box::new(ManagedAriaStrategy::new(init.instance, init.config)),
            catch_all: false,
        }
    }

    /// The generic fallback.
    pub fn rich_native() -> Self {
        Self {
            kind: StrategyKind::RichNative,
            is_compatible: |_, _| true,
            create: |_| Box::new(RichNativeStrategy::default()),
            catch_all: true,
        }
    }
}

/// Strategies in priority order; the first compatible entry wins.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    entries: Vec<StrategyDescriptor>,
}

impl StrategyRegistry {
    /// Create a registry, rejecting one without a catch-all entry.
    pub fn new(entries: Vec<StrategyDescriptor>) -> Result<Self> {
        let registry = Self { entries };
        registry.validate()?;
        Ok(registry)
    }

    /// Disabled, multi, managed ARIA (when enabled in `config`), rich native.
    pub fn standard(config: &SelectConfig) -> Self {
        let mut entries = vec![StrategyDescriptor::disabled(), StrategyDescriptor::multi()];
        if config.managed_aria {
            entries.push(StrategyDescriptor::managed_aria());
        }
        entries.push(StrategyDescriptor::rich_native());
        Self { entries }
    }

    pub fn validate(&self) -> Result<()> {
        if self.entries.iter().any(|entry| entry.catch_all) {
            Ok(())
        } else {
            Err(SelectError::MissingCatchAll)
        }
    }

    pub fn entries(&self) -> &[StrategyDescriptor] {
        &self.entries
    }

    /// The first entry compatible with `capabilities` in `env`.
    pub fn select(
        &self,
        capabilities: Capabilities,
        env: &Environment,
    ) -> Result<&StrategyDescriptor> {
        match self
            .entries
            .iter()
            .find(|entry| (entry.is_compatible)(&capabilities, env))
        {
            Some(entry) => {
                tracing::trace!(target: targets::STRATEGY, kind = %entry.kind, "strategy selected");
                Ok(entry)
            }
            None => {
                tracing::error!(
                    target: targets::STRATEGY,
                    disabled = capabilities.disabled,
                    multiple = capabilities.multiple,
                    "no compatible behavior strategy"
                );
                Err(SelectError::NoCompatibleStrategy {
                    disabled: capabilities.disabled,
                    multiple: capabilities.multiple,
                })
            }
        }
    }
}
