//! Drag selection for multi-selects.
//!
//! A drag starts on an enabled option and extends over every option hovered
//! while the pointer is held. Each step produces one batch of selection
//! writes covering every enabled option, so a step costs exactly one change
//! notification.

use std::collections::BTreeSet;

use horizon_select_core::logging::targets;

use crate::events::KeyboardModifiers;
use crate::source::{NodeKey, OptionInfo};

/// Selection writes for one drag step.
pub type SelectionUpdate = Vec<(NodeKey, bool)>;

#[derive(Debug, Clone)]
struct ActiveDrag {
    anchor: usize,
    hover: usize,
    /// Indices selected before an additive drag started.
    keep: BTreeSet<usize>,
    /// The range is deselected instead of selected.
    invert: bool,
}

/// Drag state of one options view.
#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    active: Option<ActiveDrag>,
    /// Anchor of the previous drag, used by Shift to extend a range.
    previous_start: Option<usize>,
}

impl DragSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the pointer is currently held down on the list.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The current drag anchor.
    pub fn anchor(&self) -> Option<usize> {
        self.active.as_ref().map(|drag| drag.anchor)
    }

    /// Whether the current drag deselects its range.
    pub fn is_inverted(&self) -> bool {
        self.active.as_ref().is_some_and(|drag| drag.invert)
    }

    /// Anchor a future Shift drag at `index`.
    ///
    /// Called when the view is attached to a list, with its selected index.
    pub fn set_previous_start(&mut self, index: Option<usize>) {
        self.previous_start = index;
    }

    /// Start a drag on the option at `index`.
    ///
    /// Returns `None` when the option does not exist or is disabled.
    ///
    /// With Shift held and a previous drag start known, the range is anchored
    /// at that previous start and the drag neither keeps nor inverts. With
    /// Ctrl held, the current selection is kept and the drag inverts when it
    /// starts on a selected option.
    pub fn begin(
        &mut self,
        options: &[OptionInfo],
        index: usize,
        modifiers: KeyboardModifiers,
    ) -> Option<SelectionUpdate> {
        let option = options.get(index).filter(|option| option.enabled)?;

        let drag = match self.previous_start {
            Some(previous) if modifiers.shift && previous < options.len() => ActiveDrag {
                anchor: previous,
                hover: index,
                keep: BTreeSet::new(),
                invert: false,
            },
            _ if modifiers.control => ActiveDrag {
                anchor: index,
                hover: index,
                keep: options
                    .iter()
                    .filter(|option| option.selected)
                    .map(|option| option.index)
                    .collect(),
                invert: option.selected,
            },
            _ => ActiveDrag {
                anchor: index,
                hover: index,
                keep: BTreeSet::new(),
                invert: false,
            },
        };

        tracing::trace!(
            target: targets::SELECTION,
            anchor = drag.anchor,
            invert = drag.invert,
            kept = drag.keep.len(),
            "drag started"
        );
        self.previous_start = Some(drag.anchor);
        let update = plan(options, &drag);
        self.active = Some(drag);
        Some(update)
    }

    /// Extend the drag to `hover`, clamped to the list bounds.
    ///
    /// Returns `None` when no drag is active, the list is empty, or the hover
    /// position did not change.
    pub fn extend(&mut self, options: &[OptionInfo], hover: usize) -> Option<SelectionUpdate> {
        let last = options.len().checked_sub(1)?;
        let drag = self.active.as_mut()?;
        let hover = hover.min(last);
        if drag.hover == hover {
            return None;
        }
        drag.hover = hover;
        Some(plan(options, drag))
    }

    /// End the drag. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        let was_active = self.active.take().is_some();
        if was_active {
            tracing::trace!(target: targets::SELECTION, "drag ended");
        }
        was_active
    }
}

/// Selection state of every enabled option for the current drag step.
fn plan(options: &[OptionInfo], drag: &ActiveDrag) -> SelectionUpdate {
    let low = drag.anchor.min(drag.hover);
    let high = drag.anchor.max(drag.hover);
    options
        .iter()
        .filter(|option| option.enabled)
        .map(|option| {
            let selected = if (low..=high).contains(&option.index) {
                !drag.invert
            } else {
                drag.keep.contains(&option.index)
            };
            (option.key, selected)
        })
        .collect()
}
