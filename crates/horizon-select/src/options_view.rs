//! The options view: mirror plus pointer selection.
//!
//! Single-selects highlight the hovered option and select on pointer-up.
//! Multi-selects select by dragging (see [`DragSelection`]). Pointer targets
//! arrive as [`MirrorId`]s and are resolved against the live list on every
//! event, never cached across reconciliation passes.

use horizon_select_core::logging::targets;

use crate::events::{KeyboardModifiers, PointerTarget};
use crate::mirror::{Mirror, MirrorEffect, MirrorId};
use crate::selection::{DragSelection, ScrollTracker, SelectionUpdate};
use crate::source::{OptionInfo, SourceList};

#[derive(Debug, Default)]
pub struct OptionsView {
    mirror: Mirror,
    drag: DragSelection,
    highlighted: Option<MirrorId>,
    scroll: ScrollTracker,
    scroll_request: Option<usize>,
    mounted: bool,
}

impl OptionsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to `list`, building the mirror.
    pub fn mount(&mut self, list: &SourceList) -> Vec<MirrorEffect> {
        self.mounted = true;
        self.drag.set_previous_start(list.selected_index());
        self.scroll.reset();
        self.sync(list)
    }

    /// Detach, ending any drag and highlight. The mirror is kept.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.drag.end();
        self.highlighted = None;
        self.scroll_request = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Run one reconciliation pass against the list.
    pub fn sync(&mut self, list: &SourceList) -> Vec<MirrorEffect> {
        let effects = self.mirror.sync(&list.snapshot());
        if let Some(id) = self.highlighted
            && self.mirror.find(id).is_none()
        {
            self.highlighted = None;
        }
        self.track_scroll(list);
        effects
    }

    /// The list announced a selection change.
    pub fn on_change(&mut self, list: &SourceList) {
        self.highlighted = None;
        self.track_scroll(list);
    }

    /// Pointer pressed over the view. Starts a drag on multi-selects.
    ///
    /// Returns whether the selection changed.
    pub fn on_pointer_down(
        &mut self,
        list: &SourceList,
        target: PointerTarget,
        modifiers: KeyboardModifiers,
    ) -> bool {
        if list.is_disabled() || !list.is_multiple() {
            return false;
        }
        let Some(option) = self.enabled_option(list, target) else {
            return false;
        };
        let update = self.drag.begin(&list.option_infos(), option.index, modifiers);
        Self::commit(list, update)
    }

    /// Pointer moved over `target`. Extends the drag of a multi-select, or
    /// highlights the option of a single-select.
    ///
    /// Returns whether the selection changed.
    pub fn on_pointer_over(&mut self, list: &SourceList, target: PointerTarget) -> bool {
        if list.is_disabled() {
            return false;
        }

        if list.is_multiple() {
            if !self.drag.is_active() {
                return false;
            }
            let hover = match target {
                PointerTarget::AboveItems => 0,
                PointerTarget::BelowItems => usize::MAX,
                PointerTarget::Item(_) => match self.enabled_option(list, target) {
                    Some(option) => option.index,
                    None => return false,
                },
                PointerTarget::Outside => return false,
            };
            let update = self.drag.extend(&list.option_infos(), hover);
            return Self::commit(list, update);
        }

        if let PointerTarget::Item(id) = target
            && self.enabled_option(list, target).is_some()
        {
            self.highlighted = Some(id);
        }
        false
    }

    /// Pointer released over the view.
    ///
    /// Ends a drag, or selects the released-on option of a single-select.
    /// Returns whether the selection changed.
    pub fn on_pointer_up(&mut self, list: &SourceList, target: PointerTarget) -> bool {
        if self.drag.end() || list.is_disabled() {
            return false;
        }
        let Some(option) = self.enabled_option(list, target) else {
            return false;
        };
        self.highlighted = None;
        list.set_selected_index(Some(option.index));
        list.dispatch_change();
        true
    }

    /// Pointer released anywhere in the document.
    pub fn on_document_pointer_up(&mut self) {
        self.drag.end();
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn drag(&self) -> &DragSelection {
        &self.drag
    }

    /// The option highlighted by the pointer.
    pub fn highlighted(&self) -> Option<MirrorId> {
        self.highlighted
    }

    /// Whether the pointer highlight overrides the selection marker.
    pub fn is_highlighting(&self) -> bool {
        self.highlighted.is_some()
    }

    /// Index of the option to scroll into view, if the selection bounds moved
    /// since the last call.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.scroll_request.take()
    }

    fn track_scroll(&mut self, list: &SourceList) {
        if !self.mounted {
            return;
        }
        let selected = list.selected_indices();
        let bounds = selected.first().zip(selected.last()).map(|(&first, &last)| (first, last));
        if let Some(index) = self.scroll.update(bounds) {
            self.scroll_request = Some(index);
        }
    }

    fn enabled_option(&self, list: &SourceList, target: PointerTarget) -> Option<OptionInfo> {
        let PointerTarget::Item(id) = target else {
            return None;
        };
        let node = self.mirror.find(id).filter(|node| !node.is_group())?;
        list.option_info(node.key).filter(|option| option.enabled)
    }

    fn commit(list: &SourceList, update: Option<SelectionUpdate>) -> bool {
        let Some(update) = update else {
            return false;
        };
        if let Err(error) = list.apply_selection(&update) {
            tracing::warn!(target: targets::SELECTION, %error, "drag selection dropped");
            return false;
        }
        list.dispatch_change();
        true
    }
}
