//! Strategy rendering its own accessible combobox.
//!
//! Some engines do not announce the native single-select's combobox
//! semantics reliably. There the native control is hidden from assistive
//! technology and replaced by a combobox button plus a listbox with one
//! option per source option. Keyboard handling is implemented here in full:
//! open/close, stepping over enabled options and typeahead.

use std::time::Instant;

use horizon_select_core::logging::targets;

use super::{BehaviorStrategy, BlurDebounce, BrokerContext, StrategyKind, TimerPurpose};
use crate::accessibility::{AccessibleRole, AttributeMap, names};
use crate::config::SelectConfig;
use crate::events::{
    DocumentEvent, DocumentEventKind, EventDisposition, EventTarget, Key, KeyPressEvent,
    LabelTarget, UiEvent, UiEventKind,
};
use crate::mirror::{Mirror, MirrorEffect, MirrorNode};
use crate::platform::Environment;
use crate::selection::{Navigation, Typeahead, search};
use crate::source::{MutationFilter, NodeKey, SourceList, flatten_options};
use crate::ui::FocusTarget;

/// One option of the managed listbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AriaOption {
    pub key: NodeKey,
    pub text: String,
    /// `id`, `role`, `tabindex`, `aria-disabled` and optional `title`.
    pub attributes: AttributeMap,
}

impl AriaOption {
    pub fn id(&self) -> &str {
        self.attributes.get(names::ID).unwrap_or_default()
    }
}

/// Model of the combobox button and listbox the host renders.
#[derive(Debug, Clone)]
pub struct ManagedAriaUi {
    menu_id: String,
    button: AttributeMap,
    listbox: AttributeMap,
    mirror: Mirror,
    options: Vec<AriaOption>,
}

impl ManagedAriaUi {
    fn new(instance: u64) -> Self {
        let menu_id = format!("horizon-select:managed-aria:{instance}");

        let mut button = AttributeMap::new()
            .with(names::TABINDEX, "0")
            .with(names::ARIA_AUTOCOMPLETE, "list")
            .with(names::ARIA_OWNS, menu_id.as_str())
            .with(names::ARIA_HASPOPUP, "true")
            .with(names::ARIA_ACTIVEDESCENDANT, "");
        button.set_role(AccessibleRole::Combobox);
        button.set_flag(names::ARIA_EXPANDED, false);
        button.set_flag(names::ARIA_DISABLED, true);

        let mut listbox = AttributeMap::new()
            .with(names::ID, menu_id.as_str())
            .with(names::TABINDEX, "-1");
        listbox.set_role(AccessibleRole::Listbox);
        listbox.set_flag(names::ARIA_HIDDEN, true);
        listbox.set_flag(names::ARIA_DISABLED, false);

        Self {
            menu_id,
            button,
            listbox,
            mirror: Mirror::new(),
            options: Vec::new(),
        }
    }

    /// Id of the listbox, referenced by the button's `aria-owns`.
    pub fn menu_id(&self) -> &str {
        &self.menu_id
    }

    pub fn button(&self) -> &AttributeMap {
        &self.button
    }

    pub fn listbox(&self) -> &AttributeMap {
        &self.listbox
    }

    /// Listbox options in list order; groups are not reflected.
    pub fn options(&self) -> &[AriaOption] {
        &self.options
    }

    /// Element id of the option mirroring `key`.
    pub fn option_id(&self, key: NodeKey) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.key == key)
            .map(AriaOption::id)
    }

    /// Keep the listbox in sync with the list's options.
    fn sync_menu(&mut self, list: &SourceList) -> Vec<MirrorEffect> {
        let effects = self.mirror.sync(&flatten_options(&list.snapshot()));
        self.options = self
            .mirror
            .nodes()
            .iter()
            .map(|node| self.aria_option(node))
            .collect();
        effects
    }

    fn aria_option(&self, node: &MirrorNode) -> AriaOption {
        let mut attributes = AttributeMap::new()
            .with(names::ID, format!("{}:{}", self.menu_id, node.id))
            .with(names::TABINDEX, "-1");
        attributes.set_role(AccessibleRole::Option);
        attributes.set_flag(names::ARIA_DISABLED, node.attributes.disabled);
        attributes.set_optional(names::TITLE, node.attributes.title.as_deref());
        AriaOption {
            key: node.key,
            text: node.attributes.text.clone(),
            attributes,
        }
    }

    /// Point the button at the selected option and mirror the list's labels.
    fn sync_button(&mut self, list: &SourceList) {
        let selected_id = list
            .selected_option()
            .and_then(|option| self.option_id(option.key))
            .unwrap_or_default()
            .to_string();
        self.button.set(names::ARIA_ACTIVEDESCENDANT, selected_id.as_str());
        self.button.set(names::ARIA_LABELLEDBY, selected_id);

        let title = list.title().filter(|title| !title.is_empty());
        self.button.set_optional(names::TITLE, title.as_deref());
        self.button
            .set_optional(names::ARIA_LABEL, list.aria_label().as_deref());
    }

    fn set_open(&mut self, open: bool) {
        self.button.set_flag(names::ARIA_EXPANDED, open);
        self.button.set_flag(names::ARIA_DISABLED, !open);
        self.listbox.set_flag(names::ARIA_HIDDEN, !open);
    }
}

#[derive(Debug)]
pub struct ManagedAriaStrategy {
    ui: ManagedAriaUi,
    blur: BlurDebounce,
    typeahead: Typeahead,
    last_keystroke: Option<Instant>,
}

impl ManagedAriaStrategy {
    pub fn new(instance: u64, config: &SelectConfig) -> Self {
        Self {
            ui: ManagedAriaUi::new(instance),
            blur: BlurDebounce,
            typeahead: Typeahead::new(config.typeahead_timeout()),
            last_keystroke: None,
        }
    }

    /// Whether a label click should move focus to the combobox button.
    fn label_targets_list(label: &LabelTarget, list: &SourceList) -> bool {
        match &label.html_for {
            Some(html_for) => list.id().as_deref() == Some(html_for.as_str()),
            None => label.contains_list,
        }
    }

    /// Append `ch` to the typeahead buffer and return the designated option.
    fn type_ahead(
        &mut self,
        ctx: &mut BrokerContext<'_>,
        ch: char,
        current: Option<NodeKey>,
    ) -> Option<NodeKey> {
        // Host may not have driven the reset timer yet.
        if self
            .last_keystroke
            .is_some_and(|last| ctx.now.saturating_duration_since(last) >= self.typeahead.timeout())
        {
            self.typeahead.clear();
        }
        self.last_keystroke = Some(ctx.now);

        let typed = self.typeahead.push(ch).to_string();
        ctx.start_timer(TimerPurpose::TypeaheadReset, self.typeahead.timeout());

        let options = ctx.list.option_infos();
        let found = search(&options, &typed, current, ctx.env.lacks_dead_key_accents());
        tracing::trace!(
            target: targets::STRATEGY,
            typed = %typed,
            found = ?found.map(|option| option.index),
            "typeahead"
        );
        found.map(|option| option.key)
    }
}

impl BehaviorStrategy for ManagedAriaStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ManagedAria
    }

    fn mount(&mut self, ctx: &mut BrokerContext<'_>) {
        self.ui.sync_menu(ctx.list);
        self.ui.sync_button(ctx.list);
        self.ui.set_open(ctx.is_open());
    }

    fn unmount(&mut self, ctx: &mut BrokerContext<'_>) {
        ctx.cancel_timer(TimerPurpose::TypeaheadReset);
        self.typeahead.clear();
        self.last_keystroke = None;
    }

    fn set_open(&mut self, ctx: &mut BrokerContext<'_>, open: bool) {
        ctx.set_open(open);
        self.ui.set_open(open);
    }

    fn on_ui_event(&mut self, ctx: &mut BrokerContext<'_>, event: &UiEvent) -> EventDisposition {
        ctx.ensure_focus(FocusTarget::AriaButton);

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

        ctx.request_focus_intent(FocusTarget::AriaButton);
        disposition
    }

    fn on_change(&mut self, ctx: &mut BrokerContext<'_>) {
        self.ui.sync_button(ctx.list);
        ctx.ensure_focus(FocusTarget::AriaButton);
    }

    fn on_focus(&mut self, ctx: &mut BrokerContext<'_>) {
        self.blur.focus(ctx);
    }

    fn on_blur(&mut self, ctx: &mut BrokerContext<'_>) {
        self.blur.blur(ctx);
    }

    fn on_key_down(&mut self, ctx: &mut BrokerContext<'_>, event: &KeyPressEvent) -> EventDisposition {
        let options = ctx.list.option_infos();
        let current = options
            .iter()
            .find(|option| option.enabled && option.selected)
            .map(|option| option.key);
        let open = ctx.is_open();
        let page = if open { ctx.config.page_size } else { 1 };

        let mut disposition = EventDisposition::IGNORED;
        let mut target = None;

        match event.key {
            Key::ArrowUp | Key::ArrowDown if event.modifiers.alt => {
                disposition = EventDisposition::PREVENT_DEFAULT;
                self.set_open(ctx, !open);
            }
            Key::Enter => {
                disposition = EventDisposition::PREVENT_DEFAULT;
                self.set_open(ctx, !open);
            }
            Key::Space => {
                disposition = EventDisposition::PREVENT_DEFAULT;
                if !open {
                    self.set_open(ctx, true);
                }
            }
            Key::Escape => {
                disposition = EventDisposition::PREVENT_DEFAULT;
                self.set_open(ctx, false);
            }
            key => {
                if let Some(step) = Navigation::from_key(key, page) {
                    disposition = EventDisposition::PREVENT_DEFAULT;
                    target = step.resolve(&options).map(|option| option.key);
                }
            }
        }

        if let Some(ch) = event.printable_char()
            && let Some(found) = self.type_ahead(ctx, ch, current)
        {
            target = Some(found);
        }

        if let Some(key) = target
            && Some(key) != current
        {
            match ctx.list.set_selected(key, true) {
                Ok(()) => ctx.list.dispatch_change(),
                Err(error) => {
                    tracing::warn!(target: targets::STRATEGY, %error, "keyboard selection dropped");
                }
            }
        }

        disposition
    }

    fn on_document_event(
        &mut self,
        ctx: &mut BrokerContext<'_>,
        event: &DocumentEvent,
    ) -> EventDisposition {
        match (&event.kind, &event.target) {
            // Clicks inside the dropdown do not always arrive, so a release
            // outside the widget closes it.
            (DocumentEventKind::MouseUp, target) if !target.is_ui() => {
                self.set_open(ctx, false);
                EventDisposition::IGNORED
            }
            (DocumentEventKind::Click, EventTarget::Label(label))
                if Self::label_targets_list(label, ctx.list) =>
            {
                ctx.ensure_focus(FocusTarget::AriaButton);
                EventDisposition::PREVENT_DEFAULT
            }
            _ => EventDisposition::IGNORED,
        }
    }

    fn on_timer(&mut self, ctx: &mut BrokerContext<'_>, purpose: TimerPurpose) {
        match purpose {
            TimerPurpose::BlurDebounce => {
                self.blur.expire(ctx);
                self.set_open(ctx, false);
            }
            TimerPurpose::TypeaheadReset => {
                self.typeahead.clear();
                self.last_keystroke = None;
            }
        }
    }

    fn mutation_filter(&self) -> Option<MutationFilter> {
        Some(MutationFilter::managed_aria())
    }

    fn on_mutations(&mut self, ctx: &mut BrokerContext<'_>) {
        self.ui.sync_menu(ctx.list);
        self.ui.sync_button(ctx.list);
    }

    fn focus_target(&self) -> FocusTarget {
        FocusTarget::AriaButton
    }

    fn generate_meta_attributes(&self, _env: &Environment, base: AttributeMap) -> AttributeMap {
        base.with(names::MANAGED_ARIA, "")
    }

    fn aria_ui(&self) -> Option<&ManagedAriaUi> {
        Some(&self.ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::OptionSpec;

    #[test]
    fn test_ui_model_tracks_list() {
        let list = SourceList::from_nodes([
            OptionSpec::new("One").title("first").into(),
            OptionSpec::new("Two").disabled().into(),
        ]);
        list.set_aria_label(Some("Pick one".into()));

        let mut ui = ManagedAriaUi::new(7);
        ui.sync_menu(&list);
        ui.sync_button(&list);

        assert_eq!(ui.menu_id(), "horizon-select:managed-aria:7");
        assert_eq!(ui.options().len(), 2);
        assert_eq!(ui.options()[0].id(), "horizon-select:managed-aria:7:1");
        assert_eq!(ui.options()[0].attributes.get(names::TITLE), Some("first"));
        assert_eq!(ui.options()[1].attributes.get(names::ARIA_DISABLED), Some("true"));
        assert_eq!(
            ui.button().get(names::ARIA_ACTIVEDESCENDANT),
            Some("horizon-select:managed-aria:7:1")
        );
        assert_eq!(ui.button().get(names::ARIA_LABEL), Some("Pick one"));
        assert_eq!(ui.button().get(names::ARIA_OWNS), Some(ui.menu_id()));

        // Surviving options keep their ids.
        let first = list.options()[0];
        list.insert_before(first, "Zero").unwrap();
        ui.sync_menu(&list);
        assert_eq!(ui.option_id(first), Some("horizon-select:managed-aria:7:1"));
        assert_eq!(ui.options()[0].id(), "horizon-select:managed-aria:7:3");
    }

    #[test]
    fn test_open_state_attributes() {
        let mut ui = ManagedAriaUi::new(1);
        assert_eq!(ui.button().get(names::ARIA_EXPANDED), Some("false"));
        ui.set_open(true);
        assert_eq!(ui.button().get(names::ARIA_EXPANDED), Some("true"));
        assert_eq!(ui.button().get(names::ARIA_DISABLED), Some("false"));
        assert_eq!(ui.listbox().get(names::ARIA_HIDDEN), Some("false"));
    }

    #[test]
    fn test_label_matching() {
        let list = SourceList::with_options(["a"]);
        list.set_attribute("id", Some("fruit".into()));

        let by_id = LabelTarget {
            html_for: Some("fruit".into()),
            contains_list: false,
        };
        let other = LabelTarget {
            html_for: Some("veg".into()),
            contains_list: true,
        };
        let wrapping = LabelTarget {
            html_for: None,
            contains_list: true,
        };
        assert!(ManagedAriaStrategy::label_targets_list(&by_id, &list));
        assert!(!ManagedAriaStrategy::label_targets_list(&other, &list));
        assert!(ManagedAriaStrategy::label_targets_list(&wrapping, &list));
    }
}
