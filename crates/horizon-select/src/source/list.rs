//! The live, externally mutable list of options.

use std::collections::BTreeMap;
use std::sync::Arc;

use horizon_select_core::Signal;
use horizon_select_core::logging::targets;
use parking_lot::RwLock;
use slotmap::SlotMap;

use super::mutation::{AttributeName, MutationRecord, MutationTarget};
use super::node::{GroupData, NodeKey, NodeSpec, OptionData, OptionInfo, OptionSpec, SourceNode};
use super::snapshot::{SnapshotKind, SnapshotNode};
use crate::error::{Result, SelectError};

/// The list-level flags that decide which behavior strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities {
    pub disabled: bool,
    pub multiple: bool,
}

#[derive(Debug, Default)]
struct SourceTree {
    nodes: SlotMap<NodeKey, SourceNode>,
    top: Vec<NodeKey>,
    disabled: bool,
    multiple: bool,
    title: Option<String>,
    aria_label: Option<String>,
    attributes: BTreeMap<String, String>,
}

/// A shared handle to a mutable option list.
///
/// Clones share the same list. Any holder may mutate it at any time; every
/// write is reported on [`mutated`](Self::mutated) after the write lock is
/// released, so slots may read the list freely.
///
/// Without the `multiple` flag the list keeps native single-select
/// semantics: at most one option is selected, and whenever a structural
/// change or a deselection leaves none selected, the first enabled option is
/// selected.
///
/// ```
/// use horizon_select::source::{OptionSpec, SourceList};
///
/// let list = SourceList::with_options(["Apple", "Banana"]);
/// assert_eq!(list.selected_index(), Some(0));
///
/// let cherry = list.append(None, OptionSpec::new("Cherry").selected()).unwrap();
/// assert_eq!(list.selected_index(), Some(2));
/// assert_eq!(list.index_of(cherry), Some(2));
/// ```
#[derive(Clone)]
pub struct SourceList {
    tree: Arc<RwLock<SourceTree>>,
    mutated: Arc<Signal<MutationRecord>>,
    changed: Arc<Signal<()>>,
}

static_assertions::assert_impl_all!(SourceList: Send, Sync, Clone);

impl Default for SourceList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SourceList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tree = self.tree.read();
        f.debug_struct("SourceList")
            .field("options", &tree.option_keys().len())
            .field("disabled", &tree.disabled)
            .field("multiple", &tree.multiple)
            .finish()
    }
}

impl SourceList {
    /// Create an empty single-select list.
    pub fn new() -> Self {
        Self {
            tree: Arc::new(RwLock::new(SourceTree::default())),
            mutated: Arc::new(Signal::new()),
            changed: Arc::new(Signal::new()),
        }
    }

    /// Create a single-select list of plain options.
    pub fn with_options<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_nodes(texts.into_iter().map(|text| NodeSpec::Option(OptionSpec::new(text))))
    }

    /// Create a single-select list from node descriptions.
    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeSpec>) -> Self {
        let list = Self::new();
        {
            let mut tree = list.tree.write();
            for spec in nodes {
                let position = tree.top.len();
                // Top-level insertion of either node kind cannot fail.
                let _ = tree.insert(None, position, spec);
            }
            // Nobody can observe the list yet.
            tree.normalize_single(None, true, &mut Vec::new());
        }
        list
    }

    /// Emitted once per mutation record, after the write completed.
    pub fn mutated(&self) -> &Arc<Signal<MutationRecord>> {
        &self.mutated
    }

    /// Emitted by [`dispatch_change`](Self::dispatch_change).
    pub fn changed(&self) -> &Arc<Signal<()>> {
        &self.changed
    }

    /// Whether both handles refer to the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree)
    }

    fn write<R>(
        &self,
        f: impl FnOnce(&mut SourceTree, &mut Vec<MutationRecord>) -> Result<R>,
    ) -> Result<R> {
        let mut records = Vec::new();
        let result = {
            let mut tree = self.tree.write();
            f(&mut tree, &mut records)
        };
        for record in records {
            tracing::trace!(target: targets::SOURCE, ?record, "source list mutated");
            self.mutated.emit(record);
        }
        result
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Append a node at the end of the top level (`parent = None`) or of a group.
    pub fn append(&self, parent: Option<NodeKey>, spec: impl Into<NodeSpec>) -> Result<NodeKey> {
        let spec = spec.into();
        self.write(|tree, records| {
            let position = tree.container(parent)?.len();
            let key = tree.insert(parent, position, spec)?;
            records.push(MutationRecord::child_list(target_of(parent)));
            let preferred = tree.selected_preference(key);
            tree.normalize_single(preferred, true, records);
            Ok(key)
        })
    }

    /// Insert a node immediately before `reference`, in the reference's container.
    pub fn insert_before(&self, reference: NodeKey, spec: impl Into<NodeSpec>) -> Result<NodeKey> {
        let spec = spec.into();
        self.write(|tree, records| {
            let (parent, position) = tree.locate(reference)?;
            let key = tree.insert(parent, position, spec)?;
            records.push(MutationRecord::child_list(target_of(parent)));
            let preferred = tree.selected_preference(key);
            tree.normalize_single(preferred, true, records);
            Ok(key)
        })
    }

    /// Remove a node; removing a group removes its options.
    pub fn remove(&self, key: NodeKey) -> Result<()> {
        self.write(|tree, records| {
            let (parent, position) = tree.locate(key)?;
            tree.container_mut(parent)?.remove(position);
            tree.drop_subtree(key);
            records.push(MutationRecord::child_list(target_of(parent)));
            tree.normalize_single(None, true, records);
            Ok(())
        })
    }

    /// Remove every node.
    pub fn clear(&self) -> Result<()> {
        self.write(|tree, records| {
            if tree.top.is_empty() {
                return Ok(());
            }
            tree.top.clear();
            tree.nodes.clear();
            records.push(MutationRecord::child_list(MutationTarget::List));
            Ok(())
        })
    }

    /// Move a node before `reference`, or to the end of the top level when
    /// `reference` is `None`.
    pub fn move_before(&self, key: NodeKey, reference: Option<NodeKey>) -> Result<()> {
        self.write(|tree, records| {
            if reference == Some(key) {
                return Ok(());
            }
            let destination_parent = match reference {
                Some(reference) => tree.locate(reference)?.0,
                None => None,
            };
            if destination_parent.is_some() && tree.is_group(key) {
                return Err(SelectError::InvalidStructure("groups cannot be nested"));
            }

            let (source_parent, position) = tree.locate(key)?;
            tree.container_mut(source_parent)?.remove(position);
            let destination_position = match reference {
                Some(reference) => tree.locate(reference)?.1,
                None => tree.top.len(),
            };
            tree.container_mut(destination_parent)?
                .insert(destination_position, key);
            if let Some(SourceNode::Option(option)) = tree.nodes.get_mut(key) {
                option.parent = destination_parent;
            }

            records.push(MutationRecord::child_list(target_of(source_parent)));
            if destination_parent != source_parent {
                records.push(MutationRecord::child_list(target_of(destination_parent)));
            }
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Node attributes
    // ------------------------------------------------------------------

    /// Change an option's text.
    pub fn set_text(&self, key: NodeKey, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.write(|tree, records| {
            let option = tree.option_mut(key)?;
            if option.text != text {
                option.text = text;
                records.push(MutationRecord::character_data(key));
            }
            Ok(())
        })
    }

    /// Change an option's title (tooltip).
    pub fn set_title(&self, key: NodeKey, title: Option<String>) -> Result<()> {
        self.write(|tree, records| {
            let option = tree.option_mut(key)?;
            if option.title != title {
                option.title = title;
                records.push(MutationRecord::attribute(
                    MutationTarget::Node(key),
                    AttributeName::Title,
                ));
            }
            Ok(())
        })
    }

    /// Change a group's label.
    pub fn set_label(&self, key: NodeKey, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        self.write(|tree, records| {
            let group = match tree.nodes.get_mut(key) {
                Some(SourceNode::Group(group)) => group,
                Some(SourceNode::Option(_)) => {
                    return Err(SelectError::InvalidStructure("only groups have a label"));
                }
                None => return Err(SelectError::UnknownNode(key)),
            };
            if group.label != label {
                group.label = label;
                records.push(MutationRecord::attribute(
                    MutationTarget::Node(key),
                    AttributeName::Label,
                ));
            }
            Ok(())
        })
    }

    /// Change the own disabled flag of an option or group.
    pub fn set_disabled(&self, key: NodeKey, disabled: bool) -> Result<()> {
        self.write(|tree, records| {
            let flag = match tree.nodes.get_mut(key) {
                Some(SourceNode::Option(option)) => &mut option.disabled,
                Some(SourceNode::Group(group)) => &mut group.disabled,
                None => return Err(SelectError::UnknownNode(key)),
            };
            if *flag != disabled {
                *flag = disabled;
                records.push(MutationRecord::attribute(
                    MutationTarget::Node(key),
                    AttributeName::Disabled,
                ));
            }
            Ok(())
        })
    }

    /// Select or deselect an option.
    pub fn set_selected(&self, key: NodeKey, selected: bool) -> Result<()> {
        self.write(|tree, records| {
            tree.option_mut(key)?;
            tree.set_option_selected(key, selected, records);
            tree.normalize_single(selected.then_some(key), true, records);
            Ok(())
        })
    }

    /// Select only the option at `index`, or deselect everything.
    ///
    /// Out-of-range indices deselect everything.
    pub fn set_selected_index(&self, index: Option<usize>) {
        // Infallible: only existing keys are touched.
        let _ = self.write(|tree, records| {
            let options = tree.option_keys();
            let target = index.and_then(|index| options.get(index).copied());
            for key in options {
                tree.set_option_selected(key, Some(key) == target, records);
            }
            Ok(())
        });
    }

    /// Apply several selection writes as one batch.
    ///
    /// Either every key is valid and all writes apply, or nothing changes.
    pub fn apply_selection(&self, updates: &[(NodeKey, bool)]) -> Result<()> {
        self.write(|tree, records| {
            for &(key, _) in updates {
                tree.option_mut(key)?;
            }
            for &(key, selected) in updates {
                tree.set_option_selected(key, selected, records);
            }
            let preferred = updates.iter().rev().find(|(_, selected)| *selected).map(|(k, _)| *k);
            tree.normalize_single(preferred, true, records);
            Ok(())
        })
    }

    /// Announce that the selection changed.
    pub fn dispatch_change(&self) {
        tracing::trace!(target: targets::SOURCE, "change dispatched");
        self.changed.emit(());
    }

    // ------------------------------------------------------------------
    // List attributes
    // ------------------------------------------------------------------

    /// Toggle multiple-selection mode.
    ///
    /// Leaving multiple mode keeps only the last selected option (or selects
    /// the first enabled one when none is selected).
    pub fn set_multiple(&self, multiple: bool) {
        let _ = self.write(|tree, records| {
            if tree.multiple != multiple {
                tree.multiple = multiple;
                records.push(MutationRecord::attribute(
                    MutationTarget::List,
                    AttributeName::Multiple,
                ));
                tree.normalize_single(None, true, records);
            }
            Ok(())
        });
    }

    /// Toggle the list's own disabled flag.
    pub fn set_list_disabled(&self, disabled: bool) {
        let _ = self.write(|tree, records| {
            if tree.disabled != disabled {
                tree.disabled = disabled;
                records.push(MutationRecord::attribute(
                    MutationTarget::List,
                    AttributeName::Disabled,
                ));
            }
            Ok(())
        });
    }

    /// Change the list's title.
    pub fn set_list_title(&self, title: Option<String>) {
        let _ = self.write(|tree, records| {
            if tree.title != title {
                tree.title = title;
                records.push(MutationRecord::attribute(MutationTarget::List, AttributeName::Title));
            }
            Ok(())
        });
    }

    /// Change the list's `aria-label`.
    pub fn set_aria_label(&self, label: Option<String>) {
        let _ = self.write(|tree, records| {
            if tree.aria_label != label {
                tree.aria_label = label;
                records.push(MutationRecord::attribute(
                    MutationTarget::List,
                    AttributeName::AriaLabel,
                ));
            }
            Ok(())
        });
    }

    /// Set or remove an attribute the engine does not interpret (`id`, data
    /// attributes and so on).
    pub fn set_attribute(&self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        let _ = self.write(|tree, records| {
            let changed = match value {
                Some(value) => tree.attributes.insert(name.clone(), value.clone()) != Some(value),
                None => tree.attributes.remove(&name).is_some(),
            };
            if changed {
                records.push(MutationRecord::attribute(
                    MutationTarget::List,
                    AttributeName::Other(name),
                ));
            }
            Ok(())
        });
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn capabilities(&self) -> Capabilities {
        let tree = self.tree.read();
        Capabilities {
            disabled: tree.disabled,
            multiple: tree.multiple,
        }
    }

    pub fn is_multiple(&self) -> bool {
        self.tree.read().multiple
    }

    pub fn is_disabled(&self) -> bool {
        self.tree.read().disabled
    }

    pub fn title(&self) -> Option<String> {
        self.tree.read().title.clone()
    }

    pub fn aria_label(&self) -> Option<String> {
        self.tree.read().aria_label.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.tree.read().attributes.get(name).cloned()
    }

    /// The list's `id` attribute.
    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// Number of options (groups are not counted).
    pub fn len(&self) -> usize {
        self.tree.read().option_keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.tree.read().nodes.contains_key(key)
    }

    pub fn is_group(&self, key: NodeKey) -> bool {
        self.tree.read().is_group(key)
    }

    /// Option keys in list order.
    pub fn options(&self) -> Vec<NodeKey> {
        self.tree.read().option_keys()
    }

    /// Every option in list order.
    pub fn option_infos(&self) -> Vec<OptionInfo> {
        let tree = self.tree.read();
        tree.option_keys()
            .into_iter()
            .enumerate()
            .filter_map(|(index, key)| tree.option_info(key, index))
            .collect()
    }

    /// Enabled options in list order.
    pub fn enabled_options(&self) -> Vec<OptionInfo> {
        self.option_infos().into_iter().filter(|info| info.enabled).collect()
    }

    pub fn option_info(&self, key: NodeKey) -> Option<OptionInfo> {
        let tree = self.tree.read();
        let index = tree.option_keys().iter().position(|k| *k == key)?;
        tree.option_info(key, index)
    }

    /// Position of an option in the flattened option list.
    pub fn index_of(&self, key: NodeKey) -> Option<usize> {
        self.tree.read().option_keys().iter().position(|k| *k == key)
    }

    pub fn text(&self, key: NodeKey) -> Option<String> {
        match self.tree.read().nodes.get(key)? {
            SourceNode::Option(option) => Some(option.text.clone()),
            SourceNode::Group(group) => Some(group.label.clone()),
        }
    }

    /// Neither the option nor its group is disabled.
    pub fn is_enabled(&self, key: NodeKey) -> bool {
        self.tree.read().is_enabled(key)
    }

    pub fn is_selected(&self, key: NodeKey) -> bool {
        matches!(self.tree.read().nodes.get(key), Some(SourceNode::Option(o)) if o.selected)
    }

    /// Index of the first selected option.
    pub fn selected_index(&self) -> Option<usize> {
        let tree = self.tree.read();
        tree.option_keys().iter().position(|key| tree.is_selected(*key))
    }

    /// Indices of all selected options, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        let tree = self.tree.read();
        tree.option_keys()
            .iter()
            .enumerate()
            .filter(|(_, key)| tree.is_selected(**key))
            .map(|(index, _)| index)
            .collect()
    }

    /// The first selected option.
    pub fn selected_option(&self) -> Option<OptionInfo> {
        let tree = self.tree.read();
        let keys = tree.option_keys();
        let index = keys.iter().position(|key| tree.is_selected(*key))?;
        tree.option_info(keys[index], index)
    }

    /// A consistent snapshot of the whole tree.
    pub fn snapshot(&self) -> Vec<SnapshotNode> {
        let tree = self.tree.read();
        tree.top.iter().filter_map(|key| tree.snapshot_node(*key)).collect()
    }
}

fn target_of(parent: Option<NodeKey>) -> MutationTarget {
    parent.map_or(MutationTarget::List, MutationTarget::Node)
}

impl SourceTree {
    fn option_keys(&self) -> Vec<NodeKey> {
        let mut keys = Vec::new();
        for key in &self.top {
            match self.nodes.get(*key) {
                Some(SourceNode::Option(_)) => keys.push(*key),
                Some(SourceNode::Group(group)) => keys.extend(group.children.iter().copied()),
                None => {}
            }
        }
        keys
    }

    fn is_group(&self, key: NodeKey) -> bool {
        matches!(self.nodes.get(key), Some(SourceNode::Group(_)))
    }

    fn is_selected(&self, key: NodeKey) -> bool {
        matches!(self.nodes.get(key), Some(SourceNode::Option(o)) if o.selected)
    }

    fn is_enabled(&self, key: NodeKey) -> bool {
        match self.nodes.get(key) {
            Some(SourceNode::Option(option)) => {
                !option.disabled
                    && !option
                        .parent
                        .is_some_and(|parent| matches!(self.nodes.get(parent), Some(SourceNode::Group(g)) if g.disabled))
            }
            Some(SourceNode::Group(group)) => !group.disabled,
            None => false,
        }
    }

    fn option_info(&self, key: NodeKey, index: usize) -> Option<OptionInfo> {
        match self.nodes.get(key)? {
            SourceNode::Option(option) => Some(OptionInfo {
                key,
                index,
                text: option.text.clone(),
                title: option.title.clone(),
                enabled: self.is_enabled(key),
                selected: option.selected,
            }),
            SourceNode::Group(_) => None,
        }
    }

    fn option_mut(&mut self, key: NodeKey) -> Result<&mut OptionData> {
        match self.nodes.get_mut(key) {
            Some(SourceNode::Option(option)) => Ok(option),
            Some(SourceNode::Group(_)) => Err(SelectError::InvalidStructure("expected an option, found a group")),
            None => Err(SelectError::UnknownNode(key)),
        }
    }

    fn container(&self, parent: Option<NodeKey>) -> Result<&Vec<NodeKey>> {
        match parent {
            None => Ok(&self.top),
            Some(key) => match self.nodes.get(key) {
                Some(SourceNode::Group(group)) => Ok(&group.children),
                Some(SourceNode::Option(_)) => Err(SelectError::InvalidStructure("options have no children")),
                None => Err(SelectError::UnknownNode(key)),
            },
        }
    }

    fn container_mut(&mut self, parent: Option<NodeKey>) -> Result<&mut Vec<NodeKey>> {
        match parent {
            None => Ok(&mut self.top),
            Some(key) => match self.nodes.get_mut(key) {
                Some(SourceNode::Group(group)) => Ok(&mut group.children),
                Some(SourceNode::Option(_)) => Err(SelectError::InvalidStructure("options have no children")),
                None => Err(SelectError::UnknownNode(key)),
            },
        }
    }

    /// The container holding `key` and the position within it.
    fn locate(&self, key: NodeKey) -> Result<(Option<NodeKey>, usize)> {
        let node = self.nodes.get(key).ok_or(SelectError::UnknownNode(key))?;
        let parent = node.parent();
        let position = self
            .container(parent)?
            .iter()
            .position(|k| *k == key)
            .ok_or(SelectError::UnknownNode(key))?;
        Ok((parent, position))
    }

    fn insert(
        &mut self,
        parent: Option<NodeKey>,
        position: usize,
        spec: NodeSpec,
    ) -> Result<NodeKey> {
        // Validate the destination before allocating.
        self.container(parent)?;
        let key = match spec {
            NodeSpec::Option(option) => self.nodes.insert(SourceNode::Option(OptionData {
                text: option.text,
                title: option.title,
                disabled: option.disabled,
                selected: option.selected,
                parent,
            })),
            NodeSpec::Group(group) => {
                if parent.is_some() {
                    return Err(SelectError::InvalidStructure("groups cannot be nested"));
                }
                let key = self.nodes.insert(SourceNode::Group(GroupData {
                    label: group.label,
                    disabled: group.disabled,
                    children: Vec::new(),
                }));
                let children: Vec<NodeKey> = group
                    .options
                    .into_iter()
                    .map(|option| {
                        self.nodes.insert(SourceNode::Option(OptionData {
                            text: option.text,
                            title: option.title,
                            disabled: option.disabled,
                            selected: option.selected,
                            parent: Some(key),
                        }))
                    })
                    .collect();
                if let Some(SourceNode::Group(data)) = self.nodes.get_mut(key) {
                    data.children = children;
                }
                key
            }
        };
        let container = self.container_mut(parent)?;
        let position = position.min(container.len());
        container.insert(position, key);
        Ok(key)
    }

    fn drop_subtree(&mut self, key: NodeKey) {
        if let Some(SourceNode::Group(group)) = self.nodes.remove(key) {
            for child in group.children {
                self.nodes.remove(child);
            }
        }
    }

    /// The option to keep selected after inserting `key`, if it arrived selected.
    fn selected_preference(&self, key: NodeKey) -> Option<NodeKey> {
        match self.nodes.get(key)? {
            SourceNode::Option(option) if option.selected => Some(key),
            SourceNode::Option(_) => None,
            SourceNode::Group(group) => group
                .children
                .iter()
                .rev()
                .copied()
                .find(|child| self.is_selected(*child)),
        }
    }

    fn set_option_selected(&mut self, key: NodeKey, selected: bool, records: &mut Vec<MutationRecord>) {
        if let Some(SourceNode::Option(option)) = self.nodes.get_mut(key)
            && option.selected != selected
        {
            option.selected = selected;
            records.push(MutationRecord::attribute(
                MutationTarget::Node(key),
                AttributeName::Selected,
            ));
        }
    }

    /// Restore single-select selectedness: keep `preferred` (or the last
    /// selected option) and, when `reset` is set and nothing is selected,
    /// select the first enabled option.
    fn normalize_single(
        &mut self,
        preferred: Option<NodeKey>,
        reset: bool,
        records: &mut Vec<MutationRecord>,
    ) {
        if self.multiple {
            return;
        }
        let options = self.option_keys();
        let selected: Vec<NodeKey> = options.iter().copied().filter(|k| self.is_selected(*k)).collect();
        let keep = preferred
            .filter(|key| selected.contains(key))
            .or_else(|| selected.last().copied());

        match keep {
            Some(keep) => {
                for key in selected.into_iter().filter(|key| *key != keep) {
                    self.set_option_selected(key, false, records);
                }
            }
            None if reset => {
                if let Some(first) = options.into_iter().find(|key| self.is_enabled(*key)) {
                    self.set_option_selected(first, true, records);
                }
            }
            None => {}
        }
    }

    fn snapshot_node(&self, key: NodeKey) -> Option<SnapshotNode> {
        let kind = match self.nodes.get(key)? {
            SourceNode::Option(option) => SnapshotKind::Option {
                text: option.text.clone(),
                title: option.title.clone(),
                disabled: option.disabled,
                selected: option.selected,
            },
            SourceNode::Group(group) => SnapshotKind::Group {
                label: group.label.clone(),
                disabled: group.disabled,
                children: group
                    .children
                    .iter()
                    .filter_map(|child| self.snapshot_node(*child))
                    .collect(),
            },
        };
        Some(SnapshotNode { key, kind })
    }
}
