//! Incremental two-cursor reconciliation.
//!
//! [`reconcile`] takes the previous mirror and the current source snapshot
//! and produces the new mirror plus the list of effects a host must apply
//! to its rendered tree. Surviving nodes keep their [`MirrorId`].
//!
//! Per level the pass runs in two steps:
//!
//! 1. Nodes whose source item is gone are removed.
//! 2. One forward walk pairs the old cursor with each new item. A match
//!    keeps the node and refreshes its attributes; a mismatch builds a new
//!    node and inserts it before the old cursor, which stays put.
//!
//! A reordered item therefore shows up as a remove plus an insert.

use std::collections::{HashSet, VecDeque};

use horizon_select_core::logging::targets;

use super::builder::{attributes_for, build_node};
use super::node::{MirrorId, MirrorIdAllocator, MirrorNode};
use crate::source::{NodeKey, SnapshotKind, SnapshotNode};

/// A change a host applies to its rendered tree, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorEffect {
    /// The node and its children were dropped.
    Removed { id: MirrorId, key: NodeKey },
    /// A new node (with its children) was created.
    Inserted {
        id: MirrorId,
        key: NodeKey,
        /// Enclosing group node, `None` at the top level.
        parent: Option<MirrorId>,
        /// Sibling to insert before, `None` to append.
        before: Option<MirrorId>,
    },
    /// A surviving node's attributes changed.
    Updated { id: MirrorId, key: NodeKey },
}

impl MirrorEffect {
    /// Whether the effect changes the tree's shape.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Updated { .. })
    }
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub nodes: Vec<MirrorNode>,
    pub effects: Vec<MirrorEffect>,
}

/// Run one reconciliation pass over the whole tree.
#[tracing::instrument(skip_all, target = "horizon_select::mirror", level = "trace")]
pub fn reconcile(
    old: Vec<MirrorNode>,
    new: &[SnapshotNode],
    ids: &mut MirrorIdAllocator,
) -> Reconciliation {
    let mut effects = Vec::new();
    let nodes = reconcile_level(old, new, false, None, ids, &mut effects);
    Reconciliation { nodes, effects }
}

fn reconcile_level(
    old: Vec<MirrorNode>,
    new: &[SnapshotNode],
    inherited_disabled: bool,
    parent: Option<MirrorId>,
    ids: &mut MirrorIdAllocator,
    effects: &mut Vec<MirrorEffect>,
) -> Vec<MirrorNode> {
    let present: HashSet<NodeKey> = new.iter().map(|item| item.key).collect();

    let mut cursor = VecDeque::with_capacity(old.len());
    for node in old {
        if present.contains(&node.key) {
            cursor.push_back(node);
        } else {
            remove(node, effects);
        }
    }

    let mut placed = HashSet::with_capacity(new.len());
    let mut result = Vec::with_capacity(new.len());

    for item in new {
        // A node whose item was already placed earlier in this pass was
        // reordered; its replacement exists, so drop it.
        while cursor.front().is_some_and(|node| placed.contains(&node.key)) {
            if let Some(stale) = cursor.pop_front() {
                remove(stale, effects);
            }
        }

        let matched = cursor.front().is_some_and(|node| node.key == item.key);
        let node = match cursor.pop_front() {
            Some(mut node) if matched => {
                refresh(&mut node, item, inherited_disabled, ids, effects);
                node
            }
            front => {
                if let Some(front) = front {
                    cursor.push_front(front);
                }
                let node = build_node(item, inherited_disabled, ids);
                let before = cursor.front().map(|node| node.id);
                tracing::trace!(target: targets::MIRROR, id = %node.id, ?before, "node inserted");
                effects.push(MirrorEffect::Inserted {
                    id: node.id,
                    key: node.key,
                    parent,
                    before,
                });
                node
            }
        };

        placed.insert(item.key);
        result.push(node);
    }

    for leftover in cursor {
        remove(leftover, effects);
    }

    result
}

fn refresh(
    node: &mut MirrorNode,
    item: &SnapshotNode,
    inherited_disabled: bool,
    ids: &mut MirrorIdAllocator,
    effects: &mut Vec<MirrorEffect>,
) {
    let attributes = attributes_for(item, inherited_disabled);
    if node.attributes != attributes {
        node.attributes = attributes;
        effects.push(MirrorEffect::Updated {
            id: node.id,
            key: node.key,
        });
    }

    if let SnapshotKind::Group { children, .. } = &item.kind {
        let old_children = std::mem::take(&mut node.children);
        node.children = reconcile_level(
            old_children,
            children,
            node.attributes.disabled,
            Some(node.id),
            ids,
            effects,
        );
    }
}

fn remove(node: MirrorNode, effects: &mut Vec<MirrorEffect>) {
    tracing::trace!(target: targets::MIRROR, id = %node.id, "node removed");
    effects.push(MirrorEffect::Removed {
        id: node.id,
        key: node.key,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::builder::build;
    use crate::source::{GroupSpec, OptionSpec, SourceList};

    fn keys(nodes: &[MirrorNode]) -> Vec<NodeKey> {
        nodes.iter().map(|node| node.key).collect()
    }

    fn snapshot_keys(nodes: &[SnapshotNode]) -> Vec<NodeKey> {
        nodes.iter().map(|node| node.key).collect()
    }

    #[test]
    fn test_insert_in_middle_keeps_neighbours() {
        let list = SourceList::with_options(["a", "c"]);
        let mut ids = MirrorIdAllocator::new();
        let mirror = build(&list.snapshot(), &mut ids);
        let (a, c) = (mirror[0].id, mirror[1].id);

        let options = list.options();
        let b = list.insert_before(options[1], "b").unwrap();
        let pass = reconcile(mirror, &list.snapshot(), &mut ids);

        assert_eq!(keys(&pass.nodes), list.options());
        assert_eq!(pass.nodes[0].id, a);
        assert_eq!(pass.nodes[2].id, c);
        assert_eq!(
            pass.effects,
            vec![MirrorEffect::Inserted {
                id: pass.nodes[1].id,
                key: b,
                parent: None,
                before: Some(c),
            }]
        );
    }

    #[test]
    fn test_removal_and_update() {
        let list = SourceList::with_options(["a", "b", "c"]);
        let mut ids = MirrorIdAllocator::new();
        let mirror = build(&list.snapshot(), &mut ids);
        let options = list.options();

        list.remove(options[1]).unwrap();
        list.set_text(options[2], "see").unwrap();
        let pass = reconcile(mirror.clone(), &list.snapshot(), &mut ids);

        assert_eq!(keys(&pass.nodes), vec![options[0], options[2]]);
        assert_eq!(pass.nodes[1].id, mirror[2].id);
        assert_eq!(pass.nodes[1].attributes.text, "see");
        assert_eq!(
            pass.effects,
            vec![
                MirrorEffect::Removed {
                    id: mirror[1].id,
                    key: options[1],
                },
                MirrorEffect::Updated {
                    id: mirror[2].id,
                    key: options[2],
                },
            ]
        );
    }

    #[test]
    fn test_reorder_is_remove_plus_insert() {
        let list = SourceList::with_options(["a", "b", "c"]);
        let mut ids = MirrorIdAllocator::new();
        let mirror = build(&list.snapshot(), &mut ids);
        let options = list.options();

        // a b c -> c a b
        list.move_before(options[2], Some(options[0])).unwrap();
        let pass = reconcile(mirror.clone(), &list.snapshot(), &mut ids);

        assert_eq!(keys(&pass.nodes), snapshot_keys(&list.snapshot()));
        assert_eq!(pass.nodes[1].id, mirror[0].id);
        assert_eq!(pass.nodes[2].id, mirror[1].id);
        assert_ne!(pass.nodes[0].id, mirror[2].id);

        let structural = pass.effects.iter().filter(|e| e.is_structural()).count();
        assert_eq!(structural, 2);
    }

    #[test]
    fn test_group_disable_cascades_to_children() {
        let list = SourceList::from_nodes([GroupSpec::new("g")
            .option(OptionSpec::new("x"))
            .option(OptionSpec::new("y"))
            .into()]);
        let mut ids = MirrorIdAllocator::new();
        let mirror = build(&list.snapshot(), &mut ids);
        let group = list.snapshot()[0].key;

        list.set_disabled(group, true).unwrap();
        let pass = reconcile(mirror, &list.snapshot(), &mut ids);

        assert!(pass.nodes[0].attributes.disabled);
        assert!(pass.nodes[0].children.iter().all(|c| c.attributes.disabled));
        assert_eq!(pass.effects.len(), 3);
        assert!(pass.effects.iter().all(|e| !e.is_structural()));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let list = SourceList::from_nodes([
            OptionSpec::new("a").into(),
            GroupSpec::new("g").option(OptionSpec::new("b")).into(),
        ]);
        let mut ids = MirrorIdAllocator::new();
        let first = reconcile(Vec::new(), &list.snapshot(), &mut ids);
        assert_eq!(first.effects.len(), 2);

        let second = reconcile(first.nodes.clone(), &list.snapshot(), &mut ids);
        assert!(second.effects.is_empty());
        assert_eq!(second.nodes, first.nodes);
    }
}
