//! The UI-side mirror of the source list.
//!
//! [`Mirror`] owns a persistent tree of [`MirrorNode`]s and keeps it
//! equivalent to the source list through [`reconcile`] passes. Each pass
//! returns the [`MirrorEffect`]s the host applies to its rendered elements.

mod builder;
mod node;
mod reconciler;

pub use builder::{attributes_for, build, build_node};
pub use node::{MirrorAttributes, MirrorId, MirrorIdAllocator, MirrorKind, MirrorNode};
pub use reconciler::{MirrorEffect, Reconciliation, reconcile};

use horizon_select_core::logging::targets;

use crate::source::{NodeKey, SnapshotNode};

/// A persistent mirror tree.
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    nodes: Vec<MirrorNode>,
    ids: MirrorIdAllocator,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the mirror in line with `snapshot`.
    pub fn sync(&mut self, snapshot: &[SnapshotNode]) -> Vec<MirrorEffect> {
        let old = std::mem::take(&mut self.nodes);
        let pass = reconcile(old, snapshot, &mut self.ids);
        self.nodes = pass.nodes;
        tracing::debug!(
            target: targets::MIRROR,
            effects = pass.effects.len(),
            nodes = self.nodes.len(),
            "reconciliation pass complete"
        );
        pass.effects
    }

    /// Drop every node.
    pub fn clear(&mut self) -> Vec<MirrorEffect> {
        self.sync(&[])
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[MirrorNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Source identities of the top-level nodes, in order.
    pub fn identities(&self) -> Vec<NodeKey> {
        self.nodes.iter().map(|node| node.key).collect()
    }

    /// Option nodes in list order, descending into groups.
    pub fn options(&self) -> impl Iterator<Item = &MirrorNode> {
        self.nodes.iter().flat_map(|node| {
            std::iter::once(node)
                .filter(|node| !node.is_group())
                .chain(node.children.iter())
        })
    }

    /// Find a node by id at any depth.
    pub fn find(&self, id: MirrorId) -> Option<&MirrorNode> {
        self.walk().find(|node| node.id == id)
    }

    /// Find the node mirroring `key` at any depth.
    pub fn find_by_key(&self, key: NodeKey) -> Option<&MirrorNode> {
        self.walk().find(|node| node.key == key)
    }

    /// Whether the mirror's identities match `snapshot` at every level.
    pub fn is_equivalent(&self, snapshot: &[SnapshotNode]) -> bool {
        fn level(nodes: &[MirrorNode], items: &[SnapshotNode]) -> bool {
            nodes.len() == items.len()
                && nodes
                    .iter()
                    .zip(items)
                    .all(|(node, item)| node.key == item.key && level(&node.children, item.children()))
        }
        level(&self.nodes, snapshot)
    }

    fn walk(&self) -> impl Iterator<Item = &MirrorNode> {
        self.nodes
            .iter()
            .flat_map(|node| std::iter::once(node).chain(node.children.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{GroupSpec, NodeSpec, OptionSpec, SourceList, flatten_options};

    #[test]
    fn test_sync_and_lookup() {
        let list = SourceList::from_nodes([
            NodeSpec::from("a"),
            GroupSpec::new("g").option(OptionSpec::new("b")).into(),
        ]);
        let mut mirror = Mirror::new();
        let effects = mirror.sync(&list.snapshot());

        assert_eq!(effects.len(), 2);
        assert!(mirror.is_equivalent(&list.snapshot()));
        assert_eq!(mirror.options().count(), 2);

        let b = list.options()[1];
        let node = mirror.find_by_key(b).unwrap();
        assert_eq!(mirror.find(node.id).map(|n| n.key), Some(b));
    }

    #[test]
    fn test_flattened_mirror() {
        let list = SourceList::from_nodes([
            NodeSpec::from("a"),
            GroupSpec::new("g")
                .disabled()
                .option(OptionSpec::new("b"))
                .into(),
        ]);
        let mut mirror = Mirror::new();
        mirror.sync(&flatten_options(&list.snapshot()));

        assert_eq!(mirror.identities(), list.options());
        assert!(mirror.nodes()[1].attributes.disabled);
    }

    #[test]
    fn test_clear() {
        let list = SourceList::with_options(["a", "b"]);
        let mut mirror = Mirror::new();
        mirror.sync(&list.snapshot());
        let effects = mirror.clear();
        assert_eq!(effects.len(), 2);
        assert!(mirror.is_empty());
    }
}
