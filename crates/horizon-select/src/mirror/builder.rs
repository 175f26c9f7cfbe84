//! Stateless construction of mirror nodes from a snapshot.

use super::node::{MirrorAttributes, MirrorIdAllocator, MirrorKind, MirrorNode};
use crate::source::{SnapshotKind, SnapshotNode};

/// The attributes `node` should display, given whether an enclosing group
/// is disabled.
pub fn attributes_for(node: &SnapshotNode, inherited_disabled: bool) -> MirrorAttributes {
    match &node.kind {
        SnapshotKind::Option {
            text,
            title,
            disabled,
            selected,
        } => MirrorAttributes {
            text: text.clone(),
            title: title.clone(),
            disabled: *disabled || inherited_disabled,
            selected: *selected,
        },
        SnapshotKind::Group {
            label, disabled, ..
        } => MirrorAttributes {
            text: label.clone(),
            title: None,
            disabled: *disabled || inherited_disabled,
            selected: false,
        },
    }
}

/// Build a fresh mirror node, recursively for groups.
pub fn build_node(
    node: &SnapshotNode,
    inherited_disabled: bool,
    ids: &mut MirrorIdAllocator,
) -> MirrorNode {
    let attributes = attributes_for(node, inherited_disabled);
    let id = ids.allocate();
    match &node.kind {
        SnapshotKind::Option { .. } => MirrorNode {
            id,
            key: node.key,
            kind: MirrorKind::Option,
            attributes,
            children: Vec::new(),
        },
        SnapshotKind::Group { children, .. } => {
            let disabled = attributes.disabled;
            MirrorNode {
                id,
                key: node.key,
                kind: MirrorKind::Group,
                attributes,
                children: children
                    .iter()
                    .map(|child| build_node(child, disabled, ids))
                    .collect(),
            }
        }
    }
}

/// Build a complete mirror of `nodes`.
pub fn build(nodes: &[SnapshotNode], ids: &mut MirrorIdAllocator) -> Vec<MirrorNode> {
    nodes.iter().map(|node| build_node(node, false, ids)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{GroupSpec, NodeSpec, OptionSpec, SourceList};

    #[test]
    fn test_build_mirrors_structure_and_inheritance() {
        let list = SourceList::from_nodes([
            NodeSpec::from(OptionSpec::new("Solo").title("only one")),
            GroupSpec::new("Locked")
                .disabled()
                .option(OptionSpec::new("Inner"))
                .into(),
        ]);
        let mut ids = MirrorIdAllocator::new();
        let mirror = build(&list.snapshot(), &mut ids);

        assert_eq!(mirror.len(), 2);
        assert_eq!(mirror[0].attributes.title.as_deref(), Some("only one"));
        assert!(mirror[0].attributes.selected);
        assert!(mirror[1].is_group());
        assert_eq!(mirror[1].attributes.text, "Locked");
        assert!(mirror[1].children[0].attributes.disabled);

        let mut all_ids = vec![mirror[0].id, mirror[1].id, mirror[1].children[0].id];
        all_ids.dedup();
        assert_eq!(all_ids.len(), 3);
    }
}
