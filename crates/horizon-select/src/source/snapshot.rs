//! Immutable snapshots of the source tree.

use super::node::NodeKey;

/// One node of a source list snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotNode {
    pub key: NodeKey,
    pub kind: SnapshotKind,
}

/// Node payload of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotKind {
    Option {
        text: String,
        title: Option<String>,
        /// The option's own flag; group inheritance is applied by consumers.
        disabled: bool,
        selected: bool,
    },
    Group {
        label: String,
        disabled: bool,
        children: Vec<SnapshotNode>,
    },
}

impl SnapshotNode {
    /// Child nodes of a group, empty for options.
    pub fn children(&self) -> &[SnapshotNode] {
        match &self.kind {
            SnapshotKind::Group { children, .. } => children,
            SnapshotKind::Option { .. } => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, SnapshotKind::Group { .. })
    }
}

/// Flatten a snapshot to its options in list order, folding each group's
/// disabled flag into its options.
pub fn flatten_options(nodes: &[SnapshotNode]) -> Vec<SnapshotNode> {
    let mut flat = Vec::new();
    for node in nodes {
        match &node.kind {
            SnapshotKind::Option { .. } => flat.push(node.clone()),
            SnapshotKind::Group {
                disabled: group_disabled,
                children,
                ..
            } => {
                for child in children {
                    let mut child = child.clone();
                    if let SnapshotKind::Option { disabled, .. } = &mut child.kind {
                        *disabled |= *group_disabled;
                    }
                    flat.push(child);
                }
            }
        }
    }
    flat
}
