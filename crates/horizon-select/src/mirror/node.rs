//! Mirror nodes.

use std::fmt;

use crate::source::NodeKey;

/// Identity of a mirror node.
///
/// A node keeps its id for as long as it survives reconciliation passes, so
/// hosts can key their rendered elements by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MirrorId(u64);

impl MirrorId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MirrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out increasing mirror ids, starting at 1.
#[derive(Debug, Clone)]
pub struct MirrorIdAllocator {
    next: u64,
}

impl MirrorIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> MirrorId {
        let id = MirrorId(self.next);
        self.next += 1;
        id
    }
}

impl Default for MirrorIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorKind {
    Option,
    Group,
}

/// The visual attributes a mirror node reflects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MirrorAttributes {
    /// Option text, or group label.
    pub text: String,
    pub title: Option<String>,
    /// Own flag or inherited from an enclosing disabled group.
    pub disabled: bool,
    /// Always false for groups.
    pub selected: bool,
}

/// UI-side reflection of one option or group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorNode {
    pub id: MirrorId,
    /// Non-owning back-reference to the source node.
    pub key: NodeKey,
    pub kind: MirrorKind,
    pub attributes: MirrorAttributes,
    /// Options of a group; always empty for options.
    pub children: Vec<MirrorNode>,
}

impl MirrorNode {
    pub fn is_group(&self) -> bool {
        self.kind == MirrorKind::Group
    }
}
