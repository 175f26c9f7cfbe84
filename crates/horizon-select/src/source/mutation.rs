//! Mutation records and filters.
//!
//! Every write to a [`SourceList`](super::SourceList) produces one or more
//! [`MutationRecord`]s. Consumers decide with a [`MutationFilter`] whether a
//! batch of records is relevant to them, so unrelated attribute churn never
//! triggers work.

use super::node::NodeKey;

/// Attribute names the engine distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeName {
    Disabled,
    Selected,
    Title,
    Label,
    Multiple,
    AriaLabel,
    /// Any attribute the engine does not interpret.
    Other(String),
}

impl AttributeName {
    /// The attribute's markup name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Disabled => "disabled",
            Self::Selected => "selected",
            Self::Title => "title",
            Self::Label => "label",
            Self::Multiple => "multiple",
            Self::AriaLabel => "aria-label",
            Self::Other(name) => name,
        }
    }
}

/// The node a mutation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationTarget {
    /// The list element itself.
    List,
    /// An option or group.
    Node(NodeKey),
}

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Children were added, removed or moved.
    ChildList,
    /// Text content changed.
    CharacterData,
    /// An attribute changed.
    Attribute(AttributeName),
}

/// One observed change to the source list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationRecord {
    pub target: MutationTarget,
    pub kind: MutationKind,
}

impl MutationRecord {
    pub fn new(target: MutationTarget, kind: MutationKind) -> Self {
        Self { target, kind }
    }

    pub fn child_list(target: MutationTarget) -> Self {
        Self::new(target, MutationKind::ChildList)
    }

    pub fn character_data(key: NodeKey) -> Self {
        Self::new(MutationTarget::Node(key), MutationKind::CharacterData)
    }

    pub fn attribute(target: MutationTarget, name: AttributeName) -> Self {
        Self::new(target, MutationKind::Attribute(name))
    }
}

/// Decides which mutation records a consumer cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationFilter {
    child_list: bool,
    character_data: bool,
    attributes: Vec<AttributeName>,
    list_only: bool,
}

impl MutationFilter {
    /// A filter matching nothing.
    pub fn none() -> Self {
        Self {
            child_list: false,
            character_data: false,
            attributes: Vec::new(),
            list_only: false,
        }
    }

    /// Match structural changes.
    pub fn with_child_list(mut self) -> Self {
        self.child_list = true;
        self
    }

    /// Match text changes.
    pub fn with_character_data(mut self) -> Self {
        self.character_data = true;
        self
    }

    /// Match changes of the given attributes.
    pub fn with_attributes(mut self, names: impl IntoIterator<Item = AttributeName>) -> Self {
        self.attributes.extend(names);
        self
    }

    /// Only match records targeting the list element itself.
    pub fn list_only(mut self) -> Self {
        self.list_only = true;
        self
    }

    /// Changes that require a mirror reconciliation pass.
    pub fn reconcile() -> Self {
        Self::none()
            .with_child_list()
            .with_character_data()
            .with_attributes([
                AttributeName::Disabled,
                AttributeName::Selected,
                AttributeName::Title,
                AttributeName::Label,
                AttributeName::Multiple,
            ])
    }

    /// Changes that may switch the active behavior strategy.
    pub fn capability() -> Self {
        Self::none()
            .with_attributes([AttributeName::Disabled, AttributeName::Multiple])
            .list_only()
    }

    /// Changes that affect the button label or disabled state.
    pub fn button() -> Self {
        Self::none()
            .with_child_list()
            .with_character_data()
            .with_attributes([AttributeName::Disabled, AttributeName::Selected])
    }

    /// Changes that affect the managed ARIA combobox and listbox.
    pub fn managed_aria() -> Self {
        Self::none()
            .with_child_list()
            .with_character_data()
            .with_attributes([
                AttributeName::Disabled,
                AttributeName::Selected,
                AttributeName::Title,
                AttributeName::AriaLabel,
            ])
    }

    /// Whether `record` passes this filter.
    pub fn matches(&self, record: &MutationRecord) -> bool {
        if self.list_only && record.target != MutationTarget::List {
            return false;
        }
        match &record.kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::CharacterData => self.character_data,
            MutationKind::Attribute(name) => self.attributes.contains(name),
        }
    }

    /// Whether any record in the batch passes this filter.
    pub fn matches_any<'a>(&self, records: impl IntoIterator<Item = &'a MutationRecord>) -> bool {
        records.into_iter().any(|record| self.matches(record))
    }
}
