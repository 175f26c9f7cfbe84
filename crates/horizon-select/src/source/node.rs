//! Source list nodes.

use slotmap::new_key_type;

new_key_type! {
    /// Stable identity of an option or group in a [`SourceList`](super::SourceList).
    ///
    /// Keys are never reused while the list is alive, so comparing keys is
    /// comparing identities.
    pub struct NodeKey;
}

/// Description of an option to insert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionSpec {
    pub text: String,
    pub title: Option<String>,
    pub disabled: bool,
    pub selected: bool,
}

impl OptionSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// Description of a group to insert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupSpec {
    pub label: String,
    pub disabled: bool,
    pub options: Vec<OptionSpec>,
}

impl GroupSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }
}

/// Either kind of node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSpec {
    Option(OptionSpec),
    Group(GroupSpec),
}

impl From<OptionSpec> for NodeSpec {
    fn from(spec: OptionSpec) -> Self {
        Self::Option(spec)
    }
}

impl From<GroupSpec> for NodeSpec {
    fn from(spec: GroupSpec) -> Self {
        Self::Group(spec)
    }
}

impl From<&str> for NodeSpec {
    fn from(text: &str) -> Self {
        Self::Option(OptionSpec::new(text))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OptionData {
    pub text: String,
    pub title: Option<String>,
    pub disabled: bool,
    pub selected: bool,
    pub parent: Option<NodeKey>,
}

#[derive(Debug, Clone)]
pub(crate) struct GroupData {
    pub label: String,
    pub disabled: bool,
    pub children: Vec<NodeKey>,
}

#[derive(Debug, Clone)]
pub(crate) enum SourceNode {
    Option(OptionData),
    Group(GroupData),
}

impl SourceNode {
    pub fn parent(&self) -> Option<NodeKey> {
        match self {
            Self::Option(option) => option.parent,
            Self::Group(_) => None,
        }
    }
}

/// A read-only view of one option in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInfo {
    pub key: NodeKey,
    /// Position in the flattened option list.
    pub index: usize,
    pub text: String,
    pub title: Option<String>,
    /// Neither the option nor its group is disabled.
    pub enabled: bool,
    pub selected: bool,
}
