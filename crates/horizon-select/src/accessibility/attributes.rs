//! Attribute maps and their diffs.

use std::collections::BTreeMap;
use std::fmt;

use super::role::AccessibleRole;
use super::names;

/// An ordered set of element attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap(BTreeMap<String, String>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set `name`, returning whether the map changed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.0.insert(name.into(), value.clone()) {
            Some(previous) => previous != value,
            None => true,
        }
    }

    /// Set `name` to `"true"` or `"false"`.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) -> bool {
        self.set(name, if value { "true" } else { "false" })
    }

    /// Set or remove `name`.
    pub fn set_optional(&mut self, name: &str, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.set(name, value),
            None => self.remove(name),
        }
    }

    pub fn set_role(&mut self, role: AccessibleRole) -> bool {
        self.set(names::ROLE, role.as_str())
    }

    /// Remove `name`, returning whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every attribute of `other` into this map.
    pub fn extend_from(&mut self, other: &AttributeMap) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }

    /// What changed going from `previous` to this map.
    pub fn diff(&self, previous: &AttributeMap) -> AttributeDiff {
        let added_or_changed = self
            .iter()
            .filter(|(name, value)| previous.get(name) != Some(*value))
            .fold(AttributeMap::new(), |map, (name, value)| map.with(name, value));
        let removed = previous
            .0
            .keys()
            .filter(|name| !self.0.contains_key(*name))
            .cloned()
            .collect();
        AttributeDiff {
            added_or_changed,
            removed,
        }
    }

    /// Apply a diff in place.
    pub fn apply(&mut self, diff: &AttributeDiff) {
        for name in &diff.removed {
            self.remove(name);
        }
        self.extend_from(&diff.added_or_changed);
    }
}

impl fmt::Display for AttributeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{name}=\"{value}\"")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(AttributeMap::new(), |map, (name, value)| map.with(name, value))
    }
}

/// Difference between two attribute maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDiff {
    /// Attributes that are new or carry a new value.
    pub added_or_changed: AttributeMap,
    /// Names of attributes that disappeared.
    pub removed: Vec<String>,
}

impl AttributeDiff {
    pub fn is_empty(&self) -> bool {
        self.added_or_changed.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_change() {
        let mut map = AttributeMap::new();
        assert!(map.set("a", "1"));
        assert!(!map.set("a", "1"));
        assert!(map.set_flag("b", true));
        assert_eq!(map.get("b"), Some("true"));
        assert!(map.set_optional("a", None));
        assert!(!map.contains("a"));
    }

    #[test]
    fn test_diff_and_apply() {
        let previous = AttributeMap::new()
            .with(names::READY, "")
            .with(names::SINGLE, "")
            .with(names::MANAGED_ARIA, "");
        let current = AttributeMap::new()
            .with(names::READY, "")
            .with(names::ROLE, "application");

        let diff = current.diff(&previous);
        assert_eq!(diff.added_or_changed.get(names::ROLE), Some("application"));
        assert_eq!(diff.added_or_changed.len(), 1);
        assert_eq!(
            diff.removed,
            vec![names::MANAGED_ARIA.to_string(), names::SINGLE.to_string()]
        );

        let mut patched = previous.clone();
        patched.apply(&diff);
        assert_eq!(patched, current);
        assert!(current.diff(&current).is_empty());
    }

    #[test]
    fn test_display() {
        let map: AttributeMap = [("role", "option"), ("id", "x")].into_iter().collect();
        assert_eq!(map.to_string(), "id=\"x\" role=\"option\"");
    }
}
