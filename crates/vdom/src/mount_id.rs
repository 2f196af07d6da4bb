//! Hierarchical mount identities.
//!
//! A mount identity is a dotted path assigned when a unit is mounted. The root
//! carries a fixed token; every child appends one segment derived from its
//! resolved key:
//! - positional keys append the index (`0.2`)
//! - explicit keys append `$` followed by the key (`0.$A`)
//!
//! A key repeated among siblings gets an occurrence suffix after the first
//! sibling that holds it (`0.$A#1`). `.`, `%` and `#` inside explicit keys are
//! percent-escaped so that segment boundaries stay unambiguous.

use crate::element::Key;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(Arc<str>);

impl MountId {
    pub fn root(token: &str) -> Self {
        MountId(Arc::from(token))
    }

    pub fn child(&self, key: &Key) -> Self {
        self.child_occurrence(key, 0)
    }

    /// Child identity for the `occurrence`-th sibling holding `key`.
    pub fn child_occurrence(&self, key: &Key, occurrence: usize) -> Self {
        let mut path = String::with_capacity(self.0.len() + 4);
        path.push_str(&self.0);
        path.push('.');
        match key {
            Key::Index(index) => {
                path.push_str(&index.to_string());
            }
            Key::Explicit(key) => {
                path.push('$');
                for ch in key.chars() {
                    match ch {
                        '.' => path.push_str("%2E"),
                        '%' => path.push_str("%25"),
                        '#' => path.push_str("%23"),
                        _ => path.push(ch),
                    }
                }
            }
        }
        if occurrence > 0 {
            path.push('#');
            path.push_str(&occurrence.to_string());
        }
        MountId(Arc::from(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `self` equals `scope` or lies in the subtree below it.
    pub fn is_within(&self, scope: &MountId) -> bool {
        let this = self.as_str();
        let scope = scope.as_str();
        match this.strip_prefix(scope) {
            Some("") => true,
            Some(rest) => rest.starts_with('.'),
            None => false,
        }
    }

    pub fn parent(&self) -> Option<MountId> {
        self.0
            .rfind('.')
            .map(|pos| MountId(Arc::from(&self.0[..pos])))
    }

    pub fn depth(&self) -> usize {
        self.0.bytes().filter(|b| *b == b'.').count()
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MountId {
    fn from(value: &str) -> Self {
        MountId(Arc::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_and_explicit_segments() {
        let root = MountId::root("0");
        assert_eq!(root.child(&Key::Index(2)).as_str(), "0.2");
        assert_eq!(root.child(&Key::Explicit("A".into())).as_str(), "0.$A");
        assert_eq!(
            root.child(&Key::Explicit("a.b%".into())).as_str(),
            "0.$a%2Eb%25"
        );
    }

    #[test]
    fn repeated_keys_get_distinct_segments() {
        let root = MountId::root("0");
        let a = Key::Explicit("A".into());
        assert_eq!(root.child_occurrence(&a, 0), root.child(&a));
        assert_eq!(root.child_occurrence(&a, 2).as_str(), "0.$A#2");
        assert_ne!(
            root.child_occurrence(&a, 1),
            root.child(&Key::Explicit("A#1".into()))
        );
        assert!(MountId::from("0.$A#1.0").is_within(&root.child_occurrence(&a, 1)));
    }

    #[test]
    fn within_is_segment_wise() {
        let scope = MountId::from("0.1");
        assert!(MountId::from("0.1").is_within(&scope));
        assert!(MountId::from("0.1.4").is_within(&scope));
        assert!(!MountId::from("0.12").is_within(&scope));
        assert!(!MountId::from("0").is_within(&scope));
    }

    #[test]
    fn parent_strips_last_segment() {
        assert_eq!(MountId::from("0.$A.3").parent(), Some(MountId::from("0.$A")));
        assert_eq!(MountId::from("0").parent(), None);
        assert_eq!(MountId::from("0.$A.3").depth(), 2);
    }
}
