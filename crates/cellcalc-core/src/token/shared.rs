//! Reference-counted immutable strings

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Immutable shared string
///
/// Token payloads (text, range names, operator symbols) are cloned onto the
/// evaluation stack on every run; `Arc<str>` keeps those clones allocation-free.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SharedString(Arc<str>);

impl SharedString {
    /// Create a new shared string
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        SharedString(Arc::from(s.as_ref()))
    }

    /// Get the string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the length of the string in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SharedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SharedString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SharedString {
    fn from(s: &str) -> Self {
        SharedString::new(s)
    }
}

impl From<String> for SharedString {
    fn from(s: String) -> Self {
        SharedString(Arc::from(s))
    }
}

impl PartialEq<str> for SharedString {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SharedString {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_allocation() {
        let s1 = SharedString::new("F7");
        let s2 = s1.clone();
        assert!(Arc::ptr_eq(&s1.0, &s2.0));
        assert_eq!(s1, "F7");
    }

    #[test]
    fn test_borrow_lookup() {
        let mut set = std::collections::HashSet::new();
        set.insert(SharedString::from("NOT("));
        assert!(set.contains("NOT("));
        assert!(!set.contains("not("));
    }
}
