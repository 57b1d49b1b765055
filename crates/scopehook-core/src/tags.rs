//! Scenario tags used for selective hook execution
//!
//! Tags follow the Gherkin convention of a leading `@`, which is stripped on
//! insertion so `@api` and `api` name the same tag. Comparison is
//! case-sensitive.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalize a tag: trim whitespace and a single leading `@`
fn normalize(tag: &str) -> Option<String> {
    let tag = tag.trim();
    let tag = tag.strip_prefix('@').unwrap_or(tag).trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Ordered set of normalized tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag; returns false for blank tags or tags already present
    pub fn insert(&mut self, tag: &str) -> bool {
        match normalize(tag) {
            Some(tag) => self.0.insert(tag),
            None => false,
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        normalize(tag).is_some_and(|tag| self.0.contains(&tag))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether at least one tag is shared with `other`
    pub fn intersects(&self, other: &TagSet) -> bool {
        self.0.iter().any(|tag| other.0.contains(tag))
    }

    /// Whether a hook carrying this tag set should run for a scenario
    /// tagged with `active`. An empty set matches every scenario.
    pub fn selects(&self, active: &TagSet) -> bool {
        self.is_empty() || self.intersects(active)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<String> = self.0.iter().map(|t| format!("@{}", t)).collect();
        f.write_str(&tags.join(" "))
    }
}
