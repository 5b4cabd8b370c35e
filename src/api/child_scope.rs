//! Purpose: Child scopes of an aggregator and the list they are collected into.
//! Exports: `ChildScope`, `ChildScopeList`.
//! Invariants: Metadata and keywords are copied in; the list owns copies of appended children.
use std::collections::BTreeSet;

use super::metadata::ScopeMetadata;

#[derive(Clone, Debug, PartialEq)]
pub struct ChildScope {
    id: String,
    metadata: ScopeMetadata,
    enabled: bool,
    keywords: BTreeSet<String>,
}

impl ChildScope {
    pub fn new(
        id: impl Into<String>,
        metadata: ScopeMetadata,
        enabled: bool,
        keywords: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            id: id.into(),
            metadata,
            enabled,
            keywords: keywords.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &ScopeMetadata {
        &self.metadata
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn keywords(&self) -> Vec<&str> {
        self.keywords.iter().map(String::as_str).collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChildScopeList {
    items: Vec<ChildScope>,
}

impl ChildScopeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_from<'a>(&mut self, children: impl IntoIterator<Item = &'a ChildScope>) {
        self.items.extend(children.into_iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ChildScope] {
        &self.items
    }
}
