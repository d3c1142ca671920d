//! The extension table: every `(extender, target)` pair registered by
//! `@extend` directives, indexed for subset lookup.

use std::collections::HashMap;

use lapis_common::SourcePosition;
use lapis_common::warning::warn_once;
use serde::Serialize;

use crate::selector::{ComplexSelector, CompoundSelector, SimpleSelector};

/// "Wherever `target` matches, also apply `extender`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionEntry {
    /// The full selector of the rule holding the `@extend`.
    pub extender: ComplexSelector,
    /// The compound selector named by the `@extend`.
    pub target: CompoundSelector,
    /// Where the `@extend` directive was written.
    pub position: SourcePosition,
}

/// Extension entries indexed by the simple selectors of their targets.
///
/// Every entry is listed under each component of its target. A subset lookup
/// for a compound gathers the entries listed under any of the compound's
/// components and keeps those whose whole target is contained in it, so no
/// entry with a component missing from the query is ever returned.
///
/// The table is filled once, before resolution, and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExtensionTable {
    entries: Vec<ExtensionEntry>,
    index: HashMap<SimpleSelector, Vec<usize>>,
}

impl ExtensionTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register that `extender` extends `target`.
    ///
    /// Returns false, without registering anything, when the pair is already
    /// present or either side is empty.
    pub fn insert(
        &mut self,
        extender: ComplexSelector,
        target: CompoundSelector,
        position: SourcePosition,
    ) -> bool {
        if target.is_empty() || extender.is_empty() {
            warn_once(
                "extend",
                &format!("{position}: ignoring @extend with an empty selector"),
            );
            return false;
        }
        if self
            .entries
            .iter()
            .any(|e| e.target == target && e.extender == extender)
        {
            return false;
        }

        let slot = self.entries.len();
        for simple in &target.simple_selectors {
            let slots = self.index.entry(simple.clone()).or_default();
            if slots.last() != Some(&slot) {
                slots.push(slot);
            }
        }
        self.entries.push(ExtensionEntry {
            extender,
            target,
            position,
        });
        true
    }

    /// Every entry whose target's components are all present in `query`,
    /// in registration order.
    ///
    /// An empty query matches nothing.
    #[must_use]
    pub fn lookup_subset(&self, query: &CompoundSelector) -> Vec<&ExtensionEntry> {
        let mut slots: Vec<usize> = query
            .simple_selectors
            .iter()
            .filter_map(|simple| self.index.get(simple))
            .flatten()
            .copied()
            .filter(|&slot| self.entries[slot].target.is_subset_of(query))
            .collect();
        slots.sort_unstable();
        slots.dedup();
        slots.into_iter().map(|slot| &self.entries[slot]).collect()
    }

    /// Every entry whose target equals `query`, in registration order.
    ///
    /// This is the single-component special case of [`lookup_subset`](Self::lookup_subset)
    /// generalized to exact set equality.
    #[must_use]
    pub fn lookup_exact(&self, query: &CompoundSelector) -> Vec<&ExtensionEntry> {
        self.entries.iter().filter(|e| e.target == *query).collect()
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in registration order.
    pub fn iter(&self) -> core::slice::Iter<'_, ExtensionEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ExtensionTable {
    type Item = &'a ExtensionEntry;
    type IntoIter = core::slice::Iter<'a, ExtensionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(classes: &[&str]) -> CompoundSelector {
        CompoundSelector::new(
            classes
                .iter()
                .map(|c| SimpleSelector::Class((*c).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_index_lists_entry_under_every_component() {
        let mut table = ExtensionTable::new();
        assert!(table.insert(
            ComplexSelector::from_compound(compound(&["x"])),
            compound(&["a", "b"]),
            SourcePosition::START,
        ));
        assert_eq!(table.index.len(), 2);
        assert_eq!(table.index[&SimpleSelector::Class("a".to_string())], vec![0]);
        assert_eq!(table.index[&SimpleSelector::Class("b".to_string())], vec![0]);
    }

    #[test]
    fn test_duplicate_pair_is_registered_once() {
        let mut table = ExtensionTable::new();
        let extender = ComplexSelector::from_compound(compound(&["x"]));
        assert!(table.insert(extender.clone(), compound(&["a"]), SourcePosition::START));
        assert!(!table.insert(extender, compound(&["a"]), SourcePosition::new(4, 1)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_target_is_rejected() {
        let mut table = ExtensionTable::new();
        let extender = ComplexSelector::from_compound(compound(&["x"]));
        assert!(!table.insert(extender, CompoundSelector::default(), SourcePosition::START));
        assert!(table.is_empty());
        assert!(table.lookup_subset(&CompoundSelector::default()).is_empty());
    }
}
