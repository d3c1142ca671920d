//! Trace events emitted while resolving `@extend`.
//!
//! Resolution reports its major steps to an [`ExtendObserver`]. The observer
//! only watches; nothing it does feeds back into the algorithm.

use lapis_common::SourcePosition;

use super::SeenSet;
use super::table::ExtensionEntry;
use crate::selector::{CompoundSelector, SelectorList};

/// Receives structured trace events from [`Extend`](super::Extend).
///
/// Every method has an empty default body, so implementors only override
/// the events they care about.
pub trait ExtendObserver {
    /// Resolution started on `compound`, with `seen` holding the targets
    /// already consumed along the current path.
    fn extending_compound(&self, _compound: &CompoundSelector, _seen: &SeenSet) {}

    /// `entry` is a subset match for `compound` and is about to be applied.
    fn candidate_matched(&self, _compound: &CompoundSelector, _entry: &ExtensionEntry) {}

    /// The extender's subject was unified with what remains of the matched
    /// compound. `None` means the two could not be unified.
    fn unified(
        &self,
        _entry: &ExtensionEntry,
        _remainder: &CompoundSelector,
        _result: Option<&CompoundSelector>,
    ) {
    }

    /// A rule's selector list was replaced.
    fn rule_rewritten(&self, _position: SourcePosition, _before: &SelectorList, _after: &SelectorList) {}
}

impl<T: ExtendObserver + ?Sized> ExtendObserver for &T {
    fn extending_compound(&self, compound: &CompoundSelector, seen: &SeenSet) {
        (**self).extending_compound(compound, seen);
    }

    fn candidate_matched(&self, compound: &CompoundSelector, entry: &ExtensionEntry) {
        (**self).candidate_matched(compound, entry);
    }

    fn unified(
        &self,
        entry: &ExtensionEntry,
        remainder: &CompoundSelector,
        result: Option<&CompoundSelector>,
    ) {
        (**self).unified(entry, remainder, result);
    }

    fn rule_rewritten(&self, position: SourcePosition, before: &SelectorList, after: &SelectorList) {
        (**self).rule_rewritten(position, before, after);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExtendObserver for NoopObserver {}

/// Forwards events to `tracing` under the `lapis::extend` target.
///
/// Per-compound events are `trace` level; rewritten rules are `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExtendObserver for TracingObserver {
    fn extending_compound(&self, compound: &CompoundSelector, seen: &SeenSet) {
        tracing::trace!(
            target: "lapis::extend",
            compound = %compound,
            seen = seen.len(),
            "extending compound selector"
        );
    }

    fn candidate_matched(&self, compound: &CompoundSelector, entry: &ExtensionEntry) {
        tracing::trace!(
            target: "lapis::extend",
            compound = %compound,
            target_selector = %entry.target,
            extender = %entry.extender,
            "extension matched"
        );
    }

    fn unified(
        &self,
        entry: &ExtensionEntry,
        remainder: &CompoundSelector,
        result: Option<&CompoundSelector>,
    ) {
        match result {
            Some(unified) => tracing::trace!(
                target: "lapis::extend",
                extender = %entry.extender,
                remainder = %remainder,
                unified = %unified,
                "unified extender subject"
            ),
            None => tracing::trace!(
                target: "lapis::extend",
                extender = %entry.extender,
                remainder = %remainder,
                "extender subject does not unify"
            ),
        }
    }

    fn rule_rewritten(&self, position: SourcePosition, before: &SelectorList, after: &SelectorList) {
        tracing::debug!(
            target: "lapis::extend",
            %position,
            before = %before,
            after = %after,
            "rule selector rewritten"
        );
    }
}
