//! Recursive resolution of extensions for compound and complex selectors.

use super::observer::ExtendObserver;
use super::{Extend, SeenSet};
use crate::selector::{
    Combinator, ComplexSelector, CompoundSelector, Link, SelectorGrammar, minus, unify,
};

impl<G: SelectorGrammar, O: ExtendObserver> Extend<G, O> {
    /// Every selector implied for `compound` by the extension table, excluding
    /// `compound` itself.
    ///
    /// For each entry whose target is a subset of `compound` and not yet in
    /// `seen`, the extender's subject is unified with what is left of
    /// `compound` once the target is removed. The result replaces the
    /// extender's subject, and is itself extended again with the target added
    /// to `seen`, so chained extends are followed while each target is used at
    /// most once along any path.
    ///
    /// The list may contain duplicates.
    #[must_use]
    pub fn extend_compound(&self, compound: &CompoundSelector, seen: &SeenSet) -> Vec<ComplexSelector> {
        self.observer.extending_compound(compound, seen);

        let empty = CompoundSelector::default();
        let mut results = Vec::new();

        for entry in self.table.lookup_subset(compound) {
            if seen.contains(&entry.target) {
                continue;
            }
            self.observer.candidate_matched(compound, entry);

            let remainder = minus(compound, &entry.target);
            let (combinator, subject) = entry
                .extender
                .innermost()
                .map_or((Combinator::Descendant, &empty), |link| {
                    (link.combinator, &link.compound)
                });

            let unified = unify(subject, &remainder);
            self.observer.unified(entry, &remainder, unified.as_ref());
            let Some(unified) = unified.filter(|c| !c.is_empty()) else {
                continue;
            };

            let mut links = entry
                .extender
                .context()
                .map(|context| context.links)
                .unwrap_or_default();
            links.push(Link::new(combinator, unified));
            let extended = ComplexSelector::new(links);

            let mut seen = seen.clone();
            let _ = seen.insert(entry.target.clone());
            let chained = self.extend_complex(&extended, &seen);

            results.push(extended);
            results.extend(chained);
        }

        results
    }

    /// [`extend_compound`](Self::extend_compound) applied to every compound of
    /// `selector` that is neither empty nor a lone `&`, concatenated in chain
    /// order.
    ///
    /// Results for different positions of the chain are not combined with
    /// each other.
    #[must_use]
    pub fn extend_complex(&self, selector: &ComplexSelector, seen: &SeenSet) -> Vec<ComplexSelector> {
        selector
            .compounds()
            .filter(|compound| !compound.is_empty() && !compound.is_empty_reference())
            .flat_map(|compound| self.extend_compound(compound, seen))
            .collect()
    }
}
