//! Context splicing: placing an extender where its target matched.

use crate::selector::{Combinator, ComplexSelector, Link};

/// The selectors implied by applying `extender` at the subject of `extendee`.
///
/// - Identical selectors produce nothing (extending yourself is a no-op).
/// - When both sides have ancestor context there is no way to tell which
///   context is the outer one, so both orders are produced:
///   `extendee-context extender` and `extender-context extendee-context subject`.
/// - When only the extendee has context, the whole extender is placed after it.
/// - Otherwise the result is the extender itself.
///
/// `.x .y` extended by `.a .b` yields `.x .a .b` and `.a .x .b`.
///
/// Inputs are never modified; every output is a fresh chain.
#[must_use]
pub fn generate_extension(
    extendee: &ComplexSelector,
    extender: &ComplexSelector,
) -> Vec<ComplexSelector> {
    if extendee == extender {
        return Vec::new();
    }
    let Some(subject) = extender.innermost() else {
        return Vec::new();
    };
    let joiner = extendee
        .innermost()
        .map_or(Combinator::Descendant, |link| link.combinator);

    match (extendee.context(), extender.context()) {
        (Some(extendee_context), Some(extender_context)) => {
            let outer_extendee = splice(&extendee_context, extender, joiner);

            let mut outer_extender = splice(&extender_context, &extendee_context, subject.combinator);
            outer_extender
                .links
                .push(Link::new(joiner, subject.compound.clone()));

            vec![outer_extendee, outer_extender]
        }
        (Some(extendee_context), None) => vec![splice(&extendee_context, extender, joiner)],
        (None, _) => vec![extender.clone()],
    }
}

/// `prefix` followed by `suffix`, joined by `combinator`.
fn splice(prefix: &ComplexSelector, suffix: &ComplexSelector, combinator: Combinator) -> ComplexSelector {
    let mut links = Vec::with_capacity(prefix.len() + suffix.len());
    links.extend(prefix.links.iter().cloned());
    let mut rest = suffix.links.iter().cloned();
    if let Some(first) = rest.next() {
        links.push(Link::new(combinator, first.compound));
    }
    links.extend(rest);
    ComplexSelector::new(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{CompoundSelector, SimpleSelector};

    fn link(combinator: Combinator, class: &str) -> Link {
        Link::new(
            combinator,
            CompoundSelector::from(SimpleSelector::Class(class.to_string())),
        )
    }

    #[test]
    fn test_splice_replaces_first_combinator() {
        let prefix = ComplexSelector::new(vec![link(Combinator::Descendant, "a")]);
        let suffix = ComplexSelector::new(vec![
            link(Combinator::Descendant, "b"),
            link(Combinator::NextSibling, "c"),
        ]);
        let spliced = splice(&prefix, &suffix, Combinator::Child);
        assert_eq!(spliced.to_string(), ".a > .b + .c");
    }

    #[test]
    fn test_child_combinator_is_kept_in_both_orders() {
        let extendee = ComplexSelector::new(vec![
            link(Combinator::Descendant, "x"),
            link(Combinator::Child, "y"),
        ]);
        let extender = ComplexSelector::new(vec![
            link(Combinator::Descendant, "a"),
            link(Combinator::Descendant, "b"),
        ]);
        let out: Vec<String> = generate_extension(&extendee, &extender)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(out, vec![".x > .a .b", ".a .x > .b"]);
    }
}
