//! Structural operations over compound selectors.
//!
//! These are the building blocks of `@extend` resolution: subtracting the
//! extend target from a matched compound, and unifying what is left with the
//! extender's own subject.

use super::{CompoundSelector, SimpleSelector};

/// Components of `a` that are not present in `b`, in `a`'s order.
///
/// Never fails; the result may be the empty compound selector.
#[must_use]
pub fn minus(a: &CompoundSelector, b: &CompoundSelector) -> CompoundSelector {
    CompoundSelector::new(
        a.simple_selectors
            .iter()
            .filter(|simple| !b.contains(simple))
            .cloned()
            .collect(),
    )
}

/// The minimal compound selector matched by both `a` and `b`, or `None` when
/// they assert mutually exclusive constraints.
///
/// The result is `a`'s components followed by the components of `b` that `a`
/// lacks. Two placement rules keep the canonical text re-parseable: the
/// type-like component (`&`, then a type or `*`) moves to the front, and
/// pseudo-elements move to the end. A universal selector is dropped when a
/// type selector is present.
///
/// If either side is empty, the other side is returned unchanged.
///
/// Unification fails when the two sides name different element types,
/// different ids, or different pseudo-elements.
#[must_use]
pub fn unify(a: &CompoundSelector, b: &CompoundSelector) -> Option<CompoundSelector> {
    if a.is_empty() {
        return Some(b.clone());
    }
    if b.is_empty() {
        return Some(a.clone());
    }

    if conflicts(a, b, element_type) || conflicts(a, b, id) || conflicts(a, b, pseudo_element) {
        return None;
    }

    let mut merged: Vec<SimpleSelector> = a.simple_selectors.clone();
    for simple in &b.simple_selectors {
        if !merged.contains(simple) {
            merged.push(simple.clone());
        }
    }

    if merged.iter().any(|s| matches!(s, SimpleSelector::Type(_))) {
        merged.retain(|s| *s != SimpleSelector::Universal);
    }

    // Stable sort by placement class keeps everything else in merge order.
    merged.sort_by_key(placement);

    Some(CompoundSelector::new(merged))
}

/// Where a component has to sit inside a compound for its text to re-parse.
pub(super) const fn placement(simple: &SimpleSelector) -> u8 {
    match simple {
        SimpleSelector::Parent => 0,
        SimpleSelector::Type(_) | SimpleSelector::Universal => 1,
        SimpleSelector::PseudoElement { .. } => 3,
        _ => 2,
    }
}

/// True if both sides carry a component of the kind picked out by `pick`,
/// and those components differ.
fn conflicts<'a>(
    a: &'a CompoundSelector,
    b: &'a CompoundSelector,
    pick: fn(&SimpleSelector) -> Option<&str>,
) -> bool {
    let first = |c: &'a CompoundSelector| c.simple_selectors.iter().find_map(pick);
    match (first(a), first(b)) {
        (Some(x), Some(y)) => x != y,
        _ => false,
    }
}

fn element_type(simple: &SimpleSelector) -> Option<&str> {
    match simple {
        SimpleSelector::Type(name) => Some(name.as_str()),
        _ => None,
    }
}

fn id(simple: &SimpleSelector) -> Option<&str> {
    match simple {
        SimpleSelector::Id(name) => Some(name.as_str()),
        _ => None,
    }
}

fn pseudo_element(simple: &SimpleSelector) -> Option<&str> {
    match simple {
        SimpleSelector::PseudoElement { name, .. } => Some(name.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> SimpleSelector {
        SimpleSelector::Class(name.to_string())
    }

    #[test]
    fn test_placement_orders_type_first_and_pseudo_element_last() {
        let a = CompoundSelector::new(vec![SimpleSelector::PseudoElement {
            name: "before".to_string(),
            argument: None,
        }]);
        let b = CompoundSelector::new(vec![class("x"), SimpleSelector::Type("p".to_string())]);
        let unified = unify(&a, &b).unwrap();
        assert_eq!(unified.to_string(), "p.x::before");
    }

    #[test]
    fn test_conflicting_pseudo_elements() {
        let before = CompoundSelector::from(SimpleSelector::PseudoElement {
            name: "before".to_string(),
            argument: None,
        });
        let after = CompoundSelector::from(SimpleSelector::PseudoElement {
            name: "after".to_string(),
            argument: None,
        });
        assert!(unify(&before, &after).is_none());
    }
}
