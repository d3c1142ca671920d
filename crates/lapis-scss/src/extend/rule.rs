//! Rewriting one style rule's selector list.

use super::generate::generate_extension;
use super::observer::ExtendObserver;
use super::{Extend, ExtendError, SeenSet};
use crate::parser::StyleRule;
use crate::selector::{ComplexSelector, SelectorGrammar, SelectorList};

impl<G: SelectorGrammar, O: ExtendObserver> Extend<G, O> {
    /// Resolve `@extend` for one rule, replacing its selector list when
    /// anything changed. Nested rules are not visited.
    ///
    /// Returns whether the selector was replaced.
    ///
    /// # Errors
    ///
    /// - [`ExtendError::EmptySelector`] if the rule has no selectors.
    /// - [`ExtendError::Renormalize`] if the grammar rejects the rewritten list.
    pub fn resolve_rule(&self, rule: &mut StyleRule) -> Result<bool, ExtendError> {
        if rule.selector.is_empty() {
            return Err(ExtendError::EmptySelector {
                position: rule.position,
            });
        }

        let resolved = self.resolve_selectors(&rule.selector);
        if resolved == rule.selector.selectors {
            return Ok(false);
        }

        let after = if resolved.is_empty() {
            // Nothing but unextended placeholders.
            SelectorList::new(rule.selector.position)
        } else {
            let composed = SelectorList::with_selectors(resolved, rule.selector.position);
            let text = composed.to_string();
            self.grammar
                .renormalize(&text, composed.position)
                .map_err(|source| ExtendError::Renormalize {
                    text,
                    position: composed.position,
                    source,
                })?
        };

        self.observer
            .rule_rewritten(rule.position, &rule.selector, &after);
        rule.selector = after;
        Ok(true)
    }

    /// The rewritten selectors for `list`: each original selector (unless it
    /// holds a placeholder) followed by everything extensions add for it.
    /// Placeholders and duplicates are removed.
    fn resolve_selectors(&self, list: &SelectorList) -> Vec<ComplexSelector> {
        let mut accumulator: Vec<ComplexSelector> = Vec::new();

        for selector in list {
            push_unique(&mut accumulator, selector.clone());
            for generated in self.extend_selector(selector) {
                push_unique(&mut accumulator, generated);
            }
        }

        accumulator.retain(|selector| !selector.has_placeholder());
        accumulator
    }

    /// Selectors that extensions add for one complex selector.
    ///
    /// A leading `&` link is set aside while matching and put back in front of
    /// every generated selector, along with the combinator that followed it.
    /// Each compound of the rest is extended as in
    /// [`extend_complex`](Self::extend_complex); the extendee handed to
    /// [`generate_extension`] is the chain up to and including the matched
    /// compound, and the links after it are appended to every result.
    fn extend_selector(&self, selector: &ComplexSelector) -> Vec<ComplexSelector> {
        let (back_reference, stripped) = match selector.split_back_reference() {
            Some((link, rest)) => (Some(link.clone()), rest),
            None => (None, selector.clone()),
        };
        let seen = SeenSet::new();
        let mut generated = Vec::new();

        for (i, link) in stripped.links.iter().enumerate() {
            if link.compound.is_empty() || link.compound.is_empty_reference() {
                continue;
            }
            let extendee = ComplexSelector::new(stripped.links[..=i].to_vec());
            let suffix = &stripped.links[i + 1..];

            for extension in self.extend_compound(&link.compound, &seen) {
                for mut output in generate_extension(&extendee, &extension) {
                    output.links.extend(suffix.iter().cloned());
                    generated.push(output);
                }
            }
        }

        // Generated selectors take over the leading combinator (`> .a` nested
        // under a parent, or the combinator after a stripped `&`).
        if let Some(lead) = stripped.links.first().map(|link| link.combinator) {
            for output in &mut generated {
                if let Some(first) = output.links.first_mut() {
                    first.combinator = lead;
                }
            }
        }

        match back_reference {
            Some(back_reference) => generated
                .into_iter()
                .map(|output| {
                    let mut links = Vec::with_capacity(output.len() + 1);
                    links.push(back_reference.clone());
                    links.extend(output.links);
                    ComplexSelector::new(links)
                })
                .collect(),
            None => generated,
        }
    }
}

fn push_unique(selectors: &mut Vec<ComplexSelector>, selector: ComplexSelector) {
    if !selectors.contains(&selector) {
        selectors.push(selector);
    }
}
