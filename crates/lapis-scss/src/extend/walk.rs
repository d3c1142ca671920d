//! Depth-first traversal applying the rule resolver to every style rule.

use super::observer::ExtendObserver;
use super::{Extend, ExtendError};
use crate::parser::{AtRule, Block, Statement, Stylesheet};
use crate::selector::SelectorGrammar;

impl<G: SelectorGrammar, O: ExtendObserver> Extend<G, O> {
    /// Resolve every style rule of `stylesheet`.
    ///
    /// Run this once per parsed tree. A rule whose selectors were all
    /// unextended placeholders is left with an empty list, and a second walk
    /// reports it as [`ExtendError::EmptySelector`].
    ///
    /// # Errors
    ///
    /// Stops at the first rule that fails to resolve; see [`Extend::resolve_rule`].
    pub fn walk(&self, stylesheet: &mut Stylesheet) -> Result<(), ExtendError> {
        self.walk_block(&mut stylesheet.block)
    }

    /// Resolve every style rule in `block`, in source order, pre-order: a
    /// rule's own selector is resolved before the rules nested in it.
    ///
    /// Nested rules keep their own relative selectors and are resolved
    /// independently of changes to their ancestors.
    ///
    /// # Errors
    ///
    /// Stops at the first rule that fails to resolve; see [`Extend::resolve_rule`].
    pub fn walk_block(&self, block: &mut Block) -> Result<(), ExtendError> {
        for statement in &mut block.statements {
            match statement {
                Statement::Rule(rule) => {
                    let _ = self.resolve_rule(rule)?;
                    self.walk_block(&mut rule.block)?;
                }
                Statement::Media(media) => self.walk_block(&mut media.block)?,
                Statement::AtRule(AtRule {
                    block: Some(block), ..
                }) => self.walk_block(block)?,
                Statement::AtRule(_)
                | Statement::Keyframe(_)
                | Statement::Declaration(_)
                | Statement::Extend(_) => {}
            }
        }
        Ok(())
    }
}
