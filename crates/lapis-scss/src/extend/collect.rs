//! Building the extension table from the `@extend` directives of a stylesheet.

use lapis_common::warning::warn_once;

use super::table::ExtensionTable;
use crate::parser::{AtRule, Block, ExtendDirective, Statement, Stylesheet};
use crate::selector::{Combinator, SelectorList};

/// Collect every `@extend` in `stylesheet` into an [`ExtensionTable`].
///
/// The extender of a directive is the full selector of the rule it appears
/// in, with `&` replaced by the enclosing rule's selector (or, without `&`,
/// nested as a descendant of it). Directives inside `@media` and other
/// at-rule blocks count for the enclosing rule.
///
/// Directives outside any rule, and targets that are not a single compound
/// selector, are reported with [`warn_once`] and skipped.
#[must_use]
pub fn collect_extensions(stylesheet: &Stylesheet) -> ExtensionTable {
    let mut table = ExtensionTable::new();
    collect_block(&stylesheet.block, None, &mut table);
    table
}

fn collect_block(block: &Block, parent: Option<&SelectorList>, table: &mut ExtensionTable) {
    for statement in &block.statements {
        match statement {
            Statement::Rule(rule) => {
                let resolved = match parent {
                    Some(parent) => nest(&rule.selector, parent),
                    None => rule.selector.clone(),
                };
                collect_block(&rule.block, Some(&resolved), table);
            }
            Statement::Media(media) => collect_block(&media.block, parent, table),
            Statement::AtRule(AtRule {
                block: Some(block), ..
            }) => collect_block(block, parent, table),
            Statement::Extend(directive) => match parent {
                Some(extenders) => register(directive, extenders, table),
                None => warn_once(
                    "extend",
                    &format!(
                        "{}: @extend may only be used within style rules",
                        directive.position
                    ),
                ),
            },
            Statement::AtRule(_) | Statement::Keyframe(_) | Statement::Declaration(_) => {}
        }
    }
}

/// Every selector of `selector` resolved against every selector of `parent`.
fn nest(selector: &SelectorList, parent: &SelectorList) -> SelectorList {
    let mut nested = SelectorList::new(selector.position);
    for outer in parent {
        for inner in selector {
            nested.push(inner.resolve_parent(outer));
        }
    }
    nested
}

fn register(directive: &ExtendDirective, extenders: &SelectorList, table: &mut ExtensionTable) {
    for target in &directive.selector {
        let compound = match target.links.as_slice() {
            [link] if link.combinator == Combinator::Descendant => &link.compound,
            _ => {
                warn_once(
                    "extend",
                    &format!(
                        "{}: can't extend complex selector '{target}', only compound selectors",
                        directive.position
                    ),
                );
                continue;
            }
        };
        for extender in extenders {
            let _ = table.insert(extender.clone(), compound.clone(), directive.position);
        }
    }
}
