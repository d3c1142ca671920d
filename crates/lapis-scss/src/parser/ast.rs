//! Syntax tree produced by the stylesheet [`Parser`](super::Parser).
//!
//! Only selectors are structured; declaration values, media queries and
//! at-rule preludes are kept as their source text.

use lapis_common::SourcePosition;
use serde::Serialize;

use crate::selector::SelectorList;

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    /// The top-level statements.
    pub block: Block,
}

/// A sequence of statements: the stylesheet root or the body of a rule or at-rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Block {
    /// The statements, in source order.
    pub statements: Vec<Statement>,
}

impl Block {
    /// Create a block from its statements.
    #[must_use]
    pub const fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Returns true if the block has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// One statement inside a [`Block`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// A style rule, possibly holding nested rules.
    Rule(StyleRule),
    /// An `@media` block.
    Media(MediaRule),
    /// A `@keyframes` step such as `from`, `to` or `50%`.
    Keyframe(KeyframeRule),
    /// Any other at-rule, with or without a block.
    AtRule(AtRule),
    /// A property declaration.
    Declaration(Declaration),
    /// An `@extend` directive.
    Extend(ExtendDirective),
}

/// A style rule: a selector list and its block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    /// The rule's selector. `@extend` resolution replaces it.
    pub selector: SelectorList,
    /// The rule body.
    pub block: Block,
    /// Where the rule starts.
    pub position: SourcePosition,
}

/// An `@media` block. It has no selector of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRule {
    /// The media query text.
    pub query: String,
    /// The block body.
    pub block: Block,
    /// Where the at-rule starts.
    pub position: SourcePosition,
}

/// A step inside `@keyframes`. Its prelude is not a selector and is never extended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyframeRule {
    /// The step text, e.g. `from` or `0%, 50%`.
    pub selector: String,
    /// The step body.
    pub block: Block,
    /// Where the step starts.
    pub position: SourcePosition,
}

/// A generic at-rule such as `@font-face { ... }` or `@charset "utf-8";`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtRule {
    /// The at-keyword name, without the `@`.
    pub name: String,
    /// The prelude text.
    pub prelude: String,
    /// The block, if the at-rule has one.
    pub block: Option<Block>,
    /// Where the at-rule starts.
    pub position: SourcePosition,
}

/// A property declaration, e.g. `color: red !important`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// The property name.
    pub name: String,
    /// The value text, without `!important`.
    pub value: String,
    /// Whether the declaration has `!important`.
    pub important: bool,
    /// Where the declaration starts.
    pub position: SourcePosition,
}

/// `@extend <selector-list> [!optional];`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendDirective {
    /// The extend targets.
    pub selector: SelectorList,
    /// Whether the directive carries the `!optional` flag.
    pub optional: bool,
    /// Where the directive starts.
    pub position: SourcePosition,
}
