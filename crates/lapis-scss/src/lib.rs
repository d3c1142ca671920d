//! SCSS tokenizer, parser, selector algebra and `@extend` resolution for Lapis.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - CSS token types plus SCSS `//` line comments
//!   - A source position for every token
//!
//! - **Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Nested style rules, declarations, `@media`, `@keyframes` and other at-rules
//!   - `@extend` directives
//!
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Simple, compound and complex selectors, selector lists
//!   - SCSS parent references (`&`) and placeholders (`%name`)
//!   - Difference and unification of compound selectors
//!   - A selector grammar used to renormalize rewritten selectors
//!
//! - **`@extend`**
//!   - Extension table with subset lookup
//!   - Recursive, cycle-safe resolution of chained extends
//!   - Ancestor-context splicing
//!
//! - **Printer**: nested SCSS output of the resolved tree
//!
//! # Not Yet Implemented
//!
//! - Variables, mixins, functions and control directives
//! - `@import` and `@use`
//! - Flattening nested rules into plain CSS

/// Error types for stylesheet and selector parsing.
pub mod error;
/// `@extend` resolution.
pub mod extend;
/// SCSS stylesheet parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Nested SCSS output.
pub mod printer;
/// Selector model, algebra and grammar per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

// Re-exports for convenience
pub use error::ParseError;
pub use extend::{
    Extend, ExtendError, ExtendObserver, ExtensionEntry, ExtensionTable, NoopObserver, SeenSet,
    TracingObserver, collect_extensions, extend_stylesheet, generate_extension,
};
pub use parser::{Block, Parser, Statement, StyleRule, Stylesheet, parse_stylesheet};
pub use printer::print_stylesheet;
pub use selector::{
    Combinator, ComplexSelector, CompoundSelector, Link, SelectorGrammar, SelectorList,
    SelectorParser, SimpleSelector, minus, parse_selector_list, unify,
};
pub use tokenizer::{Token, Tokenizer};
