//! SCSS stylesheet parser module.

/// Syntax tree types.
pub mod ast;
/// Stylesheet parser implementation per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;

pub use ast::{
    AtRule, Block, Declaration, ExtendDirective, KeyframeRule, MediaRule, Statement, StyleRule,
    Stylesheet,
};
pub use parser::Parser;

use crate::error::ParseError;
use crate::tokenizer::Tokenizer;

/// Tokenize and parse SCSS source text.
///
/// # Errors
///
/// Returns a [`ParseError`] if the source is not a well-formed stylesheet.
pub fn parse_stylesheet(source: &str) -> Result<Stylesheet, ParseError> {
    let mut tokenizer = Tokenizer::new(source);
    tokenizer.run();
    Parser::new(tokenizer.into_positioned()).parse_stylesheet()
}
