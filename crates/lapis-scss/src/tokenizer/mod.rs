//! SCSS tokenizer module.

/// Token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// Tokenizer implementation.
pub mod tokenizer;

pub use token::Token;
pub use tokenizer::Tokenizer;
