//! Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! The token set is the subset of CSS Syntax Level 3 that SCSS stylesheets
//! built from rules, declarations and at-rules need. Numeric tokens keep the
//! exact text they were written with, since nothing here evaluates values and
//! the printer must reproduce them unchanged.

use core::fmt::{self, Write as _};

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// A single token produced by the [`Tokenizer`](super::Tokenizer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "`<ident-token>`"
    Ident(String),

    /// "`<function-token>`" - an identifier immediately followed by `(`.
    Function(String),

    /// "`<at-keyword-token>`" - the name without the leading `@`.
    AtKeyword(String),

    /// "`<hash-token>`" - the name without the leading `#`.
    Hash(String),

    /// "`<string-token>`"
    String {
        /// The unescaped string contents.
        value: String,
        /// The quote character the string was written with.
        quote: char,
    },

    /// "`<url-token>`" - the raw contents of an unquoted `url(...)`.
    Url(String),

    /// "`<number-token>`", kept as written (e.g. `-1.5`).
    Number(String),

    /// "`<percentage-token>`", the numeric part as written.
    Percentage(String),

    /// "`<dimension-token>`"
    Dimension {
        /// The numeric part as written.
        value: String,
        /// The unit identifier.
        unit: String,
    },

    /// "`<delim-token>`"
    Delim(char),

    /// "`<whitespace-token>`"
    Whitespace,

    /// "`<colon-token>`"
    Colon,

    /// "`<semicolon-token>`"
    Semicolon,

    /// "`<comma-token>`"
    Comma,

    /// "`<[-token>`"
    LeftBracket,

    /// "`<]-token>`"
    RightBracket,

    /// "`<(-token>`"
    LeftParen,

    /// "`<)-token>`"
    RightParen,

    /// "`<{-token>`"
    LeftBrace,

    /// "`<}-token>`"
    RightBrace,

    /// "`<EOF-token>`"
    EOF,
}

impl Token {
    /// Returns true if this is the end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }
}

/// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
///
/// Writes the token back as source text. Whitespace collapses to a single space.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) | Self::Number(v) => f.write_str(v),
            Self::Function(name) => write!(f, "{name}("),
            Self::AtKeyword(name) => write!(f, "@{name}"),
            Self::Hash(name) => write!(f, "#{name}"),
            Self::Url(url) => write!(f, "url({url})"),
            Self::String { value, quote } => {
                f.write_char(*quote)?;
                for c in value.chars() {
                    if c == '\\' || c == *quote {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char(*quote)
            }
            Self::Percentage(v) => write!(f, "{v}%"),
            Self::Dimension { value, unit } => write!(f, "{value}{unit}"),
            Self::Delim(c) => write!(f, "{c}"),
            Self::Whitespace => f.write_str(" "),
            Self::Colon => f.write_str(":"),
            Self::Semicolon => f.write_str(";"),
            Self::Comma => f.write_str(","),
            Self::LeftBracket => f.write_str("["),
            Self::RightBracket => f.write_str("]"),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::LeftBrace => f.write_str("{"),
            Self::RightBrace => f.write_str("}"),
            Self::EOF => Ok(()),
        }
    }
}
