//! Selector text grammar.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! Parses selector text into a [`SelectorList`]. The stylesheet parser uses it
//! for rule preludes and `@extend` targets, and `@extend` resolution uses it
//! through [`SelectorGrammar`] to renormalize composed selectors.

use lapis_common::SourcePosition;

use super::{
    AttributeOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Link,
    SelectorList, SimpleSelector,
};
use crate::error::ParseError;

/// The grammar-level renormalize service.
///
/// Composing selectors structurally can leave trees that are equivalent to,
/// but shaped differently from, what the grammar would produce for the same
/// text. Renormalizing re-parses the canonical text to restore the canonical
/// tree shape.
pub trait SelectorGrammar {
    /// Re-parse composed selector text back into a clean selector list.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if `text` is not a valid selector list.
    fn renormalize(&self, text: &str, position: SourcePosition) -> Result<SelectorList, ParseError>;
}

impl<T: SelectorGrammar + ?Sized> SelectorGrammar for &T {
    fn renormalize(&self, text: &str, position: SourcePosition) -> Result<SelectorList, ParseError> {
        (**self).renormalize(text, position)
    }
}

/// The default [`SelectorGrammar`], backed by [`parse_selector_list`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorParser;

impl SelectorGrammar for SelectorParser {
    fn renormalize(&self, text: &str, position: SourcePosition) -> Result<SelectorList, ParseError> {
        parse_selector_list(text, position)
    }
}

/// Parse a comma-separated selector list.
///
/// Supports:
/// - Type, universal, class, ID, placeholder (`%name`) and parent (`&`) selectors
/// - Attribute selectors: `[attr]`, `=`, `~=`, `|=`, `^=`, `$=`, `*=`
/// - Pseudo-classes and pseudo-elements, with raw functional arguments
/// - All four combinators, including a leading combinator (`> .child`)
///
/// `position` is where `text` starts in the source; it becomes the list's
/// position and anchors error locations.
///
/// # Errors
///
/// Returns [`ParseError::InvalidSelector`] describing the first problem found.
pub fn parse_selector_list(text: &str, position: SourcePosition) -> Result<SelectorList, ParseError> {
    let mut cursor = Cursor::new(text, position);
    let mut list = SelectorList::new(position);

    loop {
        list.push(cursor.parse_complex()?);
        let _ = cursor.skip_whitespace();
        match cursor.next() {
            Some(',') => {}
            None => break,
            Some(c) => return Err(cursor.error(format!("unexpected '{c}'"))),
        }
    }

    Ok(list)
}

/// Returns true if `text` is a CSS identifier, so it can be written unquoted.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let first = match chars.next() {
        Some('-') => chars.next(),
        first => first,
    };
    first.is_some_and(|c| is_ident_start_char(c) || c == '-') && chars.all(is_ident_char)
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

struct Cursor {
    chars: Vec<char>,
    index: usize,
    origin: SourcePosition,
}

impl Cursor {
    fn new(text: &str, origin: SourcePosition) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            origin,
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    fn parse_complex(&mut self) -> Result<ComplexSelector, ParseError> {
        let mut links = Vec::new();

        let _ = self.skip_whitespace();
        let mut combinator = self.parse_combinator().unwrap_or(Combinator::Descendant);

        loop {
            let _ = self.skip_whitespace();
            let compound = self.parse_compound()?;
            if compound.is_empty() {
                return Err(self.error(match self.peek() {
                    Some(c) => format!("expected selector, found '{c}'"),
                    None => "expected selector".to_string(),
                }));
            }
            links.push(Link::new(combinator, compound));

            // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
            // "A descendant combinator is whitespace that separates two compound selectors."
            let had_whitespace = self.skip_whitespace();
            combinator = match self.parse_combinator() {
                Some(explicit) => explicit,
                None if had_whitespace && !matches!(self.peek(), None | Some(',')) => {
                    Combinator::Descendant
                }
                None => break,
            };
        }

        Ok(ComplexSelector::new(links))
    }

    fn parse_combinator(&mut self) -> Option<Combinator> {
        let combinator = match self.peek()? {
            '>' => Combinator::Child,
            '+' => Combinator::NextSibling,
            '~' => Combinator::SubsequentSibling,
            _ => return None,
        };
        self.index += 1;
        Some(combinator)
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut simples: Vec<SimpleSelector> = Vec::new();

        while let Some(c) = self.peek() {
            let simple = match c {
                '&' => {
                    self.index += 1;
                    // `&div` is the parent plus a type selector; anything
                    // else glued to `&` is a suffix.
                    if self.peek().is_some_and(|c| {
                        (is_ident_char(c) && !c.is_ascii_alphabetic()) || c == '\\'
                    }) {
                        return Err(self.error("suffixes on '&' are not supported"));
                    }
                    SimpleSelector::Parent
                }
                '*' => {
                    self.index += 1;
                    SimpleSelector::Universal
                }
                '.' => {
                    self.index += 1;
                    SimpleSelector::Class(self.expect_identifier("class name")?)
                }
                '#' => {
                    self.index += 1;
                    SimpleSelector::Id(self.expect_identifier("id")?)
                }
                '%' => {
                    self.index += 1;
                    SimpleSelector::Placeholder(self.expect_identifier("placeholder name")?)
                }
                '[' => {
                    self.index += 1;
                    SimpleSelector::Attribute(self.parse_attribute()?)
                }
                ':' => {
                    self.index += 1;
                    self.parse_pseudo()?
                }
                c if is_ident_start_char(c) || c == '-' || c == '\\' => {
                    SimpleSelector::Type(self.expect_identifier("type selector")?)
                }
                _ => break,
            };

            // Type-like selectors have to lead the compound: `.a&` or `[x]div`
            // would not re-parse to the same thing.
            if simple.is_type_like() && simples.iter().any(|s| !matches!(s, SimpleSelector::Parent)) {
                return Err(self.error(format!("'{simple}' must come first in a compound selector")));
            }
            simples.push(simple);
        }

        Ok(CompoundSelector::new(simples))
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Called with the `[` consumed.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, ParseError> {
        let _ = self.skip_whitespace();
        let name = self.expect_identifier("attribute name")?;
        let _ = self.skip_whitespace();

        let operator = match self.next() {
            Some(']') => {
                return Ok(AttributeSelector {
                    name,
                    matcher: None,
                });
            }
            Some('=') => AttributeOperator::Equals,
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.next() != Some('=') {
                    return Err(self.error(format!("expected '=' after '{op}'")));
                }
                match op {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::PrefixMatch,
                    '$' => AttributeOperator::SuffixMatch,
                    _ => AttributeOperator::SubstringMatch,
                }
            }
            _ => return Err(self.error("malformed attribute selector")),
        };

        let _ = self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.index += 1;
                let mut value = String::new();
                loop {
                    match self.next() {
                        Some(c) if c == quote => break,
                        // Escapes are kept verbatim, as in identifiers.
                        Some('\\') => {
                            value.push('\\');
                            if let Some(escaped) = self.next() {
                                value.push(escaped);
                            }
                        }
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string in attribute selector")),
                    }
                }
                value
            }
            _ => self.expect_identifier("attribute value")?,
        };

        let _ = self.skip_whitespace();
        if self.next() != Some(']') {
            return Err(self.error("expected ']'"));
        }

        Ok(AttributeSelector {
            name,
            matcher: Some((operator, value)),
        })
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Called with the first `:` consumed.
    fn parse_pseudo(&mut self) -> Result<SimpleSelector, ParseError> {
        let is_element = self.peek() == Some(':');
        if is_element {
            self.index += 1;
        }
        let name = self.expect_identifier("pseudo-class name")?;

        // Functional pseudo: keep the balanced argument text as written.
        let argument = if self.peek() == Some('(') {
            self.index += 1;
            let mut depth = 1u32;
            let mut argument = String::new();
            loop {
                match self.next() {
                    Some('(') => depth += 1,
                    Some(')') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    Some(_) => {}
                    None => return Err(self.error("unbalanced parentheses")),
                }
                argument.push(self.chars[self.index - 1]);
            }
            Some(argument.trim().to_string())
        } else {
            None
        };

        Ok(if is_element {
            SimpleSelector::PseudoElement { name, argument }
        } else {
            SimpleSelector::PseudoClass { name, argument }
        })
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// Escapes are kept verbatim.
    fn expect_identifier(&mut self, what: &str) -> Result<String, ParseError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                ident.push(c);
                self.index += 1;
            } else if c == '\\' && self.peek_at(1).is_some() {
                ident.push(c);
                ident.push(self.chars[self.index + 1]);
                self.index += 2;
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.error(format!("expected {what}")));
        }
        Ok(ident)
    }

    /// Skip whitespace, returning true if any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.index;
        while self.peek().is_some_and(char::is_whitespace) {
            self.index += 1;
        }
        self.index > start
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        Some(c)
    }

    /// Source position of the cursor.
    fn position(&self) -> SourcePosition {
        self.chars
            .iter()
            .take(self.index)
            .fold(self.origin, |pos, &c| pos.advance(c))
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::InvalidSelector {
            text: self.chars.iter().collect(),
            reason: reason.into(),
            position: self.position(),
        }
    }
}
