//! SCSS stylesheet parser, modelled on
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//! On top of plain CSS this accepts nested style rules and `@extend`. A nested
//! rule is told apart from a declaration by looking ahead for a `{` before the
//! next `;` or `}`.

use lapis_common::SourcePosition;

use super::ast::{
    AtRule, Block, Declaration, ExtendDirective, KeyframeRule, MediaRule, Statement, StyleRule,
    Stylesheet,
};
use crate::error::ParseError;
use crate::selector::parse_selector_list;
use crate::tokenizer::Token;

/// Stylesheet parser over a positioned token stream.
pub struct Parser {
    tokens: Vec<Token>,
    locations: Vec<SourcePosition>,
    position: usize,
}

impl Parser {
    /// Create a new parser from tokens paired with their start positions, as
    /// returned by [`Tokenizer::into_positioned`](crate::tokenizer::Tokenizer::into_positioned).
    #[must_use]
    pub fn new(tokens: Vec<(Token, SourcePosition)>) -> Self {
        let (tokens, locations) = tokens.into_iter().unzip();
        Self {
            tokens,
            locations,
            position: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unbalanced braces, declarations without a
    /// colon, `@extend` with a block, and selectors the selector grammar rejects.
    pub fn parse_stylesheet(&mut self) -> Result<Stylesheet, ParseError> {
        let statements = self.consume_list_of_statements(true, false)?;
        Ok(Stylesheet {
            block: Block::new(statements),
        })
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// Stops in front of the closing `}` of a nested block.
    fn consume_list_of_statements(
        &mut self,
        top_level: bool,
        in_keyframes: bool,
    ) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>"
                // "Do nothing."
                Some(Token::Whitespace | Token::Semicolon) => {
                    let _ = self.consume();
                }

                // "<EOF-token>"
                // "Return the list of rules."
                None | Some(Token::EOF) => {
                    if top_level {
                        return Ok(statements);
                    }
                    return Err(ParseError::UnexpectedEof {
                        expected: "'}'".to_string(),
                        position: self.location(),
                    });
                }

                Some(Token::RightBrace) => {
                    if top_level {
                        return Err(ParseError::UnexpectedToken {
                            found: "'}'".to_string(),
                            position: self.location(),
                        });
                    }
                    return Ok(statements);
                }

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule, and append
                // the returned value to the list of rules."
                Some(Token::AtKeyword(_)) => statements.push(self.consume_at_rule()?),

                // "anything else"
                Some(_) => {
                    if self.starts_block() {
                        statements.push(self.consume_qualified_rule(in_keyframes)?);
                    } else {
                        statements.push(Statement::Declaration(self.consume_declaration()?));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Result<Statement, ParseError> {
        let position = self.location();
        let name = match self.consume() {
            Some(Token::AtKeyword(name)) => name.clone(),
            _ => {
                return Err(ParseError::UnexpectedToken {
                    found: "at-rule".to_string(),
                    position,
                });
            }
        };

        self.skip_whitespace();
        let prelude_position = self.location();
        let prelude = self.consume_prelude();
        let has_block = self.peek() == Some(&Token::LeftBrace);

        if name.eq_ignore_ascii_case("extend") {
            if has_block {
                return Err(ParseError::UnexpectedToken {
                    found: "'{' after @extend".to_string(),
                    position: self.location(),
                });
            }
            self.consume_semicolon();
            let (targets, optional) = strip_flag(prelude, "optional");
            let selector = parse_selector_list(&serialize(&targets), prelude_position)?;
            return Ok(Statement::Extend(ExtendDirective {
                selector,
                optional,
                position,
            }));
        }

        let prelude = serialize(&prelude);
        if !has_block {
            self.consume_semicolon();
            return Ok(Statement::AtRule(AtRule {
                name,
                prelude,
                block: None,
                position,
            }));
        }

        if name.eq_ignore_ascii_case("media") {
            let block = self.consume_block(false)?;
            return Ok(Statement::Media(MediaRule {
                query: prelude,
                block,
                position,
            }));
        }

        // `@keyframes`, `@-webkit-keyframes`, ...
        let in_keyframes = name.to_ascii_lowercase().ends_with("keyframes");
        let block = self.consume_block(in_keyframes)?;
        Ok(Statement::AtRule(AtRule {
            name,
            prelude,
            block: Some(block),
            position,
        }))
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self, in_keyframes: bool) -> Result<Statement, ParseError> {
        let position = self.location();
        let prelude = serialize(&self.consume_prelude());
        let block = self.consume_block(false)?;

        if in_keyframes {
            return Ok(Statement::Keyframe(KeyframeRule {
                selector: prelude,
                block,
                position,
            }));
        }

        // [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
        let selector = parse_selector_list(&prelude, position)?;
        Ok(Statement::Rule(StyleRule {
            selector,
            block,
            position,
        }))
    }

    /// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Consumes `{`, the statements inside, and the matching `}`.
    fn consume_block(&mut self, in_keyframes: bool) -> Result<Block, ParseError> {
        let opened_at = self.location();
        match self.consume() {
            Some(Token::LeftBrace) => {}
            Some(token) => {
                return Err(ParseError::UnexpectedToken {
                    found: describe(token),
                    position: opened_at,
                });
            }
            None => {
                return Err(ParseError::UnexpectedEof {
                    expected: "'{'".to_string(),
                    position: opened_at,
                });
            }
        }

        let statements = self.consume_list_of_statements(false, in_keyframes)?;

        // consume_list_of_statements only returns in front of a '}'
        let _ = self.consume();
        Ok(Block::new(statements))
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Result<Declaration, ParseError> {
        let position = self.location();

        let mut name = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Colon) => break,
                Some(token @ (Token::Semicolon | Token::RightBrace | Token::EOF)) => {
                    return Err(ParseError::UnexpectedToken {
                        found: describe(token),
                        position: self.location(),
                    });
                }
                None => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "':'".to_string(),
                        position,
                    });
                }
                Some(_) => {
                    if let Some(token) = self.consume() {
                        name.push(token.clone());
                    }
                }
            }
        }
        let name = serialize(&name);
        if name.is_empty() {
            return Err(ParseError::UnexpectedToken {
                found: "':'".to_string(),
                position,
            });
        }
        let _ = self.consume(); // :

        let (value, important) = strip_flag(self.consume_prelude(), "important");
        self.consume_semicolon();

        Ok(Declaration {
            name,
            value: serialize(&value),
            important,
            position,
        })
    }

    /// Collect tokens up to (not including) the next `{`, `;` or `}` outside
    /// parentheses and brackets.
    fn consume_prelude(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;

        while let Some(token) = self.peek() {
            match token {
                Token::LeftBrace | Token::Semicolon | Token::RightBrace if depth == 0 => break,
                Token::EOF => break,
                Token::Function(_) | Token::LeftParen | Token::LeftBracket => depth += 1,
                Token::RightParen | Token::RightBracket => depth = depth.saturating_sub(1),
                _ => {}
            }
            if let Some(token) = self.consume() {
                tokens.push(token.clone());
            }
        }

        tokens
    }

    /// True if a `{` comes before the next `;` or `}` at nesting depth zero.
    fn starts_block(&self) -> bool {
        let mut depth = 0usize;
        for token in &self.tokens[self.position..] {
            match token {
                Token::LeftBrace if depth == 0 => return true,
                Token::Semicolon | Token::RightBrace if depth == 0 => return false,
                Token::EOF => return false,
                Token::Function(_) | Token::LeftParen | Token::LeftBracket => depth += 1,
                Token::RightParen | Token::RightBracket => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        false
    }

    fn consume_semicolon(&mut self) {
        if self.peek() == Some(&Token::Semicolon) {
            let _ = self.consume();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek() == Some(&Token::Whitespace) {
            let _ = self.consume();
        }
    }

    fn location(&self) -> SourcePosition {
        self.locations
            .get(self.position)
            .or_else(|| self.locations.last())
            .copied()
            .unwrap_or_default()
    }

    fn consume(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }
}

/// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
///
/// Write tokens back as text, trimmed.
fn serialize(tokens: &[Token]) -> String {
    let text: String = tokens.iter().map(ToString::to_string).collect();
    text.trim().to_string()
}

fn describe(token: &Token) -> String {
    if token.is_eof() {
        "end of input".to_string()
    } else {
        format!("'{token}'")
    }
}

/// Remove a trailing `!flag` (e.g. `!important`, `!optional`), reporting
/// whether it was present.
///
/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e.
/// if the last two (non-whitespace, non-comment) tokens in its value are
/// a <delim-token> with the value "!" followed by an <ident-token> with
/// a value that is an ASCII case-insensitive match for "important"."
///
/// STEP 1: Skip trailing whitespace.
/// STEP 2: Check for the flag's <ident-token>.
/// STEP 3: Skip any whitespace between "!" and the flag.
/// STEP 4: Check for <delim-token> "!" and cut from there.
fn strip_flag(mut tokens: Vec<Token>, flag: &str) -> (Vec<Token>, bool) {
    // STEP 1
    trim_trailing_whitespace(&mut tokens);

    // STEP 2
    match tokens.last() {
        Some(Token::Ident(name)) if name.eq_ignore_ascii_case(flag) => {}
        _ => return (tokens, false),
    }

    // STEP 3
    let mut bang = tokens.len() - 1;
    while bang > 0 && tokens[bang - 1] == Token::Whitespace {
        bang -= 1;
    }

    // STEP 4
    if bang == 0 || tokens[bang - 1] != Token::Delim('!') {
        return (tokens, false);
    }
    tokens.truncate(bang - 1);
    trim_trailing_whitespace(&mut tokens);
    (tokens, true)
}

fn trim_trailing_whitespace(tokens: &mut Vec<Token>) {
    while tokens.last() == Some(&Token::Whitespace) {
        let _ = tokens.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn tokens(source: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(source);
        tokenizer.run();
        let mut tokens = tokenizer.into_tokens();
        let _ = tokens.pop(); // EOF
        tokens
    }

    #[test]
    fn test_strip_flag_important() {
        let (value, important) = strip_flag(tokens("red ! important "), "important");
        assert!(important);
        assert_eq!(serialize(&value), "red");
    }

    #[test]
    fn test_strip_flag_requires_bang() {
        let (value, important) = strip_flag(tokens("red important"), "important");
        assert!(!important);
        assert_eq!(serialize(&value), "red important");
    }

    #[test]
    fn test_starts_block_ignores_parens() {
        let mut tokenizer = Tokenizer::new("a:not(.b) { }");
        tokenizer.run();
        let parser = Parser::new(tokenizer.into_positioned());
        assert!(parser.starts_block());

        let mut tokenizer = Tokenizer::new("color: rgb(1, 2, 3);");
        tokenizer.run();
        let parser = Parser::new(tokenizer.into_positioned());
        assert!(!parser.starts_block());
    }
}
