use lapis_common::SourcePosition;

use super::token::Token;

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// Tokenizer for SCSS source. Follows the CSS Syntax Level 3 algorithms,
/// extended with SCSS `//` line comments.
pub struct Tokenizer {
    /// The input being tokenized
    input: Vec<char>,
    /// Source location of every input character, plus one past the end
    locations: Vec<SourcePosition>,
    /// Current position in the input
    position: usize,
    /// Collected tokens
    tokens: Vec<Token>,
    /// Source location where each collected token starts
    starts: Vec<SourcePosition>,
}

impl Tokenizer {
    /// Create a new tokenizer over the given input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        let input: Vec<char> = input.into().chars().collect();
        let mut locations = Vec::with_capacity(input.len() + 1);
        let mut location = SourcePosition::START;
        for &c in &input {
            locations.push(location);
            location = location.advance(c);
        }
        locations.push(location);

        Self {
            input,
            locations,
            position: 0,
            tokens: Vec::new(),
            starts: Vec::new(),
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Consume tokens until EOF. The EOF token is always the last token.
    pub fn run(&mut self) {
        loop {
            self.consume_comments();
            let start = self.location();
            let token = self.consume_token();
            let is_eof = token.is_eof();
            self.tokens.push(token);
            self.starts.push(start);
            if is_eof {
                break;
            }
        }
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return the collected tokens paired with the position each one starts at.
    #[must_use]
    pub fn into_positioned(self) -> Vec<(Token, SourcePosition)> {
        self.tokens.into_iter().zip(self.starts).collect()
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> Token {
        let Some(c) = self.consume() else {
            return Token::EOF;
        };

        match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                while self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                Token::Whitespace
            }

            // "U+0022 QUOTATION MARK (")" / "U+0027 APOSTROPHE (')"
            '"' | '\'' => self.consume_string_token(c),

            // "U+0023 NUMBER SIGN (#)"
            // "If the next input code point is an ident code point... create a <hash-token>."
            '#' if self.peek().is_some_and(is_ident_code_point) => {
                Token::Hash(self.consume_ident_sequence())
            }

            // "U+002B PLUS SIGN (+)", "U+002D HYPHEN-MINUS (-)", "U+002E FULL STOP (.)"
            // "If the input stream starts with a number, reconsume the current
            // input code point, consume a numeric token, and return it."
            '+' | '-' | '.' => {
                self.reconsume();
                if self.would_start_number(0) {
                    self.consume_numeric_token()
                }
                // "Otherwise, if the input stream starts with an ident sequence,
                // reconsume the current input code point, consume an ident-like
                // token, and return it."
                else if c == '-' && self.would_start_ident_sequence(0) {
                    self.consume_ident_like_token()
                } else {
                    let _ = self.consume();
                    Token::Delim(c)
                }
            }

            ',' => Token::Comma,
            ':' => Token::Colon,
            ';' => Token::Semicolon,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,

            // "U+0040 COMMERCIAL AT (@)"
            // "If the next 3 input code points would start an ident sequence, consume
            // an ident sequence, create an <at-keyword-token> with its value set to
            // the returned value, and return it."
            '@' if self.would_start_ident_sequence(0) => {
                Token::AtKeyword(self.consume_ident_sequence())
            }

            // "digit"
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            // "ident-start code point"
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else"
            // "Return a <delim-token> with its value set to the current input code point."
            c => Token::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// CSS block comments, plus SCSS `//` comments running to the end
    /// of the line.
    fn consume_comments(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('/'), Some('*')) => {
                    self.position += 2;
                    while let Some(c) = self.consume() {
                        if c == '*' && self.peek() == Some('/') {
                            let _ = self.consume();
                            break;
                        }
                    }
                }
                (Some('/'), Some('/')) => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        let _ = self.consume();
                    }
                }
                _ => return,
            }
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, quote: char) -> Token {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point" / "EOF"
                Some(c) if c == quote => break,
                None => break,

                // "newline"
                // "This is a parse error. Reconsume the current input code point."
                Some('\n') => {
                    self.reconsume();
                    break;
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.consume() {
                    Some('\n') | None => {}
                    Some(escaped) => value.push(escaped),
                },

                Some(c) => value.push(c),
            }
        }

        Token::String { value, quote }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> Token {
        let value = self.consume_number();

        if self.would_start_ident_sequence(0) {
            let unit = self.consume_ident_sequence();
            Token::Dimension { value, unit }
        } else if self.peek() == Some('%') {
            let _ = self.consume();
            Token::Percentage(value)
        } else {
            Token::Number(value)
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Returns the number's representation rather than its value.
    fn consume_number(&mut self) -> String {
        let mut repr = String::new();

        if let Some(sign @ ('+' | '-')) = self.peek() {
            repr.push(sign);
            let _ = self.consume();
        }
        self.consume_digits(&mut repr);

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            repr.push('.');
            let _ = self.consume();
            self.consume_digits(&mut repr);
        }

        if let Some(e @ ('e' | 'E')) = self.peek() {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                repr.push(e);
                let _ = self.consume();
                if signed {
                    if let Some(sign) = self.consume() {
                        repr.push(sign);
                    }
                }
                self.consume_digits(&mut repr);
            }
        }

        repr
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while let Some(d) = self.peek().filter(char::is_ascii_digit) {
            repr.push(d);
            let _ = self.consume();
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> Token {
        let name = self.consume_ident_sequence();
        if self.peek() != Some('(') {
            return Token::Ident(name);
        }
        let _ = self.consume();

        // "If string's value is an ASCII case-insensitive match for 'url', and the
        // next input code point is not a quotation mark, consume a url token."
        let quoted = self
            .input
            .get(self.position..)
            .and_then(|rest| rest.iter().find(|c| !is_whitespace(**c)))
            .is_some_and(|&c| matches!(c, '"' | '\''));
        if name.eq_ignore_ascii_case("url") && !quoted {
            self.consume_url_token()
        } else {
            Token::Function(name)
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    ///
    /// The contents are kept raw up to the closing parenthesis, so `//` inside
    /// a URL is never mistaken for a comment.
    fn consume_url_token(&mut self) -> Token {
        let mut value = String::new();
        while let Some(c) = self.consume() {
            match c {
                ')' => break,
                '\\' => {
                    value.push(c);
                    if let Some(escaped) = self.consume() {
                        value.push(escaped);
                    }
                }
                c => value.push(c),
            }
        }
        Token::Url(value.trim().to_string())
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        while let Some(c) = self.peek() {
            if is_ident_code_point(c) {
                result.push(c);
                let _ = self.consume();
            } else if c == '\\' && self.peek_at(1).is_some_and(|n| n != '\n') {
                // Escapes are kept verbatim so selectors re-serialize unchanged.
                result.push(c);
                let _ = self.consume();
                if let Some(escaped) = self.consume() {
                    result.push(escaped);
                }
            } else {
                break;
            }
        }

        result
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    ///
    /// Looks at the code points `offset` and `offset + 1` past the current position.
    fn would_start_ident_sequence(&self, offset: usize) -> bool {
        let second = self.peek_at(offset + 1);
        match self.peek_at(offset) {
            // "U+002D HYPHEN-MINUS"
            Some('-') => second.is_some_and(|c| is_ident_start_code_point(c) || c == '-' || c == '\\'),
            // "U+005C REVERSE SOLIDUS (\)"
            Some('\\') => second.is_some_and(|c| c != '\n'),
            // "ident-start code point"
            Some(c) => is_ident_start_code_point(c),
            None => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self, offset: usize) -> bool {
        let is_digit_at = |at: usize| self.peek_at(at).is_some_and(|c| c.is_ascii_digit());
        match self.peek_at(offset) {
            Some('+' | '-') => {
                is_digit_at(offset + 1)
                    || (self.peek_at(offset + 1) == Some('.') && is_digit_at(offset + 2))
            }
            Some('.') => is_digit_at(offset + 1),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Source location of the next input character.
    fn location(&self) -> SourcePosition {
        self.locations[self.position.min(self.input.len())]
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
