//! Lexer for the condition language.
//!
//! Turns a substituted `test` expression into a token stream. Anything
//! outside the allow-listed grammar becomes a [`TokenKind::Error`]
//! token, which the parser reports as a syntax error.

use super::token::{Keyword, Span, Token, TokenKind};

/// Streaming lexer over a condition string.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position.
    pos: usize,
    /// Start of the token being scanned.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the next token, advancing the lexer.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' | '"' => self.scan_string(c),
            '0'..='9' => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),
            '(' => {
                self.advance();
                self.make_token(TokenKind::LeftParen)
            }
            ')' => {
                self.advance();
                self.make_token(TokenKind::RightParen)
            }
            '-' => {
                self.advance();
                self.make_token(TokenKind::Minus)
            }
            '<' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '=' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::EqEq)
                } else {
                    self.make_token(TokenKind::Error("Unexpected character: =".to_string()))
                }
            }
            '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Error("Unexpected character: !".to_string()))
                }
            }
            c => {
                self.advance();
                self.make_token(TokenKind::Error(format!("Unexpected character: {c}")))
            }
        }
    }

    /// Consumes the entire input and returns all tokens including the
    /// trailing [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    // --- Scanners ---

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.input[self.start..self.pos];
        let kind = Keyword::from_str(text).map_or_else(
            || TokenKind::Identifier(text.to_string()),
            TokenKind::Keyword,
        );
        self.make_token(kind)
    }

    fn scan_number(&mut self) -> Token {
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        let mut is_float = false;
        if self.peek() == Some('.') && matches!(self.peek_next(), Some('0'..='9')) {
            is_float = true;
            self.advance();
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let mut lookahead = self.pos + 1;
            if matches!(self.input[lookahead..].chars().next(), Some('+' | '-')) {
                lookahead += 1;
            }
            if matches!(self.input[lookahead..].chars().next(), Some('0'..='9')) {
                is_float = true;
                while self.pos < lookahead {
                    self.advance();
                }
                while matches!(self.peek(), Some('0'..='9')) {
                    self.advance();
                }
            }
        }

        let text = &self.input[self.start..self.pos];
        if !is_float {
            if let Ok(value) = text.parse::<i64>() {
                return self.make_token(TokenKind::Integer(value));
            }
            // Digit runs wider than i64 carry their magnitude as floats.
        }
        let kind = text.parse::<f64>().map_or_else(
            |_| TokenKind::Error(format!("Invalid number: {text}")),
            TokenKind::Float,
        );
        self.make_token(kind)
    }

    /// Scans a quoted string. A doubled quote inside the string is an
    /// escaped quote character.
    fn scan_string(&mut self, quote: char) -> Token {
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return self.make_token(TokenKind::Error("Unterminated string".to_string()));
                }
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        value.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return self.make_token(TokenKind::String(value));
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    // --- Helper methods ---

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds(""), vec![TokenKind::Eof]);
        assert_eq!(token_kinds("   \t\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_integers_and_floats() {
        assert_eq!(
            token_kinds("42 3.5 1e3"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Float(3.5),
                TokenKind::Float(1000.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_integers_beyond_i64_become_floats() {
        assert_eq!(
            token_kinds("9223372036854775807"),
            vec![TokenKind::Integer(i64::MAX), TokenKind::Eof]
        );
        #[allow(clippy::cast_precision_loss)]
        let expected = u64::MAX as f64;
        assert_eq!(
            token_kinds("18446744073709551615"),
            vec![TokenKind::Float(expected), TokenKind::Eof]
        );
    }

    #[test]
    fn test_integer_followed_by_dot() {
        // A trailing dot is not part of the number.
        assert_eq!(
            token_kinds("1."),
            vec![
                TokenKind::Integer(1),
                TokenKind::Error("Unexpected character: .".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            token_kinds("'hello' \"world\""),
            vec![
                TokenKind::String("hello".to_string()),
                TokenKind::String("world".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            token_kinds("'it''s'"),
            vec![TokenKind::String("it's".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            token_kinds("'oops"),
            vec![
                TokenKind::Error("Unterminated string".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("a AND b or NOT null"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Keyword(Keyword::And),
                TokenKind::Identifier("b".to_string()),
                TokenKind::Keyword(Keyword::Or),
                TokenKind::Keyword(Keyword::Not),
                TokenKind::Keyword(Keyword::Null),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            token_kinds("== != < <= > >="),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_single_equals_is_an_error() {
        assert_eq!(
            token_kinds("a = 1"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Error("Unexpected character: =".to_string()),
                TokenKind::Integer(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_disallowed_characters() {
        assert!(matches!(
            token_kinds("a.b").get(1),
            Some(TokenKind::Error(_))
        ));
        assert!(matches!(
            token_kinds("a[0]").get(1),
            Some(TokenKind::Error(_))
        ));
        assert!(matches!(token_kinds("a + b").get(1), Some(TokenKind::Error(_))));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("ab == 1");
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].span, Span::new(3, 5));
        assert_eq!(tokens[2].span, Span::new(6, 7));
    }

    #[test]
    fn test_parens_and_minus() {
        assert_eq!(
            token_kinds("-(x)"),
            vec![
                TokenKind::Minus,
                TokenKind::LeftParen,
                TokenKind::Identifier("x".to_string()),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }
}
