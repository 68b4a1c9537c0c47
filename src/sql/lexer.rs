//! SQL Lexer (Tokenizer)
//!
//! This module converts a statement into a stream of tokens. Any run of
//! whitespace separates tokens; cell values are never typed here, so numbers
//! come out as plain words.

use super::token::Token;
use crate::error::{Result, SyntaxError};

/// Characters that end a bare word.
const SEPARATORS: &[char] = &[',', '(', ')', '=', '<', '>', '!', ';', '"', '\'', '*'];

/// SQL Lexer
pub struct Lexer {
    /// Input characters
    input: Vec<char>,
    /// Current position in input
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            if token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        if self.is_at_end() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();
        match ch {
            '(' => {
                self.advance();
                Ok(Token::LParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RParen)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            '*' => {
                self.advance();
                Ok(Token::Asterisk)
            }
            '=' => {
                self.advance();
                self.consume_if('=');
                Ok(Token::Eq)
            }
            '<' => {
                self.advance();
                if self.consume_if('=') {
                    Ok(Token::Lte)
                } else if self.consume_if('>') {
                    Ok(Token::Neq)
                } else {
                    Ok(Token::Lt)
                }
            }
            '>' => {
                self.advance();
                if self.consume_if('=') {
                    Ok(Token::Gte)
                } else {
                    Ok(Token::Gt)
                }
            }
            '!' => {
                self.advance();
                if self.consume_if('=') {
                    Ok(Token::Neq)
                } else {
                    Err(SyntaxError::UnexpectedToken {
                        expected: "'=' after '!'".to_string(),
                        found: self.peek_fragment(),
                    }
                    .into())
                }
            }
            '"' | '\'' => self.read_string(ch),
            _ => Ok(self.read_word()),
        }
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get the current character
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Peek at the next character
    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Consume the current character if it equals `expected`
    fn consume_if(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Render the character at the current position for diagnostics
    fn peek_fragment(&self) -> String {
        if self.is_at_end() {
            Token::Eof.to_string()
        } else {
            self.current_char().to_string()
        }
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Read a quoted string literal; a doubled quote escapes itself
    fn read_string(&mut self, quote: char) -> Result<Token> {
        let start_pos = self.position;
        self.advance(); // skip opening quote

        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();

            if ch == quote {
                if self.peek_char() == Some(quote) {
                    value.push(quote);
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // skip closing quote
                    return Ok(Token::StringLiteral(value));
                }
            } else {
                value.push(ch);
                self.advance();
            }
        }

        Err(SyntaxError::UnterminatedString(start_pos).into())
    }

    /// Read a bare word, turning it into a keyword when it is one
    fn read_word(&mut self) -> Token {
        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_whitespace() || SEPARATORS.contains(&ch) {
                break;
            }
            value.push(ch);
            self.advance();
        }

        Token::from_keyword(&value).unwrap_or(Token::Word(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_simple_select() {
        let mut lexer = Lexer::new("SELECT * FROM people");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Select,
                Token::Asterisk,
                Token::From,
                word("people"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_select_with_where() {
        let mut lexer = Lexer::new("select name,city from people where age>=27;");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Select,
                word("name"),
                Token::Comma,
                word("city"),
                Token::From,
                word("people"),
                Token::Where,
                word("age"),
                Token::Gte,
                word("27"),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_count_star() {
        let mut lexer = Lexer::new("SELECT COUNT(*) FROM people");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[1], Token::Count);
        assert_eq!(tokens[2], Token::LParen);
        assert_eq!(tokens[3], Token::Asterisk);
        assert_eq!(tokens[4], Token::RParen);
    }

    #[test]
    fn test_string_literals() {
        let mut lexer = Lexer::new(r#"city = "Data  Analyst" OR name = 'it''s'"#);
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[2], Token::StringLiteral("Data  Analyst".to_string()));
        assert_eq!(tokens[6], Token::StringLiteral("it's".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("city = \"Chennai");
        let err = lexer.tokenize().unwrap_err();

        assert!(matches!(
            err,
            Error::Syntax(SyntaxError::UnterminatedString(7))
        ));
    }

    #[test]
    fn test_comparison_operators() {
        let mut lexer = Lexer::new("a < b <= c > d >= e <> f != g == h");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens.contains(&Token::Lt));
        assert!(tokens.contains(&Token::Lte));
        assert!(tokens.contains(&Token::Gt));
        assert!(tokens.contains(&Token::Gte));
        assert!(tokens.contains(&Token::Eq));
        assert_eq!(tokens.iter().filter(|t| **t == Token::Neq).count(), 2);
    }

    #[test]
    fn test_bare_numbers_stay_words() {
        let mut lexer = Lexer::new("salary > -12.5");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens, vec![word("salary"), Token::Gt, word("-12.5"), Token::Eof]);
    }

    #[test]
    fn test_lone_bang() {
        let mut lexer = Lexer::new("age ! 3");
        assert!(matches!(
            lexer.tokenize(),
            Err(Error::Syntax(SyntaxError::UnexpectedToken { .. }))
        ));
    }
}
