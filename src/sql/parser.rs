//! SQL Parser
//!
//! This module parses a token stream into a [`Query`]. Supported grammar:
//!
//! ```text
//! SELECT <projection> FROM <table> [WHERE <cond> {AND <cond>} | <cond> {OR <cond>}] [;]
//! ```
//!
//! A WHERE clause that mixes AND and OR is rejected rather than guessing a
//! precedence. Other keywords may appear in unquoted literals; `and`/`or`
//! as literal text must be quoted.

use tracing::debug;

use super::ast::*;
use super::lexer::Lexer;
use super::token::Token;
use crate::error::{Error, Result, SyntaxError};

static EOF: Token = Token::Eof;

/// SQL Parser
pub struct Parser {
    sql: String,
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a new parser from a SQL string
    pub fn new(sql: &str) -> Result<Self> {
        let mut lexer = Lexer::new(sql);
        let tokens = lexer.tokenize()?;

        Ok(Self {
            sql: sql.trim().to_string(),
            tokens,
            position: 0,
        })
    }

    /// Parse a single SELECT statement
    pub fn parse(&mut self) -> Result<Query> {
        if self
            .tokens
            .iter()
            .all(|t| matches!(t, Token::Semicolon | Token::Eof))
        {
            return Err(SyntaxError::EmptyStatement.into());
        }

        if !self.check(&Token::Select) {
            return Err(SyntaxError::MissingSelect(self.current().to_string()).into());
        }
        self.advance();

        let projection = self.parse_projection()?;
        let table_name = self.parse_table_name()?;

        let filter = if self.check(&Token::Where) {
            self.advance();
            Some(self.parse_where()?)
        } else {
            None
        };

        // Trailing semicolons are optional
        while self.check(&Token::Semicolon) {
            self.advance();
        }

        if !self.is_at_end() {
            let expected = if filter.is_some() {
                "AND, OR or end of statement"
            } else {
                "WHERE or end of statement"
            };
            return Err(SyntaxError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current().to_string(),
            }
            .into());
        }

        let query = Query {
            table_name,
            projection,
            filter,
        };
        debug!(?query, "parsed statement");
        Ok(query)
    }

    // ========== SELECT list ==========

    fn parse_projection(&mut self) -> Result<Projection> {
        let start = self.position;
        while !self.check(&Token::From) && !self.is_at_end() {
            self.advance();
        }
        let items = self.tokens[start..self.position].to_vec();

        if self.is_at_end() {
            return Err(SyntaxError::MissingFrom(format!("SELECT {}", render(&items))).into());
        }
        if items.is_empty() {
            return Err(SyntaxError::EmptyProjection(self.sql.clone()).into());
        }
        self.advance(); // consume FROM

        projection_from_tokens(&items)
    }

    // ========== FROM clause ==========

    fn parse_table_name(&mut self) -> Result<String> {
        if let Some(name) = identifier(self.current()) {
            self.advance();
            return Ok(name);
        }

        match self.current() {
            Token::Eof | Token::Semicolon | Token::Where => {
                Err(SyntaxError::MissingTable(self.sql.clone()).into())
            }
            other => Err(SyntaxError::UnexpectedToken {
                expected: "table name".to_string(),
                found: other.to_string(),
            }
            .into()),
        }
    }

    // ========== WHERE clause ==========

    fn parse_where(&mut self) -> Result<Expression> {
        let start = self.position;
        let mut conditions = vec![self.parse_condition()?];
        let mut op: Option<LogicalOp> = None;

        loop {
            let next = match self.current() {
                Token::And => LogicalOp::And,
                Token::Or => LogicalOp::Or,
                _ => break,
            };
            match op {
                Some(prev) if prev != next => {
                    return Err(SyntaxError::MixedConnectives(self.fragment_from(start)).into());
                }
                _ => op = Some(next),
            }
            self.advance();
            conditions.push(self.parse_condition()?);
        }

        Ok(Expression {
            op: op.unwrap_or(LogicalOp::And),
            conditions,
        })
    }

    fn parse_condition(&mut self) -> Result<Condition> {
        // The keyword that introduced this condition is part of the fragment
        let start = self.position.saturating_sub(1);

        let column = match identifier(self.current()) {
            Some(column) => column,
            None => return Err(self.malformed(start)),
        };
        self.advance();

        let op = match self.current() {
            Token::Eq => CompareOp::Eq,
            Token::Neq => CompareOp::NotEq,
            Token::Lt => CompareOp::Lt,
            Token::Gt => CompareOp::Gt,
            Token::Lte => CompareOp::LtEq,
            Token::Gte => CompareOp::GtEq,
            _ => return Err(self.malformed(start)),
        };
        self.advance();

        let value = match self.current().clone() {
            Token::StringLiteral(s) => {
                self.advance();
                s
            }
            _ => {
                // Unquoted literals may span several words
                let mut words = Vec::new();
                while let Some(word) = literal_word(self.current()) {
                    words.push(word);
                    self.advance();
                }
                if words.is_empty() {
                    return Err(self.malformed(start));
                }
                words.join(" ")
            }
        };

        Ok(Condition { column, op, value })
    }

    fn malformed(&self, start: usize) -> Error {
        SyntaxError::MalformedCondition(self.fragment_from(start)).into()
    }

    /// Render tokens from `start` up to the end of the clause
    fn fragment_from(&self, start: usize) -> String {
        let end = self.tokens[start..]
            .iter()
            .position(|t| matches!(t, Token::Semicolon | Token::Eof))
            .map_or(self.tokens.len(), |offset| start + offset);
        render(&self.tokens[start..end])
    }

    // ========== Helper Methods ==========

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&EOF)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == token
    }
}

/// Parse a statement into a [`Query`]
pub fn parse(sql: &str) -> Result<Query> {
    Parser::new(sql)?.parse()
}

fn projection_from_tokens(items: &[Token]) -> Result<Projection> {
    let invalid = |tokens: &[Token]| SyntaxError::InvalidProjection(render(tokens));

    match items {
        [Token::Asterisk] => return Ok(Projection::All),
        [Token::Count, Token::LParen, Token::Asterisk, Token::RParen] => {
            return Ok(Projection::CountAll)
        }
        [Token::Count, Token::LParen, inner, Token::RParen] => {
            return identifier(inner)
                .map(Projection::CountColumn)
                .ok_or_else(|| invalid(items).into());
        }
        [Token::Count, Token::LParen, ..] => return Err(invalid(items).into()),
        _ => {}
    }

    let mut columns = Vec::new();
    for part in items.split(|t| *t == Token::Comma) {
        match part {
            [single] => match identifier(single) {
                Some(name) => columns.push(name),
                None => return Err(invalid(part).into()),
            },
            [] => return Err(invalid(items).into()),
            _ => return Err(invalid(part).into()),
        }
    }
    Ok(Projection::Columns(columns))
}

/// Text of a token inside an unquoted literal. AND and OR always end it.
fn literal_word(token: &Token) -> Option<String> {
    match token {
        Token::Word(w) => Some(w.clone()),
        Token::And | Token::Or => None,
        keyword if keyword.is_keyword() => Some(keyword.to_string().to_lowercase()),
        _ => None,
    }
}

/// Canonical identifier for a token that can name a table or column
fn identifier(token: &Token) -> Option<String> {
    match token {
        Token::Word(w) => Some(w.trim().to_lowercase()),
        // COUNT without parentheses is an ordinary name
        Token::Count => Some("count".to_string()),
        _ => None,
    }
}

fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn syntax_error(sql: &str) -> SyntaxError {
        match parse(sql) {
            Err(Error::Syntax(e)) => e,
            other => panic!("Expected syntax error for {:?}, got {:?}", sql, other),
        }
    }

    #[test]
    fn test_parse_simple_select() {
        let query = parse("SELECT * FROM People").unwrap();

        assert_eq!(query.table_name, "people");
        assert_eq!(query.projection, Projection::All);
        assert!(query.filter.is_none());
    }

    #[test]
    fn test_parse_column_list() {
        let query = parse("select Name ,\tCITY   from people;").unwrap();

        assert_eq!(
            query.projection,
            Projection::Columns(vec!["name".to_string(), "city".to_string()])
        );
    }

    #[test]
    fn test_parse_counts() {
        let query = parse("SELECT count(*) FROM people").unwrap();
        assert_eq!(query.projection, Projection::CountAll);

        let query = parse("SELECT COUNT( Salary ) FROM people").unwrap();
        assert_eq!(query.projection, Projection::CountColumn("salary".to_string()));

        // COUNT without parentheses is a column
        let query = parse("SELECT count FROM tallies").unwrap();
        assert_eq!(query.projection, Projection::Columns(vec!["count".to_string()]));
    }

    #[test]
    fn test_parse_select_with_where() {
        let query = parse(r#"SELECT name, city FROM people WHERE City = "Chennai";"#).unwrap();

        let filter = query.filter.unwrap();
        assert_eq!(filter.op, LogicalOp::And);
        assert_eq!(
            filter.conditions,
            vec![Condition::new("city", CompareOp::Eq, "Chennai")]
        );
    }

    #[test]
    fn test_parse_and_chain() {
        let query = parse("SELECT * FROM people WHERE age >= 27 and salary<50000 AND name != 'Rohith'")
            .unwrap();

        let filter = query.filter.unwrap();
        assert_eq!(filter.op, LogicalOp::And);
        assert_eq!(
            filter.conditions,
            vec![
                Condition::new("age", CompareOp::GtEq, "27"),
                Condition::new("salary", CompareOp::Lt, "50000"),
                Condition::new("name", CompareOp::NotEq, "Rohith"),
            ]
        );
    }

    #[test]
    fn test_parse_or_chain() {
        let query = parse("SELECT * FROM people WHERE city = Chennai OR city <> Hyderabad").unwrap();

        let filter = query.filter.unwrap();
        assert_eq!(filter.op, LogicalOp::Or);
        assert_eq!(filter.conditions[1].op, CompareOp::NotEq);
    }

    #[test]
    fn test_parse_multi_word_bare_literal() {
        let query = parse("SELECT * FROM people WHERE occupation = Data   Analyst").unwrap();

        assert_eq!(query.filter.unwrap().conditions[0].value, "Data Analyst");
    }

    #[test]
    fn test_keywords_as_bare_literals() {
        let query = parse("SELECT * FROM tasks WHERE status = count").unwrap();
        assert_eq!(query.filter.unwrap().conditions[0].value, "count");

        let query = parse("SELECT * FROM notes WHERE body = select from where").unwrap();
        assert_eq!(query.filter.unwrap().conditions[0].value, "select from where");

        // AND still ends the literal
        let query = parse("SELECT * FROM tasks WHERE status = count AND owner = Divya").unwrap();
        let filter = query.filter.unwrap();
        assert_eq!(filter.conditions.len(), 2);
        assert_eq!(filter.conditions[0].value, "count");
    }

    #[test]
    fn test_quoted_literal_keeps_keywords() {
        let query = parse(r#"SELECT * FROM shows WHERE title = "Tom and Jerry""#).unwrap();

        let filter = query.filter.unwrap();
        assert_eq!(filter.conditions.len(), 1);
        assert_eq!(filter.conditions[0].value, "Tom and Jerry");
    }

    #[test]
    fn test_mixed_connectives_rejected() {
        let err = syntax_error("SELECT * FROM t WHERE a = 1 AND b = 2 OR c = 3;");

        assert_eq!(
            err,
            SyntaxError::MixedConnectives("a = 1 AND b = 2 OR c = 3".to_string())
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(syntax_error("  ; "), SyntaxError::EmptyStatement);
        assert!(matches!(
            syntax_error("DELETE FROM people"),
            SyntaxError::MissingSelect(_)
        ));
        assert_eq!(
            syntax_error("SELECT name, city"),
            SyntaxError::MissingFrom("SELECT name , city".to_string())
        );
        assert!(matches!(
            syntax_error("SELECT FROM people"),
            SyntaxError::EmptyProjection(_)
        ));
        assert!(matches!(
            syntax_error("SELECT * FROM ;"),
            SyntaxError::MissingTable(_)
        ));
        assert!(matches!(
            syntax_error("SELECT * FROM WHERE a = 1"),
            SyntaxError::MissingTable(_)
        ));
    }

    #[test]
    fn test_invalid_projections() {
        assert!(matches!(
            syntax_error("SELECT COUNT() FROM people"),
            SyntaxError::InvalidProjection(_)
        ));
        assert_eq!(
            syntax_error("SELECT COUNT(*), name FROM people"),
            SyntaxError::InvalidProjection("COUNT ( * ) , name".to_string())
        );
        assert!(matches!(
            syntax_error("SELECT name,, city FROM people"),
            SyntaxError::InvalidProjection(_)
        ));
        assert!(matches!(
            syntax_error("SELECT *, name FROM people"),
            SyntaxError::InvalidProjection(_)
        ));
        assert!(matches!(
            syntax_error("SELECT upper(name) FROM people"),
            SyntaxError::InvalidProjection(_)
        ));
    }

    #[test]
    fn test_malformed_conditions() {
        assert_eq!(
            syntax_error("SELECT * FROM people WHERE"),
            SyntaxError::MalformedCondition("WHERE".to_string())
        );
        assert_eq!(
            syntax_error("SELECT * FROM people WHERE age > 3 AND city"),
            SyntaxError::MalformedCondition("AND city".to_string())
        );
        assert!(matches!(
            syntax_error("SELECT * FROM people WHERE age >"),
            SyntaxError::MalformedCondition(_)
        ));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(matches!(
            syntax_error("SELECT * FROM people extra"),
            SyntaxError::UnexpectedToken { .. }
        ));
        assert!(matches!(
            syntax_error(r#"SELECT * FROM people WHERE a = "x" "y""#),
            SyntaxError::UnexpectedToken { .. }
        ));
    }
}
