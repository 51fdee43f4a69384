use crate::{BoolOp, Expr, MatchOp};

use super::error::ParseError;
use super::token::{Token, TokenKind};

/// Position in a token slice plus the end offset of the last consumed token,
/// which locates errors when the stream runs out.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    last_consumed: Token,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            last_consumed: Token::start_sentinel(),
        }
    }

    /// Pop the next token if its kind is one of `expected`.
    ///
    /// An `End` token counts as an exhausted stream.
    pub(crate) fn expect(&mut self, expected: &[TokenKind]) -> Result<&'t Token, ParseError> {
        let Some(token) = self.tokens.get(self.pos).filter(|t| t.kind() != TokenKind::End)
        else {
            return Err(ParseError::unexpected_end(self.last_consumed.end(), expected));
        };
        self.pos += 1;
        if token.kind() == TokenKind::Illegal || !expected.contains(&token.kind()) {
            return Err(ParseError::unexpected_token(token.clone(), expected));
        }
        self.last_consumed = token.clone();
        Ok(token)
    }

    /// Succeeds if nothing but the `End` sentinel remains.
    pub(crate) fn expect_end(&self) -> Result<(), ParseError> {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind() != TokenKind::End => Err(ParseError::unexpected_token(
                token.clone(),
                &[TokenKind::End],
            )),
            _ => Ok(()),
        }
    }
}

/// Parse a complete token stream into an expression.
///
/// Parsing stops at the first syntax error, so the error list holds exactly
/// one entry on failure. Tokens left after a complete expression are an error.
///
/// # Errors
///
/// Returns the syntax errors found in `tokens`.
pub fn parse(tokens: &[Token]) -> Result<Expr, Vec<ParseError>> {
    let mut cursor = Cursor::new(tokens);
    expr(&mut cursor)
        .and_then(|e| cursor.expect_end().map(|()| e))
        .map_err(|err| vec![err])
}

pub(crate) fn expr(cursor: &mut Cursor<'_>) -> Result<Expr, ParseError> {
    let operator = cursor.expect(TokenKind::ALL_OPERATORS)?;
    match operator.kind() {
        TokenKind::And => boolean_expr(cursor, BoolOp::And),
        TokenKind::Or => boolean_expr(cursor, BoolOp::Or),
        TokenKind::Equals => compare_expr(cursor, MatchOp::Equals),
        TokenKind::StartsWith => compare_expr(cursor, MatchOp::StartsWith),
        TokenKind::Not => not_expr(cursor),
        _ => Err(ParseError::unexpected_token(
            operator.clone(),
            TokenKind::ALL_OPERATORS,
        )),
    }
}

pub(crate) fn boolean_expr(cursor: &mut Cursor<'_>, op: BoolOp) -> Result<Expr, ParseError> {
    cursor.expect(&[TokenKind::BracketOpen])?;
    let left = expr(cursor)?;
    cursor.expect(&[TokenKind::Semicolon])?;
    let right = expr(cursor)?;
    cursor.expect(&[TokenKind::BracketClose])?;
    Ok(Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub(crate) fn compare_expr(cursor: &mut Cursor<'_>, op: MatchOp) -> Result<Expr, ParseError> {
    cursor.expect(&[TokenKind::BracketOpen])?;
    let token = cursor.expect(TokenKind::AS4_ATTRIBUTES)?;
    let attribute = token
        .kind()
        .attribute()
        .ok_or_else(|| ParseError::unexpected_token(token.clone(), TokenKind::AS4_ATTRIBUTES))?;
    cursor.expect(&[TokenKind::Semicolon])?;
    let value = cursor.expect(&[TokenKind::Value])?;
    cursor.expect(&[TokenKind::BracketClose])?;

    Ok(Expr::Match {
        op,
        attribute,
        value: strip_quotes(value.text()).to_owned(),
    })
}

pub(crate) fn not_expr(cursor: &mut Cursor<'_>) -> Result<Expr, ParseError> {
    cursor.expect(&[TokenKind::BracketOpen])?;
    let inner = expr(cursor)?;
    cursor.expect(&[TokenKind::BracketClose])?;
    Ok(Expr::Not(Box::new(inner)))
}

fn strip_quotes(lexeme: &str) -> &str {
    lexeme
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(lexeme)
}
