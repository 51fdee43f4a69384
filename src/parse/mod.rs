mod error;
mod grammar;
mod lexer;
mod token;

pub use error::{ParseError, ParseErrorKind};
pub use grammar::parse;
pub use lexer::tokenize;
pub use token::{Token, TokenKind};

pub(crate) use token::is_value_literal;

use crate::{Expr, RuleError};

/// Tokenize and parse a routing-rule pattern in one step.
///
/// The outer `Result` fails only for a blank pattern; syntax errors are
/// returned in the inner one.
///
/// # Errors
///
/// Returns [`RuleError::EmptyPattern`] if `pattern` is empty or only
/// whitespace.
pub fn parse_pattern(pattern: &str) -> Result<Result<Expr, Vec<ParseError>>, RuleError> {
    let tokens = tokenize(pattern)?;
    Ok(parse(&tokens))
}
