use std::fmt;

use super::token::{Token, TokenKind};

/// What went wrong at the failing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The token stream ended in the middle of a rule.
    UnexpectedEnd,
    /// The lexer could not tokenize the input at this position.
    IllegalToken,
    /// A token was found that the grammar does not allow here.
    UnexpectedToken,
}

/// A syntax error in a routing-rule pattern, with the column and the token
/// kinds that would have been accepted there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    column: usize,
    found: Option<Token>,
    expected: Vec<TokenKind>,
}

impl ParseError {
    pub(crate) fn unexpected_end(column: usize, expected: &[TokenKind]) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedEnd,
            column,
            found: None,
            expected: expected.to_vec(),
        }
    }

    pub(crate) fn unexpected_token(found: Token, expected: &[TokenKind]) -> Self {
        let kind = if found.kind() == TokenKind::Illegal {
            ParseErrorKind::IllegalToken
        } else {
            ParseErrorKind::UnexpectedToken
        };
        Self {
            kind,
            column: found.start(),
            found: Some(found),
            expected: expected.to_vec(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Zero-based character column of the failure.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// The offending token, `None` if the input ended early.
    #[must_use]
    pub fn found(&self) -> Option<&Token> {
        self.found.as_ref()
    }

    #[must_use]
    pub fn expected(&self) -> &[TokenKind] {
        &self.expected
    }

    /// Render `pattern` with a marker line pointing at the failing column.
    ///
    /// ```text
    /// equals(ServiceName 'x')
    ///                    ^---- Column: 19
    /// ```
    #[must_use]
    pub fn render(&self, pattern: &str) -> String {
        format!(
            "{pattern}\n{:width$}^---- Column: {}",
            "",
            self.column,
            width = self.column
        )
    }

    fn expected_list(&self) -> String {
        self.expected
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at column {}: ", self.column)?;
        match (&self.kind, &self.found) {
            (ParseErrorKind::IllegalToken, Some(found)) => write!(
                f,
                "invalid input `{}`, expected one of: {}",
                found.text(),
                self.expected_list()
            ),
            (_, Some(found)) => write!(
                f,
                "expected one of: {}, but got {}",
                self.expected_list(),
                found.kind()
            ),
            (_, None) => write!(
                f,
                "unexpected end of pattern, expected one of: {}",
                self.expected_list()
            ),
        }
    }
}

impl std::error::Error for ParseError {}
