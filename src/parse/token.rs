use std::fmt;

use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

use crate::As4Attribute;

/// Every kind of token the routing-rule lexer can produce.
///
/// The first seventeen kinds own a matcher in [`LEXICON`]; `Illegal`,
/// `Start` and `End` are sentinels that never match input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ServiceType,
    ServiceName,
    FinalRecipient,
    FromPartyIdType,
    FromPartyId,
    FromPartyRole,
    Action,
    And,
    Or,
    Not,
    Equals,
    StartsWith,
    Semicolon,
    BracketOpen,
    BracketClose,
    Whitespace,
    Value,
    Illegal,
    Start,
    End,
}

impl TokenKind {
    pub const AS4_ATTRIBUTES: &'static [TokenKind] = &[
        TokenKind::ServiceType,
        TokenKind::ServiceName,
        TokenKind::FinalRecipient,
        TokenKind::FromPartyIdType,
        TokenKind::FromPartyId,
        TokenKind::FromPartyRole,
        TokenKind::Action,
    ];

    pub const COMPARISON_OPERATORS: &'static [TokenKind] =
        &[TokenKind::Equals, TokenKind::StartsWith];

    pub const BOOLEAN_OPERATORS: &'static [TokenKind] = &[TokenKind::And, TokenKind::Or];

    /// Boolean and comparison operators plus negation: every token that may
    /// start an expression.
    pub const ALL_OPERATORS: &'static [TokenKind] = &[
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Equals,
        TokenKind::StartsWith,
        TokenKind::Not,
    ];

    /// Human-readable form used in error messages.
    #[must_use]
    pub fn display(self) -> &'static str {
        match self {
            TokenKind::ServiceType => "ServiceType",
            TokenKind::ServiceName => "ServiceName",
            TokenKind::FinalRecipient => "FinalRecipient",
            TokenKind::FromPartyIdType => "FromPartyIdType",
            TokenKind::FromPartyId => "FromPartyId",
            TokenKind::FromPartyRole => "FromPartyRole",
            TokenKind::Action => "Action",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Not => "not",
            TokenKind::Equals => "equals",
            TokenKind::StartsWith => "startswith",
            TokenKind::Semicolon => ",",
            TokenKind::BracketOpen => "(",
            TokenKind::BracketClose => ")",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Value => "quoted value",
            TokenKind::Illegal => "illegal input",
            TokenKind::Start => "start of pattern",
            TokenKind::End => "end of pattern",
        }
    }

    #[must_use]
    pub fn is_as4_attribute(self) -> bool {
        Self::AS4_ATTRIBUTES.contains(&self)
    }

    #[must_use]
    pub fn is_comparison_operator(self) -> bool {
        Self::COMPARISON_OPERATORS.contains(&self)
    }

    #[must_use]
    pub fn is_boolean_operator(self) -> bool {
        Self::BOOLEAN_OPERATORS.contains(&self)
    }

    /// The message attribute named by an attribute token, `None` for every
    /// other kind.
    #[must_use]
    pub fn attribute(self) -> Option<As4Attribute> {
        Some(match self {
            TokenKind::ServiceType => As4Attribute::ServiceType,
            TokenKind::ServiceName => As4Attribute::ServiceName,
            TokenKind::FinalRecipient => As4Attribute::FinalRecipient,
            TokenKind::FromPartyIdType => As4Attribute::FromPartyIdType,
            TokenKind::FromPartyId => As4Attribute::FromPartyId,
            TokenKind::FromPartyRole => As4Attribute::FromPartyRole,
            TokenKind::Action => As4Attribute::Action,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Value
            | TokenKind::Whitespace
            | TokenKind::Illegal
            | TokenKind::Start
            | TokenKind::End => f.write_str(self.display()),
            _ => write!(f, "'{}'", self.display()),
        }
    }
}

// -- Matchers ---------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub(crate) enum Matcher {
    Literal(&'static str),
    Whitespace,
    QuotedValue,
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '~' | '.' | '/' | '#' | '?')
}

/// True if `value` can be written between quotes in a pattern.
pub(crate) fn is_value_literal(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_value_char)
}

// Space, tab, line feed, vertical tab, form feed, carriage return.
fn is_pattern_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

fn literal<'i>(input: &mut &'i str, mut lit: &'static str) -> ModalResult<&'i str> {
    lit.parse_next(input)
}

fn whitespace<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_pattern_whitespace).parse_next(input)
}

fn quoted_value<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ('\'', take_while(1.., is_value_char), '\'')
        .take()
        .parse_next(input)
}

impl Matcher {
    /// Match anchored at the start of `input`, returning the matched prefix.
    pub(crate) fn match_prefix(self, input: &str) -> Option<&str> {
        let mut rest = input;
        let result = match self {
            Matcher::Literal(lit) => literal(&mut rest, lit),
            Matcher::Whitespace => whitespace(&mut rest),
            Matcher::QuotedValue => quoted_value(&mut rest),
        };
        result.ok()
    }
}

/// Matchers in precedence order. The lexer tries them top to bottom and the
/// first success wins, so `FromPartyIdType` must come before `FromPartyId`.
pub(crate) static LEXICON: [(TokenKind, Matcher); 17] = [
    (TokenKind::ServiceType, Matcher::Literal("ServiceType")),
    (TokenKind::ServiceName, Matcher::Literal("ServiceName")),
    (TokenKind::FinalRecipient, Matcher::Literal("FinalRecipient")),
    (TokenKind::FromPartyIdType, Matcher::Literal("FromPartyIdType")),
    (TokenKind::FromPartyId, Matcher::Literal("FromPartyId")),
    (TokenKind::FromPartyRole, Matcher::Literal("FromPartyRole")),
    (TokenKind::Action, Matcher::Literal("Action")),
    (TokenKind::And, Matcher::Literal("&")),
    (TokenKind::Or, Matcher::Literal("|")),
    (TokenKind::Not, Matcher::Literal("not")),
    (TokenKind::Equals, Matcher::Literal("equals")),
    (TokenKind::StartsWith, Matcher::Literal("startswith")),
    (TokenKind::Semicolon, Matcher::Literal(",")),
    (TokenKind::BracketOpen, Matcher::Literal("(")),
    (TokenKind::BracketClose, Matcher::Literal(")")),
    (TokenKind::Whitespace, Matcher::Whitespace),
    (TokenKind::Value, Matcher::QuotedValue),
];

// -- Token ------------------------------------------------------------------

/// A lexeme with its kind and character span in the original pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    start: usize,
    end: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    /// Zero-length `Start` sentinel placed before the first real token.
    pub(crate) fn start_sentinel() -> Self {
        Self::new(TokenKind::Start, "", 0, 0)
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character offset of the first character of this token.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Character offset one past the last character of this token.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End | TokenKind::Start => write!(f, "{}", self.kind),
            _ => write!(f, "`{}` at {}..{}", self.text, self.start, self.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(input: &str) -> Option<TokenKind> {
        LEXICON
            .iter()
            .find(|(_, m)| m.match_prefix(input).is_some())
            .map(|(kind, _)| *kind)
    }

    #[test]
    fn literal_matchers_are_anchored() {
        assert_eq!(Matcher::Literal("not").match_prefix("not("), Some("not"));
        assert_eq!(Matcher::Literal("not").match_prefix(" not"), None);
    }

    #[test]
    fn quoted_value_requires_both_quotes() {
        assert_eq!(
            Matcher::QuotedValue.match_prefix("'urn:e-codex:services:')"),
            Some("'urn:e-codex:services:'")
        );
        assert_eq!(Matcher::QuotedValue.match_prefix("'open"), None);
        assert_eq!(Matcher::QuotedValue.match_prefix("''"), None);
    }

    #[test]
    fn quoted_value_rejects_characters_outside_charset() {
        assert_eq!(Matcher::QuotedValue.match_prefix("'a b'"), None);
        assert_eq!(Matcher::QuotedValue.match_prefix("'a$b'"), None);
        assert!(Matcher::QuotedValue
            .match_prefix("'A_z0-9:~./#?'")
            .is_some());
    }

    #[test]
    fn longer_attribute_wins_over_its_prefix() {
        assert_eq!(kind_of("FromPartyIdType,"), Some(TokenKind::FromPartyIdType));
        assert_eq!(kind_of("FromPartyId,"), Some(TokenKind::FromPartyId));
        assert_eq!(kind_of("FromPartyRole"), Some(TokenKind::FromPartyRole));
    }

    #[test]
    fn sentinels_have_no_matcher() {
        for sentinel in [TokenKind::Illegal, TokenKind::Start, TokenKind::End] {
            assert!(LEXICON.iter().all(|(kind, _)| *kind != sentinel));
        }
    }

    #[test]
    fn attribute_kinds_map_to_attributes() {
        for kind in TokenKind::AS4_ATTRIBUTES {
            let attr = kind.attribute().unwrap();
            assert_eq!(attr.name(), kind.display());
        }
        assert_eq!(TokenKind::Equals.attribute(), None);
    }

    #[test]
    fn operator_groups() {
        assert!(TokenKind::And.is_boolean_operator());
        assert!(TokenKind::StartsWith.is_comparison_operator());
        assert!(!TokenKind::Not.is_boolean_operator());
        assert!(TokenKind::ALL_OPERATORS.contains(&TokenKind::Not));
        assert_eq!(TokenKind::ALL_OPERATORS.len(), 5);
    }

    #[test]
    fn display_quotes_literal_kinds() {
        assert_eq!(TokenKind::Semicolon.to_string(), "','");
        assert_eq!(TokenKind::Value.to_string(), "quoted value");
        assert_eq!(TokenKind::End.to_string(), "end of pattern");
    }
}
