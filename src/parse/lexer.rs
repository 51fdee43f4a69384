use crate::RuleError;

use super::token::{Token, TokenKind, LEXICON};

/// Split a routing-rule pattern into tokens.
///
/// Whitespace is consumed but not emitted. The sequence ends with a
/// zero-length `End` token, or with a single `Illegal` token holding the
/// unlexable remainder of the input. Offsets count characters of the
/// untrimmed input.
///
/// # Errors
///
/// Returns [`RuleError::EmptyPattern`] if `pattern` is empty or only
/// whitespace.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, RuleError> {
    if pattern.trim().is_empty() {
        return Err(RuleError::EmptyPattern);
    }

    let mut tokens = Vec::new();
    let mut rest = pattern;
    let mut offset = 0;

    loop {
        if rest.is_empty() {
            tokens.push(Token::new(TokenKind::End, "", offset, offset));
            break;
        }

        let Some((kind, matched)) = next_match(rest) else {
            let len = rest.chars().count();
            tokens.push(Token::new(TokenKind::Illegal, rest, offset, offset + len));
            break;
        };

        let len = matched.chars().count();
        if kind != TokenKind::Whitespace {
            tokens.push(Token::new(kind, matched, offset, offset + len));
        }
        offset += len;
        rest = &rest[matched.len()..];
    }

    Ok(tokens)
}

fn next_match(input: &str) -> Option<(TokenKind, &str)> {
    LEXICON
        .iter()
        .find_map(|(kind, matcher)| matcher.match_prefix(input).map(|m| (*kind, m)))
}
