use std::fmt;

use crate::parse::{parse_pattern, ParseError};

use super::attribute::MessageAttributes;
use super::error::RuleError;
use super::expr::Expr;

/// A routing-rule pattern: the source text together with the outcome of
/// parsing it.
///
/// Syntax errors do not fail construction. They are kept on the pattern so a
/// caller can show them, and a pattern with errors never matches.
#[derive(Debug, Clone)]
pub struct RoutingRulePattern {
    pattern: String,
    parsed: Result<Expr, Vec<ParseError>>,
}

impl RoutingRulePattern {
    /// Lex and parse `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyPattern`] if `pattern` is empty or blank.
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        let parsed = parse_pattern(pattern)?;
        Ok(Self {
            pattern: pattern.to_owned(),
            parsed,
        })
    }

    /// Build a pattern from an expression tree, using its canonical text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidValue`] if a compared value is empty or
    /// has characters a quoted value cannot hold, since the text would not
    /// parse back.
    pub fn from_expr(expr: Expr) -> Result<Self, RuleError> {
        if let Some(value) = expr.unquotable_value() {
            return Err(RuleError::InvalidValue {
                value: value.to_owned(),
            });
        }
        Ok(Self {
            pattern: expr.to_string(),
            parsed: Ok(expr),
        })
    }

    /// Like [`new`](Self::new), but a pattern with syntax errors is an error.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::EmptyPattern`] or [`RuleError::InvalidPattern`].
    pub fn parse_valid(pattern: &str) -> Result<Self, RuleError> {
        Self::new(pattern)?.into_valid()
    }

    /// Turn a pattern carrying syntax errors into [`RuleError::InvalidPattern`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if parsing failed.
    pub fn into_valid(self) -> Result<Self, RuleError> {
        match self.parsed {
            Ok(_) => Ok(self),
            Err(errors) => Err(RuleError::InvalidPattern {
                pattern: self.pattern,
                errors,
            }),
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The parsed expression, `None` if the pattern has syntax errors.
    #[must_use]
    pub fn expression(&self) -> Option<&Expr> {
        self.parsed.as_ref().ok()
    }

    /// Syntax errors found while parsing; empty for a valid pattern.
    #[must_use]
    pub fn parse_errors(&self) -> &[ParseError] {
        match &self.parsed {
            Ok(_) => &[],
            Err(errors) => errors,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.parsed.is_ok()
    }

    /// True if the pattern parsed and its expression holds for `attributes`.
    #[must_use]
    pub fn matches(&self, attributes: &MessageAttributes) -> bool {
        self.expression()
            .is_some_and(|expr| expr.evaluate(attributes))
    }

    /// Combine two patterns into `&(self, other)`.
    ///
    /// The result is reparsed from text, so errors in either side carry over.
    #[must_use]
    pub fn and(&self, other: &RoutingRulePattern) -> RoutingRulePattern {
        let pattern = format!("&({},{})", self.pattern, other.pattern);
        let parsed = match (&self.parsed, &other.parsed) {
            (Ok(a), Ok(b)) => Ok(a.clone().and(b.clone())),
            _ => parse_pattern(&pattern).unwrap_or_else(|_| Err(Vec::new())),
        };
        RoutingRulePattern { pattern, parsed }
    }
}

impl PartialEq for RoutingRulePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for RoutingRulePattern {}

impl fmt::Display for RoutingRulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parsed {
            Ok(expr) => write!(f, "{expr}"),
            Err(_) => write!(f, "{} (invalid)", self.pattern),
        }
    }
}

impl TryFrom<&str> for RoutingRulePattern {
    type Error = RuleError;

    fn try_from(pattern: &str) -> Result<Self, Self::Error> {
        Self::new(pattern)
    }
}

impl TryFrom<Expr> for RoutingRulePattern {
    type Error = RuleError;

    fn try_from(expr: Expr) -> Result<Self, Self::Error> {
        Self::from_expr(expr)
    }
}
