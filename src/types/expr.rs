use std::fmt;
use std::ops::Not;

use super::attribute::{As4Attribute, MessageAttributes};
use crate::parse::is_value_literal;

/// Boolean connectives, written `&` and `|` in patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

/// Attribute comparisons, written `equals` and `startswith` in patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOp {
    Equals,
    StartsWith,
}

/// A parsed routing-rule expression.
///
/// Trees are immutable once built and evaluate without side effects, so a
/// single tree can be shared across threads for read-only evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Binary {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Match {
        op: MatchOp,
        attribute: As4Attribute,
        value: String,
    },
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "&"),
            BoolOp::Or => write!(f, "|"),
        }
    }
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOp::Equals => write!(f, "equals"),
            MatchOp::StartsWith => write!(f, "startswith"),
        }
    }
}

/// Canonical pattern syntax. Parsing the output yields an equal tree as long
/// as every value stays within the quoted-value character set.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { op, left, right } => write!(f, "{op}({left}, {right})"),
            Expr::Not(inner) => write!(f, "not({inner})"),
            Expr::Match {
                op,
                attribute,
                value,
            } => write!(f, "{op}({attribute}, '{value}')"),
        }
    }
}

impl Expr {
    /// The first comparison value outside the quoted-value character set.
    pub(crate) fn unquotable_value(&self) -> Option<&str> {
        match self {
            Expr::Binary { left, right, .. } => left
                .unquotable_value()
                .or_else(|| right.unquotable_value()),
            Expr::Not(inner) => inner.unquotable_value(),
            Expr::Match { value, .. } => (!is_value_literal(value)).then_some(value.as_str()),
        }
    }

    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::Binary {
            op: BoolOp::And,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::Binary {
            op: BoolOp::Or,
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Evaluate against a message's attributes. Never fails: an absent
    /// attribute makes its comparison false.
    #[must_use]
    pub fn evaluate(&self, attributes: &MessageAttributes) -> bool {
        crate::evaluate::eval_expr(self, attributes)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

/// `equals(attribute, 'value')`.
///
/// Only values made of ASCII letters, digits and `_ : - ~ . / # ?` can be
/// turned into a [`RoutingRulePattern`](crate::RoutingRulePattern). Others
/// still evaluate but are rejected when the pattern is built.
#[must_use]
pub fn equals(attribute: As4Attribute, value: impl Into<String>) -> Expr {
    Expr::Match {
        op: MatchOp::Equals,
        attribute,
        value: value.into(),
    }
}

/// `startswith(attribute, 'prefix')`, with the same value restriction as
/// [`equals`].
#[must_use]
pub fn starts_with(attribute: As4Attribute, value: impl Into<String>) -> Expr {
    Expr::Match {
        op: MatchOp::StartsWith,
        attribute,
        value: value.into(),
    }
}
