use std::time::Instant;

use tracing::trace;

use crate::{BoolOp, Expr, MatchOp, MessageAttributes, RoutingRule, SelectionReport};

pub(crate) fn eval_expr(expr: &Expr, attributes: &MessageAttributes) -> bool {
    match expr {
        Expr::Binary {
            op: BoolOp::And,
            left,
            right,
        } => eval_expr(left, attributes) && eval_expr(right, attributes),
        Expr::Binary {
            op: BoolOp::Or,
            left,
            right,
        } => eval_expr(left, attributes) || eval_expr(right, attributes),
        Expr::Not(inner) => !eval_expr(inner, attributes),
        Expr::Match {
            op,
            attribute,
            value,
        } => attributes
            .get(*attribute)
            .is_some_and(|actual| match op {
                MatchOp::Equals => actual == value.as_str(),
                MatchOp::StartsWith => actual.starts_with(value.as_str()),
            }),
    }
}

// Rules are pre-sorted by evaluation rank (descending = checked first)
pub(crate) fn select<'r>(
    rules: &'r [RoutingRule],
    attributes: &MessageAttributes,
) -> Option<&'r RoutingRule> {
    rules.iter().find(|rule| rule.matches(attributes))
}

pub(crate) fn select_detailed(
    rules: &[RoutingRule],
    attributes: &MessageAttributes,
) -> SelectionReport {
    let start = Instant::now();
    let mut evaluated = Vec::new();
    let mut selected = None;

    for rule in rules.iter().filter(|r| !r.is_deleted()) {
        evaluated.push(rule.id().clone());
        let matched = rule.match_clause().matches(attributes);
        trace!(rule = %rule.id(), matched, "evaluated routing rule");
        if matched {
            selected = Some((rule.id().clone(), rule.link_name().to_owned()));
            break;
        }
    }

    SelectionReport::new(selected, evaluated, start.elapsed())
}
