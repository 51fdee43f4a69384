
use linkroute::parse::{parse, tokenize, TokenKind};
use linkroute::RoutingRulePattern;
use proptest::prelude::*;
use strategies::{arb_attributes, arb_expr};

proptest! {
    /// The canonical text of any tree parses back to the same tree.
    #[test]
    fn display_parses_back(expr in arb_expr(4)) {
        let text = expr.to_string();
        let tokens = tokenize(&text).unwrap();
        prop_assert_eq!(parse(&tokens), Ok(expr));
    }

    /// Extra whitespace between tokens never changes the parsed tree.
    #[test]
    fn whitespace_is_insignificant(expr in arb_expr(3)) {
        let text = expr.to_string();
        let spaced = text.replace('(', " (\t").replace(',', " ,\n ").replace(')', " ) ");
        let a = RoutingRulePattern::new(&text).unwrap();
        let b = RoutingRulePattern::new(&spaced).unwrap();
        prop_assert_eq!(a.expression(), b.expression());
    }

    /// NOT(NOT(x)) == x for any evaluation.
    #[test]
    fn double_negation(expr in arb_expr(3), attrs in arb_attributes()) {
        let doubled = !!expr.clone();
        prop_assert_eq!(doubled.evaluate(&attrs), expr.evaluate(&attrs));
    }

    /// NOT(a AND b) == NOT a OR NOT b
    #[test]
    fn de_morgan_and(a in arb_expr(2), b in arb_expr(2), attrs in arb_attributes()) {
        let lhs = !(a.clone().and(b.clone()));
        let rhs = (!a).or(!b);
        prop_assert_eq!(lhs.evaluate(&attrs), rhs.evaluate(&attrs));
    }

    /// NOT(a OR b) == NOT a AND NOT b
    #[test]
    fn de_morgan_or(a in arb_expr(2), b in arb_expr(2), attrs in arb_attributes()) {
        let lhs = !(a.clone().or(b.clone()));
        let rhs = (!a).and(!b);
        prop_assert_eq!(lhs.evaluate(&attrs), rhs.evaluate(&attrs));
    }

    /// A parsed pattern evaluates exactly like the tree it came from.
    #[test]
    fn pattern_matches_like_tree(expr in arb_expr(3), attrs in arb_attributes()) {
        let pattern = RoutingRulePattern::parse_valid(&expr.to_string()).unwrap();
        prop_assert_eq!(pattern.matches(&attrs), expr.evaluate(&attrs));
    }

    /// Lexing arbitrary text never panics, and always ends the stream with
    /// either END or a single ILLEGAL token.
    #[test]
    fn tokenize_never_panics(input in "\\PC{1,40}") {
        if let Ok(tokens) = tokenize(&input) {
            let last = tokens.last().unwrap();
            prop_assert!(matches!(last.kind(), TokenKind::End | TokenKind::Illegal));
            let illegal = tokens.iter().filter(|t| t.kind() == TokenKind::Illegal).count();
            prop_assert!(illegal <= 1);
        }
    }

    /// Parsing arbitrary text never panics and reports at most one error.
    #[test]
    fn parse_reports_at_most_one_error(input in "[&|(),' a-zA-Z:]{1,40}") {
        if let Ok(pattern) = RoutingRulePattern::new(&input) {
            prop_assert!(pattern.parse_errors().len() <= 1);
            prop_assert_eq!(pattern.is_valid(), pattern.expression().is_some());
        }
    }
}
