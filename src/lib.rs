#[cfg(feature = "config")]
pub mod config;
mod error;
mod evaluate;
mod manager;
pub mod parse;
mod types;

pub use error::LinkrouteError;
pub use manager::{BusinessDomainId, DomainRouting, RoutingRulesManager};
pub use parse::{ParseError, ParseErrorKind};
pub use types::{
    As4Attribute, BoolOp, ConfigurationSource, Expr, MatchOp, MessageAttributes, RoutingRule,
    RoutingRulePattern, RoutingRuleSet, RoutingRuleSetBuilder, RuleBuilder, RuleError, RuleId,
    SelectionReport, HIGH_PRIORITY, LOW_PRIORITY, equals, starts_with,
};
