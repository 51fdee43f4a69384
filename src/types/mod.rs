mod attribute;
mod error;
mod expr;
mod pattern;
mod rule;
mod ruleset;
mod selection_report;

pub use attribute::{As4Attribute, MessageAttributes};
pub use error::RuleError;
pub use expr::{equals, starts_with, BoolOp, Expr, MatchOp};
pub use pattern::RoutingRulePattern;
pub use rule::{ConfigurationSource, RoutingRule, RuleId, HIGH_PRIORITY, LOW_PRIORITY};
pub use ruleset::{RoutingRuleSet, RoutingRuleSetBuilder, RuleBuilder};
pub use selection_report::SelectionReport;
