use std::cmp::Reverse;
use std::fmt;

use super::attribute::MessageAttributes;
use super::error::RuleError;
use super::expr::Expr;
use super::pattern::RoutingRulePattern;
use super::rule::{ConfigurationSource, RoutingRule, RuleId};
use super::selection_report::SelectionReport;

/// Builder for constructing a [`RoutingRuleSet`].
///
/// # Example
///
/// ```
/// use linkroute::{As4Attribute, MessageAttributes, RoutingRuleSetBuilder};
///
/// let rules = RoutingRuleSetBuilder::new()
///     .rule("epo_backend", |r| r.when("equals(ServiceName, 'EPO')").priority(10))
///     .rule("test_backend", |r| r.when("startswith(Action, 'ConTest')"))
///     .build()
///     .unwrap();
///
/// let msg = MessageAttributes::new().set(As4Attribute::ServiceName, "EPO");
/// assert_eq!(rules.select(&msg).map(|r| r.link_name()), Some("epo_backend"));
/// ```
#[derive(Debug, Default)]
pub struct RoutingRuleSetBuilder {
    rules: Vec<(String, RuleBuilder)>,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    pattern: Option<PatternSource>,
    id: Option<RuleId>,
    priority: i32,
    description: String,
    source: ConfigurationSource,
}

#[derive(Debug)]
enum PatternSource {
    Text(String),
    Expr(Expr),
}

impl RoutingRuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule routing to `link_name`. The closure must call `.when()`
    /// or `.when_expr()` to set the match clause.
    #[must_use]
    pub fn rule(mut self, link_name: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        self.rules
            .push((link_name.to_owned(), f(RuleBuilder::default())));
        self
    }

    /// Parse every pattern and sort the rules into a `RoutingRuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for the first rule with an empty link name, a
    /// missing, blank or syntactically invalid pattern.
    pub fn build(self) -> Result<RoutingRuleSet, RuleError> {
        let rules = self
            .rules
            .into_iter()
            .map(|(link, builder)| builder.finish(link))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RoutingRuleSet::new(rules))
    }
}

impl RuleBuilder {
    /// Set the match clause from pattern text.
    #[must_use]
    pub fn when(mut self, pattern: &str) -> Self {
        self.pattern = Some(PatternSource::Text(pattern.to_owned()));
        self
    }

    /// Set the match clause from an expression tree. Building fails with
    /// [`RuleError::InvalidValue`] if a value cannot be quoted in a pattern.
    #[must_use]
    pub fn when_expr(mut self, expr: Expr) -> Self {
        self.pattern = Some(PatternSource::Expr(expr));
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(RuleId::from(id));
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    #[must_use]
    pub fn source(mut self, source: ConfigurationSource) -> Self {
        self.source = source;
        self
    }

    fn finish(self, link_name: String) -> Result<RoutingRule, RuleError> {
        let pattern = match self.pattern {
            Some(PatternSource::Text(text)) => RoutingRulePattern::parse_valid(&text)?,
            Some(PatternSource::Expr(expr)) => RoutingRulePattern::from_expr(expr)?,
            None => return Err(RuleError::MissingPattern { link: link_name }),
        };
        let mut rule = RoutingRule::new(link_name, pattern)
            .with_priority(self.priority)
            .with_description(self.description)
            .with_source(self.source);
        if let Some(id) = self.id {
            rule = rule.with_id(id);
        }
        if rule.link_name().trim().is_empty() {
            return Err(RuleError::EmptyLinkName {
                rule: rule.id().to_string(),
            });
        }
        Ok(rule)
    }
}

/// An immutable snapshot of routing rules in evaluation order.
///
/// Rules are stable-sorted by descending
/// [`evaluation_rank`](RoutingRule::evaluation_rank), so rules with equal
/// priority keep the order they were supplied in. Thread-safe and designed
/// to live behind `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RoutingRuleSet {
    pub(crate) rules: Vec<RoutingRule>,
}

impl RoutingRuleSet {
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = RoutingRule>) -> Self {
        let mut rules: Vec<RoutingRule> = rules.into_iter().collect();
        rules.sort_by_key(|r| Reverse(r.evaluation_rank()));
        Self { rules }
    }

    /// The first non-deleted rule, in priority order, whose pattern matches.
    #[must_use]
    pub fn select(&self, attributes: &MessageAttributes) -> Option<&RoutingRule> {
        crate::evaluate::select(&self.rules, attributes)
    }

    /// Select with diagnostics: which rules were evaluated and how long it
    /// took.
    pub fn select_detailed(&self, attributes: &MessageAttributes) -> SelectionReport {
        crate::evaluate::select_detailed(&self.rules, attributes)
    }

    /// All rules, deleted ones included, in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &RoutingRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn get(&self, id: &RuleId) -> Option<&RoutingRule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule ids with their priorities, in evaluation order.
    #[must_use]
    pub fn priority_order(&self) -> Vec<(&str, i32)> {
        self.rules
            .iter()
            .map(|r| (r.id().as_str(), r.priority()))
            .collect()
    }
}

impl FromIterator<RoutingRule> for RoutingRuleSet {
    fn from_iter<I: IntoIterator<Item = RoutingRule>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for RoutingRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deleted = self.rules.iter().filter(|r| r.is_deleted()).count();
        write!(
            f,
            "RoutingRuleSet({} rules, {} deleted)",
            self.rules.len(),
            deleted
        )
    }
}
