use std::fmt;
use std::hash::{Hash, Hasher};

use rand::distributions::Alphanumeric;
use rand::Rng;

use super::attribute::MessageAttributes;
use super::pattern::RoutingRulePattern;

/// Sentinel priority: the rule is checked before rules of any other
/// priority, even though the number itself is small.
pub const HIGH_PRIORITY: i32 = -2000;

/// Sentinel priority: the rule is checked after rules of any other
/// priority, even though the number itself is large.
pub const LOW_PRIORITY: i32 = 2000;

const RULE_ID_LEN: usize = 8;

/// Identifier of a routing rule. Two rules are the same rule iff their ids
/// are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(String);

impl RuleId {
    /// A fresh random identifier of eight ASCII alphanumerics.
    #[must_use]
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RULE_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where a routing rule was defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConfigurationSource {
    /// Loaded from the environment (configuration files).
    Env,
    /// Stored in the database by an administrator.
    Db,
    /// Created by code at runtime.
    #[default]
    Impl,
}

/// A routing rule: messages matching `match_clause` are sent to `link_name`.
///
/// Rules are checked in descending `priority` order and the first match wins.
/// [`HIGH_PRIORITY`] and [`LOW_PRIORITY`] are exceptions, see
/// [`evaluation_rank`](Self::evaluation_rank).
#[derive(Debug, Clone)]
pub struct RoutingRule {
    id: RuleId,
    link_name: String,
    match_clause: RoutingRulePattern,
    description: String,
    priority: i32,
    deleted: bool,
    source: ConfigurationSource,
}

impl RoutingRule {
    /// A rule with a generated id and default priority `0`.
    #[must_use]
    pub fn new(link_name: impl Into<String>, match_clause: RoutingRulePattern) -> Self {
        Self {
            id: RuleId::generate(),
            link_name: link_name.into(),
            match_clause,
            description: String::new(),
            priority: 0,
            deleted: false,
            source: ConfigurationSource::default(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<RuleId>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: ConfigurationSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    #[must_use]
    pub fn link_name(&self) -> &str {
        &self.link_name
    }

    #[must_use]
    pub fn match_clause(&self) -> &RoutingRulePattern {
        &self.match_clause
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Sort key for evaluation order, larger ranks go first. This is the
    /// priority itself, except that [`HIGH_PRIORITY`] ranks above and
    /// [`LOW_PRIORITY`] below every other value.
    #[must_use]
    pub fn evaluation_rank(&self) -> i64 {
        match self.priority {
            HIGH_PRIORITY => i64::MAX,
            LOW_PRIORITY => i64::MIN,
            priority => i64::from(priority),
        }
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    #[must_use]
    pub fn source(&self) -> ConfigurationSource {
        self.source
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    pub fn set_source(&mut self, source: ConfigurationSource) {
        self.source = source;
    }

    /// True if the rule is not deleted and its pattern matches.
    #[must_use]
    pub fn matches(&self, attributes: &MessageAttributes) -> bool {
        !self.deleted && self.match_clause.matches(attributes)
    }
}

impl PartialEq for RoutingRule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RoutingRule {}

impl Hash for RoutingRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for RoutingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RoutingRule(id={}, link={}, priority={}, pattern={})",
            self.id, self.link_name, self.priority, self.match_clause
        )
    }
}
