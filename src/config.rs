//! YAML routing configuration.
//!
//! ```yaml
//! domains:
//!   lane-a:
//!     default-backend-name: DEFAULT_BACKEND
//!     backend-rules:
//!       epo:
//!         link-name: epo_backend
//!         match-clause: "equals(ServiceName, 'EPO')"
//!         priority: 10
//! ```
//!
//! Rules of equal priority are checked in the order they appear in the
//! document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    BusinessDomainId, ConfigurationSource, LinkrouteError, RoutingRule, RoutingRulePattern,
    RoutingRulesManager, RuleError, RuleId,
};

/// Routing configuration of all business domains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoutingConfig {
    #[serde(default)]
    pub domains: BTreeMap<String, DomainRoutingConfig>,
}

/// Routing configuration of one business domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DomainRoutingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub default_backend_name: String,
    /// Rules with their ids, in document order.
    #[serde(default, with = "ordered_rules")]
    pub backend_rules: Vec<(String, RuleConfig)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleConfig {
    pub link_name: String,
    #[serde(default)]
    pub match_clause: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub description: String,
}

/// A configured rule that could not be loaded.
#[derive(Debug)]
pub struct RejectedRule {
    pub id: RuleId,
    pub error: RuleError,
}

fn default_enabled() -> bool {
    true
}

impl RoutingConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`LinkrouteError::Yaml`] for malformed YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, LinkrouteError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LinkrouteError::Io`] if the file cannot be read, or
    /// [`LinkrouteError::Yaml`] if it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LinkrouteError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading routing configuration");
        Self::from_yaml(&content)
    }

    /// Check that every domain names a default backend.
    ///
    /// # Errors
    ///
    /// Returns [`LinkrouteError::Config`] naming the first domain without one.
    pub fn validate(&self) -> Result<(), LinkrouteError> {
        for (domain, routing) in &self.domains {
            if routing.default_backend_name.trim().is_empty() {
                return Err(LinkrouteError::Config(format!(
                    "domain `{domain}` has no default-backend-name"
                )));
            }
        }
        Ok(())
    }

    /// Validate the configuration and load it into a fresh manager.
    ///
    /// Rules with blank or invalid patterns are skipped and returned, the
    /// remaining rules are loaded.
    ///
    /// # Errors
    ///
    /// Returns the [`validate`](Self::validate) error.
    pub fn build_manager(
        &self,
    ) -> Result<(RoutingRulesManager, Vec<RejectedRule>), LinkrouteError> {
        self.validate()?;
        let manager = RoutingRulesManager::new();
        let mut rejected = Vec::new();
        for (name, routing) in &self.domains {
            let domain = BusinessDomainId::from(name.as_str());
            manager.register_domain(domain.clone(), routing.default_backend_name.clone())?;
            manager.set_enabled(&domain, routing.enabled)?;
            let (rules, failed) = routing.rules();
            for rule in rules {
                manager.add_rule(&domain, rule)?;
            }
            rejected.extend(failed);
        }
        Ok((manager, rejected))
    }
}

impl DomainRoutingConfig {
    /// The configured rule with the given id.
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&RuleConfig> {
        self.backend_rules
            .iter()
            .find(|(rule_id, _)| rule_id == id)
            .map(|(_, rule)| rule)
    }

    /// Build the configured rules, collecting the ones that fail.
    #[must_use]
    pub fn rules(&self) -> (Vec<RoutingRule>, Vec<RejectedRule>) {
        let mut rules = Vec::new();
        let mut rejected = Vec::new();
        for (id, config) in &self.backend_rules {
            match config.to_rule(id) {
                Ok(rule) => rules.push(rule),
                Err(error) => {
                    match &error {
                        RuleError::InvalidPattern { pattern, errors } => {
                            for e in errors {
                                warn!(rule = %id, "rejected routing rule:\n{}", e.render(pattern));
                            }
                        }
                        other => warn!(rule = %id, error = %other, "rejected routing rule"),
                    }
                    rejected.push(RejectedRule {
                        id: RuleId::from(id.as_str()),
                        error,
                    });
                }
            }
        }
        (rules, rejected)
    }
}

impl RuleConfig {
    /// Build a rule with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for a blank link name or a blank or invalid
    /// match clause.
    pub fn to_rule(&self, id: &str) -> Result<RoutingRule, RuleError> {
        if self.link_name.trim().is_empty() {
            return Err(RuleError::EmptyLinkName {
                rule: id.to_owned(),
            });
        }
        let pattern = RoutingRulePattern::parse_valid(&self.match_clause)?;
        Ok(RoutingRule::new(self.link_name.clone(), pattern)
            .with_id(id)
            .with_priority(self.priority)
            .with_description(self.description.clone())
            .with_source(ConfigurationSource::Env))
    }
}

/// Serde adapter keeping `backend-rules` entries in document order.
mod ordered_rules {
    use std::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    use super::RuleConfig;

    pub fn serialize<S: Serializer>(
        rules: &[(String, RuleConfig)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(rules.iter().map(|(id, rule)| (id, rule)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, RuleConfig)>, D::Error> {
        deserializer.deserialize_map(RulesVisitor)
    }

    struct RulesVisitor;

    impl<'de> Visitor<'de> for RulesVisitor {
        type Value = Vec<(String, RuleConfig)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of rule ids to rules")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut rules: Vec<(String, RuleConfig)> =
                Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((id, rule)) = map.next_entry::<String, RuleConfig>()? {
                if rules.iter().any(|(seen, _)| *seen == id) {
                    return Err(de::Error::custom(format_args!("duplicate rule id `{id}`")));
                }
                rules.push((id, rule));
            }
            Ok(rules)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{As4Attribute, MessageAttributes};

    const YAML: &str = r#"
domains:
  lane1:
    default-backend-name: DEFAULT_BACKEND
    backend-rules:
      contest:
        link-name: RULE_BACKEND
        match-clause: "&(equals(Action, 'ConTest_Form'), equals(ServiceName, 'Connector-TEST'))"
        priority: 5
        description: connectivity tests
      broken:
        link-name: BROKEN
        match-clause: "equals(ServiceName 'EPO')"
      blank:
        link-name: BLANK
        match-clause: "   "
  lane2:
    enabled: false
    default-backend-name: OTHER
"#;

    #[test]
    fn parses_document() {
        let config = RoutingConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.domains.len(), 2);
        let lane1 = &config.domains["lane1"];
        assert!(lane1.enabled);
        assert_eq!(lane1.default_backend_name, "DEFAULT_BACKEND");
        assert_eq!(lane1.rule("contest").map(|r| r.priority), Some(5));
        assert_eq!(lane1.rule("broken").map(|r| r.priority), Some(0));
        assert!(lane1.rule("missing").is_none());
        let ids: Vec<&str> = lane1.backend_rules.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["contest", "broken", "blank"]);
        assert!(!config.domains["lane2"].enabled);
    }

    #[test]
    fn invalid_rules_are_rejected_and_rest_load() {
        let config = RoutingConfig::from_yaml(YAML).unwrap();
        let (rules, rejected) = config.domains["lane1"].rules();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].source(), ConfigurationSource::Env);
        assert_eq!(rules[0].description(), "connectivity tests");

        let ids: Vec<&str> = rejected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["broken", "blank"]);
        assert!(matches!(rejected[0].error, RuleError::InvalidPattern { .. }));
        assert!(matches!(rejected[1].error, RuleError::EmptyPattern));
    }

    #[test]
    fn build_manager_routes() {
        let config = RoutingConfig::from_yaml(YAML).unwrap();
        let (manager, rejected) = config.build_manager().unwrap();
        assert_eq!(rejected.len(), 2);

        let msg = MessageAttributes::new()
            .set(As4Attribute::Action, "ConTest_Form")
            .set(As4Attribute::ServiceName, "Connector-TEST");
        let lane1 = BusinessDomainId::from("lane1");
        let lane2 = BusinessDomainId::from("lane2");
        assert_eq!(manager.lookup_link(&lane1, &msg).as_deref(), Some("RULE_BACKEND"));
        assert_eq!(manager.lookup_link(&lane2, &msg).as_deref(), Some("OTHER"));
    }

    #[test]
    fn equal_priorities_resolve_in_document_order() {
        let yaml = r#"
domains:
  lane1:
    default-backend-name: D
    backend-rules:
      zeta:
        link-name: FIRST_IN_FILE
        match-clause: "equals(Action, 'x')"
      alpha:
        link-name: SECOND_IN_FILE
        match-clause: "equals(Action, 'x')"
"#;
        let (manager, rejected) = RoutingConfig::from_yaml(yaml)
            .unwrap()
            .build_manager()
            .unwrap();
        assert!(rejected.is_empty());

        let lane1 = BusinessDomainId::from("lane1");
        let msg = MessageAttributes::new().set(As4Attribute::Action, "x");
        assert_eq!(manager.lookup_link(&lane1, &msg).as_deref(), Some("FIRST_IN_FILE"));
    }

    #[test]
    fn duplicate_rule_ids_are_rejected() {
        let yaml = r#"
domains:
  lane1:
    default-backend-name: D
    backend-rules:
      same:
        link-name: A
        match-clause: "equals(Action, 'x')"
      same:
        link-name: B
        match-clause: "equals(Action, 'y')"
"#;
        assert!(matches!(
            RoutingConfig::from_yaml(yaml),
            Err(LinkrouteError::Yaml(_))
        ));
    }

    #[test]
    fn validate_requires_default_backend() {
        let config = RoutingConfig::from_yaml("domains:\n  lane1:\n    enabled: true\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lane1"));
        assert!(config.build_manager().is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            RoutingConfig::from_yaml("domains: ["),
            Err(LinkrouteError::Yaml(_))
        ));
    }

    #[test]
    fn empty_document_has_no_domains() {
        let config = RoutingConfig::from_yaml("{}").unwrap();
        assert!(config.domains.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_link_name_is_rejected() {
        let config = RuleConfig {
            link_name: " ".into(),
            match_clause: "equals(Action, 'x')".into(),
            priority: 0,
            description: String::new(),
        };
        assert!(matches!(
            config.to_rule("r"),
            Err(RuleError::EmptyLinkName { rule }) if rule == "r"
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            RoutingConfig::load("/nonexistent/routing.yaml"),
            Err(LinkrouteError::Io(_))
        ));
    }
}
