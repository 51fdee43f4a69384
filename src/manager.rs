use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::{LinkrouteError, MessageAttributes, RoutingRule, RoutingRuleSet, RuleId};

/// Name of a business domain (message lane). Each domain has its own rules
/// and default backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusinessDomainId(String);

impl BusinessDomainId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessDomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BusinessDomainId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for BusinessDomainId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Routing state of one business domain at a point in time.
#[derive(Debug, Clone)]
pub struct DomainRouting {
    rules: RoutingRuleSet,
    insertion_order: Vec<RoutingRule>,
    default_backend: String,
    enabled: bool,
}

impl DomainRouting {
    fn new(default_backend: String) -> Self {
        Self {
            rules: RoutingRuleSet::default(),
            insertion_order: Vec::new(),
            default_backend,
            enabled: true,
        }
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &RoutingRuleSet {
        &self.rules
    }

    #[must_use]
    pub fn default_backend(&self) -> &str {
        &self.default_backend
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The link for a message: the first matching rule's link, or the
    /// default backend when nothing matches or routing is disabled.
    #[must_use]
    pub fn route(&self, attributes: &MessageAttributes) -> &str {
        if !self.enabled {
            debug!(
                backend = %self.default_backend,
                "backend routing is disabled, applying default backend"
            );
            return &self.default_backend;
        }
        match self.rules.select(attributes) {
            Some(rule) => {
                info!(rule = %rule.id(), link = rule.link_name(), "looked up backend for message");
                rule.link_name()
            }
            None => {
                warn!(
                    backend = %self.default_backend,
                    "no routing rule matched, applying default backend"
                );
                &self.default_backend
            }
        }
    }

    fn upsert(&mut self, rule: RoutingRule) {
        match self.insertion_order.iter_mut().find(|r| r.id() == rule.id()) {
            Some(existing) => *existing = rule,
            None => self.insertion_order.push(rule),
        }
        self.resort();
    }

    fn remove(&mut self, id: &RuleId) -> Option<RoutingRule> {
        let idx = self.insertion_order.iter().position(|r| r.id() == id)?;
        let removed = self.insertion_order.remove(idx);
        self.resort();
        Some(removed)
    }

    fn resort(&mut self) {
        self.rules = RoutingRuleSet::new(self.insertion_order.iter().cloned());
    }
}

/// Holds routing rules per business domain.
///
/// Every mutation publishes a fresh [`DomainRouting`] snapshot, so a routing
/// decision in progress keeps a consistent rule set while rules are added or
/// removed concurrently.
#[derive(Debug, Default)]
pub struct RoutingRulesManager {
    domains: RwLock<HashMap<BusinessDomainId, Arc<DomainRouting>>>,
}

impl RoutingRulesManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a business domain with its default backend. An existing
    /// domain keeps its rules and only gets its default backend replaced.
    ///
    /// # Errors
    ///
    /// Returns [`LinkrouteError::BlankDefaultBackend`] if `default_backend`
    /// is blank.
    pub fn register_domain(
        &self,
        domain: BusinessDomainId,
        default_backend: impl Into<String>,
    ) -> Result<(), LinkrouteError> {
        let default_backend = checked_backend(&domain, default_backend.into())?;
        debug!(%domain, backend = %default_backend, "registered business domain");
        let mut domains = self.domains.write().unwrap_or_else(PoisonError::into_inner);
        let next = match domains.get(&domain) {
            Some(current) => DomainRouting {
                default_backend,
                ..DomainRouting::clone(current)
            },
            None => DomainRouting::new(default_backend),
        };
        domains.insert(domain, Arc::new(next));
        Ok(())
    }

    /// Add a rule to a domain, replacing any rule with the same id in place.
    ///
    /// # Errors
    ///
    /// Returns [`LinkrouteError::UnknownDomain`] if the domain was never
    /// registered.
    pub fn add_rule(
        &self,
        domain: &BusinessDomainId,
        rule: RoutingRule,
    ) -> Result<(), LinkrouteError> {
        debug!(%domain, %rule, "adding routing rule");
        self.update(domain, |routing| routing.upsert(rule))
    }

    /// Remove a rule, returning it if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`LinkrouteError::UnknownDomain`] if the domain was never
    /// registered.
    pub fn remove_rule(
        &self,
        domain: &BusinessDomainId,
        id: &RuleId,
    ) -> Result<Option<RoutingRule>, LinkrouteError> {
        let removed = self.update(domain, |routing| routing.remove(id))?;
        debug!(%domain, rule = %id, found = removed.is_some(), "removed routing rule");
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns [`LinkrouteError::UnknownDomain`] for an unregistered domain,
    /// or [`LinkrouteError::BlankDefaultBackend`] if `backend` is blank.
    pub fn set_default_backend(
        &self,
        domain: &BusinessDomainId,
        backend: impl Into<String>,
    ) -> Result<(), LinkrouteError> {
        let backend = checked_backend(domain, backend.into())?;
        self.update(domain, |routing| routing.default_backend = backend)
    }

    /// # Errors
    ///
    /// Returns [`LinkrouteError::UnknownDomain`] for an unregistered domain.
    pub fn set_enabled(
        &self,
        domain: &BusinessDomainId,
        enabled: bool,
    ) -> Result<(), LinkrouteError> {
        self.update(domain, |routing| routing.enabled = enabled)
    }

    /// The current routing snapshot of a domain.
    #[must_use]
    pub fn snapshot(&self, domain: &BusinessDomainId) -> Option<Arc<DomainRouting>> {
        let domains = self.domains.read().unwrap_or_else(PoisonError::into_inner);
        domains.get(domain).cloned()
    }

    /// The rules of a domain in evaluation order.
    #[must_use]
    pub fn rules(&self, domain: &BusinessDomainId) -> Vec<RoutingRule> {
        self.snapshot(domain)
            .map(|s| s.rules().iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn default_backend(&self, domain: &BusinessDomainId) -> Option<String> {
        self.snapshot(domain).map(|s| s.default_backend().to_owned())
    }

    #[must_use]
    pub fn domains(&self) -> Vec<BusinessDomainId> {
        let domains = self.domains.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<_> = domains.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The link a message of `domain` should be sent to, `None` if the
    /// domain is unknown.
    #[must_use]
    pub fn lookup_link(
        &self,
        domain: &BusinessDomainId,
        attributes: &MessageAttributes,
    ) -> Option<String> {
        let Some(snapshot) = self.snapshot(domain) else {
            warn!(%domain, "no routing configuration for business domain");
            return None;
        };
        Some(snapshot.route(attributes).to_owned())
    }

    fn update<T>(
        &self,
        domain: &BusinessDomainId,
        f: impl FnOnce(&mut DomainRouting) -> T,
    ) -> Result<T, LinkrouteError> {
        let mut domains = self.domains.write().unwrap_or_else(PoisonError::into_inner);
        let current = domains
            .get(domain)
            .ok_or_else(|| LinkrouteError::UnknownDomain(domain.to_string()))?;
        let mut next = DomainRouting::clone(current);
        let out = f(&mut next);
        domains.insert(domain.clone(), Arc::new(next));
        Ok(out)
    }
}

fn checked_backend(domain: &BusinessDomainId, backend: String) -> Result<String, LinkrouteError> {
    if backend.trim().is_empty() {
        return Err(LinkrouteError::BlankDefaultBackend(domain.to_string()));
    }
    Ok(backend)
}
