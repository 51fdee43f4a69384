use std::fmt;
use std::time::Duration;

use super::rule::RuleId;

/// Detailed selection report returned by
/// [`RoutingRuleSet::select_detailed()`](super::ruleset::RoutingRuleSet::select_detailed).
///
/// Contains the selected rule and link, the rules that were evaluated before
/// the scan stopped, and the wall-clock duration of the selection.
#[derive(Debug, Clone)]
#[must_use]
pub struct SelectionReport {
    selected: Option<(RuleId, String)>,
    evaluated: Vec<RuleId>,
    duration: Duration,
}

impl SelectionReport {
    pub(crate) fn new(
        selected: Option<(RuleId, String)>,
        evaluated: Vec<RuleId>,
        duration: Duration,
    ) -> Self {
        Self {
            selected,
            evaluated,
            duration,
        }
    }

    /// Id of the winning rule, same as [`RoutingRuleSet::select()`](super::ruleset::RoutingRuleSet::select).
    #[must_use]
    pub fn selected_rule(&self) -> Option<&RuleId> {
        self.selected.as_ref().map(|(id, _)| id)
    }

    /// Link name of the winning rule.
    #[must_use]
    pub fn link_name(&self) -> Option<&str> {
        self.selected.as_ref().map(|(_, link)| link.as_str())
    }

    /// Ids of the rules whose patterns were evaluated, in priority order.
    /// Deleted rules are skipped and never appear here.
    #[must_use]
    pub fn evaluated(&self) -> &[RuleId] {
        &self.evaluated
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for SelectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selected {
            Some((id, link)) => write!(f, "selected: {id} -> {link}")?,
            None => write!(f, "selected: none")?,
        }
        let evaluated: Vec<&str> = self.evaluated.iter().map(RuleId::as_str).collect();
        write!(f, ", evaluated: [{}]", evaluated.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
