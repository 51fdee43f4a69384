use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::error::RuleError;

/// The AS4 message attributes a routing rule can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum As4Attribute {
    ServiceType,
    ServiceName,
    FinalRecipient,
    FromPartyId,
    FromPartyIdType,
    FromPartyRole,
    Action,
}

impl As4Attribute {
    pub const ALL: [As4Attribute; 7] = [
        As4Attribute::ServiceType,
        As4Attribute::ServiceName,
        As4Attribute::FinalRecipient,
        As4Attribute::FromPartyId,
        As4Attribute::FromPartyIdType,
        As4Attribute::FromPartyRole,
        As4Attribute::Action,
    ];

    /// The attribute name as written in routing-rule patterns.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            As4Attribute::ServiceType => "ServiceType",
            As4Attribute::ServiceName => "ServiceName",
            As4Attribute::FinalRecipient => "FinalRecipient",
            As4Attribute::FromPartyId => "FromPartyId",
            As4Attribute::FromPartyIdType => "FromPartyIdType",
            As4Attribute::FromPartyRole => "FromPartyRole",
            As4Attribute::Action => "Action",
        }
    }
}

impl fmt::Display for As4Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for As4Attribute {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.name() == s)
            .ok_or_else(|| RuleError::UnknownAttribute { name: s.to_owned() })
    }
}

/// The attribute values of one message, as seen by routing rules.
///
/// Attributes that are not set are absent, and every comparison against an
/// absent attribute is false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageAttributes {
    values: HashMap<As4Attribute, String>,
}

impl MessageAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value.
    #[must_use]
    pub fn set(mut self, attribute: As4Attribute, value: impl Into<String>) -> Self {
        self.insert(attribute, value);
        self
    }

    pub fn insert(&mut self, attribute: As4Attribute, value: impl Into<String>) {
        self.values.insert(attribute, value.into());
    }

    pub fn remove(&mut self, attribute: As4Attribute) -> Option<String> {
        self.values.remove(&attribute)
    }

    #[must_use]
    pub fn get(&self, attribute: As4Attribute) -> Option<&str> {
        self.values.get(&attribute).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(As4Attribute, S)> for MessageAttributes {
    fn from_iter<I: IntoIterator<Item = (As4Attribute, S)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let attrs = MessageAttributes::new().set(As4Attribute::Action, "submit");
        assert_eq!(attrs.get(As4Attribute::Action), Some("submit"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn get_missing_returns_none() {
        let attrs = MessageAttributes::new().set(As4Attribute::Action, "submit");
        assert_eq!(attrs.get(As4Attribute::ServiceName), None);
    }

    #[test]
    fn overwrite_value() {
        let attrs = MessageAttributes::new()
            .set(As4Attribute::ServiceName, "a")
            .set(As4Attribute::ServiceName, "b");
        assert_eq!(attrs.get(As4Attribute::ServiceName), Some("b"));
    }

    #[test]
    fn insert_and_remove() {
        let mut attrs = MessageAttributes::new();
        attrs.insert(As4Attribute::FinalRecipient, "urn:x");
        assert_eq!(attrs.remove(As4Attribute::FinalRecipient), Some("urn:x".to_owned()));
        assert!(attrs.is_empty());
    }

    #[test]
    fn collect_from_pairs() {
        let attrs: MessageAttributes = [
            (As4Attribute::Action, "a"),
            (As4Attribute::FromPartyRole, "initiator"),
        ]
        .into_iter()
        .collect();
        assert_eq!(attrs.get(As4Attribute::FromPartyRole), Some("initiator"));
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for attr in As4Attribute::ALL {
            assert_eq!(attr.name().parse::<As4Attribute>().unwrap(), attr);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "ConversationId".parse::<As4Attribute>().unwrap_err();
        assert_eq!(err.to_string(), "unknown AS4 attribute 'ConversationId'");
    }
}
