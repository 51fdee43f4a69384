use thiserror::Error;

use crate::parse::ParseError;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("pattern is not allowed to be empty or blank")]
    EmptyPattern,

    #[error("invalid routing pattern '{pattern}': {}", first_message(errors))]
    InvalidPattern {
        pattern: String,
        errors: Vec<ParseError>,
    },

    #[error("routing rule '{rule}' has no link name")]
    EmptyLinkName { rule: String },

    #[error("routing rule for link '{link}' has no match clause")]
    MissingPattern { link: String },

    #[error("unknown AS4 attribute '{name}'")]
    UnknownAttribute { name: String },

    #[error("value '{value}' cannot be written in a routing pattern")]
    InvalidValue { value: String },
}

fn first_message(errors: &[ParseError]) -> String {
    errors
        .first()
        .map_or_else(|| "no details".to_owned(), ToString::to_string)
}
