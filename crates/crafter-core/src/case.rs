//! Naming conventions applied to outgoing messages and field errors

use convert_case::{Case, Casing};
use serde::Deserialize;

use crate::error::FieldErrors;

/// Text casing applied to every outgoing message before transmission
///
/// Type tags, trace ids and status codes are never converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, strum::EnumString, strum::Display, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NamingConvention {
    /// Leave text untouched
    #[default]
    Default,
    /// `some_value`
    SnakeCase,
    /// `SomeValue`
    PascalCase,
    /// `someValue`
    CamelCase,
    /// `some-value`
    KebabCase,
    /// `Some Value`
    TitleCase,
    /// `Some value`
    HumanCase,
    /// `SOME_VALUE`
    UpperSnakeCase,
}

impl NamingConvention {
    /// Convert a single message
    pub fn convert(self, text: &str) -> String {
        let case = match self {
            Self::Default => return text.to_owned(),
            Self::SnakeCase => Case::Snake,
            Self::PascalCase => Case::Pascal,
            Self::CamelCase => Case::Camel,
            Self::KebabCase => Case::Kebab,
            Self::TitleCase => Case::Title,
            Self::HumanCase => Case::Sentence,
            Self::UpperSnakeCase => Case::UpperSnake,
        };

        text.to_case(case)
    }

    /// Convert both keys and values of a field error map
    pub fn convert_errors(self, errors: Option<&FieldErrors>) -> Option<FieldErrors> {
        errors.map(|errors| {
            errors
                .iter()
                .map(|(field, message)| (self.convert(field), self.convert(message)))
                .collect()
        })
    }
}

/// Convert `text` to the given convention
pub fn convert(text: &str, convention: NamingConvention) -> String {
    convention.convert(text)
}

/// Convert keys and values of a field error map to the given convention
pub fn convert_errors(errors: Option<&FieldErrors>, convention: NamingConvention) -> Option<FieldErrors> {
    convention.convert_errors(errors)
}
