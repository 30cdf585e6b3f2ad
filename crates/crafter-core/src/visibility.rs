/// Whether internal diagnostic detail reaches the client
///
/// Resolved once at startup and read-only afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
pub enum Visibility {
    /// Unclassified errors are answered with a fixed message
    #[default]
    Public,
    /// Unclassified errors expose their type name and full diagnostic
    Private,
}

impl Visibility {
    /// Resolve the configured value
    ///
    /// Only the exact strings `Public` and `Private` are recognized. Anything
    /// else, including an unset value, falls back to `Public` with a warning.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            Some("Public") => Self::Public,
            Some("Private") => Self::Private,
            other => {
                tracing::warn!(
                    configured = other.unwrap_or_default(),
                    "visibility configuration was not available, defaulted to 'Public'"
                );
                Self::Public
            }
        }
    }

    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}
