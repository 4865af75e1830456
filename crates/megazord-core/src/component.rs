//! Identity of a binding module.

use std::borrow::Cow;
use std::fmt;

/// Name and expected native version of one binding module.
///
/// Binding crates embed their identity at build time:
///
/// ```rust
/// use megazord_core::ComponentIdentity;
///
/// pub const LOGINS: ComponentIdentity = ComponentIdentity::from_static("logins", "0.6.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentity {
    name: Cow<'static, str>,
    expected_version: Cow<'static, str>,
}

impl ComponentIdentity {
    /// Identity from compile-time constants.
    pub const fn from_static(name: &'static str, expected_version: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            expected_version: Cow::Borrowed(expected_version),
        }
    }

    /// Identity supplied at runtime.
    pub fn new(name: impl Into<String>, expected_version: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            expected_version: Cow::Owned(expected_version.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version the component's native ABI was generated against.
    pub fn expected_version(&self) -> &str {
        &self.expected_version
    }
}

impl fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.expected_version)
    }
}
