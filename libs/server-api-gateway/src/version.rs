use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rejected version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,

    #[error("invalid component '{component}' in version '{input}'")]
    InvalidComponent { input: String, component: String },
}

/// Dotted numeric server API version, e.g. `2.3` or `3.10`.
///
/// Components are compared numerically and missing trailing components
/// count as zero, so `2.10 > 2.9` and `2.3 == 2.3.0`.
#[derive(Debug, Clone)]
pub struct ApiVersion {
    components: Vec<u32>,
}

impl ApiVersion {
    /// Parse a dotted version string.
    ///
    /// # Errors
    /// Returns [`VersionParseError`] when the string is empty or any
    /// component is not a non-negative integer that fits in `u32`.
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let components = trimmed
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid_component(trimmed, part));
                }
                part.parse::<u32>()
                    .map_err(|_| invalid_component(trimmed, part))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }

    /// Numeric components as parsed.
    #[must_use]
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    fn significant(&self) -> &[u32] {
        let len = self
            .components
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |idx| idx + 1);
        &self.components[..len]
    }
}

fn invalid_component(input: &str, component: &str) -> VersionParseError {
    VersionParseError::InvalidComponent {
        input: input.to_owned(),
        component: component.to_owned(),
    }
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        Ok(())
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for ApiVersion {}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    // Slice ordering is lexicographic over numbers, and trailing zeros are
    // stripped first so "2.3" and "2.3.0" compare equal.
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant().cmp(other.significant())
    }
}
