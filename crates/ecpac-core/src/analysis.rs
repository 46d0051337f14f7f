//! C-PAC analysis levels.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Positional analysis level argument of the C-PAC container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisLevel {
    #[default]
    Participant,
    Group,
    TestConfig,
}

impl AnalysisLevel {
    pub const ALL: [AnalysisLevel; 3] = [Self::Participant, Self::Group, Self::TestConfig];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Group => "group",
            Self::TestConfig => "test_config",
        }
    }
}

impl fmt::Display for AnalysisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidAnalysisLevel(s.to_string()))
    }
}
