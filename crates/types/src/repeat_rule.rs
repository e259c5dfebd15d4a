// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a match event recurs from its start date.
///
/// The wire representation matches the persisted event format: `"none"`,
/// `"week"` or `"month"`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatRule {
    /// A single occurrence on the start date.
    #[default]
    #[serde(rename = "none")]
    Never,
    /// One occurrence every 7 days, anchored to the start date's weekday.
    #[serde(rename = "week")]
    Weekly,
    /// One occurrence every calendar month, anchored to the start date's
    /// day-of-month.
    #[serde(rename = "month")]
    Monthly,
}

impl RepeatRule {
    /// The wire name of this rule.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "none",
            Self::Weekly => "week",
            Self::Monthly => "month",
        }
    }
}

impl fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown repeat rule.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown repeat rule {0:?}")]
pub struct InvalidRule(pub String);

impl FromStr for RepeatRule {
    type Err = InvalidRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::Never),
            "week" => Ok(Self::Weekly),
            "month" => Ok(Self::Monthly),
            _ => Err(InvalidRule(s.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_known_rules() {
        assert_eq!("none".parse(), Ok(RepeatRule::Never));
        assert_eq!("week".parse(), Ok(RepeatRule::Weekly));
        assert_eq!("month".parse(), Ok(RepeatRule::Monthly));
    }

    #[test]
    fn rejects_unknown_rules() {
        assert_eq!(
            "fortnight".parse::<RepeatRule>(),
            Err(InvalidRule("fortnight".into()))
        );
    }

    #[test]
    fn wire_representation() {
        assert_eq!(serde_json::to_string(&RepeatRule::Weekly).unwrap(), "\"week\"");
        assert_eq!(
            serde_json::from_str::<RepeatRule>("\"month\"").unwrap(),
            RepeatRule::Monthly
        );
        assert!(serde_json::from_str::<RepeatRule>("\"daily\"").is_err());
    }
}
