//! Structured sub-filters attached to a query slot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a game was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
    Neutral,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Home => write!(f, "Home"),
            Venue::Away => write!(f, "Away"),
            Venue::Neutral => write!(f, "Neutral"),
        }
    }
}

impl Venue {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Home" | "home" => Some(Venue::Home),
            "Away" | "away" => Some(Venue::Away),
            "Neutral" | "neutral" => Some(Venue::Neutral),
            _ => None,
        }
    }
}

/// One structured filter on a query slot.
///
/// Carries enough to render the filter back to the user and to
/// serialize into the boolean-query grammar (`filter_str`). A
/// `GameSelection` stores unresolved game keys ("Opponent:YYYY-MM-DD");
/// resolution against the scope's actual game list happens only when
/// building a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredFilter {
    DateRange { from: NaiveDate, to: NaiveDate },
    GameSelection { games: Vec<String> },
    Venue { venue: Venue },
    Opponents { teams: Vec<String> },
}

impl StructuredFilter {
    /// An empty filter contributes nothing and folds to absent.
    pub fn is_empty(&self) -> bool {
        match self {
            StructuredFilter::DateRange { .. } => false,
            StructuredFilter::GameSelection { games } => games.is_empty(),
            StructuredFilter::Venue { .. } => false,
            StructuredFilter::Opponents { teams } => teams.is_empty(),
        }
    }
}

/// Drop empty filters so canonical forms never carry them.
pub fn fold_empty(filters: &[StructuredFilter]) -> Vec<StructuredFilter> {
    filters.iter().filter(|f| !f.is_empty()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_parse() {
        assert_eq!(Venue::parse("Home"), Some(Venue::Home));
        assert_eq!(Venue::parse("neutral"), Some(Venue::Neutral));
        assert_eq!(Venue::parse("Moon"), None);
    }

    #[test]
    fn test_empty_filters_fold() {
        let filters = vec![
            StructuredFilter::GameSelection { games: vec![] },
            StructuredFilter::Venue { venue: Venue::Home },
            StructuredFilter::Opponents { teams: vec![] },
        ];
        let folded = fold_empty(&filters);
        assert_eq!(folded, vec![StructuredFilter::Venue { venue: Venue::Home }]);
    }

    #[test]
    fn test_serde_tagged_form() {
        let f = StructuredFilter::DateRange {
            from: NaiveDate::from_ymd_opt(2024, 11, 20).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 12, 5).unwrap(),
        };
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], "date_range");
        let back: StructuredFilter = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }
}
