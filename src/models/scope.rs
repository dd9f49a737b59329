//! Scope snapshots: roster and game selection for a team/season.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Gender;

/// Key identifying one roster/game-selection scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    pub team: String,
    pub year: String,
    pub gender: Gender,
}

/// One game in the current scope, identified by opponent and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRef {
    pub opponent: String,
    pub date: NaiveDate,
}

impl GameRef {
    pub fn new(opponent: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            opponent: opponent.into(),
            date,
        }
    }

    /// Stable key used in game-selection filters: "Opponent:YYYY-MM-DD".
    pub fn key(&self) -> String {
        format!("{}:{}", self.opponent, self.date)
    }
}

/// Read-only snapshot of the roster and game list for one scope.
///
/// Always the result of the most recent completed scope fetch; the
/// reconciler's pure functions take this by reference and never
/// mutate it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScopeSnapshot {
    /// Player identifiers, "Surname, First" form.
    pub roster: Vec<String>,

    /// Games in scope, schedule order.
    pub games: Vec<GameRef>,
}

impl ScopeSnapshot {
    /// Look up a roster player by exact identifier.
    pub fn has_player(&self, name: &str) -> bool {
        self.roster.iter().any(|p| p == name)
    }

    /// Filter a set of requested game keys down to games actually in
    /// this scope, preserving schedule order.
    pub fn resolve_games<'a>(&'a self, keys: &[String]) -> Vec<&'a GameRef> {
        self.games.iter().filter(|g| keys.contains(&g.key())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ScopeSnapshot {
        ScopeSnapshot {
            roster: vec!["Flagg, Cooper".to_string(), "Knueppel, Kon".to_string()],
            games: vec![
                GameRef::new("Kansas", NaiveDate::from_ymd_opt(2024, 11, 12).unwrap()),
                GameRef::new("Auburn", NaiveDate::from_ymd_opt(2024, 12, 4).unwrap()),
            ],
        }
    }

    #[test]
    fn test_game_key_format() {
        let g = GameRef::new("Kansas", NaiveDate::from_ymd_opt(2024, 11, 12).unwrap());
        assert_eq!(g.key(), "Kansas:2024-11-12");
    }

    #[test]
    fn test_resolve_games_filters_unknown() {
        let snap = snapshot();
        let keys = vec![
            "Kansas:2024-11-12".to_string(),
            "Houston:2025-01-02".to_string(),
        ];
        let resolved = snap.resolve_games(&keys);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].opponent, "Kansas");
    }

    #[test]
    fn test_has_player() {
        let snap = snapshot();
        assert!(snap.has_player("Flagg, Cooper"));
        assert!(!snap.has_player("Flagg"));
    }
}
