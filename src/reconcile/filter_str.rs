//! Filter-string grammar: structured filters to/from their persisted
//! and request forms.
//!
//! Persisted form (what `parse_filter` reads back): `;`-joined
//! segments:
//!
//! ```text
//! date:2024-11-20:2024-12-05
//! date:11-20:12-05              (year inferred from the season label)
//! games:Kansas:2024-11-12,Auburn:2024-12-04
//! venue:Home
//! vs:Kansas,Auburn
//! ```
//!
//! Request form (`build_filter_str_for_query`): the same filters
//! rendered as boolean-query clauses, with a game selection expanded
//! into an OR-list of the game keys actually present in the scope's
//! game list. The persisted form keeps the unresolved descriptor so
//! the filter can be redisplayed without a scope.

use chrono::NaiveDate;
use tracing::warn;

use crate::models::{GameRef, StructuredFilter, Venue};
use crate::season_start_year;

/// Render filters to the persisted `;`-joined form.
pub fn build_filter_str(filters: &[StructuredFilter]) -> String {
    let segments: Vec<String> = filters
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| match f {
            StructuredFilter::DateRange { from, to } => format!("date:{}:{}", from, to),
            StructuredFilter::GameSelection { games } => format!("games:{}", games.join(",")),
            StructuredFilter::Venue { venue } => format!("venue:{}", venue),
            StructuredFilter::Opponents { teams } => format!("vs:{}", teams.join(",")),
        })
        .collect();
    segments.join(";")
}

/// Render filters as boolean-query clauses for a request, resolving
/// any game selection against the supplied candidate games. A
/// selection with no surviving games contributes nothing.
pub fn build_filter_str_for_query(filters: &[StructuredFilter], games: &[GameRef]) -> String {
    let segments: Vec<String> = filters
        .iter()
        .filter(|f| !f.is_empty())
        .filter_map(|f| match f {
            StructuredFilter::DateRange { from, to } => {
                Some(format!("date:[{} TO {}]", from, to))
            }
            StructuredFilter::GameSelection { games: keys } => {
                let resolved: Vec<String> = games
                    .iter()
                    .filter(|g| keys.contains(&g.key()))
                    .map(|g| format!("game:\"{}\"", g.key()))
                    .collect();
                if resolved.is_empty() {
                    None
                } else {
                    Some(format!("({})", resolved.join(" OR ")))
                }
            }
            StructuredFilter::Venue { venue } => Some(format!("venue:{}", venue)),
            StructuredFilter::Opponents { teams } => {
                let clauses: Vec<String> =
                    teams.iter().map(|t| format!("vs:\"{}\"", t)).collect();
                Some(format!("({})", clauses.join(" OR ")))
            }
        })
        .collect();
    segments.join(" AND ")
}

/// Parse one date, either `YYYY-MM-DD` or `MM-DD` with the year
/// inferred from the season label (Aug-Dec fall in the starting year,
/// Jan-Jul in the following one).
fn parse_date(raw: &str, season: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    let (month, day) = raw.split_once('-')?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let start_year = season_start_year(season)?;
    let year = if month >= 8 { start_year } else { start_year + 1 };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_segment(segment: &str, season: &str) -> Option<StructuredFilter> {
    let (kind, rest) = segment.split_once(':')?;
    match kind.trim() {
        "date" => {
            let (from_raw, to_raw) = rest.rsplit_once(':')?;
            let from = parse_date(from_raw.trim(), season)?;
            let to = parse_date(to_raw.trim(), season)?;
            (from <= to).then_some(StructuredFilter::DateRange { from, to })
        }
        "games" => {
            let games: Vec<String> = rest
                .split(',')
                .map(str::trim)
                .filter(|k| k.contains(':'))
                .map(str::to_string)
                .collect();
            (!games.is_empty()).then_some(StructuredFilter::GameSelection { games })
        }
        "venue" => Venue::parse(rest).map(|venue| StructuredFilter::Venue { venue }),
        "vs" => {
            let teams: Vec<String> = rest
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            (!teams.is_empty()).then_some(StructuredFilter::Opponents { teams })
        }
        _ => None,
    }
}

/// Reverse parse of the persisted form. An empty/sentinel string is
/// the empty filter list; malformed segments are dropped, never
/// propagated as errors.
pub fn parse_filter(raw: &str, season: &str) -> Vec<StructuredFilter> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|segment| {
            let parsed = parse_segment(segment, season);
            if parsed.is_none() {
                warn!(segment, "dropping unparseable filter segment");
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn games() -> Vec<GameRef> {
        vec![
            GameRef::new("Kansas", date(2024, 11, 12)),
            GameRef::new("Auburn", date(2024, 12, 4)),
        ]
    }

    #[test]
    fn test_round_trip_persisted_form() {
        let filters = vec![
            StructuredFilter::DateRange {
                from: date(2024, 11, 20),
                to: date(2024, 12, 5),
            },
            StructuredFilter::Venue { venue: Venue::Home },
            StructuredFilter::Opponents {
                teams: vec!["Kansas".to_string(), "Auburn".to_string()],
            },
        ];
        let raw = build_filter_str(&filters);
        assert_eq!(
            raw,
            "date:2024-11-20:2024-12-05;venue:Home;vs:Kansas,Auburn"
        );
        assert_eq!(parse_filter(&raw, "2024/25"), filters);
    }

    #[test]
    fn test_parse_empty_is_empty() {
        assert_eq!(parse_filter("", "2024/25"), vec![]);
        assert_eq!(parse_filter("   ", "2024/25"), vec![]);
    }

    #[test]
    fn test_parse_drops_malformed_segments() {
        let filters = parse_filter("venue:Courtyard;venue:Away;nonsense", "2024/25");
        assert_eq!(filters, vec![StructuredFilter::Venue { venue: Venue::Away }]);
    }

    #[test]
    fn test_month_day_year_inference() {
        let filters = parse_filter("date:11-20:01-05", "2024/25");
        assert_eq!(
            filters,
            vec![StructuredFilter::DateRange {
                from: date(2024, 11, 20),
                to: date(2025, 1, 5),
            }]
        );
    }

    #[test]
    fn test_inverted_date_range_dropped() {
        assert_eq!(parse_filter("date:2025-01-05:2024-11-20", "2024/25"), vec![]);
    }

    #[test]
    fn test_game_selection_persisted_vs_query_form() {
        let filters = vec![StructuredFilter::GameSelection {
            games: vec![
                "Kansas:2024-11-12".to_string(),
                "Houston:2025-01-02".to_string(),
            ],
        }];

        // Persisted form keeps the unresolved descriptor
        let raw = build_filter_str(&filters);
        assert_eq!(raw, "games:Kansas:2024-11-12,Houston:2025-01-02");
        assert_eq!(parse_filter(&raw, "2024/25"), filters);

        // Query form expands to the games actually in scope
        let query = build_filter_str_for_query(&filters, &games());
        assert_eq!(query, "(game:\"Kansas:2024-11-12\")");
    }

    #[test]
    fn test_game_selection_with_no_survivors_contributes_nothing() {
        let filters = vec![
            StructuredFilter::GameSelection {
                games: vec!["Houston:2025-01-02".to_string()],
            },
            StructuredFilter::Venue { venue: Venue::Home },
        ];
        assert_eq!(build_filter_str_for_query(&filters, &games()), "venue:Home");
    }

    #[test]
    fn test_query_form_joins_with_and() {
        let filters = vec![
            StructuredFilter::DateRange {
                from: date(2024, 11, 20),
                to: date(2024, 12, 5),
            },
            StructuredFilter::Opponents {
                teams: vec!["Kansas".to_string()],
            },
        ];
        assert_eq!(
            build_filter_str_for_query(&filters, &[]),
            "date:[2024-11-20 TO 2024-12-05] AND (vs:\"Kansas\")"
        );
    }

    #[test]
    fn test_empty_filters_render_nothing() {
        let filters = vec![StructuredFilter::GameSelection { games: vec![] }];
        assert_eq!(build_filter_str(&filters), "");
        assert_eq!(build_filter_str_for_query(&filters, &games()), "");
    }
}
