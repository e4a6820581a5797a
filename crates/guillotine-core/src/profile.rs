// Manager career profiles and league-wide average finishes, built from every
// season snapshot a manager appears in.

use std::collections::BTreeMap;

use crate::model::{Manager, SeasonData, MAX_WEEK};
use crate::stats::round_to;

/// Seasons before this one zeroed FAAB for eliminated teams, so their spend
/// and waste are left out of career totals.
pub const FAAB_TRACKED_FROM: i32 = 2025;

/// A single weekly score pinned to when it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekScore {
    pub score: f64,
    pub season: i32,
    pub week: u32,
}

/// One season of a manager's career.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonLine {
    pub season: i32,
    pub finish_position: Option<u32>,
    pub chop_week: Option<u32>,
    pub draft_position: Option<u32>,
    pub faab_remaining: i64,
    pub faab_spent: i64,
    pub faab_wasted: i64,
    pub avg_pos_above_chop: Option<f64>,
    pub close_calls: u32,
    pub season_total: f64,
    pub weeks_played: u32,
    pub avg_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareerStats {
    pub seasons_played: u32,
    pub championships: u32,
    pub top_3_finishes: u32,
    pub total_weeks_played: u32,
    pub total_points: f64,
    pub best_week: Option<WeekScore>,
    pub worst_week: Option<WeekScore>,
    pub close_calls: u32,
    pub total_faab_spent: i64,
    pub total_faab_wasted: i64,
    pub average_finish: Option<f64>,
    pub career_avg_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerProfile {
    /// Name as written in the most recent season the manager played.
    pub user_name: String,
    /// Oldest season first.
    pub seasons: Vec<SeasonLine>,
    pub career: CareerStats,
}

/// A manager's final place in each season and the mean of those places.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageFinish {
    pub user_name: String,
    pub finishes: BTreeMap<i32, Option<u32>>,
    pub average_finish: Option<f64>,
}

/// Final place of `m`, if the season has settled it: chopped managers always
/// have one, survivors only once the season has played out.
fn season_finish(m: &Manager, season: &SeasonData) -> Option<u32> {
    let complete = season.current_week >= MAX_WEEK;
    if m.finish_position.is_some() || m.chop_week.is_some() || complete {
        Some(m.resolved_finish(season.managers.len()))
    } else {
        None
    }
}

fn find_manager<'a>(season: &'a SeasonData, user_name: &str) -> Option<&'a Manager> {
    season
        .managers
        .iter()
        .find(|m| m.user_name.eq_ignore_ascii_case(user_name))
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Career profile for `user_name` (matched case-insensitively) across
/// `seasons`. Seasons that have not started are skipped. `None` when the
/// manager never played.
pub fn build_profile(user_name: &str, seasons: &[SeasonData]) -> Option<ManagerProfile> {
    let mut ordered: Vec<&SeasonData> = seasons.iter().filter(|s| !s.is_pre_season()).collect();
    ordered.sort_by_key(|s| s.season);

    let mut career = CareerStats::default();
    let mut lines = Vec::new();
    let mut finishes = Vec::new();
    let mut display_name = None;

    for season in ordered {
        let Some(m) = find_manager(season, user_name) else {
            continue;
        };
        display_name = Some(m.user_name.clone());
        career.seasons_played += 1;

        let finish = season_finish(m, season);
        if let Some(place) = finish {
            finishes.push(f64::from(place));
            if place == 1 {
                career.championships += 1;
            }
            if place <= 3 {
                career.top_3_finishes += 1;
            }
        }

        let mut season_total = 0.0;
        let mut weeks_played = 0u32;
        for week in 1..=MAX_WEEK {
            let Some(score) = m.raw_score(week) else {
                continue;
            };
            weeks_played += 1;
            season_total += score;
            let moment = WeekScore {
                score,
                season: season.season,
                week,
            };
            if career.best_week.map_or(true, |b| score > b.score) {
                career.best_week = Some(moment);
            }
            if career.worst_week.map_or(true, |w| score < w.score) {
                career.worst_week = Some(moment);
            }
        }
        career.total_weeks_played += weeks_played;
        career.total_points += season_total;

        let close_calls = m.close_calls.unwrap_or(0);
        let faab_spent = m.faab_spent.unwrap_or(0);
        let faab_wasted = m.faab_wasted.unwrap_or(0);
        career.close_calls += close_calls;
        if season.season >= FAAB_TRACKED_FROM {
            career.total_faab_spent += faab_spent;
            career.total_faab_wasted += faab_wasted;
        }

        lines.push(SeasonLine {
            season: season.season,
            finish_position: finish,
            chop_week: m.chop_week,
            draft_position: m.draft_position,
            faab_remaining: m.faab_remaining,
            faab_spent,
            faab_wasted,
            avg_pos_above_chop: m.avg_pos_above_chop,
            close_calls,
            season_total: round_to(season_total, 2),
            weeks_played,
            avg_score: (weeks_played > 0)
                .then(|| round_to(season_total / f64::from(weeks_played), 2)),
        });
    }

    let user_name = display_name?;
    career.average_finish = mean(&finishes).map(|avg| round_to(avg, 2));
    career.career_avg_score = (career.total_weeks_played > 0).then(|| {
        round_to(
            career.total_points / f64::from(career.total_weeks_played),
            2,
        )
    });
    career.total_points = round_to(career.total_points, 2);

    Some(ManagerProfile {
        user_name,
        seasons: lines,
        career,
    })
}

/// Every manager's finish per season, best average first. Managers without a
/// settled finish sort last.
pub fn average_finishes(seasons: &[SeasonData]) -> Vec<AverageFinish> {
    let mut ordered: Vec<&SeasonData> = seasons.iter().filter(|s| !s.is_pre_season()).collect();
    ordered.sort_by_key(|s| s.season);

    let mut out: Vec<AverageFinish> = Vec::new();
    for season in ordered {
        for m in &season.managers {
            let finish = season_finish(m, season);
            let idx = match out
                .iter()
                .position(|a| a.user_name.eq_ignore_ascii_case(&m.user_name))
            {
                Some(idx) => idx,
                None => {
                    out.push(AverageFinish {
                        user_name: m.user_name.clone(),
                        finishes: BTreeMap::new(),
                        average_finish: None,
                    });
                    out.len() - 1
                }
            };
            out[idx].user_name = m.user_name.clone();
            out[idx].finishes.insert(season.season, finish);
        }
    }

    for entry in &mut out {
        let places: Vec<f64> = entry.finishes.values().flatten().map(|p| f64::from(*p)).collect();
        entry.average_finish = mean(&places).map(|avg| round_to(avg, 2));
    }
    out.sort_by(|a, b| {
        let key = |e: &AverageFinish| e.average_finish.unwrap_or(f64::MAX);
        key(a).total_cmp(&key(b))
    });
    out
}
