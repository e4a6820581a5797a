// Season recap: elimination order, superlatives, close calls, blowouts, and
// weekly highlights for one season snapshot.

use crate::model::{SeasonData, SeasonStatus, MAX_WEEK};
use crate::stats::round_to;

/// A survival margin below this many points is a close call.
pub const CLOSE_CALL_MARGIN: f64 = 5.0;
/// A chopped manager trailing the next score by more than this was blown out.
pub const BLOWOUT_MARGIN: f64 = 20.0;
/// Close calls and blowouts kept in the recap.
pub const RECAP_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Elimination {
    pub week: u32,
    pub manager: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMoment {
    pub manager: String,
    pub score: f64,
    pub week: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Superlatives {
    pub highest_score: Option<ScoreMoment>,
    /// Lowest score that did not get its owner chopped.
    pub lowest_survivor_score: Option<ScoreMoment>,
    pub most_close_calls: Option<(String, u32)>,
    /// Highest average position above the chop line, rounded to one place.
    pub best_avg_position: Option<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseCall {
    pub week: u32,
    pub survivor: String,
    pub survivor_score: f64,
    pub chopped: String,
    pub chopped_score: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blowout {
    pub week: u32,
    pub chopped: String,
    pub score: f64,
    pub margin_to_safety: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyHighlight {
    pub week: u32,
    pub high_scorer: Option<String>,
    pub high_score: Option<f64>,
    pub median: Option<f64>,
    pub eliminated: Option<String>,
    pub chop_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRecap {
    pub season: i32,
    pub current_week: u32,
    pub is_complete: bool,
    pub status: Option<SeasonStatus>,
    pub champion: Option<String>,
    pub elimination_order: Vec<Elimination>,
    pub superlatives: Superlatives,
    /// Tightest first.
    pub close_calls: Vec<CloseCall>,
    /// Widest first.
    pub biggest_blowouts: Vec<Blowout>,
    pub weekly_highlights: Vec<WeeklyHighlight>,
}

impl SeasonRecap {
    fn empty(season: &SeasonData, current_week: u32) -> Self {
        SeasonRecap {
            season: season.season,
            current_week,
            is_complete: current_week == MAX_WEEK,
            status: season.status.clone(),
            champion: None,
            elimination_order: Vec::new(),
            superlatives: Superlatives::default(),
            close_calls: Vec::new(),
            biggest_blowouts: Vec::new(),
            weekly_highlights: Vec::new(),
        }
    }
}

/// Recap of `season` through its current week. A season that has not started
/// gets an empty recap carrying its status.
pub fn build_recap(season: &SeasonData) -> SeasonRecap {
    if season.is_pre_season() {
        return SeasonRecap::empty(season, 0);
    }
    let current_week = season.current_week.min(MAX_WEEK);
    let mut recap = SeasonRecap::empty(season, current_week);
    recap.champion = season.champion.clone();
    recap.elimination_order = elimination_order(season);
    recap.superlatives = superlatives(season);

    let (close_calls, blowouts) = bottom_margins(season);
    recap.close_calls = close_calls;
    recap.biggest_blowouts = blowouts;

    recap.weekly_highlights = (1..=current_week)
        .filter_map(|week| {
            let stat = season.weekly_stat(week)?;
            let mut high: Option<(&str, f64)> = None;
            for m in &season.managers {
                if let Some(score) = m.raw_score(week) {
                    if score > high.map_or(0.0, |(_, s)| s) {
                        high = Some((m.user_name.as_str(), score));
                    }
                }
            }
            let eliminated = recap
                .elimination_order
                .iter()
                .find(|e| e.week == week)
                .map(|e| e.manager.clone());
            Some(WeeklyHighlight {
                week,
                high_scorer: high.map(|(name, _)| name.to_string()),
                high_score: high.map(|(_, score)| score),
                median: stat.median,
                eliminated,
                chop_score: stat.chop_score,
            })
        })
        .collect();

    recap
}

fn elimination_order(season: &SeasonData) -> Vec<Elimination> {
    let mut out: Vec<Elimination> = season
        .managers
        .iter()
        .filter_map(|m| {
            let week = m.chop_week.filter(|w| *w > 0)?;
            Some(Elimination {
                week,
                manager: m.user_name.clone(),
                score: m.raw_score(week),
            })
        })
        .collect();
    out.sort_by_key(|e| e.week);
    out
}

fn superlatives(season: &SeasonData) -> Superlatives {
    let mut out = Superlatives::default();
    let mut best_avg = 0.0;

    for m in &season.managers {
        for week in 1..=MAX_WEEK {
            let Some(score) = m.raw_score(week) else {
                continue;
            };
            if score > out.highest_score.as_ref().map_or(0.0, |h| h.score) {
                out.highest_score = Some(ScoreMoment {
                    manager: m.user_name.clone(),
                    score,
                    week,
                });
            }
            let survived = m.chop_week != Some(week);
            if survived && out.lowest_survivor_score.as_ref().map_or(true, |l| score < l.score) {
                out.lowest_survivor_score = Some(ScoreMoment {
                    manager: m.user_name.clone(),
                    score,
                    week,
                });
            }
        }

        let close_calls = m.close_calls.unwrap_or(0);
        if close_calls > out.most_close_calls.as_ref().map_or(0, |(_, c)| *c) {
            out.most_close_calls = Some((m.user_name.clone(), close_calls));
        }

        let avg_pos = m.avg_pos_above_chop.unwrap_or(0.0);
        if avg_pos > best_avg {
            best_avg = avg_pos;
            out.best_avg_position = Some((m.user_name.clone(), round_to(avg_pos, 1)));
        }
    }
    out
}

/// For every week with a chop score, the gap between the bottom two alive
/// scores: under [`CLOSE_CALL_MARGIN`] is a close call, over
/// [`BLOWOUT_MARGIN`] a blowout.
fn bottom_margins(season: &SeasonData) -> (Vec<CloseCall>, Vec<Blowout>) {
    let mut weeks: Vec<u32> = season
        .weekly_stats
        .keys()
        .filter_map(|k| k.parse().ok())
        .collect();
    weeks.sort_unstable();

    let mut close_calls = Vec::new();
    let mut blowouts = Vec::new();
    for week in weeks {
        let chop_score = season.weekly_stat(week).and_then(|s| s.chop_score);
        if chop_score.map_or(true, |c| c == 0.0) {
            continue;
        }
        let mut scores: Vec<(&str, f64)> = season
            .managers
            .iter()
            .filter(|m| m.is_alive_at(week))
            .filter_map(|m| m.raw_score(week).map(|s| (m.user_name.as_str(), s)))
            .collect();
        scores.sort_by(|a, b| a.1.total_cmp(&b.1));
        let [(chopped, chopped_score), (survivor, survivor_score), ..] = scores[..] else {
            continue;
        };
        let margin = round_to(survivor_score - chopped_score, 2);
        if margin < CLOSE_CALL_MARGIN {
            close_calls.push(CloseCall {
                week,
                survivor: survivor.to_string(),
                survivor_score,
                chopped: chopped.to_string(),
                chopped_score,
                margin,
            });
        }
        if margin > BLOWOUT_MARGIN {
            blowouts.push(Blowout {
                week,
                chopped: chopped.to_string(),
                score: chopped_score,
                margin_to_safety: margin,
            });
        }
    }

    close_calls.sort_by(|a, b| a.margin.total_cmp(&b.margin));
    close_calls.truncate(RECAP_LIMIT);
    blowouts.sort_by(|a, b| b.margin_to_safety.total_cmp(&a.margin_to_safety));
    blowouts.truncate(RECAP_LIMIT);
    (close_calls, blowouts)
}
