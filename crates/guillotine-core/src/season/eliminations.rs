// Weekly chop: the lowest scorer among remaining rosters is eliminated.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::WeekScores;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Eliminations {
    /// Roster id to the week it was chopped.
    pub chop_weeks: HashMap<u32, u32>,
    /// Week to the score that got chopped.
    pub chop_scores: BTreeMap<u32, f64>,
}

impl Eliminations {
    pub fn chop_week(&self, roster_id: u32) -> Option<u32> {
        self.chop_weeks.get(&roster_id).copied()
    }

    /// Whether `roster_id` played in `week`.
    pub fn is_alive_at(&self, roster_id: u32, week: u32) -> bool {
        self.chop_week(roster_id).map_or(true, |chop| chop >= week)
    }
}

/// Walk weeks 1..=current_week in order and chop the lowest scorer each week.
///
/// Ties go to the lower roster id. Stops at the first week without scores.
pub fn compute(roster_ids: &[u32], scores: &WeekScores, current_week: u32) -> Eliminations {
    let mut remaining: Vec<u32> = roster_ids.to_vec();
    let mut out = Eliminations::default();

    for week in 1..=current_week {
        let Some(week_scores) = scores.get(&week) else {
            break;
        };
        let chopped = remaining
            .iter()
            .filter_map(|rid| week_scores.get(rid).map(|s| (*rid, *s)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        let Some((rid, score)) = chopped else {
            break;
        };
        debug!(week, roster_id = rid, score, "roster chopped");
        out.chop_weeks.insert(rid, week);
        out.chop_scores.insert(week, score);
        remaining.retain(|r| *r != rid);
    }

    out
}
