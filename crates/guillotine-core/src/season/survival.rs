// How comfortably each roster survived: average finishing position above the
// chop line, and a count of close calls.

use std::collections::HashMap;

use super::eliminations::Eliminations;
use super::WeekScores;
use crate::stats::round_to;

/// Points above the chop score within which a survival counts as close.
pub const CLOSE_CALL_POINTS: f64 = 5.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurvivalStats {
    pub avg_pos_above_chop: HashMap<u32, f64>,
    pub close_calls: HashMap<u32, u32>,
}

/// For every roster, over each week it played (through its chop week or
/// `current_week`): the number of rosters it outscored, and whether it
/// finished second to last or within [`CLOSE_CALL_POINTS`] of the chop.
pub fn compute(
    roster_ids: &[u32],
    scores: &WeekScores,
    elim: &Eliminations,
    current_week: u32,
) -> SurvivalStats {
    let mut out = SurvivalStats::default();

    for &rid in roster_ids {
        let end_week = elim.chop_week(rid).unwrap_or(current_week);
        let mut positions_above = Vec::new();
        let mut close_calls = 0u32;

        for week in 1..=end_week {
            let Some(week_scores) = scores.get(&week) else {
                continue;
            };
            let mut ranked: Vec<(u32, f64)> = roster_ids
                .iter()
                .filter(|r| elim.is_alive_at(**r, week))
                .filter_map(|r| week_scores.get(r).map(|s| (*r, *s)))
                .collect();
            if ranked.is_empty() {
                continue;
            }
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            let n = ranked.len();
            let Some(idx) = ranked.iter().position(|(r, _)| *r == rid) else {
                continue;
            };
            let above = n - (idx + 1);
            positions_above.push(above as f64);

            let chop_score = elim.chop_scores.get(&week).copied().unwrap_or(0.0);
            let margin = ranked[idx].1 - chop_score;
            if above == 1 || (above > 0 && margin <= CLOSE_CALL_POINTS) {
                close_calls += 1;
            }
        }

        let avg = if positions_above.is_empty() {
            0.0
        } else {
            round_to(positions_above.iter().sum::<f64>() / positions_above.len() as f64, 1)
        };
        out.avg_pos_above_chop.insert(rid, avg);
        out.close_calls.insert(rid, close_calls);
    }

    out
}
