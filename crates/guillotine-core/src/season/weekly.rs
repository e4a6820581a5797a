// Weekly stat lines over rosters alive each week.

use std::collections::BTreeMap;

use crate::model::{WeeklyStat, MAX_WEEK};
use crate::stats::{median, quartiles, round_to};

use super::eliminations::Eliminations;
use super::WeekScores;

/// Quartiles need at least this many scores; below it the extremes stand in.
const MIN_QUARTILE_SCORES: usize = 4;

/// Stat line for every week through [`MAX_WEEK`]. Weeks with scores get
/// values; weeks after `current_week` get an all-null line. Played weeks with
/// no surviving scores are omitted.
pub fn compute(
    roster_ids: &[u32],
    scores: &WeekScores,
    elim: &Eliminations,
    current_week: u32,
) -> BTreeMap<String, WeeklyStat> {
    let mut out = BTreeMap::new();

    for week in 1..=current_week {
        let Some(week_scores) = scores.get(&week) else {
            continue;
        };
        let mut alive: Vec<f64> = roster_ids
            .iter()
            .filter(|r| elim.is_alive_at(**r, week))
            .filter_map(|r| week_scores.get(r).copied())
            .collect();
        if let Some(stat) = stat_line(&mut alive) {
            out.insert(week.to_string(), stat);
        }
    }

    for week in current_week + 1..=MAX_WEEK {
        out.insert(week.to_string(), WeeklyStat::default());
    }

    out
}

/// Summarize one week's scores. Sorts `scores` in place.
pub fn stat_line(scores: &mut [f64]) -> Option<WeeklyStat> {
    scores.sort_by(|a, b| a.total_cmp(b));
    let (&low, &high) = (scores.first()?, scores.last()?);
    let quarts = if scores.len() >= MIN_QUARTILE_SCORES {
        quartiles(scores)
    } else {
        None
    };
    let differential = if scores.len() >= 2 {
        round_to(scores[1] - scores[0], 2)
    } else {
        0.0
    };
    Some(WeeklyStat {
        high_score: Some(high),
        percentile_75: Some(quarts.map_or(high, |q| q[2])),
        median: median(scores),
        percentile_25: Some(quarts.map_or(low, |q| q[0])),
        chop_score: Some(low),
        chop_differential: Some(differential),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::eliminations;

    #[test]
    fn stat_line_small_week_uses_extremes() {
        let stat = stat_line(&mut [90.0, 70.0, 110.0]).unwrap();
        assert_eq!(stat.high_score, Some(110.0));
        assert_eq!(stat.percentile_75, Some(110.0));
        assert_eq!(stat.median, Some(90.0));
        assert_eq!(stat.percentile_25, Some(70.0));
        assert_eq!(stat.chop_score, Some(70.0));
        assert_eq!(stat.chop_differential, Some(20.0));
    }

    #[test]
    fn stat_line_quartiles() {
        let stat = stat_line(&mut [40.0, 10.0, 30.0, 20.0]).unwrap();
        assert_eq!(stat.percentile_25, Some(12.5));
        assert_eq!(stat.percentile_75, Some(37.5));
        assert_eq!(stat.median, Some(25.0));
    }

    #[test]
    fn stat_line_single_and_empty() {
        assert!(stat_line(&mut []).is_none());
        let stat = stat_line(&mut [50.0]).unwrap();
        assert_eq!(stat.chop_differential, Some(0.0));
    }

    #[test]
    fn future_weeks_are_null() {
        let mut scores = WeekScores::new();
        scores.insert(1, [(1, 10.0), (2, 20.0)].into_iter().collect());
        let elim = eliminations::compute(&[1, 2], &scores, 1);
        let stats = compute(&[1, 2], &scores, &elim, 1);
        assert_eq!(stats.len(), MAX_WEEK as usize);
        assert_eq!(stats["1"].chop_score, Some(10.0));
        assert_eq!(stats["2"], WeeklyStat::default());
        assert_eq!(stats["17"].high_score, None);
    }
}
