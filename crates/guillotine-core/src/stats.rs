// Per-week score statistics, weekly rankings, and summary aggregates.

use std::collections::HashMap;

use crate::model::Manager;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Median of an ascending-sorted slice: the middle element for odd lengths,
/// the mean of the two middle elements for even lengths. `None` when empty.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Quartile cut points (25th, 50th, 75th) of an ascending-sorted slice using
/// the exclusive method (`(n + 1) * p` positions, linearly interpolated).
///
/// Needs at least two values; returns `None` otherwise.
pub fn quartiles(sorted: &[f64]) -> Option<[f64; 3]> {
    let len = sorted.len();
    if len < 2 {
        return None;
    }
    const N: usize = 4;
    let m = len + 1;
    let mut cuts = [0.0; 3];
    for (slot, i) in cuts.iter_mut().zip(1..N) {
        let j = (i * m / N).clamp(1, len - 1);
        let delta = (i * m) as f64 - (j * N) as f64;
        *slot = (sorted[j - 1] * (N as f64 - delta) + sorted[j] * delta) / N as f64;
    }
    Some(cuts)
}

/// Sort a copy of `values` ascending. NaNs sort last.
fn sorted_copy(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.into_iter().collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Scores for `week` from managers alive that week, in input order.
fn alive_scores(managers: &[Manager], week: u32) -> impl Iterator<Item = (&Manager, f64)> {
    managers
        .iter()
        .filter(move |m| m.is_alive_at(week))
        .filter_map(move |m| m.score(week).map(|s| (m, s)))
}

// ---------------------------------------------------------------------------
// Week stats
// ---------------------------------------------------------------------------

/// Spread of one week's scores among managers alive that week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekStats {
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl WeekStats {
    /// Sentinel for a week with no eligible scores.
    pub const EMPTY: WeekStats = WeekStats {
        min: 0.0,
        max: 0.0,
        median: 0.0,
    };
}

/// Min, max, and median for `week` over alive managers with a score.
///
/// Returns [`WeekStats::EMPTY`] when no manager qualifies.
pub fn week_stats(managers: &[Manager], week: u32) -> WeekStats {
    let sorted = sorted_copy(alive_scores(managers, week).map(|(_, s)| s));
    match (sorted.first(), sorted.last(), median(&sorted)) {
        (Some(&min), Some(&max), Some(median)) => WeekStats { min, max, median },
        _ => WeekStats::EMPTY,
    }
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// Rank (1 = highest score) of every alive manager with a score in `week`.
///
/// Managers with equal scores get consecutive ranks in input order. Managers
/// without a score, or chopped before `week`, have no entry.
pub fn week_rankings(managers: &[Manager], week: u32) -> HashMap<String, u32> {
    let mut scored: Vec<(&Manager, f64)> = alive_scores(managers, week).collect();
    // Stable sort keeps input order among ties.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
        .into_iter()
        .enumerate()
        .map(|(i, (m, _))| (m.user_name.clone(), i as u32 + 1))
        .collect()
}

// ---------------------------------------------------------------------------
// Summary stats
// ---------------------------------------------------------------------------

/// Aggregate of an arbitrary list of numbers. All fields are `None` for an
/// empty list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryStats {
    pub avg: Option<f64>,
    pub med: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Mean, median, min, and max of `values`.
pub fn calc_stats(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats::default();
    }
    let sorted = sorted_copy(values.iter().copied());
    SummaryStats {
        avg: Some(values.iter().sum::<f64>() / values.len() as f64),
        med: median(&sorted),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(name: &str, week: u32, score: Option<f64>, chop_week: Option<u32>) -> Manager {
        let mut m = Manager::new(name);
        m.set_score(week, score);
        m.chop_week = chop_week;
        m
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0]), Some(3.0));
        assert_eq!(median(&[1.0, 2.0, 9.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 9.0]), Some(2.5));
    }

    #[test]
    fn quartiles_exclusive_method() {
        let q = quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(q, [2.25, 4.5, 6.75]);
        let q = quartiles(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(q, [12.5, 25.0, 37.5]);
        assert!(quartiles(&[1.0]).is_none());
    }

    #[test]
    fn week_stats_odd_count() {
        let managers = vec![
            manager("a", 1, Some(30.0), None),
            manager("b", 1, Some(10.0), None),
            manager("c", 1, Some(20.0), None),
        ];
        assert_eq!(
            week_stats(&managers, 1),
            WeekStats { min: 10.0, max: 30.0, median: 20.0 }
        );
    }

    #[test]
    fn week_stats_even_count() {
        let managers = vec![
            manager("a", 1, Some(10.0), None),
            manager("b", 1, Some(20.0), None),
            manager("c", 1, Some(30.0), None),
            manager("d", 1, Some(40.0), None),
        ];
        assert_eq!(week_stats(&managers, 1).median, 25.0);
    }

    #[test]
    fn week_stats_skips_chopped_and_unscored() {
        let managers = vec![
            manager("a", 5, Some(10.0), Some(4)),
            manager("b", 5, None, None),
            manager("c", 5, Some(50.0), Some(5)),
            manager("d", 5, Some(70.0), None),
        ];
        assert_eq!(
            week_stats(&managers, 5),
            WeekStats { min: 50.0, max: 70.0, median: 60.0 }
        );
    }

    #[test]
    fn week_stats_empty_is_zero_sentinel() {
        let managers = vec![manager("a", 1, None, None)];
        assert_eq!(week_stats(&managers, 1), WeekStats::EMPTY);
        assert_eq!(week_stats(&[], 3), WeekStats::EMPTY);
    }

    #[test]
    fn rankings_descending() {
        let managers = vec![
            manager("C", 2, Some(10.0), None),
            manager("A", 2, Some(30.0), None),
            manager("B", 2, Some(20.0), None),
        ];
        let ranks = week_rankings(&managers, 2);
        assert_eq!(ranks["A"], 1);
        assert_eq!(ranks["B"], 2);
        assert_eq!(ranks["C"], 3);
    }

    #[test]
    fn rankings_exclude_chopped_and_unscored() {
        let managers = vec![
            manager("A", 3, Some(30.0), None),
            manager("B", 3, Some(99.0), Some(2)),
            manager("C", 3, None, None),
        ];
        let ranks = week_rankings(&managers, 3);
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks["A"], 1);
        assert!(!ranks.contains_key("B"));
        assert!(!ranks.contains_key("C"));
    }

    #[test]
    fn rankings_ties_follow_input_order() {
        let managers = vec![
            manager("first", 1, Some(50.0), None),
            manager("second", 1, Some(50.0), None),
        ];
        let ranks = week_rankings(&managers, 1);
        assert_eq!(ranks["first"], 1);
        assert_eq!(ranks["second"], 2);
    }

    #[test]
    fn calc_stats_empty_is_all_none() {
        assert_eq!(calc_stats(&[]), SummaryStats::default());
        assert!(calc_stats(&[]).avg.is_none());
    }

    #[test]
    fn calc_stats_single_value() {
        let s = calc_stats(&[5.0]);
        assert_eq!(s.avg, Some(5.0));
        assert_eq!(s.med, Some(5.0));
        assert_eq!(s.min, Some(5.0));
        assert_eq!(s.max, Some(5.0));
    }

    #[test]
    fn calc_stats_unsorted_input() {
        let s = calc_stats(&[400.0, 100.0, 300.0, 200.0]);
        assert_eq!(s.avg, Some(250.0));
        assert_eq!(s.med, Some(250.0));
        assert_eq!(s.min, Some(100.0));
        assert_eq!(s.max, Some(400.0));
    }

    #[test]
    fn round_to_one_place() {
        assert_eq!(round_to(2.34, 1), 2.3);
        assert_eq!(round_to(2.36, 1), 2.4);
    }
}
