// Render-ready standings table: one row per manager with colored, ranked
// score cells, weekly summary rows, and aggregates over remaining managers.
//
// The table is rebuilt from scratch for every render; nothing here caches.

use crate::color::{contrast_text_color, score_color, TextColor, NOT_APPLICABLE_COLOR};
use crate::model::{Manager, SeasonData, WeeklyStat, MAX_WEEK};
use crate::stats::{calc_stats, week_rankings, week_stats, SummaryStats, WeekStats};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Inputs to a render pass that do not come from the season snapshot itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingsContext {
    /// Champion of the previous season, highlighted in the table.
    pub reigning_champion: Option<String>,
}

// ---------------------------------------------------------------------------
// Cells and rows
// ---------------------------------------------------------------------------

/// What a score cell represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Scored week, manager survived it.
    Played,
    /// The week this manager was chopped.
    Chopped,
    /// A week after this manager was chopped.
    Eliminated,
    /// Manager alive but no score yet.
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCell {
    pub week: u32,
    pub score: Option<f64>,
    pub rank: Option<u32>,
    /// `#rrggbb` background.
    pub background: String,
    pub text: TextColor,
    pub state: CellState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerRow {
    pub user_name: String,
    pub draft_position: Option<u32>,
    pub faab_remaining: i64,
    pub faab_wasted: Option<i64>,
    pub close_calls: Option<u32>,
    pub avg_pos_above_chop: Option<f64>,
    pub chop_week: Option<u32>,
    pub finish_position: Option<u32>,
    pub is_champion: bool,
    pub is_reigning_champion: bool,
    /// Whether the manager is still alive as of the last visible week.
    pub remaining: bool,
    pub cells: Vec<ScoreCell>,
}

/// Weekly summary line shown beneath the manager rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMetric {
    HighScore,
    Percentile75,
    Median,
    Percentile25,
    ChopScore,
    ChopDifferential,
}

impl SummaryMetric {
    pub const ALL: [SummaryMetric; 6] = [
        SummaryMetric::HighScore,
        SummaryMetric::Percentile75,
        SummaryMetric::Median,
        SummaryMetric::Percentile25,
        SummaryMetric::ChopScore,
        SummaryMetric::ChopDifferential,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SummaryMetric::HighScore => "High Score",
            SummaryMetric::Percentile75 => "75th Pct",
            SummaryMetric::Median => "Median",
            SummaryMetric::Percentile25 => "25th Pct",
            SummaryMetric::ChopScore => "Chop Score",
            SummaryMetric::ChopDifferential => "Chop Diff",
        }
    }

    fn value(&self, stat: &WeeklyStat) -> Option<f64> {
        match self {
            SummaryMetric::HighScore => stat.high_score,
            SummaryMetric::Percentile75 => stat.percentile_75,
            SummaryMetric::Median => stat.median,
            SummaryMetric::Percentile25 => stat.percentile_25,
            SummaryMetric::ChopScore => stat.chop_score,
            SummaryMetric::ChopDifferential => stat.chop_differential,
        }
    }

    /// Whether values of this metric are scores (and so take the gradient).
    fn is_score(&self) -> bool {
        !matches!(self, SummaryMetric::ChopDifferential)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCell {
    pub value: Option<f64>,
    /// Gradient background for score-valued metrics; `None` for plain cells.
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummaryRow {
    pub metric: SummaryMetric,
    pub cells: Vec<SummaryCell>,
}

/// Aggregates over managers still alive at the last visible week.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurvivorSummary {
    pub faab_remaining: SummaryStats,
    pub avg_pos_above_chop: SummaryStats,
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StandingsTable {
    pub season: i32,
    /// Weeks 1..=visible_weeks are shown.
    pub visible_weeks: u32,
    pub status: Option<String>,
    pub champion: Option<String>,
    pub reigning_champion: Option<String>,
    /// Number of managers alive at the last visible week.
    pub remaining: usize,
    /// Per-week spread used for coloring, index 0 = week 1.
    pub week_stats: Vec<WeekStats>,
    pub rows: Vec<ManagerRow>,
    pub weekly_summary: Vec<WeeklySummaryRow>,
    pub survivor_summary: SurvivorSummary,
}

impl StandingsTable {
    pub fn row(&self, user_name: &str) -> Option<&ManagerRow> {
        self.rows.iter().find(|r| r.user_name == user_name)
    }
}

/// Number of weeks a season snapshot has data for, capped at [`MAX_WEEK`].
pub fn visible_weeks(season: &SeasonData) -> u32 {
    if season.is_pre_season() {
        return 0;
    }
    season.current_week.min(MAX_WEEK)
}

/// Build the standings table for `season`.
pub fn build_standings(season: &SeasonData, ctx: &StandingsContext) -> StandingsTable {
    let weeks = visible_weeks(season);
    let managers = &season.managers;

    let stats: Vec<WeekStats> = (1..=weeks).map(|w| week_stats(managers, w)).collect();
    let rankings: Vec<_> = (1..=weeks).map(|w| week_rankings(managers, w)).collect();

    let remaining_at = |m: &Manager| weeks == 0 || m.chop_week.map_or(true, |c| c > weeks);

    let rows = managers
        .iter()
        .map(|m| {
            let cells = (1..=weeks)
                .map(|week| {
                    let idx = (week - 1) as usize;
                    let rank = rankings[idx].get(&m.user_name).copied();
                    score_cell(m, week, &stats[idx], rank)
                })
                .collect();
            ManagerRow {
                user_name: m.user_name.clone(),
                draft_position: m.draft_position,
                faab_remaining: m.faab_remaining,
                faab_wasted: m.faab_wasted,
                close_calls: m.close_calls,
                avg_pos_above_chop: m.avg_pos_above_chop,
                chop_week: m.chop_week,
                finish_position: finish_position(m, managers.len(), weeks),
                is_champion: season.champion.as_deref() == Some(m.user_name.as_str()),
                is_reigning_champion: ctx.reigning_champion.as_deref()
                    == Some(m.user_name.as_str()),
                remaining: remaining_at(m),
                cells,
            }
        })
        .collect();

    let weekly_summary = SummaryMetric::ALL
        .iter()
        .map(|metric| WeeklySummaryRow {
            metric: *metric,
            cells: (1..=weeks)
                .map(|week| summary_cell(season, *metric, week, &stats[(week - 1) as usize]))
                .collect(),
        })
        .collect();

    let survivors: Vec<&Manager> = managers.iter().filter(|m| remaining_at(m)).collect();
    let faab: Vec<f64> = survivors.iter().map(|m| m.faab_remaining as f64).collect();
    let avg_pos: Vec<f64> = survivors
        .iter()
        .filter_map(|m| m.avg_pos_above_chop)
        .collect();

    StandingsTable {
        season: season.season,
        visible_weeks: weeks,
        status: season.status.as_ref().map(|s| s.as_str().to_string()),
        champion: season.champion.clone(),
        reigning_champion: ctx.reigning_champion.clone(),
        remaining: survivors.len(),
        week_stats: stats,
        rows,
        weekly_summary,
        survivor_summary: SurvivorSummary {
            faab_remaining: calc_stats(&faab),
            avg_pos_above_chop: calc_stats(&avg_pos),
        },
    }
}

/// Stored finish, else derived from the chop week. Survivors without a stored
/// finish only place once the season has played out.
fn finish_position(m: &Manager, teams: usize, weeks: u32) -> Option<u32> {
    if m.finish_position.is_some() || m.chop_week.is_some() || weeks >= MAX_WEEK {
        Some(m.resolved_finish(teams))
    } else {
        None
    }
}

fn score_cell(m: &Manager, week: u32, stats: &WeekStats, rank: Option<u32>) -> ScoreCell {
    let score = m.score(week);
    let state = match (m.chop_week, score) {
        (Some(chop), _) if week > chop => CellState::Eliminated,
        (Some(chop), _) if week == chop => CellState::Chopped,
        (_, Some(_)) => CellState::Played,
        (_, None) => CellState::Pending,
    };
    let background = if score.is_some() {
        score_color(score, Some(stats.min), Some(stats.max), Some(stats.median))
    } else {
        NOT_APPLICABLE_COLOR.to_string()
    };
    let text = contrast_text_color(&background);
    ScoreCell {
        week,
        score,
        rank,
        background,
        text,
        state,
    }
}

fn summary_cell(season: &SeasonData, metric: SummaryMetric, week: u32, stats: &WeekStats) -> SummaryCell {
    let value = season.weekly_stat(week).and_then(|s| metric.value(s));
    let background = metric.is_score().then(|| {
        score_color(value, Some(stats.min), Some(stats.max), Some(stats.median))
    });
    SummaryCell { value, background }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
