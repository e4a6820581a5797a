// Season processing: turns raw league payloads into a `SeasonData` snapshot
// (eliminations, FAAB, survival stats, weekly stat lines, finish order).

pub mod chopped;
pub mod eliminations;
pub mod faab;
pub mod raw;
pub mod survival;
pub mod transactions;
pub mod weekly;

use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::model::{Manager, SeasonData, SeasonStatus, MAX_WEEK};
use raw::{LeagueUser, RawSeason, Roster};

/// Week to (roster id to points).
pub type WeekScores = BTreeMap<u32, HashMap<u32, f64>>;

/// Roster ids in roster order, paired with the owning manager's name.
pub fn roster_names(users: &[LeagueUser], rosters: &[Roster]) -> Vec<(u32, String)> {
    let by_id: HashMap<&str, String> = users
        .iter()
        .map(|u| (u.user_id.as_str(), u.name()))
        .collect();
    rosters
        .iter()
        .map(|r| {
            let name = r
                .owner_id
                .as_deref()
                .and_then(|owner| by_id.get(owner).cloned())
                .unwrap_or_else(|| format!("Team {}", r.roster_id));
            (r.roster_id, name)
        })
        .collect()
}

/// Points per roster for each week up to `current_week`, stopping at the
/// first week without matchup data. Null points are skipped.
pub fn week_scores(raw: &RawSeason, current_week: u32) -> WeekScores {
    let mut out = WeekScores::new();
    for week in 1..=current_week {
        let Some(matchups) = raw.matchups.get(&week) else {
            break;
        };
        let scores = matchups
            .iter()
            .filter_map(|m| m.points.map(|p| (m.roster_id, p)))
            .collect();
        out.insert(week, scores);
    }
    out
}

/// Round-one pick number for each roster.
fn draft_positions(raw: &RawSeason) -> HashMap<u32, u32> {
    raw.draft_picks
        .iter()
        .filter(|p| p.round == 1)
        .filter_map(|p| match (p.roster_id, p.pick_no) {
            (Some(rid), Some(pick)) if rid != 0 && pick != 0 => Some((rid, pick)),
            _ => None,
        })
        .collect()
}

/// Build the full season snapshot as of `current_week`.
pub fn process_season(raw: &RawSeason, current_week: u32, starting_faab: i64) -> SeasonData {
    let current_week = current_week.min(MAX_WEEK);
    let names = roster_names(&raw.users, &raw.rosters);
    let roster_ids: Vec<u32> = names.iter().map(|(rid, _)| *rid).collect();

    let scores = week_scores(raw, current_week);
    let elim = eliminations::compute(&roster_ids, &scores, current_week);
    let drafts = draft_positions(raw);
    let ledger = faab::compute(&raw.transactions);
    let survival = survival::compute(&roster_ids, &scores, &elim, current_week);
    let weekly_stats = weekly::compute(&roster_ids, &scores, &elim, current_week);

    let mut managers: Vec<Manager> = names
        .iter()
        .map(|(rid, name)| {
            let chop_week = elim.chop_week(*rid);
            let mut manager = Manager::new(name.clone());
            manager.roster_id = Some(*rid);
            manager.draft_position = drafts.get(rid).copied();
            manager.chop_week = chop_week;
            manager.faab_spent = Some(ledger.spent(*rid));
            manager.faab_wasted = Some(ledger.wasted(*rid));
            manager.faab_remaining = match chop_week {
                Some(_) => 0,
                None => starting_faab - ledger.spent(*rid),
            };
            manager.avg_pos_above_chop = survival.avg_pos_above_chop.get(rid).copied();
            manager.close_calls = survival.close_calls.get(rid).copied();
            for week in 1..=MAX_WEEK {
                let played = week <= current_week && chop_week.map_or(true, |c| week <= c);
                let score = if played {
                    scores.get(&week).and_then(|s| s.get(rid)).copied()
                } else {
                    None
                };
                manager.set_score(week, score);
            }
            manager
        })
        .collect();

    // Chopped managers first in chop order, then survivors, tightest first.
    managers.sort_by(|a, b| {
        let key = |m: &Manager| (m.chop_week.is_none(), m.chop_week.unwrap_or(999));
        key(a).cmp(&key(b)).then_with(|| {
            a.avg_pos_above_chop
                .unwrap_or(0.0)
                .total_cmp(&b.avg_pos_above_chop.unwrap_or(0.0))
        })
    });

    let total = managers.len();
    for manager in &mut managers {
        manager.finish_position = Some(manager.resolved_finish(total));
    }

    let champion = raw.winner_roster_id.and_then(|winner| {
        names
            .iter()
            .find(|(rid, _)| *rid == winner)
            .map(|(_, name)| name.clone())
    });

    info!(
        season = raw.season,
        current_week,
        managers = managers.len(),
        chopped = elim.chop_weeks.len(),
        "processed season"
    );

    SeasonData {
        season: raw.season,
        managers,
        weekly_stats,
        current_week,
        champion,
        status: None,
        starting_faab: Some(starting_faab),
    }
}

/// Snapshot for a league that has not started scoring: every user listed,
/// full FAAB, no scores.
pub fn placeholder_season(
    season: i32,
    users: &[LeagueUser],
    starting_faab: i64,
    status: SeasonStatus,
) -> SeasonData {
    let managers = users
        .iter()
        .map(|u| {
            let mut m = Manager::new(u.name());
            m.faab_remaining = starting_faab;
            for week in 1..=MAX_WEEK {
                m.set_score(week, None);
            }
            m
        })
        .collect();
    SeasonData {
        season,
        managers,
        weekly_stats: BTreeMap::new(),
        current_week: 0,
        champion: None,
        status: Some(status),
        starting_faab: Some(starting_faab),
    }
}
