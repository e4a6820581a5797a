// Won waiver claims per week, with the competing bids each one beat.

use std::collections::{BTreeMap, HashMap};

use super::raw::{player_name, PlayerDirectory, RawSeason, Transaction};
use super::roster_names;

#[derive(Debug, Clone, PartialEq)]
pub struct WaiverAward {
    pub week: u32,
    pub player_id: String,
    pub player_name: String,
    pub manager: String,
    pub roster_id: Option<u32>,
    pub winning_bid: i64,
    /// Second entry of every bid on the player, highest first; 0 when the
    /// winner bid alone.
    pub second_highest_bid: i64,
    pub num_bidders: usize,
    pub wasted: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeekActivity {
    pub total_spent: i64,
    pub num_transactions: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonTransactions {
    pub season: i32,
    pub current_week: u32,
    /// Week order, then the order players were first claimed in.
    pub awards: Vec<WaiverAward>,
    pub weekly: BTreeMap<u32, WeekActivity>,
}

struct Bid {
    roster_id: Option<u32>,
    amount: i64,
    complete: bool,
}

/// Waiver bids per player in the order each player was first claimed. Claims
/// with a null bid are not bids.
fn bids_by_player(txns: &[Transaction]) -> Vec<(&str, Vec<Bid>)> {
    let mut order: Vec<(&str, Vec<Bid>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for txn in txns.iter().filter(|t| t.is_waiver()) {
        let (Some(adds), Some(amount)) = (&txn.adds, txn.bid()) else {
            continue;
        };
        for player_id in adds.keys() {
            let slot = *index.entry(player_id.as_str()).or_insert_with(|| {
                order.push((player_id.as_str(), Vec::new()));
                order.len() - 1
            });
            order[slot].1.push(Bid {
                roster_id: txn.claimant(),
                amount,
                complete: txn.is_complete(),
            });
        }
    }
    order
}

/// Every won waiver claim from week 1 through `current_week`.
///
/// The winner is the first completed claim on a player. Waste is the winning
/// bid minus one more than the second highest bid, floored at zero.
pub fn season_transactions(
    raw: &RawSeason,
    current_week: u32,
    players: &PlayerDirectory,
) -> SeasonTransactions {
    let names: HashMap<u32, String> = roster_names(&raw.users, &raw.rosters).into_iter().collect();
    let mut out = SeasonTransactions {
        season: raw.season,
        current_week,
        ..Default::default()
    };

    for week in 1..=current_week {
        let mut activity = WeekActivity::default();
        let txns = raw.transactions.get(&week).map(Vec::as_slice).unwrap_or_default();
        for (player_id, bids) in bids_by_player(txns) {
            let Some(winner) = bids.iter().find(|b| b.complete) else {
                continue;
            };
            let mut amounts: Vec<i64> = bids.iter().map(|b| b.amount).collect();
            amounts.sort_unstable_by(|a, b| b.cmp(a));
            let second_highest_bid = amounts.get(1).copied().unwrap_or(0);
            let manager = match winner.roster_id {
                Some(rid) => names
                    .get(&rid)
                    .cloned()
                    .unwrap_or_else(|| format!("Team {rid}")),
                None => "Unknown".to_string(),
            };

            activity.total_spent += winner.amount;
            activity.num_transactions += 1;
            out.awards.push(WaiverAward {
                week,
                player_id: player_id.to_string(),
                player_name: player_name(players, player_id),
                manager,
                roster_id: winner.roster_id,
                winning_bid: winner.amount,
                second_highest_bid,
                num_bidders: bids.len(),
                wasted: (winner.amount - second_highest_bid - 1).max(0),
            });
        }
        out.weekly.insert(week, activity);
    }
    out
}
