// FAAB accounting from waiver transactions.

use std::collections::{BTreeMap, HashMap};

use super::raw::Transaction;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaabLedger {
    pub spent: HashMap<u32, i64>,
    pub wasted: HashMap<u32, i64>,
}

impl FaabLedger {
    pub fn spent(&self, roster_id: u32) -> i64 {
        self.spent.get(&roster_id).copied().unwrap_or(0)
    }

    pub fn wasted(&self, roster_id: u32) -> i64 {
        self.wasted.get(&roster_id).copied().unwrap_or(0)
    }
}

/// One claim on a player: who bid, how much, and whether it won.
struct Claim {
    roster_id: u32,
    bid: i64,
    complete: bool,
}

/// Total completed waiver spend and overbid waste per roster.
///
/// Waste on a won claim is the winning bid minus one more than the highest
/// competing bid from a different roster, floored at zero. Uncontested claims
/// waste nothing.
pub fn compute(transactions: &BTreeMap<u32, Vec<Transaction>>) -> FaabLedger {
    let mut ledger = FaabLedger::default();

    for txns in transactions.values() {
        for txn in txns.iter().filter(|t| t.is_waiver() && t.is_complete()) {
            if let (Some(rid), Some(bid)) = (txn.claimant(), txn.bid()) {
                if bid != 0 {
                    *ledger.spent.entry(rid).or_insert(0) += bid;
                }
            }
        }

        let mut claims: BTreeMap<&str, Vec<Claim>> = BTreeMap::new();
        for txn in txns.iter().filter(|t| t.is_waiver()) {
            let Some(rid) = txn.claimant() else {
                continue;
            };
            let (Some(adds), Some(bid)) = (&txn.adds, txn.bid()) else {
                continue;
            };
            for player_id in adds.keys() {
                claims.entry(player_id.as_str()).or_default().push(Claim {
                    roster_id: rid,
                    bid,
                    complete: txn.is_complete(),
                });
            }
        }

        for mut bids in claims.into_values() {
            if bids.len() < 2 {
                continue;
            }
            bids.sort_by(|a, b| b.bid.cmp(&a.bid));
            let Some(winner) = bids.iter().find(|c| c.complete) else {
                continue;
            };
            let runner_up = bids
                .iter()
                .find(|c| c.roster_id != winner.roster_id)
                .map_or(0, |c| c.bid);
            let wasted = (winner.bid - runner_up - 1).max(0);
            if winner.roster_id != 0 {
                *ledger.wasted.entry(winner.roster_id).or_insert(0) += wasted;
            }
        }
    }

    ledger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::raw::TransactionSettings;

    fn claim(roster_id: u32, player: &str, bid: i64, status: &str) -> Transaction {
        Transaction {
            kind: "waiver".into(),
            status: status.into(),
            roster_ids: vec![roster_id],
            settings: Some(TransactionSettings {
                waiver_bid: Some(Some(bid)),
            }),
            adds: Some([(player.to_string(), roster_id)].into_iter().collect()),
        }
    }

    fn null_bid(roster_id: u32, player: &str) -> Transaction {
        let mut txn = claim(roster_id, player, 0, "failed");
        txn.settings = Some(TransactionSettings {
            waiver_bid: Some(None),
        });
        txn
    }

    #[test]
    fn spend_counts_completed_waivers_only() {
        let mut txns = BTreeMap::new();
        txns.insert(1, vec![claim(1, "p1", 40, "complete"), claim(2, "p1", 30, "failed")]);
        txns.insert(2, vec![claim(1, "p2", 15, "complete")]);
        let ledger = compute(&txns);
        assert_eq!(ledger.spent(1), 55);
        assert_eq!(ledger.spent(2), 0);
    }

    #[test]
    fn waste_is_overbid_beyond_runner_up() {
        let mut txns = BTreeMap::new();
        txns.insert(
            1,
            vec![
                claim(1, "p1", 40, "complete"),
                claim(2, "p1", 30, "failed"),
                claim(3, "p1", 10, "failed"),
            ],
        );
        let ledger = compute(&txns);
        assert_eq!(ledger.wasted(1), 9);
        assert_eq!(ledger.wasted(2), 0);
    }

    #[test]
    fn uncontested_and_tight_claims_waste_nothing() {
        let mut txns = BTreeMap::new();
        txns.insert(
            1,
            vec![
                claim(1, "solo", 100, "complete"),
                claim(2, "close", 31, "complete"),
                claim(3, "close", 30, "failed"),
            ],
        );
        let ledger = compute(&txns);
        assert_eq!(ledger.wasted(1), 0);
        assert_eq!(ledger.wasted(2), 0);
    }

    #[test]
    fn null_bids_are_not_claims() {
        let mut txns = BTreeMap::new();
        txns.insert(1, vec![claim(1, "p1", 25, "complete"), null_bid(2, "p1")]);
        let ledger = compute(&txns);
        assert_eq!(ledger.spent(1), 25);
        // The null bid leaves the winner uncontested.
        assert_eq!(ledger.wasted(1), 0);
    }

    #[test]
    fn non_waiver_transactions_are_ignored() {
        let mut trade = claim(1, "p1", 500, "complete");
        trade.kind = "free_agent".into();
        let mut txns = BTreeMap::new();
        txns.insert(1, vec![trade]);
        let ledger = compute(&txns);
        assert_eq!(ledger.spent(1), 0);
    }
}
