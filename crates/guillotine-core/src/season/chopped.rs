// Players who were on a roster the week it was chopped.

use std::collections::HashMap;

use crate::model::SeasonData;

use super::raw::{player_name, PlayerDirectory, RawSeason};

#[derive(Debug, Clone, PartialEq)]
pub struct ChopEvent {
    pub week: u32,
    pub manager: String,
    pub was_starter: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoppedPlayer {
    pub player_id: String,
    pub player_name: String,
    pub events: Vec<ChopEvent>,
}

impl ChoppedPlayer {
    pub fn times_chopped(&self) -> usize {
        self.events.len()
    }
}

/// Every player on a chopped roster's final matchup, most chops first. Ties
/// keep the order the players were first chopped in.
pub fn chopped_players(
    raw: &RawSeason,
    season: &SeasonData,
    players: &PlayerDirectory,
) -> Vec<ChoppedPlayer> {
    let mut out: Vec<ChoppedPlayer> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for week in 1..=season.current_week {
        let Some(chopped) = season.managers.iter().find(|m| m.chop_week == Some(week)) else {
            continue;
        };
        let Some(roster_id) = chopped.roster_id else {
            continue;
        };
        let Some(matchup) = raw
            .matchups
            .get(&week)
            .and_then(|ms| ms.iter().find(|m| m.roster_id == roster_id))
        else {
            continue;
        };
        let starters = matchup.starters.as_deref().unwrap_or_default();
        for player_id in matchup.players.iter().flatten() {
            let slot = *index.entry(player_id.clone()).or_insert_with(|| {
                out.push(ChoppedPlayer {
                    player_id: player_id.clone(),
                    player_name: player_name(players, player_id),
                    events: Vec::new(),
                });
                out.len() - 1
            });
            out[slot].events.push(ChopEvent {
                week,
                manager: chopped.user_name.clone(),
                was_starter: starters.contains(player_id),
            });
        }
    }

    out.sort_by(|a, b| b.times_chopped().cmp(&a.times_chopped()));
    out
}
