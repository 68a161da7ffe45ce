use crate::dashboard::matchups::{side_name, MatchupPairing};
use crate::dashboard::teams::player_lines;
use crate::dashboard::{find_owner, find_roster, team_name};
use crate::domain::sleeper::{League, Matchup, PlayerCatalog, Roster, User};
use crate::domain::week::Week;
use anyhow::bail;
use serde_json::{json, Value};

/// A labelled payload ready for `AnalysisService::analyze`. The label picks the analysis kind
/// and the cache key.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub label: String,
    pub payload: Value,
    pub force_refresh: bool,
}

impl AnalysisRequest {
    pub fn new(label: impl Into<String>, payload: Value) -> Self {
        Self {
            label: label.into(),
            payload,
            force_refresh: false,
        }
    }

    /// Ors the flag in; requests that always refresh stay that way.
    pub fn refresh(mut self, force: bool) -> Self {
        self.force_refresh |= force;
        self
    }
}

pub fn league_overview(league: &League, users: &[User], rosters: &[Roster]) -> AnalysisRequest {
    AnalysisRequest::new(
        "League Overview and Standings Analysis",
        json!({ "league": league, "users": users, "rosters": rosters }),
    )
}

pub fn week_matchups(
    week: Week,
    matchups: &[Matchup],
    users: &[User],
    rosters: &[Roster],
) -> AnalysisRequest {
    AnalysisRequest::new(
        format!("Week {week} Matchup Analysis"),
        json!({
            "matchups": matchups,
            "users": users,
            "rosters": rosters,
            "week": week,
        }),
    )
}

/// Head-to-head payload for one pairing. Always bypasses the cache.
pub fn matchup_detail(
    week: Week,
    pairing: &MatchupPairing,
    rosters: &[Roster],
    users: &[User],
    catalog: &PlayerCatalog,
) -> anyhow::Result<AnalysisRequest> {
    let [first, second] = pairing.teams.as_slice() else {
        bail!(
            "matchup {} has {} teams; expected 2",
            pairing.matchup_id,
            pairing.teams.len()
        );
    };

    let side = |m: &Matchup| {
        let roster = find_roster(rosters, m.roster_id);
        json!({
            "roster": roster,
            "players": roster.map(|r| player_lines(&r.starters, r, catalog)).unwrap_or_default(),
            "points": roster.map(Roster::total_points).unwrap_or(0.0),
            "name": side_name(m.roster_id, rosters, users),
        })
    };
    let team1 = side(first);
    let team2 = side(second);

    let label = format!(
        "Detailed Matchup Analysis: {} vs {}",
        team1["name"].as_str().unwrap_or_default(),
        team2["name"].as_str().unwrap_or_default()
    );

    Ok(AnalysisRequest::new(
        label,
        json!({ "team1": team1, "team2": team2, "week": week }),
    )
    .refresh(true))
}

pub fn team(roster: &Roster, users: &[User], catalog: &PlayerCatalog) -> AnalysisRequest {
    let name = team_name(roster, users);
    let players: Vec<_> = roster
        .players
        .iter()
        .filter_map(|id| catalog.get(id))
        .collect();

    AnalysisRequest::new(
        format!("Team Analysis for {name}"),
        json!({
            "name": name,
            "roster": roster,
            "user": find_owner(roster, users),
            "players": players,
        }),
    )
}
