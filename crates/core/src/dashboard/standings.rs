use crate::dashboard::team_name;
use crate::domain::sleeper::{League, Roster, User};
use serde::Serialize;

const NO_LEADER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub rank: usize,
    pub roster_id: u32,
    pub team_name: String,
    pub points: f64,
    pub players: usize,
    pub starters: usize,
    pub bench: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueSummary {
    pub league_id: String,
    pub name: String,
    pub season: String,
    pub status: String,
    pub teams: u32,
    pub leader: String,
}

/// Rosters ranked by starter points, highest first. Ties keep upstream order.
pub fn standings(rosters: &[Roster], users: &[User]) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = rosters
        .iter()
        .map(|roster| StandingRow {
            rank: 0,
            roster_id: roster.roster_id,
            team_name: team_name(roster, users),
            points: roster.total_points(),
            players: roster.players.len(),
            starters: roster.starters.len(),
            bench: roster.reserve.len(),
        })
        .collect();

    rows.sort_by(|a, b| b.points.total_cmp(&a.points));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

pub fn league_summary(league: &League, standings: &[StandingRow]) -> LeagueSummary {
    LeagueSummary {
        league_id: league.league_id.clone(),
        name: league.name.clone(),
        season: league.season.clone(),
        status: league.status.clone(),
        teams: league.total_rosters,
        leader: standings
            .first()
            .map(|row| row.team_name.clone())
            .unwrap_or_else(|| NO_LEADER.to_string()),
    }
}
