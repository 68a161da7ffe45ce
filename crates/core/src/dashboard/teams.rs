use crate::dashboard::standings::{standings, StandingRow};
use crate::dashboard::team_name;
use crate::domain::sleeper::{PlayerCatalog, Roster, User};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerLine {
    pub player_id: String,
    pub name: String,
    pub position: Option<String>,
    pub team: Option<String>,
    pub points: f64,
    pub injury_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterDetail {
    pub roster_id: u32,
    pub team_name: String,
    pub points: f64,
    pub total_players: usize,
    pub starters: Vec<PlayerLine>,
    pub bench: Vec<PlayerLine>,
}

/// Case-insensitive substring match on team name, ranked by points.
pub fn search_teams(rosters: &[Roster], users: &[User], term: &str) -> Vec<StandingRow> {
    let needle = term.trim().to_lowercase();
    let mut rows: Vec<StandingRow> = standings(rosters, users)
        .into_iter()
        .filter(|row| row.team_name.to_lowercase().contains(&needle))
        .collect();
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

/// Player ids missing from the catalogue are skipped.
pub fn player_lines(ids: &[String], roster: &Roster, catalog: &PlayerCatalog) -> Vec<PlayerLine> {
    ids.iter()
        .filter_map(|id| {
            let player = catalog.get(id)?;
            Some(PlayerLine {
                player_id: id.clone(),
                name: player.full_name(),
                position: player.position.clone(),
                team: player.team.clone(),
                points: roster.player_points(id),
                injury_status: player.injury_status.clone(),
            })
        })
        .collect()
}

pub fn roster_detail(roster: &Roster, users: &[User], catalog: &PlayerCatalog) -> RosterDetail {
    RosterDetail {
        roster_id: roster.roster_id,
        team_name: team_name(roster, users),
        points: roster.total_points(),
        total_players: roster.players.len(),
        starters: player_lines(&roster.starters, roster, catalog),
        bench: player_lines(&roster.reserve, roster, catalog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fixtures::*;

    #[test]
    fn search_is_case_insensitive_and_reranks() {
        let users = vec![
            user("u1", "aryangaur", "Aryan"),
            user("u2", "tahamo", "Taha"),
            user("u3", "arsh", "Arsh"),
        ];
        let rosters = vec![
            roster(1, Some("u1"), &[50.0]),
            roster(2, Some("u2"), &[70.0]),
            roster(3, Some("u3"), &[10.0]),
        ];

        let rows = search_teams(&rosters, &users, "AR");
        let names: Vec<_> = rows.iter().map(|r| (r.rank, r.team_name.as_str())).collect();
        assert_eq!(names, vec![(1, "Aryan"), (2, "Arsh")]);

        assert_eq!(search_teams(&rosters, &users, "").len(), 3);
    }

    #[test]
    fn detail_resolves_known_players_with_points() {
        let r = roster(5, None, &[12.5, 3.0]);
        let detail = roster_detail(&r, &[], &catalog());

        assert_eq!(detail.team_name, "Team 5");
        assert_eq!(detail.points, 15.5);
        assert_eq!(detail.total_players, 4);
        assert_eq!(detail.starters.len(), 2);
        assert_eq!(detail.starters[0].name, "Josh Allen");
        assert_eq!(detail.starters[0].points, 12.5);
        assert_eq!(detail.starters[1].points, 0.0);
        // p9 is not in the catalogue.
        assert_eq!(detail.bench.len(), 1);
        assert_eq!(detail.bench[0].position.as_deref(), Some("WR"));
    }
}
