use crate::dashboard::{find_roster, team_name};
use crate::domain::sleeper::{Matchup, Roster, User};
use serde::Serialize;

/// Entries of one week sharing a `matchup_id`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupPairing {
    pub matchup_id: u32,
    pub teams: Vec<Matchup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupSide {
    pub roster_id: u32,
    pub team_name: String,
    pub week_points: f64,
    pub season_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupCard {
    pub matchup_id: u32,
    pub sides: Vec<MatchupSide>,
}

/// Groups in order of first appearance. Entries without a matchup id (byes) are skipped.
pub fn group_matchups(matchups: &[Matchup]) -> Vec<MatchupPairing> {
    let mut out: Vec<MatchupPairing> = Vec::new();
    for m in matchups {
        let Some(matchup_id) = m.matchup_id else {
            continue;
        };
        match out.iter_mut().find(|p| p.matchup_id == matchup_id) {
            Some(pairing) => pairing.teams.push(m.clone()),
            None => out.push(MatchupPairing {
                matchup_id,
                teams: vec![m.clone()],
            }),
        }
    }
    out
}

pub fn find_pairing(pairings: &[MatchupPairing], matchup_id: u32) -> Option<&MatchupPairing> {
    pairings.iter().find(|p| p.matchup_id == matchup_id)
}

pub fn side_name(roster_id: u32, rosters: &[Roster], users: &[User]) -> String {
    find_roster(rosters, roster_id)
        .map(|r| team_name(r, users))
        .unwrap_or_else(|| format!("Team {roster_id}"))
}

pub fn matchup_cards(pairings: &[MatchupPairing], rosters: &[Roster], users: &[User]) -> Vec<MatchupCard> {
    pairings
        .iter()
        .map(|pairing| MatchupCard {
            matchup_id: pairing.matchup_id,
            sides: pairing
                .teams
                .iter()
                .map(|m| MatchupSide {
                    roster_id: m.roster_id,
                    team_name: side_name(m.roster_id, rosters, users),
                    week_points: m.points,
                    season_points: find_roster(rosters, m.roster_id)
                        .map(Roster::total_points)
                        .unwrap_or(0.0),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fixtures::*;

    #[test]
    fn groups_pairs_in_first_appearance_order() {
        let matchups = vec![
            matchup(Some(2), 3, 90.0),
            matchup(Some(1), 1, 100.0),
            matchup(None, 9, 50.0),
            matchup(Some(2), 4, 80.0),
            matchup(Some(1), 2, 110.0),
        ];

        let pairings = group_matchups(&matchups);
        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings[0].matchup_id, 2);
        let ids: Vec<_> = pairings[0].teams.iter().map(|m| m.roster_id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(pairings[1].teams.len(), 2);
        assert!(find_pairing(&pairings, 1).is_some());
        assert!(find_pairing(&pairings, 7).is_none());
    }

    #[test]
    fn cards_resolve_names_and_points() {
        let users = vec![user("u1", "tahamo", "Taha")];
        let rosters = vec![roster(1, Some("u1"), &[20.0, 5.5])];
        let pairings = group_matchups(&[matchup(Some(1), 1, 101.5), matchup(Some(1), 2, 99.0)]);

        let cards = matchup_cards(&pairings, &rosters, &users);
        assert_eq!(cards.len(), 1);
        assert_eq!(
            cards[0].sides,
            vec![
                MatchupSide {
                    roster_id: 1,
                    team_name: "Taha".to_string(),
                    week_points: 101.5,
                    season_points: 25.5,
                },
                MatchupSide {
                    roster_id: 2,
                    team_name: "Team 2".to_string(),
                    week_points: 99.0,
                    season_points: 0.0,
                },
            ]
        );
    }
}
