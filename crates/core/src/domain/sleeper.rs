use crate::domain::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub season: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_rosters: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sport: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub season_type: String,
    #[serde(default)]
    pub draft_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reserve: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub taxi: Vec<String>,
    /// Parallel to the lineup-slot order of `starters`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters_points: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players_points: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: RosterMetadata,
}

impl Roster {
    pub fn total_points(&self) -> f64 {
        self.starters_points.iter().flatten().sum()
    }

    pub fn player_points(&self, player_id: &str) -> f64 {
        self.players_points.get(player_id).copied().unwrap_or(0.0)
    }
}

/// One side of a head-to-head pairing for a single week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    /// Absent for bye weeks.
    #[serde(default)]
    pub matchup_id: Option<u32>,
    pub roster_id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters_points: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players_points: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fantasy_positions: Vec<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub injury_notes: Option<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Player catalogue keyed by player id.
pub type PlayerCatalog = BTreeMap<String, Player>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roster_tolerates_null_collections() {
        let v = json!({
            "roster_id": 4,
            "owner_id": "u4",
            "players": null,
            "starters": ["p1", "p2"],
            "reserve": null,
            "starters_points": [10.5, null, 4.0],
            "players_points": null,
            "metadata": null
        });

        let roster: Roster = serde_json::from_value(v).unwrap();
        assert!(roster.players.is_empty());
        assert!(roster.reserve.is_empty());
        assert!(roster.taxi.is_empty());
        assert_eq!(roster.total_points(), 14.5);
        assert_eq!(roster.player_points("p1"), 0.0);
        assert!(roster.metadata.team_name.is_none());
    }

    #[test]
    fn matchup_without_id_is_a_bye() {
        let v = json!({
            "matchup_id": null,
            "roster_id": 9,
            "points": 88.2
        });

        let m: Matchup = serde_json::from_value(v).unwrap();
        assert_eq!(m.matchup_id, None);
        assert_eq!(m.points, 88.2);
        assert!(m.starters.is_empty());
    }

    #[test]
    fn player_parses_catalogue_entry() {
        let v = json!({
            "4034": {
                "player_id": "4034",
                "first_name": "Christian",
                "last_name": "McCaffrey",
                "position": "RB",
                "team": "SF",
                "fantasy_positions": ["RB"],
                "injury_status": null,
                "search_rank": 1
            }
        });

        let catalog: PlayerCatalog = serde_json::from_value(v).unwrap();
        let player = &catalog["4034"];
        assert_eq!(player.full_name(), "Christian McCaffrey");
        assert_eq!(player.position.as_deref(), Some("RB"));
        assert!(player.injury_status.is_none());
    }
}
