//! Aggregations behind the standings, matchup and roster views: joins, sums and sorts over
//! records the sports-data API already supplies.

pub mod matchups;
pub mod standings;
pub mod teams;

use crate::domain::sleeper::{Roster, User};

/// Owner display name, then username, then `Team {roster_id}`.
pub fn team_name(roster: &Roster, users: &[User]) -> String {
    let owner = roster
        .owner_id
        .as_deref()
        .and_then(|owner_id| users.iter().find(|u| u.user_id == owner_id));

    owner
        .and_then(|u| {
            [u.display_name.as_str(), u.username.as_str()]
                .into_iter()
                .find(|name| !name.trim().is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("Team {}", roster.roster_id))
}

pub fn find_roster(rosters: &[Roster], roster_id: u32) -> Option<&Roster> {
    rosters.iter().find(|r| r.roster_id == roster_id)
}

pub fn find_owner<'a>(roster: &Roster, users: &'a [User]) -> Option<&'a User> {
    let owner_id = roster.owner_id.as_deref()?;
    users.iter().find(|u| u.user_id == owner_id)
}
