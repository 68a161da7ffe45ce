pub mod client;

use crate::domain::sleeper::{League, Matchup, PlayerCatalog, Roster, User};
use crate::domain::week::Week;
use serde_json::Value;

/// Read-only access to the sports-data API. Errors carry a `RemoteError` and have no
/// fallback content; callers surface them.
#[async_trait::async_trait]
pub trait SportsDataClient: Send + Sync {
    async fn league(&self) -> anyhow::Result<League>;

    async fn users(&self) -> anyhow::Result<Vec<User>>;

    async fn rosters(&self) -> anyhow::Result<Vec<Roster>>;

    async fn matchups(&self, week: Week) -> anyhow::Result<Vec<Matchup>>;

    async fn players(&self) -> anyhow::Result<PlayerCatalog>;

    async fn draft(&self) -> anyhow::Result<Value>;

    async fn draft_picks(&self) -> anyhow::Result<Vec<Value>>;
}
