use crate::config::Settings;
use crate::domain::sleeper::{League, Matchup, PlayerCatalog, Roster, User};
use crate::domain::week::Week;
use crate::error::{RemoteError, Service};
use crate::sleeper::SportsDataClient;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.sleeper.app/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
    league_id: String,
    draft_id: Option<String>,
}

impl SleeperClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let league_id = settings.require_league_id()?.to_string();
        let draft_id = settings.sleeper_draft_id.clone();

        let base_url =
            std::env::var("SLEEPER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = std::env::var("SLEEPER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build sleeper http client")?;

        Ok(Self {
            http,
            base_url,
            league_id,
            draft_id,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn league_id(&self) -> &str {
        &self.league_id
    }

    fn url(&self, path: &str) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn draft_id(&self) -> Result<&str> {
        self.draft_id
            .as_deref()
            .context("SLEEPER_DRAFT_ID is required for draft reads")
    }

    /// Single GET; any transport failure or non-2xx status becomes a `RemoteError`.
    pub async fn fetch_resource<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);

        let res = self.http.get(&url).send().await.map_err(|err| RemoteError {
            service: Service::Sleeper,
            stage: "request",
            status: None,
            detail: format!("GET {path} failed: {err}"),
            body: None,
        })?;

        let status = res.status();
        let text = res.text().await.map_err(|err| RemoteError {
            service: Service::Sleeper,
            stage: "body",
            status: Some(status.as_u16()),
            detail: format!("failed to read response for {path}: {err}"),
            body: None,
        })?;

        if !status.is_success() {
            return Err(RemoteError {
                service: Service::Sleeper,
                stage: "http",
                status: Some(status.as_u16()),
                detail: format!("GET {path} returned {status}"),
                body: Some(text),
            }
            .into());
        }

        let parsed = serde_json::from_str::<T>(&text).map_err(|err| RemoteError {
            service: Service::Sleeper,
            stage: "decode",
            status: Some(status.as_u16()),
            detail: format!("unexpected response shape for {path}: {err}"),
            body: Some(text),
        })?;
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl SportsDataClient for SleeperClient {
    async fn league(&self) -> Result<League> {
        self.fetch_resource(&format!("/league/{}", self.league_id))
            .await
    }

    async fn users(&self) -> Result<Vec<User>> {
        self.fetch_resource(&format!("/league/{}/users", self.league_id))
            .await
    }

    async fn rosters(&self) -> Result<Vec<Roster>> {
        self.fetch_resource(&format!("/league/{}/rosters", self.league_id))
            .await
    }

    async fn matchups(&self, week: Week) -> Result<Vec<Matchup>> {
        // Sleeper answers `null` for weeks that have not been scheduled yet.
        let matchups: Option<Vec<Matchup>> = self
            .fetch_resource(&format!("/league/{}/matchups/{week}", self.league_id))
            .await?;
        Ok(matchups.unwrap_or_default())
    }

    async fn players(&self) -> Result<PlayerCatalog> {
        self.fetch_resource("/players/nfl").await
    }

    async fn draft(&self) -> Result<Value> {
        let draft_id = self.draft_id()?;
        self.fetch_resource(&format!("/draft/{draft_id}")).await
    }

    async fn draft_picks(&self) -> Result<Vec<Value>> {
        let draft_id = self.draft_id()?;
        self.fetch_resource(&format!("/draft/{draft_id}/picks"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> SleeperClient {
        let settings = Settings {
            sleeper_league_id: Some("L1".to_string()),
            sleeper_draft_id: Some("D1".to_string()),
            ..Default::default()
        };
        SleeperClient::from_settings(&settings)
            .unwrap()
            .with_base_url(base_url)
    }

    #[test]
    fn requires_league_id() {
        assert!(SleeperClient::from_settings(&Settings::default()).is_err());
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let c = client("https://example.test/v1/");
        assert_eq!(c.url("/league/L1"), "https://example.test/v1/league/L1");
        assert_eq!(c.url("players/nfl"), "https://example.test/v1/players/nfl");
    }

    #[tokio::test]
    async fn fetches_rosters_for_configured_league() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/league/L1/rosters")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"roster_id":1,"owner_id":"u1","players":["p1"],"starters":["p1"],"reserve":null,"starters_points":[12.5]}]"#,
            )
            .create_async()
            .await;

        let rosters = client(&server.url()).rosters().await.unwrap();
        mock.assert_async().await;
        assert_eq!(rosters.len(), 1);
        assert_eq!(rosters[0].owner_id.as_deref(), Some("u1"));
        assert_eq!(rosters[0].total_points(), 12.5);
    }

    #[tokio::test]
    async fn unscheduled_week_yields_no_matchups() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/league/L1/matchups/18")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let week = Week::new(18).unwrap();
        let matchups = client(&server.url()).matchups(week).await.unwrap();
        assert!(matchups.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_a_remote_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/league/L1")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let err = client(&server.url()).league().await.unwrap_err();
        let remote = err.downcast_ref::<RemoteError>().unwrap();
        assert_eq!(remote.service, Service::Sleeper);
        assert_eq!(remote.status, Some(404));
        assert!(remote.is_not_found());
        assert_eq!(remote.body.as_deref(), Some("not found"));
    }

    #[tokio::test]
    async fn unexpected_shape_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/league/L1/users")
            .with_status(200)
            .with_body(r#"{"oops":true}"#)
            .create_async()
            .await;

        let err = client(&server.url()).users().await.unwrap_err();
        let remote = err.downcast_ref::<RemoteError>().unwrap();
        assert_eq!(remote.stage, "decode");
    }

    #[tokio::test]
    async fn draft_reads_use_configured_draft() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/draft/D1/picks")
            .with_status(200)
            .with_body(r#"[{"pick_no":1,"player_id":"4034"}]"#)
            .create_async()
            .await;

        let picks = client(&server.url()).draft_picks().await.unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0]["player_id"], "4034");
    }
}
