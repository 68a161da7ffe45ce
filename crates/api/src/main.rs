use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use huddle_core::analysis::{requests, AnalysisRequest, AnalysisService, AnalysisSource};
use huddle_core::cache::{store::JsonFileStore, AnalysisCache};
use huddle_core::dashboard::matchups::{find_pairing, group_matchups, matchup_cards, MatchupCard};
use huddle_core::dashboard::standings::{league_summary, standings, LeagueSummary, StandingRow};
use huddle_core::dashboard::teams::{roster_detail, search_teams, RosterDetail};
use huddle_core::dashboard::find_roster;
use huddle_core::domain::analysis::AnalysisResult;
use huddle_core::domain::week::Week;
use huddle_core::error::RemoteError;
use huddle_core::llm::gemini::GeminiClient;
use huddle_core::sleeper::{client::SleeperClient, SportsDataClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = huddle_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let sleeper: Option<Arc<dyn SportsDataClient>> = match SleeperClient::from_settings(&settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "sleeper client unavailable; starting API in degraded mode");
            None
        }
    };

    let generator = GeminiClient::from_settings(&settings)?;
    let cache = AnalysisCache::new(Arc::new(JsonFileStore::new(settings.analysis_cache_path())));
    let analysis = AnalysisService::new(Arc::new(generator), cache);

    let app = router(AppState { sleeper, analysis });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/league", get(get_league))
        .route("/standings", get(get_standings))
        .route("/matchups/:week", get(get_matchups))
        .route("/teams", get(get_teams))
        .route("/teams/:roster_id", get(get_team))
        .route("/draft", get(get_draft))
        .route("/analysis/league", get(analyze_league))
        .route("/analysis/matchups/:week", get(analyze_week))
        .route("/analysis/matchups/:week/:matchup_id", get(analyze_matchup))
        .route("/analysis/teams/:roster_id", get(analyze_team))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    sleeper: Option<Arc<dyn SportsDataClient>>,
    analysis: AnalysisService,
}

impl AppState {
    fn sleeper(&self) -> Result<&dyn SportsDataClient, StatusCode> {
        self.sleeper
            .as_deref()
            .ok_or(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RefreshQuery {
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Default, Deserialize)]
struct TeamsQuery {
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApiDraft {
    draft: Value,
    picks: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct ApiAnalysis {
    label: String,
    source: AnalysisSource,
    analysis: AnalysisResult,
}

/// Upstream 404 stays a 404; other sports-data failures are a bad gateway.
fn upstream_status(err: anyhow::Error) -> StatusCode {
    match err.downcast_ref::<RemoteError>() {
        Some(remote) if remote.is_not_found() => {
            tracing::info!(error = %err, "sports data not found");
            StatusCode::NOT_FOUND
        }
        Some(_) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "sports data request failed");
            StatusCode::BAD_GATEWAY
        }
        None => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn parse_week(week: u8) -> Result<Week, StatusCode> {
    Week::try_from(week).map_err(|_| StatusCode::BAD_REQUEST)
}

async fn get_league(State(state): State<AppState>) -> Result<Json<LeagueSummary>, StatusCode> {
    let sleeper = state.sleeper()?;
    let (league, users, rosters) =
        tokio::try_join!(sleeper.league(), sleeper.users(), sleeper.rosters())
            .map_err(upstream_status)?;

    Ok(Json(league_summary(&league, &standings(&rosters, &users))))
}

async fn get_standings(State(state): State<AppState>) -> Result<Json<Vec<StandingRow>>, StatusCode> {
    let sleeper = state.sleeper()?;
    let (users, rosters) =
        tokio::try_join!(sleeper.users(), sleeper.rosters()).map_err(upstream_status)?;

    Ok(Json(standings(&rosters, &users)))
}

async fn get_matchups(
    State(state): State<AppState>,
    Path(week): Path<u8>,
) -> Result<Json<Vec<MatchupCard>>, StatusCode> {
    let week = parse_week(week)?;
    let sleeper = state.sleeper()?;
    let (matchups, users, rosters) =
        tokio::try_join!(sleeper.matchups(week), sleeper.users(), sleeper.rosters())
            .map_err(upstream_status)?;

    Ok(Json(matchup_cards(&group_matchups(&matchups), &rosters, &users)))
}

async fn get_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamsQuery>,
) -> Result<Json<Vec<StandingRow>>, StatusCode> {
    let sleeper = state.sleeper()?;
    let (users, rosters) =
        tokio::try_join!(sleeper.users(), sleeper.rosters()).map_err(upstream_status)?;

    let term = query.search.unwrap_or_default();
    Ok(Json(search_teams(&rosters, &users, &term)))
}

async fn get_team(
    State(state): State<AppState>,
    Path(roster_id): Path<u32>,
) -> Result<Json<RosterDetail>, StatusCode> {
    let sleeper = state.sleeper()?;
    let (users, rosters, catalog) =
        tokio::try_join!(sleeper.users(), sleeper.rosters(), sleeper.players())
            .map_err(upstream_status)?;

    let roster = find_roster(&rosters, roster_id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(roster_detail(roster, &users, &catalog)))
}

async fn get_draft(State(state): State<AppState>) -> Result<Json<ApiDraft>, StatusCode> {
    let sleeper = state.sleeper()?;
    let (draft, picks) =
        tokio::try_join!(sleeper.draft(), sleeper.draft_picks()).map_err(upstream_status)?;

    Ok(Json(ApiDraft { draft, picks }))
}

async fn run_analysis(state: &AppState, request: AnalysisRequest) -> Json<ApiAnalysis> {
    let (analysis, source) = state
        .analysis
        .resolve(&request.label, &request.payload, request.force_refresh)
        .await;

    Json(ApiAnalysis {
        label: request.label,
        source,
        analysis,
    })
}

async fn analyze_league(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<ApiAnalysis>, StatusCode> {
    let sleeper = state.sleeper()?;
    let (league, users, rosters) =
        tokio::try_join!(sleeper.league(), sleeper.users(), sleeper.rosters())
            .map_err(upstream_status)?;

    let request = requests::league_overview(&league, &users, &rosters).refresh(query.refresh);
    Ok(run_analysis(&state, request).await)
}

async fn analyze_week(
    State(state): State<AppState>,
    Path(week): Path<u8>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<ApiAnalysis>, StatusCode> {
    let week = parse_week(week)?;
    let sleeper = state.sleeper()?;
    let (matchups, users, rosters) =
        tokio::try_join!(sleeper.matchups(week), sleeper.users(), sleeper.rosters())
            .map_err(upstream_status)?;

    let request = requests::week_matchups(week, &matchups, &users, &rosters).refresh(query.refresh);
    Ok(run_analysis(&state, request).await)
}

async fn analyze_matchup(
    State(state): State<AppState>,
    Path((week, matchup_id)): Path<(u8, u32)>,
) -> Result<Json<ApiAnalysis>, StatusCode> {
    let week = parse_week(week)?;
    let sleeper = state.sleeper()?;
    let (matchups, users, rosters, catalog) = tokio::try_join!(
        sleeper.matchups(week),
        sleeper.users(),
        sleeper.rosters(),
        sleeper.players()
    )
    .map_err(upstream_status)?;

    let pairings = group_matchups(&matchups);
    let pairing = find_pairing(&pairings, matchup_id).ok_or(StatusCode::NOT_FOUND)?;
    let request = requests::matchup_detail(week, pairing, &rosters, &users, &catalog)
        .map_err(|e| {
            tracing::warn!(%week, matchup_id, error = %e, "matchup cannot be analyzed");
            StatusCode::UNPROCESSABLE_ENTITY
        })?;

    Ok(run_analysis(&state, request).await)
}

async fn analyze_team(
    State(state): State<AppState>,
    Path(roster_id): Path<u32>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<ApiAnalysis>, StatusCode> {
    let sleeper = state.sleeper()?;
    let (users, rosters, catalog) =
        tokio::try_join!(sleeper.users(), sleeper.rosters(), sleeper.players())
            .map_err(upstream_status)?;

    let roster = find_roster(&rosters, roster_id).ok_or(StatusCode::NOT_FOUND)?;
    let request = requests::team(roster, &users, &catalog).refresh(query.refresh);
    Ok(run_analysis(&state, request).await)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &huddle_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use huddle_core::cache::store::MemoryStore;
    use huddle_core::domain::sleeper::{League, Matchup, PlayerCatalog, Roster, User};
    use huddle_core::error::Service;
    use huddle_core::llm::{Provider, TextGenerator};
    use serde_json::json;
    use tower::ServiceExt;

    struct FakeSleeper {
        missing_league: bool,
    }

    fn not_found() -> anyhow::Error {
        RemoteError {
            service: Service::Sleeper,
            stage: "http",
            status: Some(404),
            detail: "status=404".to_string(),
            body: None,
        }
        .into()
    }

    #[async_trait::async_trait]
    impl SportsDataClient for FakeSleeper {
        async fn league(&self) -> anyhow::Result<League> {
            if self.missing_league {
                return Err(not_found());
            }
            Ok(serde_json::from_value(json!({
                "league_id": "L1",
                "name": "Sunday Scaries",
                "season": "2025",
                "total_rosters": 2,
                "status": "in_season"
            }))?)
        }

        async fn users(&self) -> anyhow::Result<Vec<User>> {
            Ok(serde_json::from_value(json!([
                {"user_id": "u1", "username": "tahamo", "display_name": "Taha"},
                {"user_id": "u2", "username": "arsh", "display_name": ""}
            ]))?)
        }

        async fn rosters(&self) -> anyhow::Result<Vec<Roster>> {
            Ok(serde_json::from_value(json!([
                {"roster_id": 1, "owner_id": "u1", "players": ["p1"], "starters": ["p1"],
                 "starters_points": [40.0], "players_points": {"p1": 40.0}},
                {"roster_id": 2, "owner_id": "u2", "players": ["p2"], "starters": ["p2"],
                 "starters_points": [55.5]}
            ]))?)
        }

        async fn matchups(&self, _week: Week) -> anyhow::Result<Vec<Matchup>> {
            Ok(serde_json::from_value(json!([
                {"matchup_id": 1, "roster_id": 1, "points": 101.2},
                {"matchup_id": 1, "roster_id": 2, "points": 88.0},
                {"matchup_id": null, "roster_id": 3, "points": 0.0}
            ]))?)
        }

        async fn players(&self) -> anyhow::Result<PlayerCatalog> {
            Ok(serde_json::from_value(json!({
                "p1": {"player_id": "p1", "first_name": "Josh", "last_name": "Allen", "position": "QB"}
            }))?)
        }

        async fn draft(&self) -> anyhow::Result<Value> {
            Ok(json!({"draft_id": "D1", "status": "complete"}))
        }

        async fn draft_picks(&self) -> anyhow::Result<Vec<Value>> {
            Ok(vec![json!({"round": 1, "pick_no": 1, "player_id": "p1"})])
        }
    }

    struct DownGenerator;

    #[async_trait::async_trait]
    impl TextGenerator for DownGenerator {
        fn provider(&self) -> Provider {
            Provider::GoogleAi
        }

        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("model offline")
        }
    }

    fn app_with(sleeper: Option<Arc<dyn SportsDataClient>>) -> Router {
        let cache = AnalysisCache::new(Arc::new(MemoryStore::new()));
        router(AppState {
            sleeper,
            analysis: AnalysisService::new(Arc::new(DownGenerator), cache),
        })
    }

    fn app() -> Router {
        app_with(Some(Arc::new(FakeSleeper {
            missing_league: false,
        })))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn league_summary_names_leader() {
        let (status, body) = get_json(app(), "/league").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["leader"], "arsh");
        assert_eq!(body["teams"], 2);
    }

    #[tokio::test]
    async fn standings_are_ranked() {
        let (status, body) = get_json(app(), "/standings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["roster_id"], 2);
        assert_eq!(body[1]["team_name"], "Taha");
    }

    #[tokio::test]
    async fn matchups_skip_byes_and_validate_week() {
        let (status, body) = get_json(app(), "/matchups/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["sides"][0]["team_name"], "Taha");

        let (status, _) = get_json(app(), "/matchups/19").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn team_search_and_detail() {
        let (_, body) = get_json(app(), "/teams?search=TAH").await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = get_json(app(), "/teams/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["starters"][0]["name"], "Josh Allen");

        let (status, _) = get_json(app(), "/teams/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn draft_includes_picks() {
        let (status, body) = get_json(app(), "/draft").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["picks"][0]["pick_no"], 1);
    }

    #[tokio::test]
    async fn upstream_not_found_maps_to_404() {
        let app = app_with(Some(Arc::new(FakeSleeper {
            missing_league: true,
        })));
        let (status, _) = get_json(app, "/league").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_sports_client_is_unavailable() {
        let (status, _) = get_json(app_with(None), "/standings").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn analysis_falls_back_when_model_is_down() {
        let (status, body) = get_json(app(), "/analysis/matchups/2/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "fallback");
        assert_eq!(body["label"], "Detailed Matchup Analysis: Taha vs arsh");
        assert_eq!(body["analysis"]["confidence"], 6);

        let (status, body) = get_json(app(), "/analysis/teams/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["confidence"], 7);

        let (status, _) = get_json(app(), "/analysis/matchups/2/9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn league_analysis_is_cached_between_requests() {
        let app = app();
        let (_, first) = get_json(app.clone(), "/analysis/league").await;
        let (_, second) = get_json(app.clone(), "/analysis/league").await;
        let (_, forced) = get_json(app, "/analysis/league?refresh=true").await;

        assert_eq!(first["source"], "fallback");
        assert_eq!(second["source"], "cache");
        assert_eq!(forced["source"], "fallback");
        assert_eq!(first["analysis"], second["analysis"]);
    }
}
