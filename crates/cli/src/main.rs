use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use huddle_core::analysis::{requests, AnalysisRequest, AnalysisService};
use huddle_core::cache::{store::JsonFileStore, AnalysisCache};
use huddle_core::dashboard::matchups::{find_pairing, group_matchups, matchup_cards};
use huddle_core::dashboard::standings::{league_summary, standings};
use huddle_core::dashboard::teams::{roster_detail, search_teams};
use huddle_core::dashboard::find_roster;
use huddle_core::domain::week::Week;
use huddle_core::llm::gemini::GeminiClient;
use huddle_core::sleeper::{client::SleeperClient, SportsDataClient};

#[derive(Debug, Parser)]
#[command(name = "huddle")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// League settings and current leader.
    League,
    /// Teams ranked by starter points.
    Standings,
    /// Head-to-head pairings for a week.
    Matchups {
        #[arg(long, value_parser = parse_week)]
        week: Week,
    },
    /// Search teams by name, or show one roster in detail.
    Team {
        #[arg(long, conflicts_with = "search")]
        roster_id: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Run an AI analysis. Falls back to canned content when the model is unavailable.
    Analyze {
        #[command(subcommand)]
        target: AnalyzeTarget,
        /// Ignore any cached result.
        #[arg(long, global = true)]
        refresh: bool,
    },
}

#[derive(Debug, Subcommand)]
enum AnalyzeTarget {
    League,
    Matchups {
        #[arg(long, value_parser = parse_week)]
        week: Week,
    },
    Matchup {
        #[arg(long, value_parser = parse_week)]
        week: Week,
        #[arg(long)]
        matchup_id: u32,
    },
    Team {
        #[arg(long)]
        roster_id: u32,
    },
}

fn parse_week(raw: &str) -> Result<Week, String> {
    let n: u8 = raw.parse().map_err(|e| format!("invalid week: {e}"))?;
    Week::new(n).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = huddle_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let sleeper = SleeperClient::from_settings(&settings)?;
    let result = run(&settings, &sleeper, args.command).await;
    if let Err(e) = &result {
        sentry_anyhow::capture_anyhow(e);
        tracing::error!(error = %e, "command failed");
    }
    result
}

async fn run(
    settings: &huddle_core::config::Settings,
    sleeper: &dyn SportsDataClient,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::League => {
            let (league, users, rosters) =
                tokio::try_join!(sleeper.league(), sleeper.users(), sleeper.rosters())?;
            print_json(&league_summary(&league, &standings(&rosters, &users)))
        }
        Command::Standings => {
            let (users, rosters) = tokio::try_join!(sleeper.users(), sleeper.rosters())?;
            print_json(&standings(&rosters, &users))
        }
        Command::Matchups { week } => {
            let (matchups, users, rosters) =
                tokio::try_join!(sleeper.matchups(week), sleeper.users(), sleeper.rosters())?;
            print_json(&matchup_cards(&group_matchups(&matchups), &rosters, &users))
        }
        Command::Team {
            roster_id: Some(roster_id),
            ..
        } => {
            let (users, rosters, catalog) =
                tokio::try_join!(sleeper.users(), sleeper.rosters(), sleeper.players())?;
            let roster = find_roster(&rosters, roster_id)
                .with_context(|| format!("roster {roster_id} not found"))?;
            print_json(&roster_detail(roster, &users, &catalog))
        }
        Command::Team { search, .. } => {
            let (users, rosters) = tokio::try_join!(sleeper.users(), sleeper.rosters())?;
            print_json(&search_teams(&rosters, &users, search.as_deref().unwrap_or_default()))
        }
        Command::Analyze { target, refresh } => {
            let request = build_request(sleeper, target).await?.refresh(refresh);
            let service = analysis_service(settings)?;
            let (result, source) = service
                .resolve(&request.label, &request.payload, request.force_refresh)
                .await;
            tracing::info!(label = %request.label, source = ?source, "analysis ready");
            print_json(&result)
        }
    }
}

async fn build_request(
    sleeper: &dyn SportsDataClient,
    target: AnalyzeTarget,
) -> anyhow::Result<AnalysisRequest> {
    match target {
        AnalyzeTarget::League => {
            let (league, users, rosters) =
                tokio::try_join!(sleeper.league(), sleeper.users(), sleeper.rosters())?;
            Ok(requests::league_overview(&league, &users, &rosters))
        }
        AnalyzeTarget::Matchups { week } => {
            let (matchups, users, rosters) =
                tokio::try_join!(sleeper.matchups(week), sleeper.users(), sleeper.rosters())?;
            Ok(requests::week_matchups(week, &matchups, &users, &rosters))
        }
        AnalyzeTarget::Matchup { week, matchup_id } => {
            let (matchups, users, rosters, catalog) = tokio::try_join!(
                sleeper.matchups(week),
                sleeper.users(),
                sleeper.rosters(),
                sleeper.players()
            )?;
            let pairings = group_matchups(&matchups);
            let pairing = find_pairing(&pairings, matchup_id)
                .with_context(|| format!("matchup {matchup_id} not found in week {week}"))?;
            requests::matchup_detail(week, pairing, &rosters, &users, &catalog)
        }
        AnalyzeTarget::Team { roster_id } => {
            let (users, rosters, catalog) =
                tokio::try_join!(sleeper.users(), sleeper.rosters(), sleeper.players())?;
            let roster = find_roster(&rosters, roster_id)
                .with_context(|| format!("roster {roster_id} not found"))?;
            Ok(requests::team(roster, &users, &catalog))
        }
    }
}

fn analysis_service(settings: &huddle_core::config::Settings) -> anyhow::Result<AnalysisService> {
    let generator = GeminiClient::from_settings(settings)?;
    let store = JsonFileStore::new(settings.analysis_cache_path());
    Ok(AnalysisService::new(
        Arc::new(generator),
        AnalysisCache::new(Arc::new(store)),
    ))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
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
