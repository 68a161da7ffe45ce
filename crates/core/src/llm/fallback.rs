//! Canned analyses served whenever the model cannot be reached or its reply cannot be read.

use crate::domain::analysis::{AnalysisKind, AnalysisResult};
use serde_json::Value;

pub const DEFAULT_TEAM_A: &str = "Team A";
pub const DEFAULT_TEAM_B: &str = "Team B";
pub const DEFAULT_TEAM: &str = "This team";

pub fn fallback(kind: AnalysisKind, payload: &Value) -> AnalysisResult {
    match kind {
        AnalysisKind::Matchup => {
            let team1 = text_at(payload, &["/team1/name"]).unwrap_or(DEFAULT_TEAM_A);
            let team2 = text_at(payload, &["/team2/name"]).unwrap_or(DEFAULT_TEAM_B);
            matchup_fallback(team1, team2)
        }
        AnalysisKind::TeamAnalysis => {
            let team = text_at(payload, &["/team/name", "/name"]).unwrap_or(DEFAULT_TEAM);
            team_fallback(team)
        }
        AnalysisKind::LeagueOverview | AnalysisKind::Generic => generic_fallback(),
    }
}

/// First non-blank string found at any of `pointers`, probed in order.
fn text_at<'a>(payload: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers
        .iter()
        .filter_map(|p| payload.pointer(p))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
}

fn matchup_fallback(team1: &str, team2: &str) -> AnalysisResult {
    AnalysisResult {
        summary: format!(
            "This is a classic fantasy football showdown between {team1} and {team2}. Both teams have their strengths, but this matchup could go either way depending on player performance."
        ),
        key_insights: vec![
            format!("{team1} has a solid roster with good depth at key positions."),
            format!("{team2} shows strong potential with their starting lineup."),
            "The outcome will likely hinge on which team's players have better matchups this week."
                .to_string(),
            "Both teams should focus on optimizing their lineups for maximum points.".to_string(),
        ],
        recommendations: lines(&[
            "Check player injury reports and weather conditions before finalizing lineups.",
            "Consider streaming options for positions with favorable matchups.",
            "Monitor late-breaking news for any last-minute roster changes.",
        ]),
        confidence: 6,
    }
}

fn team_fallback(team: &str) -> AnalysisResult {
    AnalysisResult {
        summary: format!(
            "{team} has a well-rounded roster with potential for success this season. The team's performance will depend on key players staying healthy and performing consistently."
        ),
        key_insights: lines(&[
            "The roster shows good balance across different positions.",
            "There are some high-upside players who could carry the team to victory.",
            "Depth at key positions provides flexibility for lineup decisions.",
            "The team should focus on consistent performers rather than boom-or-bust players.",
        ]),
        recommendations: lines(&[
            "Consider trading for players with more consistent weekly production.",
            "Monitor the waiver wire for emerging talent to improve depth.",
            "Stay active in trade discussions to address any roster weaknesses.",
        ]),
        confidence: 7,
    }
}

fn generic_fallback() -> AnalysisResult {
    AnalysisResult {
        summary: "Fantasy football analysis shows an exciting season ahead with competitive matchups and strategic opportunities for all teams.".to_string(),
        key_insights: lines(&[
            "Teams with strong quarterback play have a significant advantage.",
            "Running back depth is crucial for consistent weekly performance.",
            "Wide receiver depth provides flexibility for different scoring formats.",
            "Active roster management is key to fantasy success.",
        ]),
        recommendations: lines(&[
            "Stay active on the waiver wire to improve roster depth.",
            "Monitor player trends and adjust strategies accordingly.",
            "Don't be afraid to make bold trades to improve your team.",
        ]),
        confidence: 8,
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
