use serde::{Deserialize, Serialize};

pub const MIN_CONFIDENCE: u8 = 1;
pub const MAX_CONFIDENCE: u8 = 10;

/// Normalized output of one AI analysis, whether it came from the model, the cache or the
/// canned fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// Always within `MIN_CONFIDENCE..=MAX_CONFIDENCE`.
    pub confidence: u8,
}

impl AnalysisResult {
    /// Non-empty text fields and an in-range confidence.
    pub fn is_well_formed(&self) -> bool {
        !self.summary.trim().is_empty()
            && !self.key_insights.is_empty()
            && !self.recommendations.is_empty()
            && (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&self.confidence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    LeagueOverview,
    Matchup,
    TeamAnalysis,
    Generic,
}

// Evaluated in order; the first substring found in the label decides the kind.
const KIND_RULES: [(&str, AnalysisKind); 3] = [
    ("Matchup", AnalysisKind::Matchup),
    ("League Overview", AnalysisKind::LeagueOverview),
    ("Team Analysis", AnalysisKind::TeamAnalysis),
];

impl AnalysisKind {
    pub fn from_label(label: &str) -> Self {
        KIND_RULES
            .iter()
            .find(|(needle, _)| label.contains(needle))
            .map(|(_, kind)| *kind)
            .unwrap_or(AnalysisKind::Generic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::LeagueOverview => "league_overview",
            AnalysisKind::Matchup => "matchup",
            AnalysisKind::TeamAnalysis => "team_analysis",
            AnalysisKind::Generic => "generic",
        }
    }
}
