use crate::domain::analysis::AnalysisKind;
use serde_json::Value;

const ROLE: &str = "You are a fantasy football expert analyst.";

const OUTPUT_FORMAT: [&str; 4] = [
    "Format your response as JSON with exactly these keys: summary (string), keyInsights (array of strings), recommendations (array of strings), confidence (integer from 1 to 10).",
    "IMPORTANT: keyInsights and recommendations must be arrays of plain strings, not objects. Each item should be a complete sentence.",
    "Return only the JSON object.",
    "",
];

struct Template {
    opening: &'static str,
    focus: &'static [&'static str],
    deliverables: [&'static str; 3],
    tone: Option<&'static str>,
}

fn template(kind: AnalysisKind) -> Template {
    match kind {
        AnalysisKind::LeagueOverview => Template {
            opening: "Based on the league data provided, give insights about the competitive landscape.",
            focus: &[
                "Who might be the early favorites to win the league based on team names and any available data",
                "Interesting observations about team strategies or compositions",
                "Potential dark horse teams that could surprise everyone",
                "General fantasy football wisdom for the current season",
            ],
            deliverables: [
                "A concise summary about the league's competitive landscape (2-3 sentences)",
                "3-4 key insights about potential winners and interesting team dynamics",
                "2-3 strategic recommendations for fantasy success this season",
            ],
            tone: Some("Make it engaging and fun - this is for a fantasy football league!"),
        },
        AnalysisKind::Matchup => Template {
            opening: "Analyze this matchup.",
            focus: &[
                "Head-to-head comparison of the two teams",
                "Key player matchups and their impact",
                "Team strengths and weaknesses",
                "Prediction for who will win and why",
                "Strategic advice for both teams",
            ],
            deliverables: [
                "A concise summary of the matchup and prediction (2-3 sentences)",
                "3-4 key insights about the teams and key factors",
                "2-3 strategic recommendations for the matchup",
            ],
            tone: Some("Make it exciting and competitive!"),
        },
        AnalysisKind::TeamAnalysis => Template {
            opening: "Analyze this specific team.",
            focus: &[
                "The team's strengths and potential weaknesses",
                "Key players who could carry the team to victory",
                "Strategic moves they should consider",
                "Their championship potential",
            ],
            deliverables: [
                "A concise summary of the team's outlook (2-3 sentences)",
                "3-4 key insights about the team's potential and strategy",
                "2-3 recommendations for improving their roster",
            ],
            tone: Some("Be specific and actionable!"),
        },
        AnalysisKind::Generic => Template {
            opening: "Analyze the following data and provide insights.",
            focus: &[],
            deliverables: [
                "A concise summary (2-3 sentences)",
                "3-4 key insights",
                "2-3 actionable recommendations",
            ],
            tone: None,
        },
    }
}

pub fn build_prompt(kind: AnalysisKind, label: &str, payload: &Value) -> String {
    let template = template(kind);
    let data = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());

    let mut lines: Vec<String> = vec![
        format!("{ROLE} {}", template.opening),
        String::new(),
        format!("Context: {label}"),
        format!("Data: {data}"),
        String::new(),
    ];

    if !template.focus.is_empty() {
        lines.push("Focus on:".to_string());
        lines.extend(
            template
                .focus
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {item}", i + 1)),
        );
        lines.push(String::new());
    }

    lines.push("Please provide:".to_string());
    lines.extend(
        template
            .deliverables
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {item}", i + 1)),
    );
    lines.push("4. Confidence level (1-10)".to_string());
    lines.push(String::new());

    lines.extend(OUTPUT_FORMAT.iter().map(|s| s.to_string()));
    if let Some(tone) = template.tone {
        lines.push(tone.to_string());
    }

    lines.join("\n")
}
