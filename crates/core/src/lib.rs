pub mod analysis;
pub mod cache;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod llm;
pub mod sleeper;

pub mod config {
    use anyhow::Context;

    const DEFAULT_ANALYSIS_CACHE_PATH: &str = ".cache/ai_analysis.json";

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub sleeper_league_id: Option<String>,
        pub sleeper_draft_id: Option<String>,
        pub google_ai_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub analysis_cache_path: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sleeper_league_id: non_empty_var("SLEEPER_LEAGUE_ID"),
                sleeper_draft_id: non_empty_var("SLEEPER_DRAFT_ID"),
                google_ai_api_key: non_empty_var("GOOGLE_AI_API_KEY"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                analysis_cache_path: non_empty_var("ANALYSIS_CACHE_PATH"),
            })
        }

        pub fn require_league_id(&self) -> anyhow::Result<&str> {
            self.sleeper_league_id
                .as_deref()
                .context("SLEEPER_LEAGUE_ID is required")
        }

        pub fn require_draft_id(&self) -> anyhow::Result<&str> {
            self.sleeper_draft_id
                .as_deref()
                .context("SLEEPER_DRAFT_ID is required")
        }

        pub fn analysis_cache_path(&self) -> &str {
            self.analysis_cache_path
                .as_deref()
                .unwrap_or(DEFAULT_ANALYSIS_CACHE_PATH)
        }
    }

    fn non_empty_var(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn require_accessors_report_missing_values() {
            let settings = Settings::default();
            let err = settings.require_league_id().unwrap_err();
            assert!(err.to_string().contains("SLEEPER_LEAGUE_ID"));
            assert!(settings.require_draft_id().is_err());
            assert_eq!(settings.analysis_cache_path(), DEFAULT_ANALYSIS_CACHE_PATH);
        }

        #[test]
        fn require_accessors_return_configured_values() {
            let settings = Settings {
                sleeper_league_id: Some("1180".to_string()),
                analysis_cache_path: Some("/tmp/cache.json".to_string()),
                ..Default::default()
            };
            assert_eq!(settings.require_league_id().unwrap(), "1180");
            assert_eq!(settings.analysis_cache_path(), "/tmp/cache.json");
        }
    }
}
