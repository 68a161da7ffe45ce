use crate::analysis::requests::AnalysisRequest;
use crate::cache::{cache_key, AnalysisCache};
use crate::domain::analysis::{AnalysisKind, AnalysisResult};
use crate::error::RemoteError;
use crate::llm::fallback::fallback;
use crate::llm::json::normalize;
use crate::llm::prompt::build_prompt;
use crate::llm::TextGenerator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Cache,
    Model,
    Fallback,
}

/// Entry point for AI analyses. Every call yields a usable `AnalysisResult`; failures are
/// absorbed into canned fallback content.
#[derive(Clone)]
pub struct AnalysisService {
    generator: Arc<dyn TextGenerator>,
    cache: AnalysisCache,
    clock: Clock,
}

impl AnalysisService {
    pub fn new(generator: Arc<dyn TextGenerator>, cache: AnalysisCache) -> Self {
        Self {
            generator,
            cache,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn get_analysis(
        &self,
        label: &str,
        payload: &Value,
        force_refresh: bool,
    ) -> AnalysisResult {
        self.resolve(label, payload, force_refresh).await.0
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        self.get_analysis(&request.label, &request.payload, request.force_refresh)
            .await
    }

    pub async fn resolve(
        &self,
        label: &str,
        payload: &Value,
        force_refresh: bool,
    ) -> (AnalysisResult, AnalysisSource) {
        let key = cache_key(label);

        if !force_refresh {
            if let Some(cached) = self.cache.get(&key, (self.clock)()).await {
                if cached.is_fresh() {
                    tracing::debug!(
                        key = %key,
                        age_secs = cached.age.num_seconds(),
                        "using cached AI analysis"
                    );
                    return (cached.result, AnalysisSource::Cache);
                }
            }
        }

        let kind = AnalysisKind::from_label(label);
        let (result, source) = match self.generate(kind, label, payload).await {
            Ok(result) => (result, AnalysisSource::Model),
            Err(err) => {
                log_fallback(&key, kind, &err);
                (fallback(kind, payload), AnalysisSource::Fallback)
            }
        };

        if let Err(err) = self.cache.set(&key, &result, (self.clock)()).await {
            tracing::warn!(key = %key, error = %err, "failed to write AI analysis to cache");
        }

        tracing::info!(key = %key, kind = kind.as_str(), source = ?source, "AI analysis resolved");
        (result, source)
    }

    async fn generate(
        &self,
        kind: AnalysisKind,
        label: &str,
        payload: &Value,
    ) -> anyhow::Result<AnalysisResult> {
        let prompt = build_prompt(kind, label, payload);
        let reply = self.generator.generate(&prompt).await?;
        Ok(normalize(&reply)?)
    }
}

fn log_fallback(key: &str, kind: AnalysisKind, err: &anyhow::Error) {
    let rate_limited = err
        .downcast_ref::<RemoteError>()
        .is_some_and(RemoteError::is_rate_limited);

    if rate_limited {
        tracing::warn!(
            key,
            kind = kind.as_str(),
            error = %err,
            "AI quota exhausted; using fallback analysis"
        );
    } else {
        tracing::warn!(
            key,
            kind = kind.as_str(),
            error = %err,
            "AI analysis failed; using fallback analysis"
        );
    }
}
