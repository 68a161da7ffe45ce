use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Sleeper,
    GoogleAi,
}

/// Failure talking to one of the upstream HTTP services. Never retried locally.
#[derive(Debug, Clone)]
pub struct RemoteError {
    pub service: Service,
    pub stage: &'static str,
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    pub detail: String,
    pub body: Option<String>,
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Status 429, an embedded `error.code` of 429, or any mention of "quota".
    pub fn is_rate_limited(&self) -> bool {
        if self.status == Some(429) {
            return true;
        }
        if self.detail.contains("quota") {
            return true;
        }

        let Some(body) = self.body.as_deref() else {
            return false;
        };
        match serde_json::from_str::<Value>(body) {
            Ok(json) => {
                let error = &json["error"];
                error["code"].as_u64() == Some(429)
                    || error["message"]
                        .as_str()
                        .is_some_and(|m| m.contains("quota"))
            }
            Err(_) => body.contains("quota"),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "remote error (service={:?}, stage={}",
            self.service, self.stage
        )?;
        if let Some(status) = self.status {
            write!(f, ", status={status}")?;
        }
        write!(f, "): {}", self.detail)
    }
}

impl std::error::Error for RemoteError {}

/// The model reply held no recoverable JSON object.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub detail: String,
    pub raw_output: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unparseable analysis reply: {}", self.detail)
    }
}

impl std::error::Error for ParseError {}
