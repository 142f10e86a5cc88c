//! Thin client for a local Ollama-style generation endpoint, plus the wire
//! shape of the structured review payload.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModelConfig;
use crate::errors::{Error, LlmError};

/// Structured payload the model is asked to return.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewPayload {
    #[serde(default)]
    pub reviews: Vec<ReviewEntry>,
}

/// One structured review entry as the model reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEntry {
    /// One of `ERROR|WARNING|INFO|HINT`, validated downstream.
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "codeSnippet", default)]
    pub code_snippet: Option<String>,
}

/// Thin model client over `/api/generate`.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    cfg: ModelConfig,
}

impl LlmClient {
    pub fn new(cfg: ModelConfig) -> Self {
        let http = reqwest::Client::builder()
            .http2_keep_alive_interval(Some(Duration::from_secs(20)))
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .build()
            .expect("http client");
        Self { http, cfg }
    }

    /// Best-effort warmup to avoid cold starts.
    pub async fn warmup(&self) {
        let _ = self.generate_raw("ping").await;
    }

    /// Minimal `/api/generate` wrapper, returns plain text.
    pub async fn generate_raw(&self, prompt: &str) -> Result<String, Error> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
        }
        #[derive(Deserialize)]
        struct Resp {
            response: String,
        }

        let url = format!("{}/api/generate", self.cfg.endpoint.trim_end_matches('/'));
        debug!("llm.generate model={} url={}", self.cfg.model, url);
        let resp = self
            .http
            .post(&url)
            .json(&Req {
                model: &self.cfg.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Llm(LlmError::HttpStatus(resp.status().as_u16())));
        }
        let body: Resp = resp.json().await?;
        Ok(body.response)
    }
}

/// Trim common code-fence wrappers around JSON.
pub fn cleanup_json_like(s: &str) -> String {
    let mut t = s.trim().to_string();
    if t.starts_with("```") {
        t = t
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .to_string();
        if let Some(pos) = t.rfind("```") {
            t.truncate(pos);
        }
    }
    t.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_strips_json_fences() {
        let fenced = "```json\n{\"reviews\":[]}\n```";
        assert_eq!(cleanup_json_like(fenced), "{\"reviews\":[]}");

        let bare = "{\"reviews\":[]}";
        assert_eq!(cleanup_json_like(bare), bare);
    }

    #[test]
    fn payload_tolerates_missing_fields() {
        let payload: ReviewPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.reviews.is_empty());

        let payload: ReviewPayload =
            serde_json::from_str(r#"{"reviews":[{"severity":"error"}]}"#).unwrap();
        assert_eq!(payload.reviews.len(), 1);
        assert!(payload.reviews[0].message.is_empty());
        assert!(payload.reviews[0].code_snippet.is_none());
    }

    #[test]
    fn payload_reads_camel_case_snippet() {
        let payload: ReviewPayload = serde_json::from_str(
            r#"{"reviews":[{"severity":"hint","message":"m","codeSnippet":"let x;"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.reviews[0].code_snippet.as_deref(), Some("let x;"));
    }
}
