use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::config::Settings;

/// Status description reported when polling gives up. Distinct from the
/// judge's own "Time Limit Exceeded" verdict.
pub(crate) const TIMEOUT_STATUS: &str = "Time Limit";

/// Judge0 status ids 1 (In Queue) and 2 (Processing) are not terminal.
const LAST_PENDING_STATUS_ID: i32 = 2;

const RESULT_FIELDS: &str = "stdout,stderr,compile_output,status,time";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExecutionRequest {
    pub(crate) source_code: String,
    pub(crate) language_id: i32,
    pub(crate) stdin: String,
    pub(crate) expected_output: Option<String>,
    pub(crate) cpu_time_limit: Option<f64>,
    pub(crate) memory_limit_kb: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExecutionOutcome {
    /// `None` for the synthetic polling-timeout outcome.
    pub(crate) status_id: Option<i32>,
    pub(crate) status: String,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
    pub(crate) compile_output: String,
    pub(crate) time: Option<f64>,
}

impl ExecutionOutcome {
    pub(crate) fn timed_out() -> Self {
        Self {
            status_id: None,
            status: TIMEOUT_STATUS.to_string(),
            stdout: String::new(),
            stderr: String::new(),
            compile_output: String::new(),
            time: None,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum JudgeError {
    #[error("judge {stage} request failed: {source}")]
    Transport {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("judge {stage} returned status {status}: {body}")]
    Status { stage: &'static str, status: StatusCode, body: String },
    #[error("judge submission response did not include a token")]
    MissingToken,
    #[error("invalid judge response: {0}")]
    InvalidResponse(String),
}

/// Runs one source + stdin payload to a terminal verdict.
#[async_trait]
pub(crate) trait CodeExecutor: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, JudgeError>;
}

#[derive(Debug, Clone)]
pub(crate) struct JudgeClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    poll_interval: Duration,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SubmitPayload {
    source_code: String,
    language_id: i32,
    stdin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_time_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_limit: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PollResponse {
    status: Option<PollStatus>,
    stdout: Option<String>,
    stderr: Option<String>,
    compile_output: Option<String>,
    time: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PollStatus {
    id: i32,
    description: String,
}

impl JudgeClient {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let judge = settings.judge();
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(judge.request_timeout_seconds))
            .build()
            .context("Failed to build judge HTTP client")?;

        Ok(Self {
            client,
            base_url: judge.base_url.trim_end_matches('/').to_string(),
            auth_token: judge.auth_token.clone(),
            poll_interval: Duration::from_millis(judge.poll_interval_ms),
            timeout: Duration::from_millis(judge.timeout_ms),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_timing(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
        self
    }

    async fn submit(&self, request: &ExecutionRequest) -> Result<String, JudgeError> {
        let payload = SubmitPayload {
            source_code: STANDARD.encode(&request.source_code),
            language_id: request.language_id,
            stdin: STANDARD.encode(&request.stdin),
            expected_output: request.expected_output.as_ref().map(|value| STANDARD.encode(value)),
            cpu_time_limit: request.cpu_time_limit,
            memory_limit: request.memory_limit_kb,
        };

        let mut builder = self
            .client
            .post(format!("{}/submissions", self.base_url))
            .query(&[("base64_encoded", "true"), ("wait", "false")])
            .json(&payload);
        if let Some(token) = &self.auth_token {
            builder = builder.header("X-Auth-Token", token);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| JudgeError::Transport { stage: "submit", source })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Status { stage: "submit", status, body });
        }

        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|source| JudgeError::Transport { stage: "submit", source })?;

        parsed.token.filter(|token| !token.is_empty()).ok_or(JudgeError::MissingToken)
    }

    async fn fetch(&self, token: &str) -> Result<PollResponse, JudgeError> {
        let mut builder = self
            .client
            .get(format!("{}/submissions/{}", self.base_url, token))
            .query(&[("base64_encoded", "true"), ("fields", RESULT_FIELDS)]);
        if let Some(auth) = &self.auth_token {
            builder = builder.header("X-Auth-Token", auth);
        }

        let response =
            builder.send().await.map_err(|source| JudgeError::Transport { stage: "poll", source })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Status { stage: "poll", status, body });
        }

        response.json().await.map_err(|source| JudgeError::Transport { stage: "poll", source })
    }

    async fn poll(&self, token: &str) -> Result<ExecutionOutcome, JudgeError> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let snapshot = self.fetch(token).await?;
            let status = snapshot.status.as_ref().ok_or_else(|| {
                JudgeError::InvalidResponse(format!("submission {token} has no status"))
            })?;

            if status.id > LAST_PENDING_STATUS_ID {
                return Ok(ExecutionOutcome {
                    status_id: Some(status.id),
                    status: status.description.clone(),
                    stdout: decode_field(snapshot.stdout.as_deref()),
                    stderr: decode_field(snapshot.stderr.as_deref()),
                    compile_output: decode_field(snapshot.compile_output.as_deref()),
                    time: snapshot.time.as_ref().and_then(parse_time),
                });
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(token, "Judge polling timed out");
                return Ok(ExecutionOutcome::timed_out());
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

#[async_trait]
impl CodeExecutor for JudgeClient {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, JudgeError> {
        let timer = Instant::now();
        let token = self.submit(request).await?;
        let outcome = self.poll(&token).await?;

        let elapsed = timer.elapsed().as_secs_f64();
        metrics::counter!("judge_executions_total", "status" => outcome.status.clone()).increment(1);
        metrics::histogram!("judge_execution_duration_seconds").record(elapsed);
        tracing::debug!(
            token = %token,
            language_id = request.language_id,
            status = %outcome.status,
            duration_seconds = elapsed,
            "Judge execution finished"
        );

        Ok(outcome)
    }
}

/// Judge0 wraps base64 output at 60 columns; strip the line breaks before
/// decoding. Undecodable text is passed through as-is.
fn decode_field(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return String::new();
    };
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            tracing::warn!(error = %err, "Judge returned a field that is not base64");
            raw.to_string()
        }
    }
}

fn parse_time(value: &Value) -> Option<f64> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}
