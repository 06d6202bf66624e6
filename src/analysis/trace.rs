//! Optional trace-run collaborator (LangSmith).
//!
//! The orchestrator talks to a `TraceSink` regardless of whether tracing
//! is configured; `NoopTraceSink` absorbs the calls when it is off, so
//! control flow never branches on a toggle at each call site. Sink
//! failures are logged and swallowed by the orchestrator — they must
//! never replace the primary result or error.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Trace service unreachable at {0}")]
    Connection(String),

    #[error("Trace service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Terminal state of a trace run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Succeeded(Value),
    Failed(String),
}

/// Trace-run collaborator abstraction.
pub trait TraceSink: Send + Sync {
    /// Whether runs should be recorded at all. When false the
    /// orchestrator skips run-id generation entirely.
    fn enabled(&self) -> bool;

    fn start_run(&self, run_id: Uuid, name: &str, inputs: &Value) -> Result<(), TraceError>;

    fn finish_run(&self, run_id: Uuid, outcome: RunOutcome) -> Result<(), TraceError>;
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn start_run(&self, run_id: Uuid, name: &str, inputs: &Value) -> Result<(), TraceError> {
        (**self).start_run(run_id, name, inputs)
    }

    fn finish_run(&self, run_id: Uuid, outcome: RunOutcome) -> Result<(), TraceError> {
        (**self).finish_run(run_id, outcome)
    }
}

impl<T: TraceSink + ?Sized> TraceSink for std::sync::Arc<T> {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn start_run(&self, run_id: Uuid, name: &str, inputs: &Value) -> Result<(), TraceError> {
        (**self).start_run(run_id, name, inputs)
    }

    fn finish_run(&self, run_id: Uuid, outcome: RunOutcome) -> Result<(), TraceError> {
        (**self).finish_run(run_id, outcome)
    }
}

/// Sink used when tracing is disabled — accepts and discards everything.
pub struct NoopTraceSink;

impl TraceSink for NoopTraceSink {
    fn enabled(&self) -> bool {
        false
    }

    fn start_run(&self, _run_id: Uuid, _name: &str, _inputs: &Value) -> Result<(), TraceError> {
        Ok(())
    }

    fn finish_run(&self, _run_id: Uuid, _outcome: RunOutcome) -> Result<(), TraceError> {
        Ok(())
    }
}

/// LangSmith REST client: `POST /runs` to open a run, `PATCH /runs/{id}`
/// to close it with outputs or an error.
pub struct LangSmithSink {
    endpoint: String,
    api_key: String,
    project: String,
    client: reqwest::blocking::Client,
}

impl LangSmithSink {
    /// Trace calls ride on the request path, so keep the timeout short.
    const TIMEOUT_SECS: u64 = 10;

    pub fn new(endpoint: &str, api_key: &str, project: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            project: project.to_string(),
            client,
        }
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<(), TraceError> {
        let response = request
            .header("x-api-key", &self.api_key)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    TraceError::Connection(self.endpoint.clone())
                } else {
                    TraceError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TraceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Body for POST /runs
#[derive(Serialize)]
struct CreateRunBody<'a> {
    id: Uuid,
    name: &'a str,
    run_type: &'a str,
    inputs: &'a Value,
    session_name: &'a str,
    start_time: String,
}

/// Body for PATCH /runs/{id}
#[derive(Serialize)]
struct UpdateRunBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    outputs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    end_time: String,
}

impl TraceSink for LangSmithSink {
    fn enabled(&self) -> bool {
        true
    }

    fn start_run(&self, run_id: Uuid, name: &str, inputs: &Value) -> Result<(), TraceError> {
        let url = format!("{}/runs", self.endpoint);
        let body = CreateRunBody {
            id: run_id,
            name,
            run_type: "llm",
            inputs,
            session_name: &self.project,
            start_time: chrono::Utc::now().to_rfc3339(),
        };
        self.send(self.client.post(&url).json(&body))
    }

    fn finish_run(&self, run_id: Uuid, outcome: RunOutcome) -> Result<(), TraceError> {
        let url = format!("{}/runs/{}", self.endpoint, run_id);
        let body = match outcome {
            RunOutcome::Succeeded(outputs) => UpdateRunBody {
                outputs: Some(outputs),
                error: None,
                end_time: chrono::Utc::now().to_rfc3339(),
            },
            RunOutcome::Failed(message) => UpdateRunBody {
                outputs: None,
                error: Some(message),
                end_time: chrono::Utc::now().to_rfc3339(),
            },
        };
        self.send(self.client.patch(&url).json(&body))
    }
}

/// Recording sink for tests — captures every event in memory, optionally
/// failing each call to exercise swallow-and-continue behavior.
pub struct RecordingTraceSink {
    pub events: std::sync::Mutex<Vec<TraceEvent>>,
    fail: bool,
}

#[derive(Debug, Clone)]
pub enum TraceEvent {
    Started { run_id: Uuid, name: String, inputs: Value },
    Finished { run_id: Uuid, error: Option<String> },
}

impl RecordingTraceSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

impl Default for RecordingTraceSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSink for RecordingTraceSink {
    fn enabled(&self) -> bool {
        true
    }

    fn start_run(&self, run_id: Uuid, name: &str, inputs: &Value) -> Result<(), TraceError> {
        self.events.lock().unwrap().push(TraceEvent::Started {
            run_id,
            name: name.to_string(),
            inputs: inputs.clone(),
        });
        if self.fail {
            return Err(TraceError::HttpClient("simulated trace failure".into()));
        }
        Ok(())
    }

    fn finish_run(&self, run_id: Uuid, outcome: RunOutcome) -> Result<(), TraceError> {
        let error = match outcome {
            RunOutcome::Succeeded(_) => None,
            RunOutcome::Failed(message) => Some(message),
        };
        self.events
            .lock()
            .unwrap()
            .push(TraceEvent::Finished { run_id, error });
        if self.fail {
            return Err(TraceError::HttpClient("simulated trace failure".into()));
        }
        Ok(())
    }
}
