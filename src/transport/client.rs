use super::logging::{debug_payload_enabled, emit_debug_payload};
use super::stream::{StreamEvent, StreamParser};
use super::ResumeTransport;
use crate::config::Config;
use crate::types::ResumePayload;
use crate::util::is_local_endpoint_url;
use anyhow::{anyhow, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Posts resume commands to the orchestrator from a background worker.
///
/// Each payload is sent as its own request, in submission order.
#[derive(Clone)]
pub struct HttpTransport {
    queue: mpsc::UnboundedSender<ResumePayload>,
}

#[derive(Clone)]
struct RunsEndpoint {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    assistant_id: String,
}

impl HttpTransport {
    /// Must be called inside a tokio runtime.
    pub fn spawn(config: &Config) -> (Self, JoinHandle<()>) {
        let endpoint = RunsEndpoint {
            http: reqwest::Client::new(),
            url: config.resume_url(),
            api_key: config.api_key.clone(),
            assistant_id: config.assistant_id.clone(),
        };
        let (queue, mut rx) = mpsc::unbounded_channel::<ResumePayload>();
        let worker = tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                if let Err(error) = endpoint.post(&payload).await {
                    tracing::warn!(%error, "resume submission failed");
                }
            }
        });
        (Self { queue }, worker)
    }
}

/// Wait for the resume worker to post what is still queued. The worker only
/// stops once every `HttpTransport` clone has been dropped, so drop those
/// first. Returns false if `grace` ran out first.
pub async fn finish_resume_worker(worker: JoinHandle<()>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, worker).await {
        Ok(Ok(())) => {
            tracing::debug!("resume worker drained");
            true
        }
        Ok(Err(error)) => {
            tracing::warn!(%error, "resume worker stopped abnormally");
            true
        }
        Err(_) => {
            tracing::warn!(?grace, "resume worker still posting at exit; queued payloads dropped");
            false
        }
    }
}

impl ResumeTransport for HttpTransport {
    fn submit(&self, payload: ResumePayload) {
        if self.queue.send(payload).is_err() {
            tracing::warn!("resume worker stopped; payload discarded");
        }
    }
}

impl RunsEndpoint {
    async fn post(&self, payload: &ResumePayload) -> Result<()> {
        let body = run_request_body(&self.assistant_id, payload);
        if debug_payload_enabled() {
            emit_debug_payload(&self.url, &body);
        }

        let mut request = self
            .http
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        request
            .send()
            .await
            .map_err(|error| map_request_error(error, &self.url))?
            .error_for_status()
            .map_err(|error| map_request_error(error, &self.url))?;
        tracing::info!(
            url = %self.url,
            resume = payload
                .command
                .resume
                .first()
                .map(|entry| entry.kind.as_str())
                .unwrap_or("none"),
            "resume submitted"
        );
        Ok(())
    }
}

fn run_request_body(assistant_id: &str, payload: &ResumePayload) -> Value {
    let mut body = payload.to_value();
    if let Value::Object(map) = &mut body {
        map.insert(
            "assistant_id".to_string(),
            Value::String(assistant_id.to_string()),
        );
    }
    body
}

async fn open_stream(
    http: &reqwest::Client,
    url: &str,
    api_key: Option<&str>,
) -> Result<ByteStream> {
    let mut request = http.get(url).header("accept", "text/event-stream");
    if let Some(api_key) = api_key {
        request = request.header("x-api-key", api_key);
    }
    let response = request
        .send()
        .await
        .map_err(|error| map_request_error(error, url))?
        .error_for_status()
        .map_err(|error| map_request_error(error, url))?;

    let url_for_stream = url.to_string();
    let stream = response
        .bytes_stream()
        .map(move |item| item.map_err(|error| map_request_error(error, &url_for_stream)));
    Ok(Box::pin(stream))
}

/// Follow the orchestrator's event stream and forward decoded events until
/// the stream ends or `cancel` fires. Connection failures are reported once
/// through `Err` on the channel and end the task.
pub fn spawn_update_stream(
    config: &Config,
    events: mpsc::UnboundedSender<Result<StreamEvent, String>>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let http = reqwest::Client::new();
    let url = config.stream_url();
    let api_key = config.api_key.clone();

    tokio::spawn(async move {
        let mut stream = tokio::select! {
            _ = cancel.cancelled() => return,
            opened = open_stream(&http, &url, api_key.as_deref()) => match opened {
                Ok(stream) => stream,
                Err(error) => {
                    let _ = events.send(Err(error.to_string()));
                    return;
                }
            },
        };
        tracing::info!(%url, "subscribed to tool call stream");

        pump_events(&mut stream, &events, &cancel).await;
    })
}

pub(crate) async fn pump_events(
    stream: &mut ByteStream,
    events: &mpsc::UnboundedSender<Result<StreamEvent, String>>,
    cancel: &CancellationToken,
) {
    let mut parser = StreamParser::new();
    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => return,
            chunk = stream.next() => chunk,
        };
        match chunk {
            Some(Ok(bytes)) => {
                let decoded = match parser.process(&bytes) {
                    Ok(decoded) => decoded,
                    Err(error) => {
                        let _ = events.send(Err(error.to_string()));
                        return;
                    }
                };
                for event in decoded {
                    if events.send(Ok(event)).is_err() {
                        return;
                    }
                }
            }
            Some(Err(error)) => {
                let _ = events.send(Err(error.to_string()));
                return;
            }
            None => {
                let leftover = parser.flush();
                if !leftover.trim().is_empty() {
                    tracing::debug!(bytes = leftover.len(), "stream ended mid-event");
                }
                return;
            }
        }
    }
}

fn map_request_error(error: reqwest::Error, request_url: &str) -> anyhow::Error {
    if error.is_connect() && is_local_endpoint_url(request_url) {
        return anyhow!(
            "cannot reach local orchestrator '{}': {}. Start the server or update MAILCARDS_SERVER_URL.",
            request_url,
            error
        );
    }
    if error.is_connect() {
        return anyhow!("cannot reach orchestrator '{}': {}", request_url, error);
    }
    if error.is_timeout() {
        return anyhow!("request to '{}' timed out: {}", request_url, error);
    }
    if let Some(status) = error.status() {
        return anyhow!(
            "orchestrator '{}' returned HTTP {}: {}",
            request_url,
            status,
            error
        );
    }
    anyhow!("request to '{}' failed: {}", request_url, error)
}
