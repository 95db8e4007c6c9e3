/// LLM Client — the single point of entry for all language-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the completions API directly.
/// Everything goes through the `ChatModel` trait, implemented here by `LlmClient`
/// against any OpenAI-compatible `/chat/completions` endpoint.
///
/// All calls stream: the returned `TextStream` yields text fragments as the
/// server produces them and ends when the server sends its terminator.
/// `HTTP_TIMEOUT_SECS` bounds connecting, waiting for the response headers and
/// each gap between body chunks; a long answer that keeps arriving is never cut.
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::conversation::Turn;

pub mod prompts;
pub mod sse;

use sse::{decode_event, SseDecoder, StreamEvent};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("No data from the model for {0:?}")]
    Timeout(Duration),
}

/// Incremental text fragments from one completion. Finite and not restartable.
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// A streaming chat model. Carried as `Arc<dyn ChatModel>` so the dialogue
/// engine can be exercised against a scripted fake.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Multi-turn completion over a full ordered message list.
    async fn stream_chat(&self, messages: Vec<Turn>) -> Result<TextStream, LlmError>;

    /// Single-turn completion: one system instruction plus one user message.
    async fn stream_completion(&self, system: &str, user: &str) -> Result<TextStream, LlmError> {
        self.stream_chat(vec![Turn::system(system), Turn::user(user)])
            .await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    idle_timeout: Duration,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        let idle_timeout = Duration::from_secs(config.http_timeout_secs);
        Self {
            // No whole-request timeout: it would also cap the streamed body.
            client: Client::builder()
                .connect_timeout(idle_timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            idle_timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn stream_chat(&self, messages: Vec<Turn>) -> Result<TextStream, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|turn| ChatMessage {
                    role: turn.role.as_str(),
                    content: &turn.content,
                })
                .collect(),
            stream: true,
        };

        let request = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request_body)
            .send();
        let response = tokio::time::timeout(self.idle_timeout, request)
            .await
            .map_err(|_| LlmError::Timeout(self.idle_timeout))??;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(
            "Completion stream opened: model={}, messages={}",
            self.model,
            messages.len()
        );

        Ok(text_stream(
            response.bytes_stream().map_err(LlmError::Http),
            self.idle_timeout,
        ))
    }
}

struct StreamState {
    body: BoxStream<'static, Result<Bytes, LlmError>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
    idle_timeout: Duration,
}

/// Turns an SSE response body into text fragments.
/// Ends at the `[DONE]` marker or when the body closes, whichever comes first.
/// Waiting longer than `idle_timeout` for the next chunk yields `LlmError::Timeout`.
fn text_stream<S>(body: S, idle_timeout: Duration) -> TextStream
where
    S: Stream<Item = Result<Bytes, LlmError>> + Send + 'static,
{
    let state = StreamState {
        body: body.boxed(),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
        idle_timeout,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.pending.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }

            let next = tokio::time::timeout(state.idle_timeout, state.body.next()).await;
            let payloads = match next {
                Ok(Some(Ok(bytes))) => state.decoder.push(&bytes),
                Ok(Some(Err(e))) => {
                    state.finished = true;
                    return Some((Err(e), state));
                }
                Err(_) => {
                    state.finished = true;
                    let waited = state.idle_timeout;
                    return Some((Err(LlmError::Timeout(waited)), state));
                }
                Ok(None) => {
                    state.finished = true;
                    state.decoder.finish().into_iter().collect()
                }
            };

            for payload in payloads {
                match decode_event(&payload) {
                    Ok(StreamEvent::Delta(text)) if !text.is_empty() => {
                        state.pending.push_back(text)
                    }
                    Ok(StreamEvent::Delta(_)) => {}
                    Ok(StreamEvent::Done) => {
                        state.finished = true;
                        break;
                    }
                    Err(e) => debug!("Skipping undecodable stream payload: {e}"),
                }
            }
        }
    })
    .boxed()
}
