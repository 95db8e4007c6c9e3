//! In-memory collaborators for tests. No network, fully scripted.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::config::Config;
use crate::llm_client::{ChatModel, LlmError, TextStream};
use crate::models::conversation::Turn;
use crate::models::weather::WeatherRecord;
use crate::state::AppState;
use crate::weather::WeatherLookup;

/// Replays a fixed reply (or a fixed failure) and records every request.
pub struct ScriptedModel {
    reply: Vec<&'static str>,
    fail: bool,
    calls: Mutex<Vec<Vec<Turn>>>,
}

impl ScriptedModel {
    pub fn replying(reply: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Vec::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Vec<Turn>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn stream_chat(&self, messages: Vec<Turn>) -> Result<TextStream, LlmError> {
        self.calls.lock().unwrap().push(messages);
        if self.fail {
            return Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            });
        }
        let fragments: Vec<Result<String, LlmError>> =
            self.reply.iter().map(|s| Ok(s.to_string())).collect();
        Ok(stream::iter(fragments).boxed())
    }
}

/// Answers every lookup with the same record and remembers the queried cities.
pub struct FixedWeather {
    record: Option<WeatherRecord>,
    queries: Mutex<Vec<String>>,
}

impl FixedWeather {
    pub fn new(record: Option<WeatherRecord>) -> Arc<Self> {
        Arc::new(Self {
            record,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherLookup for FixedWeather {
    async fn get_weather(&self, city_name: &str, _language: &str) -> Option<WeatherRecord> {
        self.queries.lock().unwrap().push(city_name.to_string());
        self.record.clone()
    }
}

pub fn beijing() -> WeatherRecord {
    WeatherRecord {
        city: "北京".to_string(),
        country: Some("中国".to_string()),
        latitude: 39.9,
        longitude: 116.4,
        temperature_c: 2.3,
        description: "多云".to_string(),
        observed_at: "2025-12-22T10:00".to_string(),
    }
}

pub fn test_config() -> Config {
    Config {
        api_key: Some("test-key".to_string()),
        base_url: "http://localhost".to_string(),
        model: "test-model".to_string(),
        weather_language: "zh".to_string(),
        http_timeout_secs: 1,
        rust_log: "warn".to_string(),
    }
}

pub fn test_state(llm: Arc<ScriptedModel>, weather: Arc<FixedWeather>) -> AppState {
    AppState {
        llm,
        weather,
        config: test_config(),
    }
}
