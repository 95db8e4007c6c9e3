//! Weather Lookup — city name → coordinates → current conditions via Open-Meteo.
//!
//! Flow: geocode (first match only) → forecast `current` block → code table.
//! Every failure along the way is logged and collapsed into `None` at the
//! `WeatherLookup` boundary; nothing propagates to the dialogue engine.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::weather::WeatherRecord;

pub mod codes;

use codes::code_to_description;

const GEOCODE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const REQUEST_TIMEOUT_SECS: u64 = 8;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No geocoding result for '{0}'")]
    CityNotFound(String),

    #[error("Forecast response has no usable current conditions")]
    MissingCurrent,
}

/// Resolves a city name to its current weather. `None` means unavailable.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn get_weather(&self, city_name: &str, language: &str) -> Option<WeatherRecord>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Clone, Deserialize)]
struct Place {
    name: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<Current>,
}

#[derive(Debug, Deserialize)]
struct Current {
    time: Option<String>,
    temperature_2m: Option<f64>,
    weather_code: Option<i64>,
}

/// Open-Meteo backed lookup. No API key required.
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn geocode(&self, name: &str, language: &str) -> Result<Place, WeatherError> {
        let response: GeocodeResponse = self
            .client
            .get(GEOCODE_URL)
            .query(&[
                ("name", name),
                ("count", "1"),
                ("language", language),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        first_place(response, name)
    }

    async fn current(&self, latitude: f64, longitude: f64) -> Result<Current, WeatherError> {
        let response: ForecastResponse = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", "temperature_2m,weather_code".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.current.ok_or(WeatherError::MissingCurrent)
    }

    async fn lookup(&self, city_name: &str, language: &str) -> Result<WeatherRecord, WeatherError> {
        let place = self.geocode(city_name, language).await?;
        debug!(
            "Geocoded '{}' to ({}, {})",
            city_name, place.latitude, place.longitude
        );
        let current = self.current(place.latitude, place.longitude).await?;
        build_record(city_name, place, current)
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherLookup for OpenMeteoClient {
    async fn get_weather(&self, city_name: &str, language: &str) -> Option<WeatherRecord> {
        match self.lookup(city_name, language).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Weather lookup for '{city_name}' failed: {e}");
                None
            }
        }
    }
}

fn first_place(response: GeocodeResponse, name: &str) -> Result<Place, WeatherError> {
    response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::CityNotFound(name.to_string()))
}

/// Combines a geocoding hit and its current conditions into one record.
/// The queried name stands in when the geocoder returns none.
fn build_record(
    city_name: &str,
    place: Place,
    current: Current,
) -> Result<WeatherRecord, WeatherError> {
    let temperature_c = current.temperature_2m.ok_or(WeatherError::MissingCurrent)?;
    let observed_at = current.time.ok_or(WeatherError::MissingCurrent)?;

    Ok(WeatherRecord {
        city: place
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| city_name.to_string()),
        country: place.country,
        latitude: place.latitude,
        longitude: place.longitude,
        temperature_c,
        description: code_to_description(current.weather_code),
        observed_at,
    })
}
