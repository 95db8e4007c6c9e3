use serde::{Deserialize, Serialize};

/// Current conditions for one resolved city. Built fresh per query, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub description: String,
    /// Local observation time as reported upstream, e.g. `2025-12-22T10:00`.
    pub observed_at: String,
}
