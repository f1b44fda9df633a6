use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored temperature/humidity sample. `id` and `timestamp` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    pub id: i64,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

/// A validated candidate reading, not yet stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub humidity: f64,
}

/// Latest-value body of `GET /data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub temp: f64,
    pub hum: f64,
}

impl From<&Reading> for WeatherData {
    fn from(reading: &Reading) -> Self {
        Self {
            temp: reading.temperature,
            hum: reading.humidity,
        }
    }
}

/// One element of `GET /history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub temp: f64,
    pub hum: f64,
    pub time: String,
}

/// Acknowledgement body for `POST /data` and error bodies on every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }
}
