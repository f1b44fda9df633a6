use crate::errors::Result;
use crate::model::{HistoryEntry, Reading, WeatherData};
use crate::store::ReadingStore;
use crate::view::PageView;
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::str::FromStr;

/// Zone used when rendering reading timestamps as wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    #[default]
    Local,
    Utc,
}

impl DisplayZone {
    /// `HH:MM:SS`, 24-hour, no date or zone marker.
    pub fn clock_time(&self, timestamp: DateTime<Utc>) -> String {
        match self {
            DisplayZone::Local => timestamp.with_timezone(&Local).format("%H:%M:%S").to_string(),
            DisplayZone::Utc => timestamp.format("%H:%M:%S").to_string(),
        }
    }
}

impl FromStr for DisplayZone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(DisplayZone::Local),
            "utc" => Ok(DisplayZone::Utc),
            other => Err(format!("unknown display timezone '{}'", other)),
        }
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayZone::Local => write!(f, "local"),
            DisplayZone::Utc => write!(f, "utc"),
        }
    }
}

pub async fn latest_view(store: &dyn ReadingStore) -> Result<Option<WeatherData>> {
    Ok(store.latest().await?.as_ref().map(WeatherData::from))
}

pub async fn history_view(store: &dyn ReadingStore, zone: DisplayZone) -> Result<Vec<HistoryEntry>> {
    let readings = store.all_ordered().await?;
    Ok(readings
        .iter()
        .map(|reading| history_entry(reading, zone))
        .collect())
}

pub async fn page_view(store: &dyn ReadingStore, zone: DisplayZone) -> Result<PageView> {
    let latest = store.latest().await?;
    Ok(PageView {
        weather_data: latest.as_ref().map(WeatherData::from),
        last_update: latest.map(|reading| zone.clock_time(reading.timestamp)),
    })
}

fn history_entry(reading: &Reading, zone: DisplayZone) -> HistoryEntry {
    HistoryEntry {
        temp: reading.temperature,
        hum: reading.humidity,
        time: zone.clock_time(reading.timestamp),
    }
}
