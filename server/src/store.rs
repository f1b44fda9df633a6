use crate::errors::Result;
use crate::model::{NewReading, Reading};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Append-only, totally ordered collection of readings.
///
/// Implementations serialize `append` calls so ids are strictly increasing with
/// insertion order, and readers only ever observe fully committed readings.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Stores a reading, assigning its id and server timestamp.
    /// Returns only once the reading is durable.
    async fn append(&self, reading: NewReading) -> Result<Reading>;

    /// The reading with the greatest id, or `None` while the store is empty.
    async fn latest(&self) -> Result<Option<Reading>>;

    /// Every reading, ascending by id, from one consistent snapshot.
    async fn all_ordered(&self) -> Result<Vec<Reading>>;

    async fn count(&self) -> Result<u64>;
}

/// How many readings a store keeps. Bounded stores evict oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    #[default]
    Unbounded,
    Newest(usize),
}

impl Retention {
    pub fn limit(&self) -> Option<usize> {
        match self {
            Retention::Unbounded => None,
            Retention::Newest(n) => Some(*n),
        }
    }
}

impl FromStr for Retention {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("unbounded") {
            return Ok(Retention::Unbounded);
        }
        match s.parse::<usize>() {
            Ok(0) => Err("retention must keep at least one reading".to_string()),
            Ok(n) if n > i64::MAX as usize => {
                Err(format!("retention {} exceeds the maximum of {}", n, i64::MAX))
            }
            Ok(n) => Ok(Retention::Newest(n)),
            Err(e) => Err(format!("invalid retention '{}': {}", s, e)),
        }
    }
}

impl fmt::Display for Retention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Retention::Unbounded => write!(f, "unbounded"),
            Retention::Newest(n) => write!(f, "{}", n),
        }
    }
}
