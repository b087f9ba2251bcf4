//! YAML duration fields parse the common `<n>(ns|us|ms|s|m|h)` form.
//! Generalizes the teacher's `duration_serde` module (which only
//! round-trips a `Duration` as milliseconds) to accept humantime-style
//! unit suffixes on the way in and emit the same on the way out.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HumanDuration(pub Duration);

impl HumanDuration {
    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl From<Duration> for HumanDuration {
    fn from(d: Duration) -> Self {
        HumanDuration(d)
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", humantime::format_duration(self.0))
    }
}

impl Serialize for HumanDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HumanDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_duration(&raw)
            .map(HumanDuration)
            .map_err(serde::de::Error::custom)
    }
}

/// Parses `<n>(ns|us|ms|s|m|h)`, falling back to `humantime`'s more
/// permissive grammar (which accepts compound forms like `1h30m`) for
/// anything the bare suffix parse rejects.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_suffix("ns") {
        return rest
            .parse::<u64>()
            .map(Duration::from_nanos)
            .map_err(|e| e.to_string());
    }
    if let Some(rest) = raw.strip_suffix("us") {
        return rest
            .parse::<u64>()
            .map(Duration::from_micros)
            .map_err(|e| e.to_string());
    }
    if let Some(rest) = raw.strip_suffix("ms") {
        return rest
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| e.to_string());
    }
    if let Some(rest) = raw.strip_suffix('s') {
        if let Ok(n) = rest.parse::<f64>() {
            return Ok(Duration::from_secs_f64(n));
        }
    }
    if let Some(rest) = raw.strip_suffix('m') {
        if let Ok(n) = rest.parse::<f64>() {
            return Ok(Duration::from_secs_f64(n * 60.0));
        }
    }
    if let Some(rest) = raw.strip_suffix('h') {
        if let Ok(n) = rest.parse::<f64>() {
            return Ok(Duration::from_secs_f64(n * 3600.0));
        }
    }
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
