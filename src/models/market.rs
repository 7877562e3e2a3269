// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Market model and crowd-level derivation.

use chrono::{Local, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::models::null_as_default;
use crate::time_utils;

/// Coarse occupancy estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

impl CrowdLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrowdLevel::Low => "LOW",
            CrowdLevel::Medium => "MEDIUM",
            CrowdLevel::High => "HIGH",
        }
    }

    /// Short label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            CrowdLevel::Low => "Quiet",
            CrowdLevel::Medium => "Moderate",
            CrowdLevel::High => "Busy",
        }
    }

    /// One-line visiting advice for detail pages.
    pub fn advice(&self) -> &'static str {
        match self {
            CrowdLevel::Low => "Great time to visit!",
            CrowdLevel::Medium => "Moderately busy",
            CrowdLevel::High => "Very busy, consider visiting later",
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown crowd level: {0:?}")]
pub struct ParseCrowdLevelError(pub String);

impl FromStr for CrowdLevel {
    type Err = ParseCrowdLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(CrowdLevel::Low),
            "MEDIUM" => Ok(CrowdLevel::Medium),
            "HIGH" => Ok(CrowdLevel::High),
            _ => Err(ParseCrowdLevelError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for CrowdLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Slot of the day used by crowd schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Morning is [6, 12), afternoon [12, 18), everything else evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }

    /// Level assumed when a market has no estimate for this slot.
    pub fn default_level(&self) -> CrowdLevel {
        match self {
            TimeOfDay::Morning | TimeOfDay::Afternoon => CrowdLevel::Medium,
            TimeOfDay::Evening => CrowdLevel::Low,
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            _ => Err(format!("unknown time of day: {s:?}")),
        }
    }
}

/// Crowd estimate per slot, as flat `crowdLevel*` fields on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrowdSchedule {
    #[serde(rename = "crowdLevelMorning", default)]
    pub morning: Option<CrowdLevel>,
    #[serde(rename = "crowdLevelAfternoon", default)]
    pub afternoon: Option<CrowdLevel>,
    #[serde(rename = "crowdLevelEvening", default)]
    pub evening: Option<CrowdLevel>,
}

impl CrowdSchedule {
    pub fn slot(&self, time_of_day: TimeOfDay) -> Option<CrowdLevel> {
        match time_of_day {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Afternoon => self.afternoon,
            TimeOfDay::Evening => self.evening,
        }
    }

    /// Level for the slot containing `hour`, falling back to the slot default.
    pub fn level_at(&self, hour: u32) -> CrowdLevel {
        let slot = TimeOfDay::from_hour(hour);
        self.slot(slot).unwrap_or_else(|| slot.default_level())
    }
}

/// Where the market record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataSource {
    Local,
    Google,
    Hybrid,
    #[serde(other)]
    Unknown,
}

/// Photo attached to a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPhoto {
    #[serde(default)]
    pub id: Option<i64>,
    pub photo_url: String,
    #[serde(default)]
    pub is_primary: Option<bool>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A market as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "time_utils::deserialize_time_of_day")]
    pub opening_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "time_utils::deserialize_time_of_day")]
    pub closing_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_covered: Option<bool>,
    #[serde(default)]
    pub specialties: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<MarketPhoto>,
    #[serde(flatten)]
    pub crowd: CrowdSchedule,
    /// Live override reported by the backend, raw (case varies).
    #[serde(default)]
    pub current_crowd_level: Option<String>,
    #[serde(default)]
    pub data_source: Option<DataSource>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub google_place_id: Option<String>,
    #[serde(default)]
    pub is_open: Option<bool>,
}

impl Market {
    pub fn covered(&self) -> bool {
        self.is_covered.unwrap_or(false)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }

    /// Photo URLs in display order.
    pub fn photo_urls(&self) -> impl Iterator<Item = &str> {
        self.photos.iter().map(|p| p.photo_url.as_str())
    }

    /// Photo flagged primary, else the first one.
    pub fn primary_photo(&self) -> Option<&MarketPhoto> {
        self.photos
            .iter()
            .find(|p| p.is_primary == Some(true))
            .or_else(|| self.photos.first())
    }

    /// Crowd level at `hour`: the live override when it parses, else the
    /// schedule slot for that hour.
    pub fn crowd_level_at(&self, hour: u32) -> CrowdLevel {
        self.current_crowd_level
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| self.crowd.level_at(hour))
    }

    /// Crowd level right now. Reads the wall clock on every call.
    pub fn current_crowd_level(&self) -> CrowdLevel {
        self.crowd_level_at(Local::now().hour())
    }

    /// "Open: 8:00 AM - 2:00 PM" style summary.
    pub fn hours_summary(&self) -> String {
        time_utils::format_market_hours(self.opening_time, self.closing_time, self.is_open)
    }
}

/// Aggregate counters from the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatistics {
    pub total_markets: u64,
    pub covered_markets: u64,
    /// Counters added by newer backends.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Market service health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
