// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod identity;
pub mod market;
pub mod weather;

pub use identity::{Identity, IdentityKind};
pub use market::{
    Coordinates, CrowdLevel, CrowdSchedule, DataSource, HealthStatus, Market, MarketPhoto,
    MarketStatistics, TimeOfDay,
};
pub use weather::{CurrentConditions, DailyForecast, WeatherSnapshot};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
