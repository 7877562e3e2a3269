// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather endpoints.

use crate::error::Result;
use crate::models::WeatherSnapshot;
use crate::services::gateway::Gateway;

pub const WEATHER_PATH: &str = "/weather/api";
pub const WEATHER_LOCATION_PATH: &str = "/weather/api/location";

/// Weather API client.
#[derive(Clone)]
pub struct WeatherApi {
    gateway: Gateway,
}

impl WeatherApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Current conditions and forecast for the backend's default location.
    pub async fn current(&self) -> Result<WeatherSnapshot> {
        self.gateway.get_json(WEATHER_PATH, &[]).await
    }

    pub async fn at_location(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot> {
        self.gateway
            .get_json(
                WEATHER_LOCATION_PATH,
                &[("lat", lat.to_string()), ("lon", lon.to_string())],
            )
            .await
    }
}
