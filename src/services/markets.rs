// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Market endpoints.

use crate::error::Result;
use crate::models::{CrowdLevel, HealthStatus, Market, MarketStatistics, TimeOfDay};
use crate::services::gateway::Gateway;

const MARKETS_PATH: &str = "/api/markets";

/// Radius in kilometres used when a nearby search does not give one.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Minimum rating used when a high-rated search does not give one.
pub const DEFAULT_MIN_RATING: f64 = 4.0;

/// Market API client.
#[derive(Clone)]
pub struct MarketsApi {
    gateway: Gateway,
}

impl MarketsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn all(&self) -> Result<Vec<Market>> {
        self.gateway.get_json(MARKETS_PATH, &[]).await
    }

    pub async fn by_id(&self, id: i64) -> Result<Market> {
        self.gateway
            .get_json(&format!("{}/{}", MARKETS_PATH, id), &[])
            .await
    }

    /// Search by name, falling back to specialty on the server side.
    pub async fn search(&self, name: Option<&str>, specialty: Option<&str>) -> Result<Vec<Market>> {
        let mut query = Vec::new();
        if let Some(name) = name {
            query.push(("name", name.to_string()));
        }
        if let Some(specialty) = specialty {
            query.push(("specialty", specialty.to_string()));
        }
        self.gateway
            .get_json(&format!("{}/search", MARKETS_PATH), &query)
            .await
    }

    pub async fn nearby(&self, latitude: f64, longitude: f64, radius_km: f64) -> Result<Vec<Market>> {
        self.gateway
            .get_json(
                &format!("{}/nearby", MARKETS_PATH),
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("radius", radius_km.to_string()),
                ],
            )
            .await
    }

    pub async fn covered(&self) -> Result<Vec<Market>> {
        self.gateway
            .get_json(&format!("{}/covered", MARKETS_PATH), &[])
            .await
    }

    pub async fn by_crowd_level(&self, time_of_day: TimeOfDay, level: CrowdLevel) -> Result<Vec<Market>> {
        self.gateway
            .get_json(
                &format!("{}/crowd-level", MARKETS_PATH),
                &[
                    ("timeOfDay", time_of_day.as_str().to_string()),
                    ("crowdLevel", level.as_str().to_string()),
                ],
            )
            .await
    }

    pub async fn high_rated(&self, min_rating: f64) -> Result<Vec<Market>> {
        self.gateway
            .get_json(
                &format!("{}/high-rated", MARKETS_PATH),
                &[("minRating", min_rating.to_string())],
            )
            .await
    }

    pub async fn statistics(&self) -> Result<MarketStatistics> {
        self.gateway
            .get_json(&format!("{}/statistics", MARKETS_PATH), &[])
            .await
    }

    /// Refresh a market from external place data. Returns the server's
    /// status message.
    pub async fn sync(&self, id: i64) -> Result<String> {
        let body = self
            .gateway
            .post::<serde_json::Value>(&format!("{}/{}/sync", MARKETS_PATH, id), None)
            .await?;
        Ok(body.into_text())
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.gateway
            .get_json(&format!("{}/health", MARKETS_PATH), &[])
            .await
    }
}
