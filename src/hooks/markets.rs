// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Market list and market detail hooks.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::hooks::resource::{ApiResource, RequestState};
use crate::models::{CrowdLevel, Market, TimeOfDay};
use crate::services::markets::{MarketsApi, DEFAULT_NEARBY_RADIUS_KM};

/// Filters for the market list. Only one applies; see [`MarketQuery::lookup`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketQuery {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
    pub covered: bool,
    pub min_rating: Option<f64>,
}

impl MarketQuery {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn near(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn within_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    pub fn covered_only(mut self) -> Self {
        self.covered = true;
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    /// Pick the single backend query for these filters.
    ///
    /// Priority: name/specialty search, then nearby (needs both
    /// coordinates), then covered, then minimum rating, then all markets.
    pub fn lookup(&self) -> MarketLookup {
        let name = non_empty(&self.name);
        let specialty = non_empty(&self.specialty);
        if name.is_some() || specialty.is_some() {
            return MarketLookup::Search { name, specialty };
        }
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            return MarketLookup::Nearby {
                latitude,
                longitude,
                radius_km: self.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM),
            };
        }
        if self.covered {
            return MarketLookup::Covered;
        }
        if let Some(min_rating) = self.min_rating {
            return MarketLookup::HighRated { min_rating };
        }
        MarketLookup::All
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

/// One backend market query.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketLookup {
    Search {
        name: Option<String>,
        specialty: Option<String>,
    },
    Nearby {
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    },
    Covered,
    HighRated {
        min_rating: f64,
    },
    All,
}

impl MarketLookup {
    pub async fn fetch(&self, api: &MarketsApi) -> Result<Vec<Market>> {
        match self {
            MarketLookup::Search { name, specialty } => {
                api.search(name.as_deref(), specialty.as_deref()).await
            }
            MarketLookup::Nearby {
                latitude,
                longitude,
                radius_km,
            } => api.nearby(*latitude, *longitude, *radius_km).await,
            MarketLookup::Covered => api.covered().await,
            MarketLookup::HighRated { min_rating } => api.high_rated(*min_rating).await,
            MarketLookup::All => api.all().await,
        }
    }
}

/// Market list that follows a [`MarketQuery`].
pub struct MarketsHook {
    api: MarketsApi,
    resource: ApiResource<Vec<Market>, MarketQuery>,
}

impl MarketsHook {
    /// Start listing markets for `query`. Must be called within a tokio runtime.
    pub fn mount(api: MarketsApi, query: MarketQuery) -> Self {
        let fetch_api = api.clone();
        let resource = ApiResource::mount(query, move |query: MarketQuery| {
            let api = fetch_api.clone();
            async move {
                let lookup = query.lookup();
                tracing::debug!(?lookup, "Fetching markets");
                lookup.fetch(&api).await
            }
        });
        Self { api, resource }
    }

    pub fn state(&self) -> RequestState<Vec<Market>> {
        self.resource.state()
    }

    /// Markets currently held, empty before the first success.
    pub fn markets(&self) -> Vec<Market> {
        self.resource.state().data.unwrap_or_default()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<Vec<Market>>> {
        self.resource.subscribe()
    }

    pub fn query(&self) -> MarketQuery {
        self.resource.dependencies()
    }

    /// Change the filters; refetches only if they differ by value.
    pub fn set_query(&self, query: MarketQuery) -> Option<JoinHandle<()>> {
        self.resource.set_dependencies(query)
    }

    pub async fn refetch(&self) -> Result<()> {
        self.resource.refetch().await
    }

    pub async fn settled(&self) -> RequestState<Vec<Market>> {
        self.resource.settled().await
    }

    /// Replace the list with a name/specialty search.
    pub async fn search(&self, name: Option<&str>, specialty: Option<&str>) -> Result<()> {
        self.resource.run_with(self.api.search(name, specialty)).await
    }

    /// Replace the list with markets near a point.
    pub async fn nearby(&self, latitude: f64, longitude: f64, radius_km: Option<f64>) -> Result<()> {
        let radius = radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
        self.resource
            .run_with(self.api.nearby(latitude, longitude, radius))
            .await
    }

    /// Replace the list with markets at `level` during `time_of_day`.
    pub async fn by_crowd_level(&self, time_of_day: TimeOfDay, level: CrowdLevel) -> Result<()> {
        self.resource
            .run_with(self.api.by_crowd_level(time_of_day, level))
            .await
    }
}

/// A single market, re-fetched when the id changes.
pub struct MarketDetailHook {
    resource: ApiResource<Market, i64>,
}

impl MarketDetailHook {
    /// Must be called within a tokio runtime.
    pub fn mount(api: MarketsApi, id: i64) -> Self {
        let resource = ApiResource::mount(id, move |id: i64| {
            let api = api.clone();
            async move { api.by_id(id).await }
        });
        Self { resource }
    }

    pub fn state(&self) -> RequestState<Market> {
        self.resource.state()
    }

    pub fn market(&self) -> Option<Market> {
        self.resource.state().data
    }

    pub fn set_market_id(&self, id: i64) -> Option<JoinHandle<()>> {
        self.resource.set_dependencies(id)
    }

    pub async fn refetch(&self) -> Result<()> {
        self.resource.refetch().await
    }

    pub async fn settled(&self) -> RequestState<Market> {
        self.resource.settled().await
    }
}
