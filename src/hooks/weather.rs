// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather hook: current conditions plus forecast from one call.

use tokio::sync::watch;

use crate::error::Result;
use crate::hooks::resource::{ApiResource, RequestState};
use crate::models::{CurrentConditions, DailyForecast, WeatherSnapshot};
use crate::services::weather::WeatherApi;

pub struct WeatherHook {
    api: WeatherApi,
    resource: ApiResource<WeatherSnapshot>,
}

impl WeatherHook {
    /// Fetch weather for the default location. Must be called within a tokio
    /// runtime.
    pub fn mount(api: WeatherApi) -> Self {
        let fetch_api = api.clone();
        let resource = ApiResource::mount((), move |_| {
            let api = fetch_api.clone();
            async move { api.current().await }
        });
        Self { api, resource }
    }

    pub fn state(&self) -> RequestState<WeatherSnapshot> {
        self.resource.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<WeatherSnapshot>> {
        self.resource.subscribe()
    }

    pub fn weather(&self) -> Option<CurrentConditions> {
        self.resource.state().data.map(|s| s.current())
    }

    pub fn forecast(&self) -> Vec<DailyForecast> {
        self.resource
            .state()
            .data
            .map(|s| s.forecast)
            .unwrap_or_default()
    }

    pub async fn refetch(&self) -> Result<()> {
        self.resource.refetch().await
    }

    /// Replace the snapshot with weather at explicit coordinates.
    pub async fn fetch_for_location(&self, lat: f64, lon: f64) -> Result<()> {
        self.resource.run_with(self.api.at_location(lat, lon)).await
    }

    pub async fn settled(&self) -> RequestState<WeatherSnapshot> {
        self.resource.settled().await
    }
}
