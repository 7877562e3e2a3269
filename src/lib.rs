// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Market-Client: discover local markets, their crowd levels and the weather
//!
//! This crate provides the client side of the market discovery API: a
//! request gateway, the session state machine, and fetch-and-cache hooks
//! for markets and weather.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;
pub mod time_utils;
pub mod validation;

use std::sync::Arc;

use config::Config;
use hooks::{MarketDetailHook, MarketQuery, MarketsHook, WeatherHook};
use navigation::Navigator;
use services::{AuthApi, Gateway, MarketsApi, Transport, WeatherApi};
use session::AuthContext;

/// Shared client state, created once at startup.
pub struct MarketClient {
    pub gateway: Gateway,
    pub auth: Arc<AuthContext>,
    pub markets: MarketsApi,
    pub weather: WeatherApi,
}

impl MarketClient {
    /// Client talking HTTP to the configured backend.
    pub fn new(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self, reqwest::Error> {
        Ok(Self::from_gateway(Gateway::from_config(config, navigator)?))
    }

    /// Client over an explicit transport.
    pub fn with_transport(
        base_url: &str,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::from_gateway(Gateway::new(base_url, transport, navigator))
    }

    fn from_gateway(gateway: Gateway) -> Self {
        Self {
            auth: Arc::new(AuthContext::new(AuthApi::new(gateway.clone()))),
            markets: MarketsApi::new(gateway.clone()),
            weather: WeatherApi::new(gateway.clone()),
            gateway,
        }
    }

    /// Market list following `query`. Must be called within a tokio runtime.
    pub fn markets_hook(&self, query: MarketQuery) -> MarketsHook {
        MarketsHook::mount(self.markets.clone(), query)
    }

    /// One market by id. Must be called within a tokio runtime.
    pub fn market_detail(&self, id: i64) -> MarketDetailHook {
        MarketDetailHook::mount(self.markets.clone(), id)
    }

    /// Weather for the default location. Must be called within a tokio runtime.
    pub fn weather_hook(&self) -> WeatherHook {
        WeatherHook::mount(self.weather.clone())
    }
}
