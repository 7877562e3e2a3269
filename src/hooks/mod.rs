// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stateful data handles over the API services.

pub mod action;
pub mod markets;
pub mod resource;
pub mod weather;

pub use action::{ActionState, AsyncAction};
pub use markets::{MarketDetailHook, MarketLookup, MarketQuery, MarketsHook};
pub use resource::{ApiResource, RequestState};
pub use weather::WeatherHook;
