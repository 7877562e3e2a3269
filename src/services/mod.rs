// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend API access.

pub mod auth;
pub mod gateway;
pub mod markets;
pub mod transport;
pub mod weather;

pub use auth::{AuthApi, FederatedProvider};
pub use gateway::{ApiBody, Gateway};
pub use markets::MarketsApi;
pub use transport::{ApiRequest, RawResponse, RequestBody, ReqwestTransport, Transport, TransportError, UploadFile};
pub use weather::WeatherApi;
