// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation seam between the client and whatever hosts it.
//!
//! The gateway needs to send the user to the login page on a 401, and the
//! session context needs to know which page it was started on. Both go
//! through [`Navigator`] so neither depends on a routing framework.

use parking_lot::RwLock;

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";
/// Path of the registration page.
pub const REGISTER_PATH: &str = "/register";
/// Path of the landing page.
pub const HOME_PATH: &str = "/";

/// Pages reachable without a session.
pub const PUBLIC_PATHS: &[&str] = &[LOGIN_PATH, REGISTER_PATH];

/// Host-provided navigation.
pub trait Navigator: Send + Sync {
    /// Path of the page currently shown (e.g. `/markets`).
    fn current_path(&self) -> String;

    /// Leave the current page for `location`, an app path or an absolute URL.
    fn navigate(&self, location: &str);
}

/// In-memory navigator that records every navigation.
///
/// Used by the CLI and by tests; app paths update [`Navigator::current_path`],
/// absolute URLs (federated login) only land in the history.
#[derive(Debug)]
pub struct HistoryNavigator {
    path: RwLock<String>,
    history: RwLock<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new(start_path: &str) -> Self {
        Self {
            path: RwLock::new(start_path.to_string()),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Every location passed to `navigate`, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.read().clone()
    }

    /// Most recent navigation target, if any.
    pub fn last_location(&self) -> Option<String> {
        self.history.read().last().cloned()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(HOME_PATH)
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> String {
        self.path.read().clone()
    }

    fn navigate(&self, location: &str) {
        tracing::debug!(from = %self.current_path(), to = location, "Navigating");
        if location.starts_with('/') {
            *self.path.write() = location.to_string();
        }
        self.history.write().push(location.to_string());
    }
}
