// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-demand async action with loading/error state, for form submissions
//! and other user-triggered operations.

use std::fmt::Display;
use std::future::Future;
use tokio::sync::watch;

/// Loading flag and last error of an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Clears `loading` however the attempt ends, including cancellation.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ActionState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}

/// Runs operations on demand and tracks their progress.
pub struct AsyncAction {
    state: watch::Sender<ActionState>,
}

impl Default for AsyncAction {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncAction {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ActionState::default());
        Self { state }
    }

    pub fn state(&self) -> ActionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ActionState> {
        self.state.subscribe()
    }

    /// Run `operation`, recording its error, and hand its outcome back.
    pub async fn execute<T, E, F, Fut>(&self, operation: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let _guard = LoadingGuard { state: &self.state };

        let result = operation().await;
        if let Err(e) = &result {
            let message = e.to_string();
            tracing::debug!(error = %message, "Action failed");
            self.state.send_modify(|s| s.error = Some(message));
        }
        result
    }
}
