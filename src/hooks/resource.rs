// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auto-fetching resource with loading/error state.
//!
//! An [`ApiResource`] owns one [`RequestState`] and a fetcher keyed by a
//! dependency value. It fetches when mounted and again whenever the
//! dependency changes by value. State is published on a `watch` channel.
//!
//! Every fetch run gets a liveness token. Starting a new run, or dropping the
//! resource, invalidates the previous token, and a run whose token is dead
//! leaves the state alone when it completes. Older requests are not cancelled;
//! their results are just discarded.

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Result;

/// Data, loading flag and last error of one fetchable value.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> RequestState<T> {
    /// Start of an attempt: loading, previous error cleared, data kept.
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
    }

    fn fail(&mut self, error: String) {
        self.error = Some(error);
        self.loading = false;
    }
}

type Fetcher<T, D> = Arc<dyn Fn(D) -> BoxFuture<'static, Result<T>> + Send + Sync>;

struct Shared<T, D> {
    fetcher: Fetcher<T, D>,
    state: watch::Sender<RequestState<T>>,
    deps: Mutex<D>,
    live: Mutex<Arc<AtomicBool>>,
}

impl<T, D> Shared<T, D> {
    /// Invalidate the current run and hand out a token for a new one.
    fn begin_run(&self) -> Arc<AtomicBool> {
        let token = Arc::new(AtomicBool::new(true));
        let previous = std::mem::replace(&mut *self.live.lock(), token.clone());
        previous.store(false, Ordering::Release);
        self.state.send_modify(RequestState::begin);
        token
    }
}

/// Releases `loading` if a live run ends without reporting, e.g. because its
/// future was dropped mid-flight.
struct RunGuard<'a, T> {
    state: &'a watch::Sender<RequestState<T>>,
    token: Arc<AtomicBool>,
    done: bool,
}

impl<T> Drop for RunGuard<'_, T> {
    fn drop(&mut self) {
        if !self.done && self.token.load(Ordering::Acquire) {
            self.state.send_modify(|s| s.loading = false);
        }
    }
}

async fn complete_run<T, Fut>(
    state: &watch::Sender<RequestState<T>>,
    token: Arc<AtomicBool>,
    fut: Fut,
) -> Result<()>
where
    T: Send + Sync,
    Fut: Future<Output = Result<T>>,
{
    let mut guard = RunGuard {
        state,
        token,
        done: false,
    };
    let result = fut.await;
    guard.done = true;

    if !guard.token.load(Ordering::Acquire) {
        tracing::debug!("Discarding stale response");
        return result.map(|_| ());
    }

    match result {
        Ok(data) => {
            state.send_modify(|s| s.succeed(data));
            Ok(())
        }
        Err(e) => {
            let message = e.to_string();
            state.send_modify(|s| s.fail(message));
            Err(e)
        }
    }
}

/// A fetchable value keyed by dependencies `D`.
pub struct ApiResource<T, D = ()> {
    shared: Arc<Shared<T, D>>,
}

impl<T, D> ApiResource<T, D>
where
    T: Clone + Send + Sync + 'static,
    D: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create without fetching.
    pub fn new<F, Fut>(deps: D, fetch: F) -> Self
    where
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let fetcher: Fetcher<T, D> = Arc::new(move |d| Box::pin(fetch(d)));
        let (state, _) = watch::channel(RequestState::default());
        Self {
            shared: Arc::new(Shared {
                fetcher,
                state,
                deps: Mutex::new(deps),
                live: Mutex::new(Arc::new(AtomicBool::new(true))),
            }),
        }
    }

    /// Create and start the first fetch in the background.
    ///
    /// Must be called within a tokio runtime.
    pub fn mount<F, Fut>(deps: D, fetch: F) -> Self
    where
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let resource = Self::new(deps, fetch);
        resource.spawn_fetch();
        resource
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState<T> {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.shared.state.subscribe()
    }

    pub fn dependencies(&self) -> D {
        self.shared.deps.lock().clone()
    }

    /// Update the dependencies; refetches in the background only when the
    /// new value differs from the current one.
    pub fn set_dependencies(&self, deps: D) -> Option<JoinHandle<()>> {
        {
            let mut current = self.shared.deps.lock();
            if *current == deps {
                return None;
            }
            *current = deps;
        }
        Some(self.spawn_fetch())
    }

    /// Fetch again with the current dependencies and wait for the outcome.
    pub async fn refetch(&self) -> Result<()> {
        let deps = self.dependencies();
        let fut = (self.shared.fetcher)(deps);
        self.run_with(fut).await
    }

    /// Run an ad-hoc operation through this resource's lifecycle: its result
    /// replaces the data, its failure is recorded as the error.
    pub async fn run_with<Fut>(&self, fut: Fut) -> Result<()>
    where
        Fut: Future<Output = Result<T>>,
    {
        let token = self.shared.begin_run();
        complete_run(&self.shared.state, token, fut).await
    }

    /// Wait until no fetch is in flight and return the state.
    pub async fn settled(&self) -> RequestState<T> {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|s| !s.loading).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    fn spawn_fetch(&self) -> JoinHandle<()> {
        let token = self.shared.begin_run();
        let shared = self.shared.clone();
        let deps = self.dependencies();
        tokio::spawn(async move {
            let fut = (shared.fetcher)(deps);
            // Failures are recorded in the state
            let _ = complete_run(&shared.state, token, fut).await;
        })
    }
}

impl<T, D> Drop for ApiResource<T, D> {
    fn drop(&mut self) {
        self.shared.live.lock().store(false, Ordering::Release);
    }
}
