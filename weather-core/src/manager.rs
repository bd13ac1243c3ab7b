//! Fire-and-forget weather fetches with a single result callback.
//!
//! [`WeatherManager`] spawns every fetch as its own task on a tokio runtime and
//! hands the outcome to a [`WeatherListener`] exactly once. The listener runs on
//! a worker thread of that runtime, never on the caller's thread; hosts that
//! need updates on a specific thread should use [`WeatherManager::with_channel`]
//! and drain the receiver wherever they like.

use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::debug;

use crate::{FetchError, Query, WeatherModel, WeatherProvider};

/// Outcome of one fetch, tagged with the query that produced it.
#[derive(Debug)]
pub struct WeatherUpdate {
    pub query: Query,
    pub result: Result<WeatherModel, FetchError>,
}

pub trait WeatherListener: Send + Sync + 'static {
    fn on_update(&self, update: WeatherUpdate);
}

impl<F> WeatherListener for F
where
    F: Fn(WeatherUpdate) + Send + Sync + 'static,
{
    fn on_update(&self, update: WeatherUpdate) {
        self(update)
    }
}

/// Forwards every update into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: UnboundedSender<WeatherUpdate>,
}

impl ChannelListener {
    pub fn new() -> (Self, UnboundedReceiver<WeatherUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl WeatherListener for ChannelListener {
    fn on_update(&self, update: WeatherUpdate) {
        if let Err(err) = self.tx.send(update) {
            debug!(query = %err.0.query, "Dropping weather update, receiver is gone");
        }
    }
}

#[derive(Clone)]
pub struct WeatherManager {
    provider: Arc<dyn WeatherProvider>,
    listener: Arc<dyn WeatherListener>,
    runtime: Handle,
}

impl WeatherManager {
    /// Spawns fetches on the runtime this is called from.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime. Use
    /// [`WeatherManager::with_runtime`] to pass a handle explicitly.
    pub fn new(provider: Arc<dyn WeatherProvider>, listener: impl WeatherListener) -> Self {
        Self::with_runtime(provider, listener, Handle::current())
    }

    pub fn with_runtime(
        provider: Arc<dyn WeatherProvider>,
        listener: impl WeatherListener,
        runtime: Handle,
    ) -> Self {
        Self {
            provider,
            listener: Arc::new(listener),
            runtime,
        }
    }

    /// Manager whose updates arrive on the returned receiver.
    pub fn with_channel(
        provider: Arc<dyn WeatherProvider>,
    ) -> (Self, UnboundedReceiver<WeatherUpdate>) {
        let (listener, rx) = ChannelListener::new();
        (Self::new(provider, listener), rx)
    }

    pub fn fetch_weather_by_city(&self, city_name: impl Into<String>) -> JoinHandle<()> {
        self.fetch(Query::City(city_name.into()))
    }

    pub fn fetch_weather_by_coordinates(&self, lat: f64, lon: f64) -> JoinHandle<()> {
        self.fetch(Query::coordinates(lat, lon))
    }

    /// Start an independent fetch. The listener hears about it exactly once
    /// when the task completes. Dropping the handle does not cancel it.
    pub fn fetch(&self, query: Query) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        let listener = Arc::clone(&self.listener);

        self.runtime.spawn(async move {
            let result = provider.current_weather(&query).await;
            listener.on_update(WeatherUpdate { query, result });
        })
    }
}

impl std::fmt::Debug for WeatherManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherManager")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}
