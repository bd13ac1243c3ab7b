//! Core library for the `weather` lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather model and its derived display values
//! - Abstraction over weather providers, with an OpenWeather implementation
//! - A fetch manager that reports every lookup to a listener exactly once
//!
//! It is used by `weather-lookup-cli`, but can also be embedded in other hosts.

pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::FetchError;
pub use manager::{ChannelListener, WeatherListener, WeatherManager, WeatherUpdate};
pub use model::{IconKey, Query, WeatherModel};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
