use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, de::Error as _};
use tracing::{debug, warn};

use crate::{Config, FetchError, Query, WeatherModel};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;

        let provider = Self::new(api_key);
        Ok(match config.base_url() {
            Some(url) => provider.with_base_url(url),
            None => provider,
        })
    }

    pub async fn fetch_weather_by_city(&self, city_name: &str) -> Result<WeatherModel, FetchError> {
        self.current_weather(&Query::city(city_name)).await
    }

    pub async fn fetch_weather_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherModel, FetchError> {
        self.current_weather(&Query::coordinates(lat, lon)).await
    }

    /// Full request URL for `query`, with every parameter percent-encoded.
    pub fn build_request_url(&self, query: &Query) -> Result<Url, FetchError> {
        let invalid = |reason: String| FetchError::InvalidRequestUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        if let Query::Coordinates { lat, lon } = query {
            if !lat.is_finite() || !lon.is_finite() {
                return Err(invalid(format!("coordinates must be finite, got {lat},{lon}")));
            }
        }

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("appid", &self.api_key)
                .append_pair("units", "metric");

            match query {
                Query::City(name) => {
                    pairs.append_pair("q", name);
                }
                Query::Coordinates { lat, lon } => {
                    pairs
                        .append_pair("lat", &lat.to_string())
                        .append_pair("lon", &lon.to_string());
                }
            }
        }

        Ok(url)
    }

    async fn execute(&self, query: &Query) -> Result<WeatherModel, FetchError> {
        let url = self.build_request_url(query)?;

        debug!(%query, "Requesting current weather from OpenWeather");

        // reqwest errors carry the URL, which contains the API key.
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        decode_current(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &Query) -> Result<WeatherModel, FetchError> {
        let result = self.execute(query).await;

        match &result {
            Ok(model) => debug!(%query, city = %model.city_name, "Weather updated"),
            Err(err) => warn!(%query, kind = err.kind(), error = %err, "Weather fetch failed"),
        }

        result
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Error payload OpenWeather sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct OwErrorResponse {
    message: String,
}

/// Decode a current-weather body. Only the first `weather` entry is used.
pub fn decode_current(body: &str) -> Result<WeatherModel, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(FetchError::Decode)?;

    let condition = parsed.weather.into_iter().next().ok_or_else(|| {
        FetchError::Decode(serde_json::Error::custom("`weather` array is empty"))
    })?;

    Ok(WeatherModel {
        condition_id: condition.id,
        description: condition.description,
        city_name: parsed.name,
        temperature_c: parsed.main.temp,
    })
}

fn provider_message(body: &str) -> String {
    serde_json::from_str::<OwErrorResponse>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
