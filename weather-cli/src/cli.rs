use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::Password;
use tracing::info;
use weather_lookup_core::{Config, Query, WeatherManager, provider_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city or a coordinate pair.
    Show {
        /// City name, e.g. "London" or "São Paulo".
        #[arg(required_unless_present = "lat")]
        city: Option<String>,

        /// Latitude in decimal degrees.
        #[arg(long, requires = "lon", conflicts_with = "city", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                lat,
                lon,
                json,
            } => show(resolve_query(city, lat, lon)?, json).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(query: Query, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;

    let (manager, mut rx) = WeatherManager::with_channel(provider);
    manager
        .fetch(query)
        .await
        .context("Weather fetch task failed")?;

    let update = rx
        .recv()
        .await
        .ok_or_else(|| anyhow!("Weather fetch ended without a result"))?;
    let model = update
        .result
        .with_context(|| format!("Could not fetch weather for {}", update.query))?;

    info!(city = %model.city_name, icon = %model.icon_key(), "Fetched weather");

    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        println!("{model}");
    }

    Ok(())
}

fn resolve_query(city: Option<String>, lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<Query> {
    match (city, lat, lon) {
        (Some(city), None, None) => {
            let city = city.trim();
            if city.is_empty() {
                return Err(anyhow!("City name must not be empty"));
            }
            Ok(Query::city(city))
        }
        (None, Some(lat), Some(lon)) => Ok(Query::coordinates(lat, lon)),
        _ => Err(anyhow!("Pass either a city name or both --lat and --lon")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_city() {
        let cli = Cli::try_parse_from(["weather", "show", "New York"]).unwrap();
        match cli.command {
            Command::Show { city, lat, json, .. } => {
                assert_eq!(city.as_deref(), Some("New York"));
                assert_eq!(lat, None);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli =
            Cli::try_parse_from(["weather", "show", "--lat", "-33.87", "--lon", "151.21", "--json"])
                .unwrap();
        match cli.command {
            Command::Show { city, lat, lon, json } => {
                let query = resolve_query(city, lat, lon).unwrap();
                assert_eq!(query, Query::coordinates(-33.87, 151.21));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_city_with_coordinates() {
        assert!(Cli::try_parse_from(["weather", "show", "Paris", "--lat", "1", "--lon", "2"]).is_err());
    }

    #[test]
    fn rejects_lat_without_lon() {
        assert!(Cli::try_parse_from(["weather", "show", "--lat", "1"]).is_err());
    }

    #[test]
    fn empty_city_is_rejected() {
        let err = resolve_query(Some("  ".to_string()), None, None).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn city_is_trimmed() {
        let query = resolve_query(Some(" Berlin ".to_string()), None, None).unwrap();
        assert_eq!(query, Query::city("Berlin"));
    }
}
