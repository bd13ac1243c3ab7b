use serde::{Deserialize, Serialize};
use std::fmt;

/// What to look up: a city name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Query {
    pub fn city(name: impl Into<String>) -> Self {
        Query::City(name.into())
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Query::Coordinates { lat, lon }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::City(name) => f.write_str(name),
            Query::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}

/// Symbolic icon for a condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKey {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Fog,
    Clear,
    Cloud,
}

impl IconKey {
    /// Map a provider condition code onto an icon. Codes outside the known
    /// groups fall back to [`IconKey::Cloud`].
    pub fn from_condition(condition_id: i64) -> Self {
        match condition_id {
            200..=232 => IconKey::Thunderstorm,
            300..=321 => IconKey::Drizzle,
            500..=531 => IconKey::Rain,
            600..=622 => IconKey::Snow,
            700..=781 => IconKey::Fog,
            800 => IconKey::Clear,
            _ => IconKey::Cloud,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconKey::Thunderstorm => "thunderstorm",
            IconKey::Drizzle => "drizzle",
            IconKey::Rain => "rain",
            IconKey::Snow => "snow",
            IconKey::Fog => "fog",
            IconKey::Clear => "clear",
            IconKey::Cloud => "cloud",
        }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weather observation, as returned by a single successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherModel {
    pub condition_id: i64,
    pub description: String,
    pub city_name: String,
    pub temperature_c: f64,
}

impl WeatherModel {
    /// Temperature with exactly one fractional digit.
    ///
    /// Uses `{:.1}` formatting, which rounds the exact binary value with ties
    /// to even.
    pub fn temperature_display(&self) -> String {
        format!("{:.1}", self.temperature_c)
    }

    pub fn icon_key(&self) -> IconKey {
        IconKey::from_condition(self.condition_id)
    }
}

impl fmt::Display for WeatherModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}°C, {} ({})",
            self.city_name,
            self.temperature_display(),
            self.description,
            self.icon_key()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(condition_id: i64, temperature_c: f64) -> WeatherModel {
        WeatherModel {
            condition_id,
            description: "test".to_string(),
            city_name: "Testville".to_string(),
            temperature_c,
        }
    }

    #[test]
    fn icon_key_covers_range_boundaries() {
        let cases = [
            (200, IconKey::Thunderstorm),
            (232, IconKey::Thunderstorm),
            (300, IconKey::Drizzle),
            (321, IconKey::Drizzle),
            (500, IconKey::Rain),
            (531, IconKey::Rain),
            (600, IconKey::Snow),
            (622, IconKey::Snow),
            (700, IconKey::Fog),
            (781, IconKey::Fog),
            (800, IconKey::Clear),
        ];

        for (code, expected) in cases {
            assert_eq!(model(code, 0.0).icon_key(), expected, "code {code}");
        }
    }

    #[test]
    fn icon_key_defaults_to_cloud() {
        for code in [-1, 0, 199, 233, 299, 322, 450, 532, 623, 699, 782, 801, 804, 10_000] {
            assert_eq!(model(code, 0.0).icon_key(), IconKey::Cloud, "code {code}");
        }
    }

    #[test]
    fn icon_key_strings() {
        assert_eq!(IconKey::from_condition(211).as_str(), "thunderstorm");
        assert_eq!(IconKey::from_condition(741).to_string(), "fog");
        assert_eq!(IconKey::from_condition(803).as_str(), "cloud");
    }

    #[test]
    fn temperature_display_has_one_fractional_digit() {
        assert_eq!(model(800, 21.34).temperature_display(), "21.3");
        assert_eq!(model(800, -5.0).temperature_display(), "-5.0");
        assert_eq!(model(800, 21.0).temperature_display(), "21.0");
        assert_eq!(model(800, 18.26).temperature_display(), "18.3");
    }

    #[test]
    fn display_summarises_model() {
        let m = WeatherModel {
            condition_id: 800,
            description: "clear sky".to_string(),
            city_name: "London".to_string(),
            temperature_c: 18.2,
        };
        assert_eq!(m.to_string(), "London: 18.2°C, clear sky (clear)");
    }

    #[test]
    fn query_display() {
        assert_eq!(Query::city("Paris").to_string(), "Paris");
        assert_eq!(Query::coordinates(51.5, -0.12).to_string(), "51.5,-0.12");
    }
}
