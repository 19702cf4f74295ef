use crate::{
    ExclusionList, PUBLISH_NAMESPACE, Position, STATION_INFO_URL,
    units::{celsius_to_kelvin, deg_to_rad},
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, Visitor},
};
use serde_json::{Value, json};
use std::fmt;

/// Characters escaped when an identifier is placed in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encodes `raw` so it stays one path segment: `/`, `?` and `#`
/// cannot change which resource a URL points at.
pub fn encode_path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// A station discovered in a tile listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Identifier as the provider spells it, used in request paths.
    pub id: String,
    /// Lower-cased identifier, used in publish paths and the info URL.
    pub key: String,
    pub excluded: bool,
}

impl Station {
    pub fn new(id: impl Into<String>, exclusions: &ExclusionList) -> Self {
        let id = id.into();
        Self {
            key: id.to_lowercase(),
            excluded: exclusions.is_excluded(&id),
            id,
        }
    }

    /// Provider identifier encoded for use in a request path.
    pub fn path_segment(&self) -> String {
        encode_path_segment(&self.id)
    }

    pub fn info_url(&self) -> String {
        format!("{STATION_INFO_URL}/{}", encode_path_segment(&self.key))
    }
}

/// Station reading in provider units (degrees, Celsius).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReading {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub wind: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub gust: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub dir: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub temp: Option<f64>,
}

/// A reading normalized to canonical units (radians, Kelvin).
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station: String,
    pub name: Option<String>,
    pub date: Option<Value>,
    pub position: Option<Position>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_direction: Option<f64>,
    pub temperature: Option<f64>,
    pub url: String,
}

/// One `(path, value)` entry handed to the publish sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathValue {
    pub path: String,
    pub value: Value,
}

impl Observation {
    pub fn from_reading(station: &Station, reading: RawReading) -> Self {
        let position = match (reading.lat, reading.lon) {
            (Some(latitude), Some(longitude)) => Some(Position::new(latitude, longitude)),
            _ => None,
        };
        Self {
            station: station.key.clone(),
            name: reading.name,
            date: reading.time,
            position,
            wind_speed: reading.wind,
            wind_gust: reading.gust,
            wind_direction: deg_to_rad(reading.dir),
            temperature: celsius_to_kelvin(reading.temp),
            url: station.info_url(),
        }
    }

    /// Path prefix for this station, `observations.windy.<key>`.
    pub fn namespace(&self) -> String {
        format!("{PUBLISH_NAMESPACE}.{}", self.station)
    }

    /// The eight published entries, always in the same order.
    pub fn path_values(&self) -> Vec<PathValue> {
        let namespace = self.namespace();
        let entry = |leaf: &str, value: Value| PathValue {
            path: format!("{namespace}.{leaf}"),
            value,
        };
        vec![
            entry("name", json!(self.name)),
            entry("date", self.date.clone().unwrap_or(Value::Null)),
            entry("position", json!(self.position)),
            entry("wind.speed", json!(self.wind_speed)),
            entry("wind.gust", json!(self.wind_gust)),
            entry("wind.direction", json!(self.wind_direction)),
            entry("temperature", json!(self.temperature)),
            entry("url", json!(self.url)),
        ]
    }
}

fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionalNumberVisitor;

    impl<'de> Visitor<'de> for OptionalNumberVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, a string representing a number, or null")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Option<f64>, E> {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Option<f64>, E> {
            Ok(Some(value as f64))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Option<f64>, E> {
            Ok(Some(value as f64))
        }

        fn visit_str<E>(self, value: &str) -> Result<Option<f64>, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            value.parse::<f64>().map(Some).map_err(de::Error::custom)
        }

        fn visit_none<E>(self) -> Result<Option<f64>, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Option<f64>, E> {
            Ok(None)
        }

        fn visit_some<S>(self, deserializer: S) -> Result<Option<f64>, S::Error>
        where
            S: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(OptionalNumberVisitor)
}
