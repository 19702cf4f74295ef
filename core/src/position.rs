use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses either `lat,lon` or `{"latitude":..,"longitude":..}`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.starts_with('{') {
            return serde_json::from_str(input).ok();
        }
        let (lat, lon) = input.split_once(',')?;
        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = lon.trim().parse::<f64>().ok()?;
        (latitude.is_finite() && longitude.is_finite()).then(|| Self::new(latitude, longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_comma_separated_pair() {
        assert_eq!(
            Position::parse(" 47.0, -122.5 "),
            Some(Position::new(47.0, -122.5))
        );
    }

    #[test]
    fn parse_json_object() {
        assert_eq!(
            Position::parse(r#"{"latitude": 44.1, "longitude": 12.4}"#),
            Some(Position::new(44.1, 12.4))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Position::parse("north"), None);
        assert_eq!(Position::parse("12.0"), None);
        assert_eq!(Position::parse("NaN,1.0"), None);
    }
}
