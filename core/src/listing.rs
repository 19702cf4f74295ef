use serde::Deserialize;
use serde_json::Value;

/// Largest float that still holds every smaller integer exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A tile's station directory as returned by the provider.
///
/// `data` is a flat array of station tuples, each `items` fields wide; the
/// first field of every tuple is the station identifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationListing {
    #[serde(default)]
    pub items: usize,
    #[serde(default)]
    pub data: Vec<Value>,
}

impl StationListing {
    /// Number of complete tuples. A trailing partial tuple is not counted.
    pub fn station_count(&self) -> usize {
        if self.items == 0 {
            return 0;
        }
        self.data.len() / self.items
    }

    /// Identifiers in listing order, read at `i * items` for each tuple.
    ///
    /// Numeric identifiers are rendered as strings; tuples whose first
    /// field is anything else are skipped.
    pub fn station_ids(&self) -> Vec<String> {
        (0..self.station_count())
            .filter_map(|index| station_id(&self.data[index * self.items]))
            .collect()
    }
}

fn station_id(field: &Value) -> Option<String> {
    match field {
        Value::String(id) => {
            let id = id.trim();
            (!id.is_empty()).then(|| id.to_string())
        }
        Value::Number(number) => number
            .as_u64()
            .map(|id| id.to_string())
            .or_else(|| number.as_i64().map(|id| id.to_string()))
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|id| id.fract() == 0.0 && id.abs() < MAX_EXACT_INTEGER)
                    .map(|id| (id as i64).to_string())
            })
            .or_else(|| Some(number.to_string())),
        _ => None,
    }
}
