use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use windy_core::PathValue;

const SOURCE_LABEL: &str = "windy";

/// Sink for normalized observations.
pub trait Publisher: Send + Sync + 'static {
    /// `key` is the lower-cased station identifier that prefixes every path.
    fn publish(&self, key: &str, values: Vec<PathValue>);
}

impl<T: Publisher> Publisher for Arc<T> {
    fn publish(&self, key: &str, values: Vec<PathValue>) {
        (**self).publish(key, values)
    }
}

#[derive(Serialize)]
struct Delta<'a> {
    updates: [Update<'a>; 1],
}

#[derive(Serialize)]
struct Update<'a> {
    source: Source<'a>,
    timestamp: String,
    values: &'a [PathValue],
}

#[derive(Serialize)]
struct Source<'a> {
    label: &'a str,
    station: &'a str,
}

fn delta_line(key: &str, values: &[PathValue], timestamp: String) -> serde_json::Result<String> {
    serde_json::to_string(&Delta {
        updates: [Update {
            source: Source {
                label: SOURCE_LABEL,
                station: key,
            },
            timestamp,
            values,
        }],
    })
}

/// Writes one JSON delta per observation to stdout, newline delimited.
#[derive(Default)]
pub struct StdoutPublisher;

impl Publisher for StdoutPublisher {
    fn publish(&self, key: &str, values: Vec<PathValue>) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = match delta_line(key, &values, timestamp) {
            Ok(line) => line,
            Err(err) => {
                crate::logging::Logger::new()
                    .station(key)
                    .error("publish.encode_failed", &err, "Failed to encode delta");
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{line}").and_then(|()| stdout.flush()) {
            crate::logging::Logger::new()
                .station(key)
                .error("publish.write_failed", &err, "Failed to write delta");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn delta_wraps_values_in_a_single_update() {
        let values = vec![
            PathValue {
                path: "observations.windy.abc.name".to_string(),
                value: json!("Test"),
            },
            PathValue {
                path: "observations.windy.abc.temperature".to_string(),
                value: Value::Null,
            },
        ];
        let line = delta_line("abc", &values, "2026-10-19T08:00:00.000Z".to_string()).unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            parsed,
            json!({
                "updates": [{
                    "source": {"label": "windy", "station": "abc"},
                    "timestamp": "2026-10-19T08:00:00.000Z",
                    "values": [
                        {"path": "observations.windy.abc.name", "value": "Test"},
                        {"path": "observations.windy.abc.temperature", "value": null},
                    ],
                }],
            })
        );
        assert!(!line.contains('\n'));
    }
}
