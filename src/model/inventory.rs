//! Occurrence counts over detections, for inventory summaries.

use super::Detection;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Count of each distinct value, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Occurrences {
    pub entries: IndexMap<String, usize>,
}

impl Occurrences {
    fn record(&mut self, value: &str) {
        *self.entries.entry(value.to_string()).or_insert(0) += 1;
    }

    /// Number of distinct values.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Occurrences of one value.
    #[must_use]
    pub fn count(&self, value: &str) -> usize {
        self.entries.get(value).copied().unwrap_or(0)
    }
}

/// Count values of `cryptoProperties.algorithmProperties.<property>`.
///
/// The property may be a string or an array of strings.
#[must_use]
pub fn count_algorithm_property(detections: &[Detection], property: &str) -> Occurrences {
    let mut occurrences = Occurrences::default();
    for detection in detections {
        let Some(raw) = detection
            .crypto_properties()
            .and_then(|c| c.get("algorithmProperties"))
            .and_then(|a| a.get(property))
        else {
            continue;
        };
        match raw {
            Value::String(s) if !s.is_empty() => occurrences.record(s),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .for_each(|s| occurrences.record(s)),
            _ => {}
        }
    }
    occurrences
}

/// Count raw component names.
#[must_use]
pub fn count_names(detections: &[Detection]) -> Occurrences {
    let mut occurrences = Occurrences::default();
    for name in detections.iter().filter_map(Detection::name) {
        if !name.is_empty() {
            occurrences.record(name);
        }
    }
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detection(name: &str, algorithm_properties: Value) -> Detection {
        Detection {
            component_index: 0,
            occurrence_index: None,
            component: json!({
                "type": "cryptographic-asset",
                "name": name,
                "cryptoProperties": {"algorithmProperties": algorithm_properties}
            }),
        }
    }

    #[test]
    fn test_count_string_and_array_properties() {
        let detections = vec![
            detection("AES", json!({"primitive": "block-cipher", "cryptoFunctions": ["encrypt"]})),
            detection("AES", json!({"primitive": "block-cipher", "cryptoFunctions": ["encrypt", "decrypt"]})),
            detection("RSA", json!({"primitive": "pke"})),
        ];

        let primitives = count_algorithm_property(&detections, "primitive");
        assert_eq!(primitives.distinct(), 2);
        assert_eq!(primitives.count("block-cipher"), 2);

        let functions = count_algorithm_property(&detections, "cryptoFunctions");
        assert_eq!(functions.count("encrypt"), 2);
        assert_eq!(functions.count("decrypt"), 1);
        assert_eq!(functions.count("sign"), 0);
    }

    #[test]
    fn test_count_names_in_first_seen_order() {
        let detections = vec![
            detection("RSA", json!({})),
            detection("AES", json!({})),
            detection("RSA", json!({})),
        ];
        let names = count_names(&detections);
        let order: Vec<_> = names.entries.keys().cloned().collect();
        assert_eq!(order, vec!["RSA", "AES"]);
        assert_eq!(names.count("RSA"), 2);
    }
}
