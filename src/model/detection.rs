//! Detections: components narrowed to a single evidence occurrence.
//!
//! A CBOM component lists every place it was found under
//! `evidence.occurrences`. Consumers work per occurrence, so each component
//! is unwrapped into one [`Detection`] per occurrence.

use serde::Serialize;
use serde_json::Value;

/// Component type that is in scope for analysis.
pub const CRYPTO_ASSET_TYPE: &str = "cryptographic-asset";

/// A cryptographic-asset component narrowed to one evidence occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Index of the originating component in `components`
    pub component_index: usize,
    /// Index of the occurrence within the original `evidence.occurrences`,
    /// `None` when the component had no occurrences
    pub occurrence_index: Option<usize>,
    /// Deep copy of the component, holding at most one occurrence
    pub component: Value,
}

/// One evidence occurrence (`{location, line}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub location: Option<&'a str>,
    pub line: Option<u64>,
}

impl Detection {
    /// The component's `bom-ref`, if it is a string.
    #[must_use]
    pub fn bom_ref(&self) -> Option<&str> {
        self.component.get("bom-ref").and_then(Value::as_str)
    }

    /// The raw component name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.component.get("name").and_then(Value::as_str)
    }

    /// The name as shown to users, without its `@` identifier suffix.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name().map(strip_identifier_suffix)
    }

    /// `cryptoProperties`, when present.
    #[must_use]
    pub fn crypto_properties(&self) -> Option<&Value> {
        self.component.get("cryptoProperties")
    }

    /// The single occurrence carried by this detection.
    #[must_use]
    pub fn occurrence(&self) -> Option<Occurrence<'_>> {
        let occurrences = self
            .component
            .get("evidence")?
            .get("occurrences")?
            .as_array()?;
        let [only] = occurrences.as_slice() else {
            return None;
        };
        Some(Occurrence {
            location: only.get("location").and_then(Value::as_str),
            line: only.get("line").and_then(Value::as_u64),
        })
    }
}

/// Result of expanding a component list.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub detections: Vec<Detection>,
    /// Number of components skipped because they are not cryptographic assets
    pub ignored: usize,
}

/// Whether a raw component is a cryptographic asset.
#[must_use]
pub fn is_crypto_asset(component: &Value) -> bool {
    component.get("type").and_then(Value::as_str) == Some(CRYPTO_ASSET_TYPE)
}

/// Expand a BOM's `components` into detections.
///
/// Anything other than an array yields no detections.
#[must_use]
pub fn expand(components: Option<&Value>) -> Expansion {
    match components.and_then(Value::as_array) {
        Some(components) => expand_components(components),
        None => Expansion::default(),
    }
}

/// Expand a slice of raw components into detections.
#[must_use]
pub fn expand_components(components: &[Value]) -> Expansion {
    let mut expansion = Expansion::default();
    for (component_index, component) in components.iter().enumerate() {
        if !is_crypto_asset(component) {
            expansion.ignored += 1;
            continue;
        }

        let occurrences = component
            .get("evidence")
            .and_then(|e| e.get("occurrences"))
            .and_then(Value::as_array)
            .filter(|o| !o.is_empty());

        match occurrences {
            Some(occurrences) => {
                for (occurrence_index, occurrence) in occurrences.iter().enumerate() {
                    let mut copy = component.clone();
                    if let Some(evidence) = copy.get_mut("evidence") {
                        evidence["occurrences"] = Value::Array(vec![occurrence.clone()]);
                    }
                    expansion.detections.push(Detection {
                        component_index,
                        occurrence_index: Some(occurrence_index),
                        component: copy,
                    });
                }
            }
            None => expansion.detections.push(Detection {
                component_index,
                occurrence_index: None,
                component: component.clone(),
            }),
        }
    }

    if expansion.ignored > 0 {
        tracing::debug!(
            "Skipped {} component(s) that are not cryptographic assets",
            expansion.ignored
        );
    }
    expansion
}

/// Expand the `components` of a whole BOM document.
#[must_use]
pub fn expand_bom(bom: &Value) -> Expansion {
    expand(bom.get("components"))
}

/// Strip everything after the last unescaped `@`.
///
/// An `@` preceded by a backslash is part of the name.
#[must_use]
pub fn strip_identifier_suffix(name: &str) -> &str {
    let bytes = name.as_bytes();
    let cut = bytes
        .iter()
        .enumerate()
        .rev()
        .find(|&(i, &b)| b == b'@' && (i == 0 || bytes[i - 1] != b'\\'))
        .map(|(i, _)| i);
    match cut {
        Some(i) => &name[..i],
        None => name,
    }
}
