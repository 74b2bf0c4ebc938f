//! Structural acceptability check for incoming CBOM documents.
//!
//! This only checks the fields the rest of the crate relies on. It is not a
//! CycloneDX schema validator.

use crate::model::CRYPTO_ASSET_TYPE;
use serde::Serialize;
use serde_json::Value;

/// Top-level fields every document must carry.
pub const MANDATORY_FIELDS: [&str; 4] = ["bomFormat", "specVersion", "serialNumber", "version"];

/// Outcome of [`validate_bom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomValidity {
    pub valid: bool,
    /// Some component was skipped because it is not a cryptographic asset
    pub ignored_some_component: bool,
    /// One message per defect, in document order
    pub messages: Vec<String>,
}

impl Default for BomValidity {
    fn default() -> Self {
        Self {
            valid: true,
            ignored_some_component: false,
            messages: Vec::new(),
        }
    }
}

impl BomValidity {
    fn defect(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.messages.push(message.into());
    }
}

/// Check a document for the fields needed downstream.
///
/// All defects are collected; nothing short-circuits except an absent
/// `components` field, which is a valid document with no components.
#[must_use]
pub fn validate_bom(doc: Option<&Value>) -> BomValidity {
    let mut validity = BomValidity::default();

    let Some(bom) = doc.filter(|v| !v.is_null()) else {
        validity.defect("CBOM is undefined or null.");
        return validity;
    };
    let Some(fields) = bom.as_object() else {
        validity.defect("CBOM is not a JSON object.");
        return validity;
    };

    for field in MANDATORY_FIELDS {
        if !fields.contains_key(field) {
            validity.defect(format!("Missing mandatory field: {field}."));
        }
    }

    let Some(components) = fields.get("components") else {
        report(&validity);
        return validity;
    };
    let Some(components) = components.as_array() else {
        validity.defect("Components field is not an array.");
        report(&validity);
        return validity;
    };

    for (index, component) in components.iter().enumerate() {
        let Some(kind) = component.get("type") else {
            validity.defect(format!(
                "Component at index {index} is missing mandatory field: type."
            ));
            continue;
        };
        if kind.as_str() != Some(CRYPTO_ASSET_TYPE) {
            validity.ignored_some_component = true;
            tracing::debug!("Ignoring CBOM component at index {index} of type: {kind}");
            continue;
        }
        if component.get("cryptoProperties").is_none() {
            validity.defect(format!(
                "Component at index {index} is missing mandatory field: cryptoProperties."
            ));
        }
    }

    report(&validity);
    validity
}

fn report(validity: &BomValidity) {
    if !validity.valid {
        tracing::warn!(
            "Invalid CBOM detected. {} errors:\n   - {}",
            validity.messages.len(),
            validity.messages.join("\n   - ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header() -> Value {
        json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.6",
            "serialNumber": "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79",
            "version": 1
        })
    }

    #[test]
    fn test_minimal_document_is_valid() {
        let validity = validate_bom(Some(&header()));
        assert!(validity.valid);
        assert!(!validity.ignored_some_component);
        assert!(validity.messages.is_empty());
    }

    #[test]
    fn test_all_missing_fields_reported() {
        let validity = validate_bom(Some(&json!({"components": []})));
        assert!(!validity.valid);
        assert_eq!(validity.messages.len(), 4);
        assert_eq!(validity.messages[0], "Missing mandatory field: bomFormat.");
        assert_eq!(validity.messages[3], "Missing mandatory field: version.");
    }

    #[test]
    fn test_absent_components_keeps_header_messages() {
        let validity = validate_bom(Some(&json!({"bomFormat": "CycloneDX"})));
        assert!(!validity.valid);
        assert_eq!(validity.messages.len(), 3);
    }

    #[test]
    fn test_null_and_non_object_documents() {
        assert!(!validate_bom(None).valid);
        assert!(!validate_bom(Some(&Value::Null)).valid);
        assert!(!validate_bom(Some(&json!([1, 2]))).valid);
    }

    #[test]
    fn test_components_not_an_array() {
        let mut bom = header();
        bom["components"] = json!({"type": "cryptographic-asset"});
        let validity = validate_bom(Some(&bom));
        assert!(!validity.valid);
        assert_eq!(validity.messages, vec!["Components field is not an array."]);
    }

    #[test]
    fn test_component_checks() {
        let mut bom = header();
        bom["components"] = json!([
            {"type": "library", "name": "openssl"},
            {"name": "untyped"},
            {"type": "cryptographic-asset", "bom-ref": "no-props"},
            {"type": "cryptographic-asset", "bom-ref": "ok", "cryptoProperties": {}}
        ]);
        let validity = validate_bom(Some(&bom));
        assert!(!validity.valid);
        assert!(validity.ignored_some_component);
        assert_eq!(
            validity.messages,
            vec![
                "Component at index 1 is missing mandatory field: type.",
                "Component at index 2 is missing mandatory field: cryptoProperties.",
            ]
        );
    }

    #[test]
    fn test_ignored_components_alone_stay_valid() {
        let mut bom = header();
        bom["components"] = json!([{"type": "library"}]);
        let validity = validate_bom(Some(&bom));
        assert!(validity.valid);
        assert!(validity.ignored_some_component);
    }
}
