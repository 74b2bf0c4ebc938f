//! Shape check for compliance reports received from outside the process.
//!
//! A report that fails here must not be shown. Callers fall back to the
//! local engine instead of erroring.

use crate::compliance::ComplianceIcon;
use crate::model::is_truthy;
use serde_json::Value;

/// Whether `report` is a well-formed, successful compliance report.
///
/// Each rejection is logged with the reason at warn level.
#[must_use]
pub fn validate_compliance_report(report: Option<&Value>) -> bool {
    match check(report) {
        Ok(()) => true,
        Err(reason) => {
            tracing::warn!("Rejected compliance report: {reason}");
            false
        }
    }
}

fn check(report: Option<&Value>) -> Result<(), &'static str> {
    let report = report
        .filter(|r| !r.is_null())
        .ok_or("no report was provided")?;

    if report.get("error") != Some(&Value::Bool(false)) {
        return Err("the compliance backend was not able to return a compliance result");
    }

    let well_typed = report.get("policyName").is_some_and(Value::is_string)
        && report
            .get("complianceServiceName")
            .is_some_and(Value::is_string)
        && report.get("findings").is_some_and(Value::is_array)
        && report.get("complianceLevels").is_some_and(Value::is_array)
        && report
            .get("defaultComplianceLevel")
            .is_some_and(Value::is_number)
        && report
            .get("globalComplianceStatus")
            .is_some_and(Value::is_boolean);
    if !well_typed {
        return Err("the report does not have the correct format");
    }

    let levels = report["complianceLevels"].as_array().map_or(&[][..], Vec::as_slice);
    let mut level_ids: Vec<f64> = Vec::with_capacity(levels.len());
    for level in levels {
        let id = level.get("id").and_then(Value::as_f64);
        let shaped = level.get("label").is_some_and(Value::is_string)
            && level.get("colorHex").is_some_and(Value::is_string);
        let icon = level.get("icon").and_then(Value::as_str);
        let (Some(id), true, Some(icon)) = (id, shaped, icon) else {
            return Err("a compliance level does not have the correct format");
        };
        if ComplianceIcon::from_name(icon).is_none() {
            return Err("a compliance level uses an icon that is not recognized");
        }
        if level
            .get("description")
            .is_some_and(|d| is_truthy(d) && !d.is_string())
        {
            return Err("a compliance level description is not a string");
        }
        if level_ids.contains(&id) {
            return Err("two compliance levels share the same id");
        }
        level_ids.push(id);
    }

    let findings = report["findings"].as_array().map_or(&[][..], Vec::as_slice);
    for finding in findings {
        let level_id = finding.get("levelId").and_then(Value::as_f64);
        let (true, Some(level_id)) = (
            finding.get("bomRef").is_some_and(Value::is_string),
            level_id,
        ) else {
            return Err("a finding does not have the correct format");
        };
        if finding
            .get("message")
            .is_some_and(|m| is_truthy(m) && !m.is_string())
        {
            return Err("a finding message is not a string");
        }
        if !level_ids.contains(&level_id) {
            return Err("a finding references a level id that is not declared");
        }
    }

    Ok(())
}
