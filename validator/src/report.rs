//! Serializable validation outcome for one expression.

use cron_schema_core::{CronFields, InputOptions};
use serde::Serialize;

use crate::validate_with;

/// Outcome of validating one expression, suitable for structured output
/// (JSON/YAML) from tooling.
///
/// # Examples
///
/// ```
/// use cron_schema_core::InputOptions;
/// use cron_schema_validator::ValidationReport;
///
/// let report = ValidationReport::evaluate("* * * * *", &InputOptions::default());
/// assert!(report.valid);
/// assert!(report.errors.is_empty());
///
/// let report = ValidationReport::evaluate("* * * *", &InputOptions::default());
/// assert!(!report.valid);
/// assert!(report.errors[0].contains("* * * *"));
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub expression: String,
    pub valid: bool,
    /// Positional field assignment, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<CronFields>,
    /// Annotated error messages, present on failure.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Validates `expression` under `input` and captures the outcome.
    pub fn evaluate(expression: &str, input: &InputOptions) -> Self {
        match validate_with(expression, input) {
            Ok(fields) => Self {
                expression: expression.to_string(),
                valid: true,
                fields: Some(fields),
                errors: Vec::new(),
            },
            Err(errors) => Self {
                expression: expression.to_string(),
                valid: false,
                fields: None,
                errors,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization_shape() {
        let report = ValidationReport::evaluate("0 */4 * 1 6", &InputOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["fields"]["hours"], "*/4");
        assert_eq!(json["fields"]["daysOfMonth"], "*");
        assert!(json.get("errors").is_none());

        let report = ValidationReport::evaluate("bad", &InputOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert!(json.get("fields").is_none());
        assert!(!json["errors"].as_array().unwrap().is_empty());
    }
}
