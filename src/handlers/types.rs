//! # Common API Types
//!
//! Response envelopes and request parameter parsing shared by the handlers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, validation_error};
use crate::repositories::DateRange;

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Vehicle deactivated")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledgement carrying the id of the created row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = "Firm added")]
    pub message: String,
    #[schema(example = 1)]
    pub id: i32,
}

/// Query string carrying only the owner
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OwnerQuery {
    /// Id of the user the request acts for
    pub owner_id: Option<i64>,
}

/// Parse an optional `YYYY-MM-DD` parameter. Blank values count as absent.
pub fn parse_date_param(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            validation_error(
                &format!("{field} must be a date in YYYY-MM-DD format"),
                json!({ field: raw }),
            )
        })
}

/// Optional range filter: applied only when both bounds are present.
pub fn parse_optional_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<DateRange>, ApiError> {
    let start = parse_date_param(start, "start")?;
    let end = parse_date_param(end, "end")?;
    Ok(DateRange::from_bounds(start, end))
}

/// Mandatory range: both bounds are required.
pub fn parse_required_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, ApiError> {
    let start = parse_date_param(start, "start")?;
    let end = parse_date_param(end, "end")?;

    match (start, end) {
        (Some(start), Some(end)) => Ok(DateRange::new(start, end)),
        (start, end) => {
            let mut missing = serde_json::Map::new();
            if start.is_none() {
                missing.insert("start".to_string(), json!("required"));
            }
            if end.is_none() {
                missing.insert("end".to_string(), json!("required"));
            }
            Err(validation_error(
                "start and end dates are required",
                serde_json::Value::Object(missing),
            ))
        }
    }
}

/// Trimmed, non-empty text field or a validation error naming it.
pub fn required_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            validation_error(
                &format!("{field} is required"),
                json!({ field: "required" }),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn blank_dates_are_absent() {
        assert_eq!(parse_date_param(None, "start").unwrap(), None);
        assert_eq!(parse_date_param(Some("  "), "start").unwrap(), None);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let err = parse_date_param(Some("2024-13-01"), "end").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("end"));

        assert!(parse_date_param(Some("15/01/2024"), "start").is_err());
    }

    #[test]
    fn optional_range_ignores_a_single_bound() {
        assert_eq!(parse_optional_range(Some("2024-01-01"), None).unwrap(), None);
        assert!(parse_optional_range(Some("2024-01-01"), Some("2024-01-31"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn required_range_lists_missing_bounds() {
        let err = parse_required_range(None, Some("2024-01-31")).unwrap_err();
        let details = err.details.unwrap();
        assert_eq!(details["start"], "required");
        assert!(details.get("end").is_none());
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text(Some("  acme "), "name").unwrap(), "acme");
        assert!(required_text(Some("   "), "name").is_err());
        assert!(required_text(None, "name").is_err());
    }
}
