//! Normalized operation responses.

use crate::ImageError;
use imgtools_core::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one operation: a report or an error, never a panic.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response<T> {
    /// Operation completed
    Success {
        /// Always `true`
        success: bool,
        /// Operation-specific fields
        #[serde(flatten)]
        report: T,
    },
    /// Operation was rejected or failed
    Failure(Failure),
}

/// Error payload of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Human-readable message
    pub error: String,
    /// Error code, e.g. `E6003`
    pub code: String,
}

impl Failure {
    /// Failure payload for an error.
    pub fn from_error(err: &ImageError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

impl<T> Response<T> {
    /// Successful response.
    pub fn ok(report: T) -> Self {
        Response::Success {
            success: true,
            report,
        }
    }

    /// Wrap an operation result, logging failures.
    pub fn from_result(operation: &str, result: crate::Result<T>) -> Self {
        match result {
            Ok(report) => Self::ok(report),
            Err(err) => {
                if err.is_validation() {
                    tracing::info!(operation, code = %err.code(), error = %err, "request rejected");
                } else {
                    tracing::warn!(operation, code = %err.code(), error = %err, "operation failed");
                }
                Response::Failure(Failure::from_error(&err))
            }
        }
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// The report, if successful.
    pub fn report(&self) -> Option<&T> {
        match self {
            Response::Success { report, .. } => Some(report),
            Response::Failure(_) => None,
        }
    }

    /// The failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Response::Success { .. } => None,
            Response::Failure(failure) => Some(failure),
        }
    }

    /// Convert into a std `Result`.
    pub fn into_result(self) -> std::result::Result<T, Failure> {
        match self {
            Response::Success { report, .. } => Ok(report),
            Response::Failure(failure) => Err(failure),
        }
    }
}

impl<T: Serialize> Response<T> {
    /// Structured JSON document for the caller.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({
                "error": format!("Failed to serialize response: {e}"),
                "code": ErrorCode::Internal.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Report {
        output_path: String,
        width: u32,
    }

    #[test]
    fn test_success_is_flattened() {
        let response = Response::ok(Report {
            output_path: "/tmp/out.png".into(),
            width: 3,
        });
        let json = response.to_json();

        assert_eq!(json["success"], true);
        assert_eq!(json["output_path"], "/tmp/out.png");
        assert_eq!(json["width"], 3);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_omits_report_fields() {
        let response: Response<Report> =
            Response::from_result("test", Err(ImageError::InvalidColor("nope".into())));
        let json = response.to_json();

        assert_eq!(json["error"], "Invalid hex color: nope");
        assert_eq!(json["code"], "E6003");
        assert!(json.get("success").is_none());
        assert!(json.get("output_path").is_none());
        assert!(!response.is_success());
        assert!(response.report().is_none());
    }
}
