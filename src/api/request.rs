//! Lenient parsing of the `/recommend` request body.

use serde_json::Value;

use crate::error::AppError;
use crate::services::DEFAULT_RECOMMENDATIONS;

/// A validated recommendation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendRequest {
    pub user_id: String,
    pub num_recommendations: i64,
}

impl RecommendRequest {
    /// Parse `{"user_id": string, "num_recommendations"?: integer}`.
    ///
    /// The id is only checked for presence here; its format is validated
    /// by the recommendation service.
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        let no_data = || AppError::InvalidInput("No data provided.".to_string());

        let value: Value = serde_json::from_slice(body).map_err(|_| no_data())?;
        let object = match value.as_object() {
            Some(object) if !object.is_empty() => object,
            _ => return Err(no_data()),
        };

        let user_id = match object.get("user_id") {
            None => return Err(required()),
            Some(value) if is_blank(value) => return Err(required()),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(AppError::InvalidInput(
                    "Invalid user_id format.".to_string(),
                ))
            }
        };

        let num_recommendations = match object.get("num_recommendations") {
            None | Some(Value::Null) => DEFAULT_RECOMMENDATIONS,
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
                AppError::InvalidInput("num_recommendations must be an integer.".to_string())
            })?,
            Some(_) => {
                return Err(AppError::InvalidInput(
                    "num_recommendations must be an integer.".to_string(),
                ))
            }
        };

        Ok(Self {
            user_id,
            num_recommendations,
        })
    }
}

fn required() -> AppError {
    AppError::InvalidInput("user_id is required.".to_string())
}

/// Null, false, zero and empty values count as no id at all.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> String {
        match RecommendRequest::parse(body.as_bytes()) {
            Err(AppError::InvalidInput(msg)) => msg,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_defaults_count() {
        let request = RecommendRequest::parse(br#"{"user_id": "abc"}"#).unwrap();
        assert_eq!(request.user_id, "abc");
        assert_eq!(request.num_recommendations, DEFAULT_RECOMMENDATIONS);
    }

    #[test]
    fn test_parse_explicit_count() {
        let request =
            RecommendRequest::parse(br#"{"user_id": "abc", "num_recommendations": 2}"#).unwrap();
        assert_eq!(request.num_recommendations, 2);
    }

    #[test]
    fn test_parse_no_data() {
        assert_eq!(message(""), "No data provided.");
        assert_eq!(message("{}"), "No data provided.");
        assert_eq!(message("[1, 2]"), "No data provided.");
        assert_eq!(message("not json"), "No data provided.");
    }

    #[test]
    fn test_parse_missing_user_id() {
        assert_eq!(message(r#"{"num_recommendations": 3}"#), "user_id is required.");
        assert_eq!(message(r#"{"user_id": ""}"#), "user_id is required.");
        assert_eq!(message(r#"{"user_id": null}"#), "user_id is required.");
        assert_eq!(message(r#"{"user_id": false}"#), "user_id is required.");
        assert_eq!(message(r#"{"user_id": 0}"#), "user_id is required.");
        assert_eq!(message(r#"{"user_id": []}"#), "user_id is required.");
        assert_eq!(message(r#"{"user_id": {}}"#), "user_id is required.");
    }

    #[test]
    fn test_parse_non_string_user_id() {
        assert_eq!(message(r#"{"user_id": 12345}"#), "Invalid user_id format.");
        assert_eq!(message(r#"{"user_id": true}"#), "Invalid user_id format.");
        assert_eq!(message(r#"{"user_id": ["abc"]}"#), "Invalid user_id format.");
    }

    #[test]
    fn test_parse_bad_count() {
        assert_eq!(
            message(r#"{"user_id": "abc", "num_recommendations": "five"}"#),
            "num_recommendations must be an integer."
        );
        assert_eq!(
            message(r#"{"user_id": "abc", "num_recommendations": 2.5}"#),
            "num_recommendations must be an integer."
        );
    }
}
