//! Argument extraction shared by the tools.
//!
//! Models sometimes send numbers as strings ("70" instead of 70), so numeric
//! readers accept both. Only finite values are accepted.

use runcoach_core::error::ToolError;
use serde_json::Value;

pub(crate) fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    args[name]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidArguments(format!("Missing '{name}' argument")))
}

pub(crate) fn optional_str<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args[name].as_str().map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn optional_f64(args: &Value, name: &str) -> Result<Option<f64>, ToolError> {
    match &args[name] {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{name}' must be a number, got {s:?}"))),
        other => Err(ToolError::InvalidArguments(format!(
            "'{name}' must be a number, got {other}"
        ))),
    }
}

pub(crate) fn required_f64(args: &Value, name: &str) -> Result<f64, ToolError> {
    optional_f64(args, name)?
        .ok_or_else(|| ToolError::InvalidArguments(format!("Missing '{name}' argument")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings() {
        let args = json!({"a": 5, "b": "6.5", "c": "fast", "d": true});
        assert_eq!(required_f64(&args, "a").unwrap(), 5.0);
        assert_eq!(required_f64(&args, "b").unwrap(), 6.5);
        assert!(required_f64(&args, "c").is_err());
        assert!(required_f64(&args, "d").is_err());
        assert!(required_f64(&args, "missing").is_err());
        assert_eq!(optional_f64(&args, "missing").unwrap(), None);
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        let args = json!({"a": "NaN", "b": "inf", "c": "-Infinity", "d": " 42 "});
        assert!(required_f64(&args, "a").is_err());
        assert!(optional_f64(&args, "b").is_err());
        assert!(required_f64(&args, "c").is_err());
        assert_eq!(required_f64(&args, "d").unwrap(), 42.0);
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let args = json!({"location": "  "});
        assert!(required_str(&args, "location").is_err());
        assert!(optional_str(&args, "location").is_none());
    }
}
