use crate::commands::CommandError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Loosely-typed parameter map carried by a flow step and handed to command
/// builders. Values arrive as JSON scalars; the accessors coerce them to the
/// kind a command declares, so `"true"`, `true` and `1` all satisfy a boolean
/// parameter.
///
/// Optional accessors fall back to their default on a missing or
/// un-coercible value; `required_*` accessors report which command and
/// parameter were violated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamBag(HashMap<String, Value>);

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Keys in sorted order, for stable display
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn required_str(&self, command: &str, param: &str) -> Result<String, CommandError> {
        match self.get(param) {
            None | Some(Value::Null) => Err(CommandError::MissingParam {
                command: command.to_string(),
                param: param.to_string(),
            }),
            Some(value) => as_string(value).ok_or_else(|| CommandError::InvalidParam {
                command: command.to_string(),
                param: param.to_string(),
                expected: "string",
            }),
        }
    }

    pub fn str_or(&self, param: &str, default: &str) -> String {
        self.get(param)
            .and_then(as_string)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn required_bool(&self, command: &str, param: &str) -> Result<bool, CommandError> {
        match self.get(param) {
            None | Some(Value::Null) => Err(CommandError::MissingParam {
                command: command.to_string(),
                param: param.to_string(),
            }),
            Some(value) => as_bool(value).ok_or_else(|| CommandError::InvalidParam {
                command: command.to_string(),
                param: param.to_string(),
                expected: "boolean",
            }),
        }
    }

    pub fn bool_or(&self, param: &str, default: bool) -> bool {
        self.get(param).and_then(as_bool).unwrap_or(default)
    }

    #[allow(dead_code)]
    pub fn required_int(&self, command: &str, param: &str) -> Result<i64, CommandError> {
        match self.get(param) {
            None | Some(Value::Null) => Err(CommandError::MissingParam {
                command: command.to_string(),
                param: param.to_string(),
            }),
            Some(value) => as_i64(value).ok_or_else(|| CommandError::InvalidParam {
                command: command.to_string(),
                param: param.to_string(),
                expected: "integer",
            }),
        }
    }

    pub fn int_or(&self, param: &str, default: i64) -> i64 {
        self.get(param).and_then(as_i64).unwrap_or(default)
    }

    #[allow(dead_code)]
    pub fn float_or(&self, param: &str, default: f64) -> f64 {
        self.get(param).and_then(as_f64).unwrap_or(default)
    }

    pub fn required_path(&self, command: &str, param: &str) -> Result<PathBuf, CommandError> {
        self.required_str(command, param).map(PathBuf::from)
    }

    pub fn path_or(&self, param: &str, default: &str) -> PathBuf {
        PathBuf::from(self.str_or(param, default))
    }
}

impl FromIterator<(String, Value)> for ParamBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(entries: &[(&str, Value)]) -> ParamBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_required_str_present_and_missing() {
        let params = bag(&[("oldValue", json!("http://a"))]);
        assert_eq!(
            params.required_str("search-replace", "oldValue").unwrap(),
            "http://a"
        );

        let err = params
            .required_str("search-replace", "newValue")
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingParam { .. }));
    }

    #[test]
    fn test_string_coercion_from_scalars() {
        let params = bag(&[("count", json!(3)), ("flag", json!(true))]);
        assert_eq!(params.str_or("count", ""), "3");
        assert_eq!(params.str_or("flag", ""), "true");
        assert_eq!(params.str_or("absent", "fallback"), "fallback");
    }

    #[test]
    fn test_bool_coercion() {
        let params = bag(&[
            ("a", json!(true)),
            ("b", json!("true")),
            ("c", json!("0")),
            ("d", json!(1)),
            ("e", json!("garbage")),
        ]);
        assert!(params.bool_or("a", false));
        assert!(params.bool_or("b", false));
        assert!(!params.bool_or("c", true));
        assert!(params.bool_or("d", false));
        // un-coercible optional values fall back to the default
        assert!(params.bool_or("e", true));
        assert!(!params.bool_or("absent", false));
    }

    #[test]
    fn test_required_bool_rejects_garbage() {
        let params = bag(&[("enable", json!("definitely"))]);
        let err = params
            .required_bool("maintenance-mode", "enable")
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::InvalidParam {
                expected: "boolean",
                ..
            }
        ));
    }

    #[test]
    fn test_int_coercion() {
        let params = bag(&[("n", json!(42)), ("s", json!("17")), ("f", json!(2.5))]);
        assert_eq!(params.int_or("n", 0), 42);
        assert_eq!(params.int_or("s", 0), 17);
        // 2.5 is not an integer
        assert_eq!(params.int_or("f", 7), 7);
        assert_eq!(params.required_int("git-log", "n").unwrap(), 42);
    }

    #[test]
    fn test_float_coercion() {
        let params = bag(&[("x", json!(2.5)), ("y", json!("1.25")), ("z", json!(3))]);
        assert!((params.float_or("x", 0.0) - 2.5).abs() < f64::EPSILON);
        assert!((params.float_or("y", 0.0) - 1.25).abs() < f64::EPSILON);
        assert!((params.float_or("z", 0.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_accessors() {
        let params = bag(&[("inputFile", json!("/tmp/dump.sql"))]);
        assert_eq!(
            params.required_path("db-import", "inputFile").unwrap(),
            PathBuf::from("/tmp/dump.sql")
        );
        assert_eq!(params.path_or("outputFile", ""), PathBuf::from(""));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let params = bag(&[("message", Value::Null)]);
        let err = params.required_str("git-commit", "message").unwrap_err();
        assert!(matches!(err, CommandError::MissingParam { .. }));
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut params = ParamBag::new();
        params.insert("oldValue", "http://a");
        params.insert("allTables", true);
        params.insert("count", 3);

        let text = serde_json::to_string(&params).unwrap();
        let back: ParamBag = serde_json::from_str(&text).unwrap();
        assert_eq!(params, back);
    }
}
