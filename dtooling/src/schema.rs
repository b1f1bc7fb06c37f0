//! Declarative argument tables: validation, defaults, and JSON Schema output.
//!
//! Every tool declares its arguments once. Validation applies defaults, so
//! prompt builders never observe a missing optional that has one.
//!
//! ```rust
//! use dtooling::{ArgumentSchema, ArgumentSpec};
//! use serde_json::json;
//!
//! let schema = ArgumentSchema::new()
//!     .with(ArgumentSpec::string("code", "Source code to review").required())
//!     .with(ArgumentSpec::string("language", "Programming language").with_default("JavaScript"));
//!
//! let args = schema.validate(&json!({"code": "let x = 1"})).expect("arguments should validate");
//! assert_eq!(args.text("language"), "JavaScript");
//!
//! let err = schema.validate(&json!({})).expect_err("code is required");
//! assert!(err.message.contains("code"));
//! ```

use serde_json::{Map, Value, json};

use crate::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    String,
    Boolean,
    StringList,
}

impl ArgumentKind {
    fn label(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Boolean => "a boolean",
            Self::StringList => "a list of strings",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    pub name: String,
    pub description: String,
    pub kind: ArgumentKind,
    pub required: bool,
    pub default: Option<Value>,
    pub allowed: Vec<String>,
}

impl ArgumentSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ArgumentKind,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            default: None,
            allowed: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, ArgumentKind::String)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, ArgumentKind::Boolean)
    }

    pub fn string_list(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, ArgumentKind::StringList)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_allowed<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = allowed.into_iter().map(Into::into).collect();
        self
    }

    /// Normalized value, or `None` when the input counts as absent.
    fn coerce(&self, raw: &Value) -> Result<Option<Value>, ToolError> {
        let value = match (self.kind, raw) {
            (_, Value::Null) => None,
            (ArgumentKind::String, Value::String(text)) => non_blank(text).map(Value::from),
            (ArgumentKind::String, Value::Number(number)) => {
                Some(Value::String(number.to_string()))
            }
            (ArgumentKind::String, Value::Bool(flag)) => Some(Value::String(flag.to_string())),
            (ArgumentKind::Boolean, Value::Bool(flag)) => Some(Value::Bool(*flag)),
            (ArgumentKind::Boolean, Value::String(text)) => {
                match text.trim().to_ascii_lowercase().as_str() {
                    "" => None,
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    _ => return Err(self.type_error()),
                }
            }
            (ArgumentKind::StringList, Value::Array(items)) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    let text = match item {
                        Value::String(text) => text.trim().to_string(),
                        Value::Number(number) => number.to_string(),
                        Value::Bool(flag) => flag.to_string(),
                        Value::Null => continue,
                        _ => return Err(self.type_error()),
                    };
                    if !text.is_empty() {
                        values.push(Value::String(text));
                    }
                }
                (!values.is_empty()).then_some(Value::Array(values))
            }
            (ArgumentKind::StringList, Value::String(text)) => {
                let values: Vec<Value> = text
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(Value::from)
                    .collect();
                (!values.is_empty()).then_some(Value::Array(values))
            }
            _ => return Err(self.type_error()),
        };

        Ok(value)
    }

    fn type_error(&self) -> ToolError {
        ToolError::invalid_arguments(format!(
            "argument '{}' must be {}",
            self.name,
            self.kind.label()
        ))
    }

    fn is_allowed(&self, value: &Value) -> bool {
        self.allowed.is_empty()
            || value
                .as_str()
                .is_some_and(|text| self.allowed.iter().any(|allowed| allowed == text))
    }

    fn json_schema(&self) -> Value {
        let mut property = Map::new();
        match self.kind {
            ArgumentKind::String => {
                property.insert("type".to_string(), json!("string"));
            }
            ArgumentKind::Boolean => {
                property.insert("type".to_string(), json!("boolean"));
            }
            ArgumentKind::StringList => {
                property.insert("type".to_string(), json!("array"));
                property.insert("items".to_string(), json!({"type": "string"}));
            }
        }
        property.insert("description".to_string(), json!(self.description));
        if !self.allowed.is_empty() {
            property.insert("enum".to_string(), json!(self.allowed));
        }
        if let Some(default) = &self.default {
            property.insert("default".to_string(), default.clone());
        }
        Value::Object(property)
    }
}

fn non_blank(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentSchema {
    specs: Vec<ArgumentSpec>,
}

impl ArgumentSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, spec: ArgumentSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn specs(&self) -> &[ArgumentSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Checks raw call arguments and applies defaults.
    ///
    /// `null` is treated as an empty object. Keys not declared in the schema
    /// are dropped.
    pub fn validate(&self, raw: &Value) -> Result<ToolArguments, ToolError> {
        let empty = Map::new();
        let input = match raw {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => {
                return Err(ToolError::invalid_arguments(
                    "arguments must be a JSON object",
                ));
            }
        };

        let mut values = Map::new();
        for spec in &self.specs {
            let provided = match input.get(&spec.name) {
                Some(raw) => spec.coerce(raw)?,
                None => None,
            };

            let value = match provided {
                Some(value) if spec.is_allowed(&value) => Some(value),
                Some(value) => match &spec.default {
                    Some(default) => Some(default.clone()),
                    None => {
                        return Err(ToolError::invalid_arguments(format!(
                            "argument '{}' must be one of [{}], got {}",
                            spec.name,
                            spec.allowed.join(", "),
                            value
                        )));
                    }
                },
                None if spec.required => {
                    return Err(ToolError::invalid_arguments(format!(
                        "missing required argument '{}'",
                        spec.name
                    )));
                }
                None => spec.default.clone(),
            };

            if let Some(value) = value {
                values.insert(spec.name.clone(), value);
            }
        }

        Ok(ToolArguments { values })
    }

    pub fn json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .specs
            .iter()
            .map(|spec| (spec.name.clone(), spec.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .specs
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Arguments that passed validation, with defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: Map<String, Value>,
}

impl ToolArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// String value, or `""` when absent.
    pub fn text(&self, name: &str) -> &str {
        self.optional_text(name).unwrap_or_default()
    }

    pub fn optional_text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.values
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn list(&self, name: &str) -> Vec<&str> {
        self.values
            .get(name)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolErrorKind;

    fn review_schema() -> ArgumentSchema {
        ArgumentSchema::new()
            .with(ArgumentSpec::string("code", "Source code").required())
            .with(ArgumentSpec::string("language", "Language").with_default("JavaScript"))
            .with(
                ArgumentSpec::string("focus", "Review focus")
                    .with_allowed(["performance", "security", "all"])
                    .with_default("all"),
            )
    }

    #[test]
    fn blank_required_string_is_missing() {
        let error = review_schema()
            .validate(&json!({"code": "   "}))
            .expect_err("blank code must fail");

        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
        assert_eq!(error.message, "missing required argument 'code'");
    }

    #[test]
    fn blank_optional_string_takes_default() {
        let args = review_schema()
            .validate(&json!({"code": "x", "language": ""}))
            .expect("arguments should validate");

        assert_eq!(args.text("language"), "JavaScript");
    }

    #[test]
    fn value_outside_allowed_falls_back_to_default() {
        let args = review_schema()
            .validate(&json!({"code": "x", "focus": "style"}))
            .expect("arguments should validate");

        assert_eq!(args.text("focus"), "all");
    }

    #[test]
    fn value_outside_allowed_without_default_is_rejected() {
        let schema = ArgumentSchema::new()
            .with(ArgumentSpec::string("mode", "Mode").with_allowed(["a", "b"]));

        let error = schema
            .validate(&json!({"mode": "c"}))
            .expect_err("unknown mode must fail");
        assert!(error.message.contains("mode"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let error = review_schema()
            .validate(&json!({"code": {"nested": true}}))
            .expect_err("object code must fail");

        assert_eq!(error.message, "argument 'code' must be a string");
    }

    #[test]
    fn non_object_arguments_are_rejected_and_null_is_empty() {
        let schema = ArgumentSchema::new().with(ArgumentSpec::string("note", "Note"));

        let error = schema
            .validate(&json!(["code"]))
            .expect_err("array arguments must fail");
        assert_eq!(error.message, "arguments must be a JSON object");

        let args = schema.validate(&Value::Null).expect("null is empty");
        assert!(args.as_map().is_empty());
    }

    #[test]
    fn booleans_accept_string_forms() {
        let schema = ArgumentSchema::new()
            .with(ArgumentSpec::boolean("save_locally", "Save").with_default(true));

        let args = schema
            .validate(&json!({"save_locally": "false"}))
            .expect("string boolean should validate");
        assert!(!args.flag("save_locally"));

        let defaulted = schema.validate(&json!({})).expect("default applies");
        assert!(defaulted.flag("save_locally"));

        schema
            .validate(&json!({"save_locally": "maybe"}))
            .expect_err("non-boolean string must fail");
    }

    #[test]
    fn string_lists_accept_arrays_and_comma_strings() {
        let schema =
            ArgumentSchema::new().with(ArgumentSpec::string_list("features", "Features"));

        let from_array = schema
            .validate(&json!({"features": ["auth", " search ", ""]}))
            .expect("array should validate");
        assert_eq!(from_array.list("features"), vec!["auth", "search"]);

        let from_string = schema
            .validate(&json!({"features": "auth, search"}))
            .expect("string should validate");
        assert_eq!(from_string.list("features"), vec!["auth", "search"]);
    }

    #[test]
    fn scalars_are_stringified_for_string_arguments() {
        let args = review_schema()
            .validate(&json!({"code": 42}))
            .expect("number should be stringified");

        assert_eq!(args.text("code"), "42");
    }

    #[test]
    fn json_schema_lists_properties_and_required_fields() {
        let schema = review_schema().json_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["code"]));
        assert_eq!(schema["properties"]["language"]["default"], "JavaScript");
        assert_eq!(
            schema["properties"]["focus"]["enum"],
            json!(["performance", "security", "all"])
        );
    }
}
