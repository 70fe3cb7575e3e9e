//! Field definitions and their storage types.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::identifier::normalize;

/// Kind of value a field collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    Counter,
    Range,
    Boolean,
    Timer,
    Select,
    MultiSelect,
    Image,
}

impl FieldType {
    /// Number, counter and range fields store integers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Counter | Self::Range)
    }

    pub fn is_select(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }

    /// Column type this field type is stored as.
    pub fn sql_type(self, varchar_length: u32) -> SqlType {
        match self {
            Self::Boolean => SqlType::Boolean,
            t if t.is_numeric() => SqlType::Integer,
            _ => SqlType::Varchar(varchar_length),
        }
    }
}

/// SQL column type of a dynamic column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// Single-character code, see `BOOLEAN_TRUE_CODE`.
    Boolean,
    Integer,
    Varchar(u32),
}

impl SqlType {
    /// Declared type as written into DDL.
    pub fn declaration(&self) -> String {
        match self {
            Self::Boolean => "CHAR(1)".to_string(),
            Self::Integer => "INTEGER".to_string(),
            Self::Varchar(len) => format!("VARCHAR({len})"),
        }
    }

    /// Compare against a declared type reported by the catalog.
    /// Case and whitespace are ignored.
    pub fn matches_declared(&self, declared: &str) -> bool {
        squash(declared) == squash(&self.declaration())
    }
}

fn squash(declared: &str) -> String {
    declared
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// One entry of a select field's ordered choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

/// One schema-defined scouting datum.
///
/// Identity is the `code` alone: title and type may change without the field
/// becoming a different field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

impl FieldSpec {
    pub fn new(code: impl Into<String>, field_type: FieldType) -> Self {
        let code = code.into();
        Self {
            title: code.clone(),
            code,
            field_type,
            required: false,
            default_value: None,
            min: None,
            max: None,
            step: None,
            choices: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Column identifier for this field.
    pub fn column(&self) -> String {
        normalize(&self.code)
    }

    pub fn sql_type(&self, varchar_length: u32) -> SqlType {
        self.field_type.sql_type(varchar_length)
    }
}

impl PartialEq for FieldSpec {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for FieldSpec {}

impl Hash for FieldSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_type_mapping() {
        assert_eq!(FieldType::Boolean.sql_type(255), SqlType::Boolean);
        assert_eq!(FieldType::Number.sql_type(255), SqlType::Integer);
        assert_eq!(FieldType::Counter.sql_type(255), SqlType::Integer);
        assert_eq!(FieldType::Range.sql_type(255), SqlType::Integer);
        assert_eq!(FieldType::Timer.sql_type(64), SqlType::Varchar(64));
        assert_eq!(FieldType::MultiSelect.sql_type(255), SqlType::Varchar(255));
    }

    #[test]
    fn declared_type_comparison_ignores_case_and_spaces() {
        assert!(SqlType::Varchar(255).matches_declared("varchar( 255 )"));
        assert!(SqlType::Boolean.matches_declared("CHAR(1)"));
        assert!(!SqlType::Integer.matches_declared("VARCHAR(255)"));
        assert!(!SqlType::Varchar(255).matches_declared("VARCHAR(64)"));
    }

    #[test]
    fn identity_is_code_only() {
        let a = FieldSpec::new("auto_score", FieldType::Number).with_title("Auto");
        let b = FieldSpec::new("auto_score", FieldType::Text).with_title("Autonomous");
        assert_eq!(a, b);
        assert_ne!(a, FieldSpec::new("teleop", FieldType::Number));
    }

    #[test]
    fn field_type_serde_names() {
        let json = serde_json::to_string(&FieldType::MultiSelect).unwrap();
        assert_eq!(json, "\"multi-select\"");
        let parsed: FieldType = serde_json::from_str("\"counter\"").unwrap();
        assert_eq!(parsed, FieldType::Counter);
    }
}
