//! The schema model handed to the synchronizer, codec and statement builder.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::FIXED_COLUMNS;
use crate::errors::{StoreError, StoreResult};

use super::field::FieldSpec;

/// Named group of fields. Never affects the relational schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl SectionSpec {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Full scouting schema (`game_config.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(default)]
    pub page_title: String,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

impl GameConfig {
    pub fn new(page_title: impl Into<String>, sections: Vec<SectionSpec>) -> Self {
        Self {
            page_title: page_title.into(),
            sections,
        }
    }

    /// Fields in canonical order: section order, then intra-section order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }

    pub fn field(&self, code: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.code == code)
    }

    /// Field owning a normalized column identifier.
    pub fn field_for_column(&self, column: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.column() == column)
    }

    /// Column identifiers in canonical order.
    pub fn columns(&self) -> Vec<String> {
        self.fields().map(FieldSpec::column).collect()
    }

    /// Reject schemas that cannot map one-to-one onto table columns.
    ///
    /// Checks empty and duplicate codes, normalization collisions (including
    /// with the fixed key and delete-flag columns), inverted numeric bounds
    /// and choices on non-select fields.
    pub fn validate(&self) -> StoreResult<()> {
        let mut seen: FxHashMap<String, &str> = FxHashMap::default();

        for field in self.fields() {
            if field.code.trim().is_empty() {
                return Err(StoreError::schema_conflict(format!(
                    "field titled '{}' has an empty code",
                    field.title
                )));
            }

            let column = field.column();
            if FIXED_COLUMNS.contains(&column.as_str()) {
                return Err(StoreError::schema_conflict(format!(
                    "field code '{}' normalizes to reserved column {}",
                    field.code, column
                )));
            }
            if let Some(owner) = seen.get(&column) {
                let message = if *owner == field.code {
                    format!("duplicate field code '{}'", field.code)
                } else {
                    format!(
                        "field code '{}' normalizes to column {} already used by '{}'",
                        field.code, column, owner
                    )
                };
                return Err(StoreError::schema_conflict(message));
            }
            seen.insert(column, &field.code);

            if let (Some(min), Some(max)) = (field.min, field.max) {
                if min > max {
                    return Err(StoreError::schema_conflict(format!(
                        "field '{}' has min {} greater than max {}",
                        field.code, min, max
                    )));
                }
            }

            if field.choices.is_some() && !field.field_type.is_select() {
                return Err(StoreError::schema_conflict(format!(
                    "field '{}' declares choices but is not a select field",
                    field.code
                )));
            }
        }

        debug!(fields = self.field_count(), "Schema validated");
        Ok(())
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Write the schema as JSON via a temp file + rename.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, self.to_json()?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Choice, FieldType};

    fn sample() -> GameConfig {
        GameConfig::new(
            "Scouting 2026",
            vec![
                SectionSpec::new(
                    "Auto",
                    vec![
                        FieldSpec::new("auto_score", FieldType::Number),
                        FieldSpec::new("left_line", FieldType::Boolean),
                    ],
                ),
                SectionSpec::new("Endgame", vec![FieldSpec::new("climb", FieldType::Select)]),
            ],
        )
    }

    #[test]
    fn canonical_order_is_section_then_field() {
        let schema = sample();
        let codes: Vec<&str> = schema.fields().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["auto_score", "left_line", "climb"]);
        assert_eq!(schema.columns(), vec!["AUTO_SCORE", "LEFT_LINE", "CLIMB"]);
        assert_eq!(schema.field_count(), 3);
    }

    #[test]
    fn empty_schema_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert_eq!(GameConfig::default().field_count(), 0);
    }

    #[test]
    fn rejects_normalization_collision() {
        let mut schema = sample();
        schema.sections[1]
            .fields
            .push(FieldSpec::new("AUTO-SCORE", FieldType::Text));
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("AUTO_SCORE"), "{err}");
    }

    #[test]
    fn rejects_duplicate_code_across_sections() {
        let mut schema = sample();
        schema.sections[1]
            .fields
            .push(FieldSpec::new("left_line", FieldType::Boolean));
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }

    #[test]
    fn rejects_fixed_column_names() {
        let schema = GameConfig::new(
            "x",
            vec![SectionSpec::new("s", vec![FieldSpec::new("deleted", FieldType::Boolean)])],
        );
        assert!(schema.validate().is_err());
        let schema = GameConfig::new(
            "x",
            vec![SectionSpec::new("s", vec![FieldSpec::new("id", FieldType::Number)])],
        );
        assert!(schema.validate().is_err());
    }

    #[test]
    fn rejects_inverted_bounds_and_stray_choices() {
        let mut field = FieldSpec::new("cycles", FieldType::Counter);
        field.min = Some(10);
        field.max = Some(1);
        let schema = GameConfig::new("x", vec![SectionSpec::new("s", vec![field])]);
        assert!(schema.validate().is_err());

        let mut field = FieldSpec::new("notes", FieldType::Text);
        field.choices = Some(vec![Choice {
            name: "a".to_string(),
            value: "1".to_string(),
        }]);
        let schema = GameConfig::new("x", vec![SectionSpec::new("s", vec![field])]);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = r#"{
            "pageTitle": "Match Scouting",
            "sections": [
                {"name": "Auto", "fields": [
                    {"code": "auto_score", "title": "Auto Score", "type": "number", "min": 0, "max": 50},
                    {"code": "defense?", "title": "Played Defense", "type": "boolean", "defaultValue": "false"}
                ]}
            ]
        }"#;
        let schema = GameConfig::from_json(json).unwrap();
        assert_eq!(schema.page_title, "Match Scouting");
        assert_eq!(schema.field_count(), 2);
        let defense = schema.field("defense?").unwrap();
        assert_eq!(defense.default_value.as_deref(), Some("false"));
        assert_eq!(schema.field_for_column("DEFENSE_").unwrap().title, "Played Defense");

        let round = GameConfig::from_json(&schema.to_json().unwrap()).unwrap();
        assert_eq!(round, schema);
    }
}
