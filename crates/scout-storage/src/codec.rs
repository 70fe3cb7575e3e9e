//! Record codec: tab-delimited wire payloads ↔ field values ↔ SQLite values.
//!
//! Always walks fields in canonical order. A shape or coercion failure
//! rejects the whole record before anything is written.

use rusqlite::types::{Value, ValueRef};

use scout_core::constants::{BOOLEAN_FALSE_CODE, BOOLEAN_TRUE_CODE, ID_COLUMN};
use scout_core::{FieldSpec, FieldType, GameConfig, StoreError, StoreResult};

/// Decoded payload: raw segment per field code, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRecord {
    values: Vec<(String, String)>,
}

impl WireRecord {
    pub fn get(&self, code: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

/// Split a tab-delimited payload against the schema.
///
/// Trailing empty segments are kept: `"3\t"` is two segments. The segment
/// count must equal the field count exactly; the record is never padded or
/// truncated. The one special case is a schema with no fields, which accepts
/// only the empty payload.
pub fn decode_wire_record(payload: &str, schema: &GameConfig) -> StoreResult<WireRecord> {
    let expected = schema.field_count();
    if expected == 0 && payload.is_empty() {
        return Ok(WireRecord { values: Vec::new() });
    }

    let segments: Vec<&str> = payload.split('\t').collect();
    if segments.len() != expected {
        return Err(StoreError::RecordShape {
            expected,
            got: segments.len(),
        });
    }

    let values = schema
        .fields()
        .zip(segments)
        .map(|(field, raw)| (field.code.clone(), raw.to_string()))
        .collect();
    Ok(WireRecord { values })
}

/// Convert one raw value into the parameter bound for its column.
///
/// - absent → NULL
/// - numeric types → integer. The empty string is how the edit view shows
///   NULL, so it counts as absent; anything else must parse exactly, with no
///   surrounding whitespace
/// - boolean → `"true"` becomes the true code, empty/absent NULL, anything
///   else the false code
/// - all other types → the string unchanged
pub fn coerce_for_write(raw: Option<&str>, field: &FieldSpec) -> StoreResult<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };

    match field.field_type {
        t if t.is_numeric() => {
            if raw.is_empty() {
                return Ok(Value::Null);
            }
            raw.parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| StoreError::InvalidFieldValue {
                    field: field.code.clone(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
        }
        FieldType::Boolean => Ok(match raw {
            "" => Value::Null,
            "true" => Value::Text(BOOLEAN_TRUE_CODE.to_string()),
            _ => Value::Text(BOOLEAN_FALSE_CODE.to_string()),
        }),
        _ => Ok(Value::Text(raw.to_string())),
    }
}

/// Display string for a stored value. Display only: booleans come back as
/// `"true"`/`"false"` so a displayed row re-encodes to the same values.
pub fn coerce_for_read(value: ValueRef<'_>, field_type: FieldType) -> String {
    match (value, field_type) {
        (ValueRef::Null, _) => String::new(),
        (ValueRef::Text(t), FieldType::Boolean) => {
            let text = String::from_utf8_lossy(t);
            match text.as_ref() {
                BOOLEAN_TRUE_CODE => "true".to_string(),
                BOOLEAN_FALSE_CODE => "false".to_string(),
                _ => text.into_owned(),
            }
        }
        (ValueRef::Integer(i), FieldType::Boolean) => (i != 0).to_string(),
        (ValueRef::Integer(i), _) => i.to_string(),
        (ValueRef::Real(r), _) => r.to_string(),
        (ValueRef::Text(t), _) | (ValueRef::Blob(t), _) => String::from_utf8_lossy(t).into_owned(),
    }
}

/// Display string for the soft-delete flag.
pub fn coerce_flag_for_read(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Integer(i) => (i != 0).to_string(),
        other => coerce_for_read(other, FieldType::Boolean),
    }
}

/// Parameters for the INSERT built from the same schema, canonical order.
pub fn encode_record(record: &WireRecord, schema: &GameConfig) -> StoreResult<Vec<Value>> {
    schema
        .fields()
        .map(|field| coerce_for_write(record.get(&field.code), field))
        .collect()
}

/// Parameters for the UPDATE built from the same schema.
///
/// `row` is a projected edit-view row: id, delete flag, then one display
/// string per field. Fields bind in canonical order and the id last; the
/// delete flag is not written back.
pub fn encode_update_row(row: &[String], schema: &GameConfig) -> StoreResult<Vec<Value>> {
    let expected = schema.field_count() + 2;
    if row.len() != expected {
        return Err(StoreError::RecordShape {
            expected,
            got: row.len(),
        });
    }

    let id = row[0]
        .trim()
        .parse::<i64>()
        .map_err(|e| StoreError::InvalidFieldValue {
            field: ID_COLUMN.to_string(),
            value: row[0].clone(),
            reason: e.to_string(),
        })?;

    let mut params = schema
        .fields()
        .zip(&row[2..])
        .map(|(field, raw)| coerce_for_write(Some(raw.as_str()), field))
        .collect::<StoreResult<Vec<Value>>>()?;
    params.push(Value::Integer(id));
    Ok(params)
}
