//! Column identifier rule.
//!
//! Every component derives column names from field codes through
//! [`normalize`]; nothing else may build a column name from a code.
//! Normalized identifiers are uppercase ASCII letters separated by single
//! underscores, so `__` never appears in one. The synchronizer relies on that
//! for its temporary column names.

/// Normalize a field code into its column identifier.
///
/// Uppercases ASCII letters and collapses every maximal run of non-letter
/// characters (digits included) into one `_`.
///
/// ```
/// use scout_core::normalize;
/// assert_eq!(normalize("auto_score"), "AUTO_SCORE");
/// assert_eq!(normalize("defense?"), "DEFENSE_");
/// ```
pub fn normalize(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut in_run = false;
    for c in code.chars() {
        if c.is_ascii_alphabetic() {
            out.push(c.to_ascii_uppercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Quote an identifier for SQLite, doubling embedded double quotes.
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
