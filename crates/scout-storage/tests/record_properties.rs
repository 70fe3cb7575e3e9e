//! Property tests: a record written through the gateway reads back as the
//! segments it was written from, modulo the declared lossy display of
//! booleans and blank numbers.

use proptest::prelude::*;
use tempfile::TempDir;

use scout_core::{FieldSpec, FieldType, GameConfig, SectionSpec, StorageConfig};
use scout_storage::{create_database, Database, QueryGateway};

fn schema() -> GameConfig {
    GameConfig::new(
        "Props",
        vec![
            SectionSpec::new(
                "Counts",
                vec![
                    FieldSpec::new("auto_score", FieldType::Number),
                    FieldSpec::new("cycles", FieldType::Counter),
                ],
            ),
            SectionSpec::new(
                "Flags",
                vec![
                    FieldSpec::new("defense?", FieldType::Boolean),
                    FieldSpec::new("notes", FieldType::Text),
                ],
            ),
        ],
    )
}

/// Raw segment plus the display string it must read back as.
fn number_segment() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        Just((String::new(), String::new())),
        any::<i64>().prop_map(|n| (n.to_string(), n.to_string())),
    ]
}

fn boolean_segment() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        Just(("true".to_string(), "true".to_string())),
        Just((String::new(), String::new())),
        "[a-z]{1,6}".prop_map(|s| {
            let shown = if s == "true" { "true" } else { "false" };
            (s, shown.to_string())
        }),
    ]
}

fn text_segment() -> impl Strategy<Value = (String, String)> {
    "[a-zA-Z0-9 ,.?!-]{0,24}".prop_map(|s| (s.clone(), s))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_insert_then_list_reproduces_segments(
        records in prop::collection::vec(
            (number_segment(), number_segment(), boolean_segment(), text_segment()),
            1..6,
        )
    ) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("scout.db"), StorageConfig::default());
        let schema = schema();
        create_database(&db, &schema).unwrap();
        let gateway = QueryGateway::new(&db, &schema);

        for (score, cycles, defense, notes) in &records {
            let payload = [&score.0, &cycles.0, &defense.0, &notes.0]
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join("\t");
            gateway.insert_record(&payload).unwrap();
        }

        let grid = gateway.list_active_records().unwrap();
        prop_assert_eq!(grid.len(), records.len() + 1);
        for (i, (score, cycles, defense, notes)) in records.iter().enumerate() {
            let expected = vec![
                (i + 1).to_string(),
                "false".to_string(),
                score.1.clone(),
                cycles.1.clone(),
                defense.1.clone(),
                notes.1.clone(),
            ];
            prop_assert_eq!(&grid[i + 1], &expected);

            // A displayed row is a fixed point of update.
            prop_assert_eq!(gateway.update_record(&grid[i + 1]).unwrap(), 1);
        }
        prop_assert_eq!(gateway.list_active_records().unwrap(), grid);
    }

    #[test]
    fn prop_wrong_segment_count_never_writes(extra in 1usize..4, short in any::<bool>()) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("scout.db"), StorageConfig::default());
        let schema = schema();
        create_database(&db, &schema).unwrap();
        let gateway = QueryGateway::new(&db, &schema);

        let count = if short { 4 - extra } else { 4 + extra };
        let payload = vec!["1"; count].join("\t");
        prop_assert!(gateway.insert_record(&payload).is_err());
        prop_assert_eq!(gateway.count_active_records().unwrap(), 0);
    }
}
