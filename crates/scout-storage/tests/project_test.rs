//! Project lifecycle: create, reopen, migrate, persist the schema.

use tempfile::TempDir;

use scout_core::constants::{DATABASE_FILE, GAME_CONFIG_FILE, SETTINGS_FILE};
use scout_core::{FieldSpec, FieldType, GameConfig, ScoutConfig, SectionSpec, StoreError};
use scout_storage::ScoutProject;

fn season_schema() -> GameConfig {
    GameConfig::new(
        "Season",
        vec![SectionSpec::new(
            "Teleop",
            vec![
                FieldSpec::new("cycles", FieldType::Counter),
                FieldSpec::new("parked", FieldType::Boolean),
            ],
        )],
    )
}

#[test]
fn create_writes_all_three_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("event");
    let project = ScoutProject::create(&root, season_schema(), ScoutConfig::default()).unwrap();

    assert!(root.join(GAME_CONFIG_FILE).exists());
    assert!(root.join(DATABASE_FILE).exists());
    assert!(root.join(SETTINGS_FILE).exists());
    assert_eq!(project.schema().field_count(), 2);
    assert_eq!(project.dir(), root.as_path());
}

#[test]
fn create_twice_fails() {
    let dir = TempDir::new().unwrap();
    ScoutProject::create(dir.path(), season_schema(), ScoutConfig::default()).unwrap();
    let err = ScoutProject::create(dir.path(), season_schema(), ScoutConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::AlreadyExists(_)), "{err}");
}

#[test]
fn open_requires_an_initialized_directory() {
    let dir = TempDir::new().unwrap();
    let err = ScoutProject::open(dir.path()).err().unwrap();
    assert!(matches!(err, StoreError::NotInitialized(_)), "{err}");
}

#[test]
fn reopen_sees_records_and_settings() {
    let dir = TempDir::new().unwrap();
    let mut settings = ScoutConfig::default();
    settings.storage.table_name = Some("MATCHES".to_string());

    {
        let project = ScoutProject::create(dir.path(), season_schema(), settings).unwrap();
        project.gateway().insert_record("6\ttrue").unwrap();
        project.shutdown();
    }

    let project = ScoutProject::open(dir.path()).unwrap();
    assert_eq!(project.database().table_name(), "MATCHES");
    assert_eq!(project.schema().page_title, "Season");
    let grid = project.gateway().list_active_records().unwrap();
    assert_eq!(grid[1], vec!["1", "false", "6", "true"]);
}

#[test]
fn update_schema_migrates_then_persists() {
    let dir = TempDir::new().unwrap();
    let mut project = ScoutProject::create(dir.path(), season_schema(), ScoutConfig::default()).unwrap();
    project.gateway().insert_record("6\ttrue").unwrap();

    let mut next = season_schema();
    next.sections[0].fields.remove(1);
    next.sections
        .push(SectionSpec::new("Notes", vec![FieldSpec::new("comments", FieldType::Text)]));

    let report = project.update_schema(next.clone()).unwrap();
    assert_eq!(report.added, vec!["COMMENTS"]);
    assert_eq!(report.dropped, vec!["PARKED"]);

    let on_disk = GameConfig::load(&dir.path().join(GAME_CONFIG_FILE)).unwrap();
    assert_eq!(on_disk.columns(), vec!["CYCLES", "COMMENTS"]);

    let grid = project.gateway().list_active_records().unwrap();
    assert_eq!(grid[1], vec!["1", "false", "6", ""]);
}

#[test]
fn failed_update_leaves_json_untouched() {
    let dir = TempDir::new().unwrap();
    let mut project = ScoutProject::create(dir.path(), season_schema(), ScoutConfig::default()).unwrap();

    let mut bad = season_schema();
    bad.sections[0]
        .fields
        .push(FieldSpec::new("Cycles", FieldType::Number));
    assert!(project.update_schema(bad).is_err());

    let on_disk = GameConfig::load(&dir.path().join(GAME_CONFIG_FILE)).unwrap();
    assert_eq!(on_disk.columns(), vec!["CYCLES", "PARKED"]);
    assert_eq!(project.schema().field_count(), 2);
}
