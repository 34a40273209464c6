//! End-to-end import/export through the file-backed store.

use examplanner_core::{
    parse_import, to_json, AppConfig, ErrorKind, ExamRecord, FileStore, PlannerStore, RuntimeEnv,
};

fn exam(id: &str, date: &str, title: &str) -> ExamRecord {
    ExamRecord {
        id: id.to_string(),
        title: title.to_string(),
        subject: "Física General I".to_string(),
        date: date.to_string(),
        time: "08:00".to_string(),
        location: "Aula 101".to_string(),
        topics: vec!["Cinemática".to_string()],
        notes: None,
        form_url: Some("https://forms.example.com/x".to_string()),
        distribution_url: None,
    }
}

fn open(dir: &std::path::Path) -> PlannerStore<FileStore> {
    PlannerStore::open(FileStore::open(dir).unwrap(), None, &RuntimeEnv::default()).unwrap()
}

#[test]
fn test_import_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let exported = {
        let source = vec![
            exam("b", "2026-06-01", "Segundo Parcial"),
            exam("a", "2026-04-01", "Primer Parcial"),
        ];
        let mut config = AppConfig::default();
        config.subtitle_name = "Cálculo I".to_string();
        to_json(&source, Some(&config)).unwrap()
    };

    {
        let mut store = open(dir.path());
        let result = parse_import(&exported);
        assert!(result.success);
        store.apply_import(result).unwrap();
    }

    let store = open(dir.path());
    let ids: Vec<&str> = store.exams().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(store.config().subtitle_name, "Cálculo I");
    assert_eq!(store.config().semester, AppConfig::default().semester);
}

#[test]
fn test_legacy_array_keeps_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path());
    store
        .update_config(examplanner_core::AppConfigPatch {
            title_name: Some("Mis exámenes".to_string()),
            ..Default::default()
        })
        .unwrap();

    let legacy = to_json(&[exam("x", "2026-05-05", "Quiz")], None).unwrap();
    store.apply_import(parse_import(&legacy)).unwrap();

    assert_eq!(store.exams().len(), 1);
    assert_eq!(store.config().title_name, "Mis exámenes");
}

#[test]
fn test_failed_import_leaves_disk_untouched() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = open(dir.path());
        store.add(exam("keep", "2026-03-03", "Original")).unwrap();

        let bad = parse_import(r#"[{"id": "1", "title": "", "subject": "Q"}]"#);
        assert!(!bad.success);
        assert_eq!(bad.error_kind, Some(ErrorKind::SchemaViolation));
        assert!(store.apply_import(bad).is_err());

        let garbage = parse_import("{ not json");
        assert_eq!(garbage.error_kind, Some(ErrorKind::MalformedJson));
        assert!(store.apply_import(garbage).is_err());
    }

    let store = open(dir.path());
    assert_eq!(store.exams().len(), 1);
    assert_eq!(store.exams()[0].id, "keep");
}

#[test]
fn test_bare_export_reimports_identically() {
    let records = vec![
        exam("1", "2026-01-10", "A"),
        exam("2", "2026-01-10", "B"),
        exam("3", "2026-02-01", "C"),
    ];
    let json = to_json(&records, None).unwrap();
    let data = parse_import(&json).into_result().unwrap();
    assert_eq!(data.exams, records);
    assert!(data.config.is_none());
}
