//! Student build generation and read-back into a read-only store.

use examplanner_core::export::student_build::DEFAULT_MOUNT_ID;
use examplanner_core::{
    extract_injected_data, generate_student_build, AppConfig, BuildProfile, ErrorKind, ExamRecord,
    MemoryStore, PlannerError, PlannerStore, RuntimeEnv, StoreMode, StudentBuildGenerator,
};

const BUNDLED: &str = r#"<!doctype html>
<html lang="es">
  <head>
    <script type="module">console.log("bundled app")</script>
  </head>
  <body>
    <div id="planner-root"><div class="loading"><p>Cargando…</p></div></div>
  </body>
</html>"#;

const DEV_SERVER: &str = r#"<!doctype html>
<html>
  <head><script type="module" src="/@vite/client"></script></head>
  <body>
    <div id="planner-root"></div>
    <script type="module" src="/src/main.tsx"></script>
  </body>
</html>"#;

fn exam(id: &str, title: &str) -> ExamRecord {
    ExamRecord {
        id: id.to_string(),
        title: title.to_string(),
        subject: "Física".to_string(),
        date: "2026-11-20".to_string(),
        time: "13:00".to_string(),
        location: "Auditorio".to_string(),
        topics: vec![],
        notes: Some("Traer calculadora".to_string()),
        form_url: None,
        distribution_url: Some("https://example.com/aulas".to_string()),
    }
}

#[test]
fn test_round_trip_into_read_only_store() {
    let records = vec![exam("1", "Parcial </script><b>1</b>"), exam("2", "Final")];
    let mut config = AppConfig::default();
    config.semester = "I semestre 2027".to_string();

    let html = StudentBuildGenerator::new(BUNDLED, BuildProfile::detect(BUNDLED))
        .generate(&records, Some(&config))
        .unwrap();

    assert!(html.contains(&format!(r#"<div id="{}"></div>"#, DEFAULT_MOUNT_ID)));
    assert!(!html.contains("Cargando"));
    assert_eq!(html.matches("</script>").count(), 2);

    let injected = extract_injected_data(&html).unwrap();
    let store = PlannerStore::open(MemoryStore::new(), Some(injected), &RuntimeEnv::default()).unwrap();

    assert_eq!(store.mode(), StoreMode::ReadOnly);
    assert_eq!(store.exams(), records.as_slice());
    assert_eq!(store.config(), &config);
}

#[test]
fn test_dev_template_is_blocked() {
    assert_eq!(BuildProfile::detect(DEV_SERVER), BuildProfile::Development);

    let err = StudentBuildGenerator::new(DEV_SERVER, BuildProfile::detect(DEV_SERVER))
        .generate(&[exam("1", "A")], None)
        .unwrap_err();
    assert!(matches!(err, PlannerError::BlockedExport));
    assert_eq!(err.kind(), Some(ErrorKind::BlockedExport));

    assert_eq!(generate_student_build(DEV_SERVER, BuildProfile::Development, &[]), "");
}

#[test]
fn test_explicit_profile_overrides_detection() {
    let env = RuntimeEnv {
        build_profile: Some(BuildProfile::Development),
        ..Default::default()
    };
    assert_eq!(env.profile_for(BUNDLED), BuildProfile::Development);
    assert_eq!(RuntimeEnv::default().profile_for(BUNDLED), BuildProfile::Production);
}

#[test]
fn test_template_is_not_modified() {
    let template = BUNDLED.to_string();
    let generator = StudentBuildGenerator::new(template.clone(), BuildProfile::Production);
    let first = generator.generate(&[exam("1", "A")], None).unwrap();
    let second = generator.generate(&[exam("2", "B")], None).unwrap();

    assert_ne!(first, second);
    assert!(second.contains(r#""id":"2""#));
    assert!(!second.contains(r#""id":"1""#));
    assert_eq!(template, BUNDLED);
}

#[test]
fn test_page_without_injection_has_no_data() {
    assert!(extract_injected_data(BUNDLED).is_none());
}
