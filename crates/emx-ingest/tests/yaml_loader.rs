use std::fs;

use emx_ingest::{DocumentLoader, YamlLoader};
use emx_model::{ErrorKind, Value};

#[test]
fn loads_document_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bird.yaml");
    fs::write(
        &path,
        "name: bird\nversion: 1.2\nentities:\n  - name: species\n    attributes:\n      - name: id\n",
    )
    .expect("write yaml");

    let document = YamlLoader::new().load(&path).expect("load yaml");
    assert_eq!(document.name().as_deref(), Some("bird"));
    assert_eq!(document.get("version"), Some(&Value::from(1.2)));
    assert_eq!(
        document
            .get("entities")
            .and_then(Value::as_sequence)
            .map(Vec::len),
        Some(1)
    );
    assert_eq!(document.path, path);
}

#[test]
fn include_resolves_next_to_including_document() {
    let dir = tempfile::tempdir().expect("temp dir");
    let shared = dir.path().join("shared");
    fs::create_dir_all(&shared).expect("create shared dir");
    fs::write(shared.join("base.yaml"), "name: base\ndescription: Shared package\n")
        .expect("write base");
    let including = shared.join("bird.yaml");
    fs::write(&including, "include: base.yaml\nentities: []\n").expect("write bird");

    let loader = YamlLoader::new();
    let document = loader.load(&including).expect("load bird");
    let target = document
        .include()
        .expect("scalar include")
        .expect("include directive");
    let included = loader.load_include(&document, &target).expect("load include");

    assert_eq!(included.name().as_deref(), Some("base"));
    assert_eq!(included.path, shared.join("base.yaml"));
}

#[test]
fn missing_file_reports_io_kind() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = YamlLoader::new()
        .load(&dir.path().join("absent.yaml"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("absent.yaml"));
}
