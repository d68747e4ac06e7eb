use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use flp_bridge::{
    ProjectHandle,
    fixtures::demo_project,
    format,
    handle::{ErrorKind, HandleError, InfosPatch},
    model::Project,
};

fn handle_for(project: &Project, project_dir: Option<&str>) -> ProjectHandle {
    let bytes = format::save(project).expect("fixture project should serialize");
    ProjectHandle::from_bytes(&bytes, project_dir.map(str::to_string))
        .expect("fixture project should load")
}

#[test]
fn infos_extracts_metadata_in_channel_order() {
    let project = demo_project();
    let handle = handle_for(&project, None);

    let infos = handle.infos().expect("infos should succeed");
    assert_eq!(infos.title, "Night Drive");
    assert_eq!(infos.artist, "demo artist");
    assert_eq!(infos.description, "late session sketch");
    assert_eq!(infos.genre, "dnb");
    assert_eq!(infos.version, "21.0.3");
    assert!((infos.tempo - 174.0).abs() < f64::EPSILON);
    assert_eq!(infos.created_at, project.created_at.timestamp());
    assert!((infos.work_time - 5_400.0).abs() < f64::EPSILON);
    assert_eq!(
        infos.samples,
        vec![
            r"C:\audio\kick.wav".to_string(),
            "/home/demo/loops/hat.wav".to_string(),
        ]
    );
}

#[test]
fn plugins_are_deduplicated_by_name_in_first_occurrence_order() {
    let handle = handle_for(&demo_project(), None);

    let infos = handle.infos().expect("infos should succeed");
    assert_eq!(infos.plugins.len(), 1);
    assert_eq!(infos.plugins[0].name, "Serum");
    assert_eq!(infos.plugins[0].by, "Xfer Records");
}

#[test]
fn infos_never_mutates_the_project() {
    let project = demo_project();
    let handle = handle_for(&project, Some("proj"));

    let _ = handle.infos().expect("infos should succeed");
    let _ = handle.infos_json().expect("serialized infos should succeed");
    assert_eq!(handle.project(), &project);
}

#[test]
fn infos_json_uses_the_wire_key_spelling() {
    let handle = handle_for(&demo_project(), None);

    let raw = handle.infos_json().expect("serialized infos should succeed");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("infos should be json");
    let object = value.as_object().expect("infos should be a json object");
    for key in [
        "title",
        "artist",
        "description",
        "genre",
        "version",
        "tempo",
        "createdAt",
        "workTime",
        "samples",
        "plugins",
    ] {
        assert!(object.contains_key(key), "missing key: {key}");
    }
    assert!(value["tempo"].is_number());
    assert!(value["samples"].is_array());
    assert!(value["plugins"].is_array());
}

#[test]
fn set_infos_applies_only_present_fields() {
    let mut handle = handle_for(&demo_project(), None);

    let patch = InfosPatch {
        title: Some("Renamed".to_string()),
        tempo: Some(128.0),
        ..InfosPatch::default()
    };
    handle.set_infos(&patch).expect("patch should apply");

    let infos = handle.infos().expect("infos should succeed");
    assert_eq!(infos.title, "Renamed");
    assert!((infos.tempo - 128.0).abs() < f64::EPSILON);
    assert_eq!(infos.artist, "demo artist");
    assert_eq!(infos.genre, "dnb");
}

#[test]
fn set_infos_is_idempotent() {
    let patch = InfosPatch {
        title: Some("Once".to_string()),
        artist: Some("Someone".to_string()),
        tempo: Some(150.5),
        ..InfosPatch::default()
    };

    let mut once = handle_for(&demo_project(), Some("proj"));
    once.set_infos(&patch).expect("first apply should succeed");
    let after_once = once.infos().expect("infos should succeed");

    once.set_infos(&patch).expect("second apply should succeed");
    let after_twice = once.infos().expect("infos should succeed");

    assert_eq!(after_once, after_twice);
}

#[test]
fn set_infos_rejects_non_finite_tempo() {
    let mut handle = handle_for(&demo_project(), None);

    let patch = InfosPatch {
        tempo: Some(f64::NAN),
        ..InfosPatch::default()
    };
    let error = handle.set_infos(&patch).expect_err("nan tempo should fail");
    assert!(matches!(error, HandleError::SetInfos));
    assert_eq!(error.kind(), ErrorKind::Write);
    assert_eq!(error.to_string(), "Error while setting infos");
}

#[test]
fn info_then_export_roundtrips_metadata() {
    let handle = handle_for(&demo_project(), None);
    let original = handle.infos().expect("infos should succeed");

    let envelope = handle.export(false).expect("export should succeed");
    let value: serde_json::Value =
        serde_json::from_str(&envelope).expect("envelope should be json");
    let encoded = value["file"].as_str().expect("file should be base64 text");
    let bytes = BASE64.decode(encoded).expect("file should decode");

    let reloaded = ProjectHandle::from_bytes(&bytes, None).expect("exported bytes should load");
    let roundtripped = reloaded.infos().expect("infos should succeed");

    assert!((roundtripped.tempo - original.tempo).abs() < 1e-9);
    assert_eq!(roundtripped.created_at, original.created_at);
    assert_eq!(roundtripped, original);
}

#[test]
fn export_with_infos_bundles_metadata_next_to_file() {
    let handle = handle_for(&demo_project(), None);

    let envelope = handle.export(true).expect("export should succeed");
    let value: serde_json::Value =
        serde_json::from_str(&envelope).expect("envelope should be json");
    assert_eq!(value["title"], "Night Drive");
    assert!(value["tempo"].is_number());
    assert!(value["file"].is_string());
}

#[test]
fn export_without_infos_only_carries_the_file() {
    let handle = handle_for(&demo_project(), None);

    let envelope = handle.export(false).expect("export should succeed");
    let value: serde_json::Value =
        serde_json::from_str(&envelope).expect("envelope should be json");
    let object = value.as_object().expect("envelope should be a json object");
    assert_eq!(object.len(), 1);
    assert!(object.contains_key("file"));
}

#[test]
fn load_rejects_garbage_with_the_fixed_message() {
    let error = ProjectHandle::from_bytes(b"definitely not a project", None)
        .expect_err("garbage should not load");
    assert!(matches!(error, HandleError::Load));
    assert_eq!(error.kind(), ErrorKind::Load);
    assert_eq!(error.to_string(), "Error while parsing the file");
}
