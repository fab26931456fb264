use std::fs;

use mindhub_client::{ensure_output_dir, export_json, PersistError};
use mindhub_core::MindustryServer;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn server(address: &str, name: Option<&str>) -> MindustryServer {
    MindustryServer {
        address: address.to_string(),
        name: name.map(str::to_string),
        ..MindustryServer::default()
    }
}

#[test]
fn export_creates_directory_and_replaces_previous_file() {
    let tmp = TempDir::new().expect("tempdir");
    let target = tmp.path().join("exports").join("servers.json");

    let written = export_json(&target, &[server("a:6567", Some("Alpha"))]).expect("first export");
    assert_eq!(written, target);

    export_json(&target, &[server("b:6567", None), server("c:6567", None)])
        .expect("second export");

    let content = fs::read_to_string(&target).expect("read export");
    let servers: Vec<MindustryServer> = serde_json::from_str(&content).expect("parse export");
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].address, "b:6567");
    assert!(content.contains("\"mapname\": null"));
}

#[test]
fn export_into_a_file_path_fails() {
    let tmp = TempDir::new().expect("tempdir");
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "not a directory").expect("write blocker");

    let err = export_json(&blocker.join("out.json"), &[server("a:6567", None)]).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir(_)), "got {err:?}");
}

#[test]
fn ensure_output_dir_accepts_existing_directory() {
    let tmp = TempDir::new().expect("tempdir");
    ensure_output_dir(tmp.path()).expect("existing dir");
    assert!(matches!(
        ensure_output_dir(&tmp.path().join("a").join("b")),
        Ok(())
    ));
}
