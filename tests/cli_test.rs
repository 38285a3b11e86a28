//! Integration tests for the swaggen CLI

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/swagger")
        .join(name)
}

#[test]
fn test_check_command_lists_operations() {
    let mut cmd = Command::cargo_bin("swaggen").unwrap();

    cmd.arg("check")
        .arg("--spec")
        .arg(fixture("petstore.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Swagger Petstore: 4 operations, 3 models"))
        .stdout(predicate::str::contains("  listPets"))
        .stdout(predicate::str::contains("  showPetById"));
}

#[test]
fn test_generate_command_writes_package() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("pets");
    let mut cmd = Command::cargo_bin("swaggen").unwrap();

    cmd.arg("generate")
        .arg("--spec")
        .arg(fixture("petstore.json"))
        .arg("--package")
        .arg("pets")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 4 operations"))
        .stdout(predicate::str::contains("fingerprint: "));

    let manifest = std::fs::read_to_string(out.join("Cargo.toml")).unwrap();
    assert!(manifest.contains("name = \"pets\""));
    assert!(out.join("src/server.rs").exists());
}

#[test]
fn test_generate_reads_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("configured");
    let config = temp_dir.path().join("swaggen.toml");
    std::fs::write(
        &config,
        format!(
            "[generator]\npackage = \"configured\"\noutput_dir = {:?}\n\n[client]\nretries = 3\ntimeout_ms = 1500\n",
            out.to_string_lossy()
        ),
    )
    .unwrap();

    Command::cargo_bin("swaggen")
        .unwrap()
        .arg("generate")
        .arg("--spec")
        .arg(fixture("petstore.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let client = std::fs::read_to_string(out.join("src/client.rs")).unwrap();
    assert!(client.contains("runtime::BoundedRetryPolicy::new(4)"));
    assert!(client.contains("1500"));
}

#[test]
fn test_generate_fails_on_redefined_bad_request() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("broken");

    Command::cargo_bin("swaggen")
        .unwrap()
        .arg("generate")
        .arg("--spec")
        .arg(fixture("redefined_bad_request.json"))
        .arg("--package")
        .arg("broken")
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("reserved for the shared BadRequest"));

    assert!(!out.exists());
}

#[test]
fn test_generate_requires_a_package_name() {
    Command::cargo_bin("swaggen")
        .unwrap()
        .arg("generate")
        .arg("--spec")
        .arg(fixture("petstore.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("A package name is required"));
}

#[test]
fn test_check_rejects_form_data() {
    Command::cargo_bin("swaggen")
        .unwrap()
        .arg("check")
        .arg("--spec")
        .arg(fixture("form_data.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("formData"));
}
