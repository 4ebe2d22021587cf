//! Integration tests for the offline `pigmento` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's home, config files and environment.
fn pigmento(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pigmento").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .env_remove("PIGMENTO_API_URL")
        .env_remove("PIGMENTO_DATA_DIR")
        .env_remove("PIGMENTO_BACKEND")
        .env_remove("PIGMENTO_DEV_MODE")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.path().join("store"))
        .arg("--log-level")
        .arg("error");
    cmd
}

fn status_json(temp_dir: &TempDir) -> serde_json::Value {
    let assert = pigmento(temp_dir).arg("status").arg("--json").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    serde_json::from_str(&stdout).expect("Status JSON output should be valid JSON")
}

#[test]
fn test_status_on_first_launch() {
    let temp_dir = TempDir::new().unwrap();

    let status = status_json(&temp_dir);
    assert_eq!(status["gate"], "NEEDS_ONBOARDING");
    assert_eq!(status["route"], "/onboarding");
    assert_eq!(status["isOnboard"], false);
    assert_eq!(status["signedIn"], false);
    assert_eq!(status["session"], serde_json::Value::Null);
    assert_eq!(status["backend"], "secure");
}

#[test]
fn test_status_human_output() {
    let temp_dir = TempDir::new().unwrap();

    pigmento(&temp_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pigmento Status"))
        .stdout(predicate::str::contains("NEEDS_ONBOARDING"));
}

#[test]
fn test_onboarding_persists_between_runs() {
    let temp_dir = TempDir::new().unwrap();

    pigmento(&temp_dir).arg("onboard").assert().success().stdout(predicate::str::contains("Onboarding completed"));

    let status = status_json(&temp_dir);
    assert_eq!(status["gate"], "NEEDS_AUTH");
    assert_eq!(status["route"], "/auth/signIn");

    pigmento(&temp_dir)
        .arg("onboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("already completed"));
}

#[test]
fn test_dev_sign_in_and_sign_out() {
    let temp_dir = TempDir::new().unwrap();
    pigmento(&temp_dir).arg("onboard").assert().success();

    pigmento(&temp_dir).env("PIGMENTO_DEV_MODE", "1").arg("dev-sign-in").assert().success();
    let status = status_json(&temp_dir);
    assert_eq!(status["gate"], "AUTHENTICATED");
    assert_eq!(status["route"], "/");
    assert_eq!(status["session"], "xxx");
    assert_eq!(status["isLoading"], false);

    pigmento(&temp_dir).arg("sign-out").assert().success();
    pigmento(&temp_dir).arg("sign-out").assert().success();
    let status = status_json(&temp_dir);
    assert_eq!(status["gate"], "NEEDS_AUTH");
    assert_eq!(status["isOnboard"], true);
    assert!(!temp_dir.path().join("store").join("session.json").exists());
}

#[test]
fn test_dev_sign_in_requires_dev_mode() {
    let temp_dir = TempDir::new().unwrap();

    pigmento(&temp_dir)
        .arg("dev-sign-in")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dev mode is disabled"));
}

#[test]
fn test_memory_backend_forgets_between_runs() {
    let temp_dir = TempDir::new().unwrap();

    pigmento(&temp_dir).arg("--backend").arg("memory").arg("onboard").assert().success();

    let assert = pigmento(&temp_dir).arg("--backend").arg("memory").arg("status").arg("--json").assert().success();
    let status: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(status["gate"], "NEEDS_ONBOARDING");
    assert_eq!(status["backend"], "memory");
}

#[test]
fn test_invalid_backend() {
    let temp_dir = TempDir::new().unwrap();

    pigmento(&temp_dir).arg("--backend").arg("cloud").arg("status").assert().failure();
}

#[test]
fn test_upload_requires_sign_in() {
    let temp_dir = TempDir::new().unwrap();
    pigmento(&temp_dir).arg("onboard").assert().success();
    let photo = temp_dir.path().join("photo.jpg");
    std::fs::write(&photo, [0xFF, 0xD8, 0xFF]).unwrap();

    pigmento(&temp_dir)
        .arg("upload")
        .arg(&photo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_color_requires_onboarding() {
    let temp_dir = TempDir::new().unwrap();

    pigmento(&temp_dir)
        .arg("color")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Onboarding not completed"));
}

#[test]
fn test_sign_up_validates_before_sending() {
    let temp_dir = TempDir::new().unwrap();

    pigmento(&temp_dir)
        .args(["sign-up", "--email", "johndoe@gmail.com", "--password", "secret1", "--confirm-password", "secret2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Passwords don't match"));
}

#[test]
fn test_sign_in_rejects_invalid_email() {
    let temp_dir = TempDir::new().unwrap();

    pigmento(&temp_dir)
        .args(["sign-in", "--email", "not-an-email", "--password", "whatever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid email address"));
}

#[test]
fn test_local_config_file_is_read() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".pigmentorc"), "[api]\ndev_mode = true\n").unwrap();

    pigmento(&temp_dir).arg("dev-sign-in").assert().success();
}
