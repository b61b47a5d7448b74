//! Profile persistence through the CLI (non-interactive paths only).
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

fn profiles_path(xdg: &Path) -> PathBuf {
    xdg.join("sysdash").join("profiles.json")
}

fn run_sysdash(xdg: &Path, args: &[&str]) {
    let out = Command::cargo_bin("sysdash")
        .unwrap()
        .env("XDG_CONFIG_HOME", xdg)
        .env_remove("SYSDASH_LOG")
        .args(args)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "sysdash {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn test_profile_created_on_first_use() {
    let td = tempfile::tempdir().unwrap();
    run_sysdash(td.path(), &["--profile", "unittest", "http://example:1", "--dry-run"]);
    let data = fs::read_to_string(profiles_path(td.path())).expect("profiles.json created");
    assert!(data.contains("unittest"), "profiles.json missing profile entry: {data}");
}

#[test]
fn test_profile_overwrite_only_when_changed() {
    let td = tempfile::tempdir().unwrap();
    run_sysdash(td.path(), &["--profile", "prod", "http://one:8080", "--dry-run"]);
    let first = fs::read_to_string(profiles_path(td.path())).unwrap();
    run_sysdash(td.path(), &["--profile", "prod", "http://one:8080", "--dry-run"]);
    let second = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");
    // --save overwrites without prompting
    run_sysdash(td.path(), &["--profile", "prod", "--save", "http://two:8080", "--dry-run"]);
    let third = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert!(third.contains("two"), "Updated URL not written: {third}");
}

#[test]
fn test_saved_profile_is_loaded_by_name() {
    let td = tempfile::tempdir().unwrap();
    run_sysdash(td.path(), &["--profile", "lab", "http://lab:9000", "--dry-run"]);
    let out = Command::cargo_bin("sysdash")
        .unwrap()
        .env("XDG_CONFIG_HOME", td.path())
        .args(["--profile", "lab", "--dry-run"])
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&out.stdout).contains("http://lab:9000/"));
}

#[test]
fn test_profile_tls_ca_persisted() {
    let td = tempfile::tempdir().unwrap();
    let ca = td.path().join("cert.pem");
    // a file that exists but is not PEM: the profile is saved before the
    // client is built, so the run itself fails afterwards
    fs::write(&ca, "not a certificate").unwrap();
    let _ = Command::cargo_bin("sysdash")
        .unwrap()
        .env("XDG_CONFIG_HOME", td.path())
        .args([
            "--profile",
            "secureX",
            "--tls-ca",
            ca.to_str().unwrap(),
            "https://host:8443",
            "--dry-run",
        ])
        .output()
        .unwrap();
    let data = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert!(data.contains("secureX"));
    assert!(data.contains("cert.pem"));
}
