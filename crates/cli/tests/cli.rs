use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let cache_dir = dir.path().join("cache");
    let config_path = dir.path().join("config.toml");
    let content = format!(
        "[general]\ncache_dir = \"{}\"\n",
        cache_dir.display().to_string().replace('\\', "/")
    );
    fs::write(&config_path, content).expect("write config");
    config_path
}

fn add_page(config_path: &Path, name: &str, url: &str) {
    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(config_path)
        .args(["add", "--name", name, "--url", url])
        .assert()
        .success();
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("cache_dir"));
    assert!(content.contains("mode = \"links\""));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# existing").expect("write existing");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn add_then_list_shows_the_page() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);

    add_page(&config_path, "Example", "http://example.com/news");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Example"))
        .stdout(predicate::str::contains("http://example.com/news"))
        .stdout(predicate::str::contains("pending"));
}

#[test]
fn duplicate_url_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);

    add_page(&config_path, "First", "http://example.com/");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["add", "--name", "Second", "--url", "http://example.com/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already registered"));
}

#[test]
fn rename_keeps_the_url() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);

    add_page(&config_path, "Old", "http://example.com/page");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["rename", "--from", "Old", "--to", "New"])
        .assert()
        .success();

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New"))
        .stdout(predicate::str::contains("http://example.com/page"));
}

#[test]
fn export_import_roundtrip() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);
    let export_path = dir.path().join("registry-export.json");

    add_page(&config_path, "A", "http://example.com/a");
    add_page(&config_path, "B", "http://example.com/b");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["export", "--path"])
        .arg(&export_path)
        .assert()
        .success();

    let exported: Value =
        serde_json::from_str(&fs::read_to_string(&export_path).expect("read export"))
            .expect("valid json");
    assert_eq!(exported.as_array().map(|a| a.len()), Some(2));

    // Re-import into a fresh cache.
    let dir2 = TempDir::new().expect("temp dir");
    let config_path2 = write_config(&dir2);

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path2)
        .args(["import", "--path"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 entries"));

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path2)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://example.com/a"))
        .stdout(predicate::str::contains("http://example.com/b"));
}

#[test]
fn removed_page_can_be_added_again() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);
    let import_path = dir.path().join("import.json");

    add_page(&config_path, "A", "http://example.com/a");
    add_page(&config_path, "B", "http://example.com/b");

    // Importing only A marks B as removed.
    fs::write(
        &import_path,
        r#"[{"name": "A", "url": "http://example.com/a"}]"#,
    )
    .expect("write import");
    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["import", "--path"])
        .arg(&import_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 removed)"));

    // The leftover record must not block re-registration.
    add_page(&config_path, "B", "http://example.com/b");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["print", "--name", "B"])
        .assert()
        .success();
}

#[test]
fn reimported_page_is_monitored_again() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);
    let narrow = dir.path().join("narrow.json");
    let full = dir.path().join("full.json");

    add_page(&config_path, "A", "http://example.com/a");
    add_page(&config_path, "B", "http://example.com/b");

    fs::write(&narrow, r#"[{"name": "A", "url": "http://example.com/a"}]"#).expect("write");
    fs::write(
        &full,
        r#"[{"name": "A", "url": "http://example.com/a"},
           {"name": "B", "url": "http://example.com/b"}]"#,
    )
    .expect("write");

    for path in [&narrow, &full] {
        let mut cmd = cargo_bin_cmd!("pagewatch");
        cmd.arg("--config")
            .arg(&config_path)
            .args(["import", "--path"])
            .arg(path)
            .assert()
            .success();
    }

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\"").not())
        .stdout(predicate::str::contains("http://example.com/b"));
}

#[test]
fn duplicate_urls_in_import_are_skipped() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);
    let import_path = dir.path().join("import.json");

    fs::write(
        &import_path,
        r#"[{"name": "First", "url": "http://example.com/dup"},
           {"name": "Second", "url": "http://example.com/dup"}]"#,
    )
    .expect("write import");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["import", "--path"])
        .arg(&import_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 entries"));

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Second").not());
}

#[test]
fn delete_removes_the_page() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);

    add_page(&config_path, "Doomed", "http://example.com/doomed");

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["delete", "--name", "Doomed"])
        .assert()
        .success();

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Doomed").not());
}

#[test]
fn print_unknown_page_fails() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .args(["print", "--name", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No page named"));
}

#[test]
fn update_with_empty_registry_succeeds() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_config(&dir);

    let mut cmd = cargo_bin_cmd!("pagewatch");
    cmd.arg("--config")
        .arg(&config_path)
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("No pages registered"));
}
