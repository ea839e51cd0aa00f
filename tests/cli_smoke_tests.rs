mod common;

use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("reformas_cli").expect("binary exists");
    cmd.env("PG_REFORMAS_HOME", home).env("NO_COLOR", "1");
    cmd
}

#[test]
fn version_prints_build_metadata() {
    let home = common::temp_home();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains("CLI version"))
        .stdout(contains("Quote schema"));
}

#[test]
fn catalog_lists_seed_services() {
    let home = common::temp_home();
    cli(&home)
        .args(["catalog", "pintura"])
        .assert()
        .success()
        .stdout(contains("Pintura Látex PVA"))
        .stdout(contains("Tinta Látex PVA"));
}

#[test]
fn sample_quote_can_be_shown_and_rendered() {
    let home = common::temp_home();
    cli(&home)
        .args(["sample", "ORC-2024-050"])
        .assert()
        .success()
        .stdout(contains("ORC-2024-050"));

    cli(&home)
        .arg("show")
        .assert()
        .success()
        .stdout(contains("Maria Silva"))
        .stdout(contains("Cronograma"));

    let output = home.join("ORC-2024-050.html");
    cli(&home)
        .args(["render", "ORC-2024-050"])
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("Wrote"));
    let page = std::fs::read_to_string(&output).expect("page written");
    assert!(page.contains("ORC-2024-050"));
    assert!(page.contains("size: A4"));

    cli(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("ORC-2024-050"));
}

#[test]
fn invalid_quantity_is_reported() {
    let home = common::temp_home();
    cli(&home).args(["sample", "ORC-2024-060"]).assert().success();
    cli(&home)
        .args(["add", "ORC-2024-060", "1", "-2"])
        .assert()
        .failure()
        .stderr(contains("Invalid quantity"));
}

#[test]
fn unknown_quote_is_reported() {
    let home = common::temp_home();
    cli(&home)
        .args(["show", "ORC-1999-001"])
        .assert()
        .failure()
        .stderr(contains("ORC-1999-001"));
}

#[test]
fn manual_backup_is_listed() {
    let home = common::temp_home();
    cli(&home).args(["sample", "ORC-2024-070"]).assert().success();
    cli(&home)
        .args(["backup", "ORC-2024-070", "Antes da obra"])
        .assert()
        .success()
        .stdout(contains("antes-da-obra_ORC-2024-070_"));
    cli(&home)
        .args(["backups", "ORC-2024-070"])
        .assert()
        .success()
        .stdout(contains("antes-da-obra_ORC-2024-070_"));
    cli(&home)
        .args(["restore", "ORC-2024-070", "missing.json"])
        .assert()
        .failure()
        .stderr(contains("missing.json"));
}
