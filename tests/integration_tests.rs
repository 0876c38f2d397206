//! Integration tests for the pcfg CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Helper to get a pcfg command isolated from the user's config
fn pcfg(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pcfg").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env_remove("PCFG_CATALOG")
        .env_remove("PCFG_FORMAT")
        .env_remove("PCFG_SINK")
        .env_remove("PCFG_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a workspace in a temp directory
fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp).arg("init").assert().success();
    tmp
}

/// Helper to write a catalog file next to the workspace
fn write_catalog(tmp: &TempDir, name: &str, content: &str) -> String {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path.display().to_string()
}

fn stdout_json(output: std::process::Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

const SMALL_CATALOG: &str = r#"
processes:
  - id: 7
    name: Laser Cutting
materials:
  - id: 70
    processId: 7
    name: Acrylic
    color: [Clear, Smoke]
finishes:
  - id: 700
    processId: 7
    name: Flame Polished
    restrictedMaterials: [70]
"#;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("manufacturing process"))
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("configure"))
        .stdout(predicate::str::contains("submit"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pcfg"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp).arg("frobnicate").assert().failure();
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_workspace() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized configurator workspace"));

    assert!(tmp.path().join(".pcfg").is_dir());
    assert!(tmp.path().join(".pcfg/config.yaml").is_file());
    assert!(tmp.path().join(".pcfg/catalog.yaml").is_file());
}

#[test]
fn test_init_twice_reports_existing() {
    let tmp = setup_workspace();
    pcfg(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_restores_catalog() {
    let tmp = setup_workspace();
    fs::write(tmp.path().join(".pcfg/catalog.yaml"), SMALL_CATALOG).unwrap();

    pcfg(&tmp).args(["init", "--force"]).assert().success();

    let catalog = fs::read_to_string(tmp.path().join(".pcfg/catalog.yaml")).unwrap();
    assert!(catalog.contains("CNC Machining"));
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[test]
fn test_catalog_list_processes_hides_inactive() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["catalog", "list", "processes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CNC Machining"))
        .stdout(predicate::str::contains("Injection Molding").not())
        .stdout(predicate::str::contains("3 process(s) found"));

    pcfg(&tmp)
        .args(["catalog", "list", "processes", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Injection Molding"));
}

#[test]
fn test_catalog_list_materials_by_process() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["catalog", "list", "materials", "--process", "2", "-f", "id"])
        .assert()
        .success()
        .stdout("20\n21\n22\n");
}

#[test]
fn test_catalog_list_count() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["catalog", "list", "finishes", "--process", "1", "--count"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn test_catalog_list_finishes_for_material_json() {
    let tmp = TempDir::new().unwrap();
    let output = pcfg(&tmp)
        .args(["catalog", "list", "finishes", "--material", "10", "-f", "json"])
        .output()
        .unwrap();

    let json = stdout_json(output);
    let ids: Vec<u64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![100, 101, 102, 103]);
}

#[test]
fn test_catalog_list_csv() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["catalog", "list", "materials", "-p", "2", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id,process,name,colors,infill,tolerance,custom,active\n",
        ))
        .stdout(predicate::str::contains("\"Black, White, Gray, Red\""));
}

#[test]
fn test_catalog_show_material() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["catalog", "show", "material", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PLA"))
        .stdout(predicate::str::contains("FDM 3D Printing"))
        .stdout(predicate::str::contains("Sanded"));
}

#[test]
fn test_catalog_show_yaml() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["catalog", "show", "finish", "101", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: Anodized Type II"))
        .stdout(predicate::str::contains("restrictedMaterials"));
}

#[test]
fn test_catalog_show_unknown_id_fails() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["catalog", "show", "material", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("999"));
}

#[test]
fn test_catalog_check_sample() {
    let tmp = TempDir::new().unwrap();
    // ABS stays active under the inactive Injection Molding process
    pcfg(&tmp)
        .args(["catalog", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"))
        .stdout(predicate::str::contains("0 error(s), 1 warning(s)"));

    pcfg(&tmp)
        .args(["catalog", "check", "--strict"])
        .assert()
        .failure();
}

#[test]
fn test_catalog_check_dangling_reference() {
    let tmp = TempDir::new().unwrap();
    let catalog = SMALL_CATALOG.replace("restrictedMaterials: [70]", "restrictedMaterials: [70, 71]");
    let path = write_catalog(&tmp, "broken.yaml", &catalog);

    pcfg(&tmp)
        .args(["--catalog", &path, "catalog", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("71"))
        .stderr(predicate::str::contains("catalog check failed"));
}

#[test]
fn test_duplicate_material_id_rejected_on_load() {
    let tmp = TempDir::new().unwrap();
    let catalog = r#"
processes:
  - id: 7
    name: Laser Cutting
  - id: 8
    name: Waterjet
materials:
  - id: 70
    processId: 7
    name: Acrylic
  - id: 70
    processId: 8
    name: Granite
"#;
    let path = write_catalog(&tmp, "dup.yaml", catalog);

    pcfg(&tmp)
        .args(["--catalog", &path, "catalog", "list", "materials"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate material id 70"));

    pcfg(&tmp)
        .args(["--catalog", &path, "submit", "-p", "7", "-m", "70", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate material id 70"));
}

#[test]
fn test_catalog_check_clean_custom_catalog() {
    let tmp = TempDir::new().unwrap();
    let path = write_catalog(&tmp, "small.yaml", SMALL_CATALOG);

    pcfg(&tmp)
        .args(["--catalog", &path, "catalog", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog OK"));
}

#[test]
fn test_catalog_schema_violation_fails() {
    let tmp = TempDir::new().unwrap();
    let path = write_catalog(
        &tmp,
        "bad.yaml",
        "processes:\n  - id: 1\nmaterials: []\nfinishes: []\n",
    );

    pcfg(&tmp)
        .args(["--catalog", &path, "catalog", "list", "processes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn test_catalog_syntax_error_fails() {
    let tmp = TempDir::new().unwrap();
    let path = write_catalog(&tmp, "bad.json", "{ \"processes\": [ }");

    pcfg(&tmp)
        .args(["--catalog", &path, "catalog", "list", "processes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn test_catalog_json_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_catalog(
        &tmp,
        "catalog.json",
        r#"{"processes":[{"id":5,"name":"Waterjet"}],"materials":[],"finishes":[]}"#,
    );

    pcfg(&tmp)
        .args(["--catalog", &path, "catalog", "list", "processes", "-f", "id"])
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn test_catalog_schema_prints() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["catalog", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"$schema\""));
}

#[test]
fn test_catalog_dump_round_trips_through_loader() {
    let tmp = TempDir::new().unwrap();
    let output = pcfg(&tmp).args(["catalog", "dump"]).output().unwrap();
    assert!(output.status.success());

    let path = write_catalog(&tmp, "dumped.yaml", &String::from_utf8(output.stdout).unwrap());
    pcfg(&tmp)
        .args(["--catalog", &path, "catalog", "list", "processes", "--all", "--count"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn test_workspace_catalog_is_used() {
    let tmp = setup_workspace();
    fs::write(tmp.path().join(".pcfg/catalog.yaml"), SMALL_CATALOG).unwrap();

    pcfg(&tmp)
        .args(["catalog", "list", "processes", "-f", "id"])
        .assert()
        .success()
        .stdout("7\n");
}

// ============================================================================
// Options Tests
// ============================================================================

#[test]
fn test_options_for_material() {
    let tmp = TempDir::new().unwrap();
    let output = pcfg(&tmp)
        .args(["options", "--process", "2", "--material", "20", "-f", "json"])
        .output()
        .unwrap();

    let view = stdout_json(output);
    assert_eq!(view["process"]["id"], 2);
    assert_eq!(view["material"]["name"], "PLA");
    assert_eq!(view["availableMaterialCount"], 3);
    assert_eq!(view["colors"].as_array().unwrap().len(), 4);
    assert_eq!(view["displayedTolerance"], 0.2);
    assert_eq!(view["finishVisible"], true);
    assert_eq!(view["finishes"][0]["id"], 200);
    assert_eq!(view["customMaterialVisible"], false);
}

#[test]
fn test_options_without_material_hides_finishes() {
    let tmp = TempDir::new().unwrap();
    let output = pcfg(&tmp)
        .args(["options", "--process", "1", "-f", "json"])
        .output()
        .unwrap();

    let view = stdout_json(output);
    assert_eq!(view["availableMaterialCount"], 4);
    assert_eq!(view["finishVisible"], false);
    assert!(view["finishes"].as_array().unwrap().is_empty());
    assert!(view["material"].is_null());
}

#[test]
fn test_options_id_lists_next_level() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["options", "-f", "id"])
        .assert()
        .success()
        .stdout("1\n2\n3\n");

    pcfg(&tmp)
        .args(["options", "-p", "3", "-f", "id"])
        .assert()
        .success()
        .stdout("30\n31\n");
}

#[test]
fn test_options_rejects_material_from_other_process() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["options", "-p", "1", "-m", "20"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not selectable"));
}

// ============================================================================
// Submit Tests
// ============================================================================

#[test]
fn test_submit_json_envelope() {
    let tmp = TempDir::new().unwrap();
    let output = pcfg(&tmp)
        .args([
            "submit", "-p", "2", "-m", "20", "--finish", "200", "-n", "10", "--color", "Red",
            "--infill", "50%", "-f", "json",
        ])
        .output()
        .unwrap();

    let envelope = stdout_json(output);
    assert!(envelope["id"].as_str().unwrap().starts_with("SUB-"));
    assert!(envelope["submitted"].is_string());

    let properties = &envelope["properties"];
    assert_eq!(properties["quantity"], 10);
    assert_eq!(properties["processId"], 2);
    assert_eq!(properties["materialId"], 20);
    assert_eq!(properties["finishId"], 200);
    assert_eq!(properties["color"], "Red");
    assert_eq!(properties["infill"], "50%");
    assert_eq!(properties["tolerance"], 0.2);
    assert_eq!(properties["threads"], 1);
    assert_eq!(properties["inserts"], 1);
    assert!(properties["customMaterial"].is_null());
}

#[test]
fn test_submit_json_lines_omits_unset_finish() {
    let tmp = TempDir::new().unwrap();
    let output = pcfg(&tmp)
        .args(["submit", "-p", "3", "-m", "31"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);

    let envelope: Value = serde_json::from_str(stdout.trim()).unwrap();
    let properties = envelope["properties"].as_object().unwrap();
    assert!(!properties.contains_key("finishId"));
    assert_eq!(properties["materialId"], 31);
    assert_eq!(properties["tolerance"], 0.25);
    assert!(properties["color"].is_null());
}

#[test]
fn test_submit_yaml() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["submit", "-p", "1", "-m", "11", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("materialId: 11"));
}

#[test]
fn test_submit_custom_material_text() {
    let tmp = TempDir::new().unwrap();
    let output = pcfg(&tmp)
        .args([
            "submit",
            "-p",
            "1",
            "-m",
            "19",
            "--finish",
            "103",
            "--custom-material",
            "Inconel 718",
            "--custom-finish",
            "Black oxide",
            "-f",
            "json",
        ])
        .output()
        .unwrap();

    let properties = stdout_json(output)["properties"].clone();
    assert_eq!(properties["customMaterial"], "Inconel 718");
    assert_eq!(properties["customFinish"], "Black oxide");
    assert!(properties["tolerance"].is_null());
}

#[test]
fn test_submit_custom_text_dropped_for_catalog_material() {
    let tmp = TempDir::new().unwrap();
    let output = pcfg(&tmp)
        .args([
            "submit",
            "-p",
            "1",
            "-m",
            "10",
            "--custom-material",
            "ignored",
            "--dry-run",
            "-f",
            "json",
        ])
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let record = stdout_json(output);
    assert!(record["customMaterial"].is_null());
    assert!(stderr.contains("--custom-material ignored"));
}

#[test]
fn test_submit_tolerance_choices() {
    let tmp = TempDir::new().unwrap();
    let chosen = pcfg(&tmp)
        .args(["submit", "-p", "1", "-m", "10", "-t", "0.01", "--dry-run", "-f", "json"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(chosen)["tolerance"], 0.01);

    let cleared = pcfg(&tmp)
        .args(["submit", "-p", "1", "-m", "10", "--no-tolerance", "--dry-run", "-f", "json"])
        .output()
        .unwrap();
    assert!(stdout_json(cleared)["tolerance"].is_null());
}

#[test]
fn test_submit_warns_on_unoffered_color() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["submit", "-p", "2", "-m", "20", "--color", "Purple", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("color 'Purple' is not offered"))
        .stdout(predicate::str::contains("Purple"));
}

#[test]
fn test_submit_rejects_material_from_other_process() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["submit", "-p", "1", "-m", "20"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not selectable"));
}

#[test]
fn test_submit_rejects_inactive_material() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["submit", "-p", "1", "-m", "13"])
        .assert()
        .failure();
}

#[test]
fn test_submit_rejects_unoffered_finish() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["submit", "-p", "1", "-m", "11", "--finish", "101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not offered"));
}

#[test]
fn test_submit_rejects_unknown_process() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["submit", "-p", "99", "-m", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown process"));
}

#[test]
fn test_submit_requires_process_and_material() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp).args(["submit", "-p", "1"]).assert().failure();
}

#[test]
fn test_submit_rejects_zero_counts() {
    let tmp = TempDir::new().unwrap();
    for flag in ["--quantity", "--threads", "--inserts"] {
        pcfg(&tmp)
            .args(["submit", "-p", "1", "-m", "10", flag, "0", "--dry-run"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(flag));
    }

    pcfg(&tmp)
        .args(["submit", "-p", "1", "-m", "10", "--threads", "1", "--dry-run"])
        .assert()
        .success();
}

#[test]
fn test_submit_log_sink() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .env("PCFG_SINK", "log")
        .args(["submit", "-p", "2", "-m", "22"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("properties submitted"));
}

// ============================================================================
// Configure Tests
// ============================================================================

#[test]
fn test_configure_requires_terminal() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .arg("configure")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_keys() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("default_format"))
        .stdout(predicate::str::contains("sink"));
}

#[test]
fn test_config_set_and_show() {
    let tmp = setup_workspace();
    pcfg(&tmp)
        .args(["config", "set", "sink", "log"])
        .assert()
        .success();

    pcfg(&tmp)
        .args(["config", "show", "sink"])
        .assert()
        .success()
        .stdout("log\n");

    // Submissions now go to the log instead of stdout
    pcfg(&tmp)
        .args(["submit", "-p", "3", "-m", "30"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    pcfg(&tmp)
        .args(["config", "unset", "sink"])
        .assert()
        .success();
    pcfg(&tmp)
        .args(["config", "show", "sink"])
        .assert()
        .failure();
}

#[test]
fn test_config_default_format() {
    let tmp = setup_workspace();
    pcfg(&tmp)
        .args(["config", "set", "default_format", "id"])
        .assert()
        .success();

    pcfg(&tmp)
        .args(["catalog", "list", "processes"])
        .assert()
        .success()
        .stdout("1\n2\n3\n");
}

#[test]
fn test_config_set_rejects_bad_values() {
    let tmp = setup_workspace();
    pcfg(&tmp)
        .args(["config", "set", "sink", "kafka"])
        .assert()
        .failure();
    pcfg(&tmp)
        .args(["config", "set", "author", "someone"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_set_global() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["config", "set", "--global", "default_format", "json"])
        .assert()
        .success();

    pcfg(&tmp)
        .args(["config", "show", "default_format"])
        .assert()
        .success()
        .stdout("json\n");
}

#[test]
fn test_env_overrides_config() {
    let tmp = setup_workspace();
    fs::write(tmp.path().join(".pcfg/catalog.yaml"), SMALL_CATALOG).unwrap();

    // PCFG_CATALOG points back at a file with process 5
    let path = write_catalog(
        &tmp,
        "env.json",
        r#"{"processes":[{"id":5,"name":"Waterjet"}],"materials":[],"finishes":[]}"#,
    );
    pcfg(&tmp)
        .env("PCFG_CATALOG", &path)
        .args(["catalog", "list", "processes", "-f", "id"])
        .assert()
        .success()
        .stdout("5\n");
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    pcfg(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pcfg"));
}
