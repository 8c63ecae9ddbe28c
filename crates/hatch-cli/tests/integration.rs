#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hatch(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hatch").unwrap();
    cmd.current_dir(dir.path()).env("HATCH_ROOT", dir.path());
    cmd
}

fn init_platform(dir: &TempDir) {
    hatch(dir).args(["init", "--name", "test"]).assert().success();
}

fn create_garden(dir: &TempDir) {
    hatch(dir)
        .args([
            "idea",
            "create",
            "garden",
            "--title",
            "Community garden",
            "--description",
            "Grow vegetables together",
            "--champion",
            "ana",
        ])
        .assert()
        .success();
}

fn project_manifest(dir: &TempDir, id: &str) -> std::path::PathBuf {
    dir.path().join(format!(".hatch/projects/{id}/manifest.yaml"))
}

// ---------------------------------------------------------------------------
// hatch init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    hatch(&dir).arg("init").assert().success();

    assert!(dir.path().join(".hatch/ideas").is_dir());
    assert!(dir.path().join(".hatch/projects").is_dir());
    assert!(dir.path().join(".hatch/config.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    hatch(&dir).arg("init").assert().success();
    hatch(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists"));
}

// ---------------------------------------------------------------------------
// hatch idea
// ---------------------------------------------------------------------------

#[test]
fn idea_create_and_list() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["idea", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("garden"))
        .stdout(predicate::str::contains("Community garden"));
}

#[test]
fn idea_create_rejects_duplicate() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["idea", "create", "garden", "--title", "Again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn idea_create_requires_init() {
    let dir = TempDir::new().unwrap();
    hatch(&dir)
        .args(["idea", "create", "garden", "--title", "Garden"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn idea_milestone_and_tag_show_up() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["idea", "milestone", "garden", "Break ground", "--date", "2027-03-01"])
        .assert()
        .success();
    hatch(&dir)
        .args(["idea", "tag", "garden", "outdoors"])
        .assert()
        .success();

    let out = hatch(&dir)
        .args(["--json", "idea", "show", "garden"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["idea"]["milestones"][0]["title"], "Break ground");
    assert_eq!(json["idea"]["milestones"][0]["date"], "2027-03-01");
    assert_eq!(json["idea"]["tags"][0], "outdoors");
}

#[test]
fn idea_milestone_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["idea", "milestone", "garden", "Break ground", "--date", "March"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

// ---------------------------------------------------------------------------
// hatch convert
// ---------------------------------------------------------------------------

#[test]
fn convert_happy_path_creates_project() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["convert", "garden"])
        .write_stdin("next\nnext\nassign designer bo\nnext\ntemplate scrum\nsubmit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 1/4"))
        .stdout(predicate::str::contains("is now a project"))
        .stdout(predicate::str::contains("/projects/community-garden"));

    let manifest = std::fs::read_to_string(project_manifest(&dir, "community-garden")).unwrap();
    let project: serde_yaml::Value = serde_yaml::from_str(&manifest).unwrap();
    assert_eq!(project["source_idea"], "garden");
    assert_eq!(project["workspace"]["board_template"], "scrum");

    // The idea is left as it was.
    hatch(&dir)
        .args(["idea", "show", "garden"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grow vegetables together"))
        .stdout(predicate::str::contains("community-garden"));
}

#[test]
fn convert_blank_name_blocks_scope() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["convert", "garden"])
        .write_stdin("next\nset name\nnext\ncancel\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("name must not be empty"))
        .stdout(predicate::str::contains("Conversion cancelled"));

    assert!(!dir.path().join(".hatch/projects/community-garden").exists());
}

#[test]
fn convert_submit_early_is_refused() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["convert", "garden"])
        .write_stdin("submit\ncancel\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("submit is only available"));
}

#[test]
fn convert_eof_discards_draft() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["convert", "garden"])
        .write_stdin("next\nset name Renamed\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("draft discarded"));

    assert!(!project_manifest(&dir, "renamed").exists());
}

#[test]
fn convert_conflict_keeps_draft_for_retry() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    hatch(&dir)
        .args(["convert", "garden"])
        .write_stdin("next\nnext\nnext\nsubmit\n")
        .assert()
        .success();

    hatch(&dir)
        .args(["convert", "garden"])
        .write_stdin("next\nnext\nnext\nsubmit\nset name Community garden east\nsubmit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project was not created"))
        .stdout(predicate::str::contains("/projects/community-garden-east"));

    assert!(project_manifest(&dir, "community-garden-east").exists());
}

#[test]
fn convert_json_streams_events() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);

    let out = hatch(&dir)
        .args(["--json", "convert", "garden"])
        .write_stdin("next\nnext\nnext\nsubmit\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let events: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .filter_map(|v| v["event"].as_str().map(str::to_string))
        .collect();
    assert_eq!(
        events,
        [
            "step_changed",
            "step_changed",
            "step_changed",
            "submit_started",
            "committed"
        ]
    );
}

#[test]
fn convert_unknown_idea_fails() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);

    hatch(&dir)
        .args(["convert", "nope"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ---------------------------------------------------------------------------
// hatch project / config
// ---------------------------------------------------------------------------

#[test]
fn project_list_after_conversion() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    create_garden(&dir);
    hatch(&dir)
        .args(["convert", "garden"])
        .write_stdin("next\nnext\nnext\nsubmit\n")
        .assert()
        .success();

    hatch(&dir)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("community-garden"));
    hatch(&dir)
        .args(["project", "show", "community-garden"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kanban"));
}

#[test]
fn config_validate_passes_on_default() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);

    hatch(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config OK"));
}

#[test]
fn config_validate_reports_empty_roles() {
    let dir = TempDir::new().unwrap();
    init_platform(&dir);
    let path = dir.path().join(".hatch/config.yaml");
    let mut cfg: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    cfg["wizard"]["roles"] = serde_yaml::Value::Sequence(vec![]);
    std::fs::write(&path, serde_yaml::to_string(&cfg).unwrap()).unwrap();

    hatch(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("wizard.roles is empty"));
}
