use assert_cmd::cargo::cargo_bin_cmd;
use ccextract_testing::{TestWorld, fixtures};
use predicates::prelude::*;

const PROJECT: &str = "-Users-alice-src-app";
const OTHER_PROJECT: &str = "-Users-alice-notes";

fn world() -> TestWorld {
    TestWorld::new()
        .with_session(
            PROJECT,
            "aaaa1111-0000-0000-0000-000000000000",
            &fixtures::simple_session("2026-01-15T10:00:00Z", "Add a config loader", "Done."),
        )
        .with_session(
            OTHER_PROJECT,
            "bbbb2222-0000-0000-0000-000000000000",
            &fixtures::simple_session("2026-01-14T08:30:00Z", "Summarize my notes", "Sure."),
        )
        .age_session(OTHER_PROJECT, "bbbb2222-0000-0000-0000-000000000000", 3600)
}

#[test]
fn test_list_shows_newest_first_with_preview() {
    let world = world();
    let result = world.run(&["list"]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());

    let out = result.stdout();
    assert!(out.contains("Found 2 Claude sessions:"));
    let first = out.find("1. ~/src/app").expect("newest session listed first");
    let second = out.find("2. ~/notes").expect("older session listed second");
    assert!(first < second);
    assert!(out.contains("Session:  aaaa1111..."));
    assert!(out.contains("Messages: 2"));
    assert!(out.contains("Preview:  \"Add a config loader...\""));
    assert!(!out.contains('\u{1b}'), "no color when piped");
}

#[test]
fn test_list_limit_keeps_total() {
    let world = world();
    let result = world.run(&["list", "--limit", "1"]).unwrap();
    assert!(result.success());
    assert!(result.stdout().contains("Found 2 Claude sessions:"));
    assert!(result.stdout().contains("1. ~/src/app"));
    assert!(!result.stdout().contains("2. ~/notes"));
}

#[test]
fn test_list_ignores_subagent_transcripts() {
    let world = world().with_subagent(
        PROJECT,
        "aaaa1111-0000-0000-0000-000000000000",
        "a1b2c3",
        &fixtures::simple_session("2026-01-15T10:00:05Z", "Explore", "Found it."),
    );
    let result = world.run(&["list"]).unwrap();
    assert!(result.stdout().contains("Found 2 Claude sessions:"));
}

#[test]
fn test_projects() {
    let world = world();
    let result = world.run(&["projects"]).unwrap();
    assert!(result.success());

    let out = result.stdout();
    assert!(out.contains("Found 2 Claude projects:"));
    assert!(out.contains("1. ~/src/app"));
    assert!(out.contains("Sessions:    1"));
    assert!(out.contains(&format!("Path:        {}", OTHER_PROJECT)));
}

#[test]
fn test_empty_projects_dir() {
    let world = TestWorld::new();
    let result = world.run(&["list"]).unwrap();
    assert!(result.success());
    assert!(result.stdout().starts_with("No Claude sessions found."));
}

#[test]
fn test_missing_claude_dir_is_not_an_error() {
    let world = TestWorld::new();
    std::fs::remove_dir_all(world.claude_dir()).unwrap();

    let mut cmd = cargo_bin_cmd!("ccextract");
    world.configure_command(&mut cmd).arg("projects");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("No Claude projects found."));
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("ccextract");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("projects"))
        .stdout(predicate::str::contains("export"));
}
