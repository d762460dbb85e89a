//! Command line parsing and reports

use draftsmith_cli::{command, flag, run};
use draftsmith_test_utils::{TempProject, BLOG, POST_BELONGS_TO_USER};
use pretty_assertions::assert_eq;

fn invoke(project: &TempProject, args: &[&str]) -> (i32, String) {
    let root = project.root().to_string_lossy().into_owned();
    let mut argv = vec!["draftsmith", "--root", root.as_str()];
    argv.extend_from_slice(args);
    let matches = command().try_get_matches_from(argv).unwrap();
    let mut out = Vec::new();
    let code = run(&matches, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn command_definition_is_consistent() {
    command().debug_assert();
}

#[test]
fn global_flags_after_subcommand() {
    let matches = command()
        .try_get_matches_from(["draftsmith", "build", "--json", "-v", "--only", "model,migration"])
        .unwrap();
    assert!(flag(&matches, "json"));
    assert!(flag(&matches, "verbose"));
    let (_, sub) = matches.subcommand().unwrap();
    let only: Vec<&String> = sub.get_many::<String>("only").unwrap().collect();
    assert_eq!(only, vec!["model", "migration"]);
}

#[test]
fn subcommand_is_required() {
    assert!(command().try_get_matches_from(["draftsmith"]).is_err());
}

#[test]
fn build_then_no_changes() {
    let project = TempProject::with_draft(BLOG);

    let (code, out) = invoke(&project, &["build"]);
    assert_eq!(code, 0, "{out}");
    assert!(out.contains("src/models/post.rs (scaffold_only)"), "{out}");

    let (code, out) = invoke(&project, &["build"]);
    assert_eq!(code, 0);
    assert!(out.starts_with("No changes in draft.yaml"), "{out}");
}

#[test]
fn build_json_report() {
    let project = TempProject::with_draft(POST_BELONGS_TO_USER);
    let (code, out) = invoke(&project, &["build", "--json", "--only", "model"]);
    assert_eq!(code, 0);

    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["status"], "built");
    assert_eq!(report["generated"].as_object().unwrap().len(), 1);
}

#[test]
fn invalid_draft_exits_with_errors() {
    let project = TempProject::with_draft("models:\n  post: [title]\n");
    let (code, out) = invoke(&project, &["build"]);
    assert_eq!(code, 1);
    assert!(out.contains("Invalid draft"), "{out}");
    assert!(out.contains("error: "), "{out}");
}

#[test]
fn missing_draft_is_reported() {
    let project = TempProject::new();
    let (code, out) = invoke(&project, &["plan", "--json"]);
    assert_eq!(code, 1);
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["status"], "error");
}

#[test]
fn plan_status_and_revert() {
    let project = TempProject::with_draft(POST_BELONGS_TO_USER);

    let (code, out) = invoke(&project, &["plan"]);
    assert_eq!(code, 0);
    assert!(out.contains("  1. Scaffold Post model"), "{out}");

    let (_, out) = invoke(&project, &["status"]);
    assert!(out.starts_with("Never built"), "{out}");

    invoke(&project, &["build"]);
    let (_, out) = invoke(&project, &["status"]);
    assert!(out.contains("table posts"), "{out}");

    let (code, out) = invoke(&project, &["revert"]);
    assert_eq!(code, 0);
    assert_eq!(out, "Nothing to revert.\n");
}
