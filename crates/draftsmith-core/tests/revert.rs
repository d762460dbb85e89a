//! Backup capture and revert

use draftsmith_artifact::ContentHash;
use draftsmith_core::BuildRequest;
use draftsmith_generators::builtin::MIGRATIONS_DIR;
use draftsmith_state::StateError;
use draftsmith_test_utils::{TempProject, POST_BELONGS_TO_USER};
use pretty_assertions::assert_eq;

fn changed_draft() -> String {
    format!("{POST_BELONGS_TO_USER}    excerpt: text\n")
}

#[test]
fn revert_restores_previous_build() {
    let project = TempProject::with_draft(POST_BELONGS_TO_USER);
    let orchestrator = project.orchestrator();
    assert!(orchestrator.build(&BuildRequest::new()).unwrap().success());

    let migration = format!("{MIGRATIONS_DIR}/{}", project.list(MIGRATIONS_DIR)[0]);
    let sql_before = project.read(&migration);
    let types_before = project.read("types/models.ts");

    project.write_draft(&changed_draft());
    assert!(orchestrator.build(&BuildRequest::new()).unwrap().success());
    assert_ne!(project.read(&migration), sql_before);
    project.write(&migration, "-- edited after the build\n");

    let state = orchestrator.status().unwrap();
    assert_eq!(
        state.last_build_backup.get(&project.path(&migration)),
        Some(&sql_before)
    );

    let result = orchestrator.revert().unwrap();
    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.restored.len(), 2);
    assert_eq!(project.read(&migration), sql_before);
    assert_eq!(project.read("types/models.ts"), types_before);

    let state = orchestrator.status().unwrap();
    assert!(!state.has_backup());
    assert_eq!(
        state.generated[&project.path(&migration)].content_hash,
        ContentHash::compute(sql_before.as_bytes())
    );
}

#[test]
fn second_revert_is_a_no_op() {
    let project = TempProject::with_draft(POST_BELONGS_TO_USER);
    let orchestrator = project.orchestrator();
    orchestrator.build(&BuildRequest::new()).unwrap();
    project.write_draft(&changed_draft());
    orchestrator.build(&BuildRequest::new()).unwrap();

    assert!(!orchestrator.revert().unwrap().restored.is_empty());
    let migration = format!("{MIGRATIONS_DIR}/{}", project.list(MIGRATIONS_DIR)[0]);
    let after_first = project.read(&migration);

    let again = orchestrator.revert().unwrap();
    assert!(again.success);
    assert!(again.restored.is_empty());
    assert_eq!(project.read(&migration), after_first);
}

#[test]
fn revert_without_any_build_succeeds() {
    let project = TempProject::new();
    let orchestrator = project.orchestrator();
    let result = orchestrator.revert().unwrap();
    assert!(result.success);
    assert!(result.restored.is_empty());
    assert!(!orchestrator.store().path().exists());
}

#[test]
fn first_build_has_nothing_to_revert() {
    let project = TempProject::with_draft(POST_BELONGS_TO_USER);
    let orchestrator = project.orchestrator();
    orchestrator.build(&BuildRequest::new()).unwrap();

    let result = orchestrator.revert().unwrap();
    assert!(result.success);
    assert!(result.restored.is_empty());
    assert!(project.exists("src/models/post.rs"));
}

#[test]
fn revert_respects_the_lock() {
    let project = TempProject::with_draft(POST_BELONGS_TO_USER);
    let orchestrator = project.orchestrator();
    let _lock = orchestrator.store().lock().unwrap();

    let err = orchestrator.revert().unwrap_err();
    assert!(err.is_locked());
    assert!(matches!(err, StateError::Locked { .. }));
}

#[test]
fn kept_scaffold_files_are_not_backed_up() {
    let project = TempProject::with_draft(POST_BELONGS_TO_USER);
    let orchestrator = project.orchestrator();
    orchestrator.build(&BuildRequest::new()).unwrap();

    project.write("src/models/post.rs", "// mine\n");
    project.write_draft(&changed_draft());
    orchestrator.build(&BuildRequest::new()).unwrap();

    let state = orchestrator.status().unwrap();
    assert!(!state
        .last_build_backup
        .contains_key(&project.path("src/models/post.rs")));

    orchestrator.revert().unwrap();
    assert_eq!(project.read("src/models/post.rs"), "// mine\n");
}
