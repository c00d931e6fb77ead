// staging_flow.rs — End-to-end test of the staging protocol.
//
// This single test exercises the complete editing flow:
//
//   1. Seed a published/working project pair plus a transient project
//   2. Open: create a working copy (copied into the transient project,
//      exclusively locked, name-probed)
//   3. Edit: write draft content and properties to the staging path
//   4. Save: commit staged content back onto the original
//   5. Exit: discard the working copy (best-effort teardown)
//   6. Re-open after a simulated crash: an orphaned working copy is
//      reused in place instead of piling up suffixed names
//
// VERIFY:
//   - The ambient project pointer is identical before and after every
//     coordinator call
//   - The original resource carries the committed content and properties
//   - The staging copy is gone after discard
//   - The orphan recovery path returns the same staging path

use std::collections::BTreeMap;

use stagehand_staging::{ProjectContext, SessionPhase, StagingCoordinator};
use stagehand_store::{
    CopyMode, LockState, MemoryStore, OwnerId, Project, ProjectKind, ResourceStore, StoreError,
};

fn seeded_world() -> (MemoryStore, Project, Project) {
    let store = MemoryStore::new();
    let working = Project::new("Offline", ProjectKind::Working);
    let transient = Project::new("tempFileProject", ProjectKind::Transient);

    let mut properties = BTreeMap::new();
    properties.insert("title".to_string(), "Welcome".to_string());
    properties.insert("template".to_string(), "/system/default".to_string());
    store
        .create_resource("/sites/home/index.html", working.id, b"<h1>v1</h1>", properties)
        .unwrap();

    (store, working, transient)
}

#[test]
fn full_editing_session_open_edit_save_exit() {
    let (store, working, transient) = seeded_world();
    let coordinator = StagingCoordinator::new(&store, transient.id);
    let mut ctx = ProjectContext::new(OwnerId::new(), working.clone());
    ctx.register(transient.clone());

    // ---- Open: stage a working copy --------------------------------
    let before = ctx.current();
    let mut session = coordinator
        .create_working_copy(&mut ctx, "/sites/home/index.html")
        .unwrap();
    assert_eq!(ctx.current(), before, "open must restore the project pointer");
    assert_eq!(session.phase(), SessionPhase::Active);

    let staging_path = session.staging_path().unwrap().to_string();
    assert_eq!(staging_path, "/sites/home/__temp_index.html");

    let copy = store.read(&staging_path, transient.id).unwrap();
    assert_eq!(copy.content, b"<h1>v1</h1>");
    assert!(matches!(copy.lock, LockState::Locked { exclusive: true, .. }));

    // ---- Edit: the editor works against the staging path -----------
    store
        .write(&staging_path, transient.id, b"<h1>v2</h1>")
        .unwrap();
    let mut draft_properties = store.read_properties(&staging_path, transient.id).unwrap();
    draft_properties.insert("title".to_string(), "Welcome back".to_string());
    store
        .write_properties(&staging_path, transient.id, draft_properties)
        .unwrap();

    // The original is untouched while the draft evolves.
    assert_eq!(
        store
            .read("/sites/home/index.html", working.id)
            .unwrap()
            .content,
        b"<h1>v1</h1>"
    );

    // ---- Save: commit back onto the original -----------------------
    coordinator.commit(&mut ctx, &mut session).unwrap();
    assert_eq!(ctx.current(), before, "save must restore the project pointer");
    assert_eq!(session.phase(), SessionPhase::Committed);

    let saved = store.read("/sites/home/index.html", working.id).unwrap();
    assert_eq!(saved.content, b"<h1>v2</h1>");
    assert_eq!(saved.properties.get("title").unwrap(), "Welcome back");
    assert_eq!(saved.properties.get("template").unwrap(), "/system/default");

    // ---- Exit: best-effort teardown --------------------------------
    coordinator.discard(&mut ctx, &mut session).unwrap();
    assert_eq!(ctx.current(), before, "exit must restore the project pointer");
    assert!(matches!(
        store.read(&staging_path, transient.id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn orphaned_working_copy_is_recovered_on_next_open() {
    let (store, working, transient) = seeded_world();

    // Simulate a crashed session: its working copy sits in the transient
    // project, unlocked, and was never discarded.
    store
        .copy(
            "/sites/home/index.html",
            working.id,
            "/sites/home/__temp_index.html",
            transient.id,
            CopyMode::AsNewResource,
        )
        .unwrap();

    let coordinator = StagingCoordinator::new(&store, transient.id);
    let mut ctx = ProjectContext::new(OwnerId::new(), working.clone());
    ctx.register(transient.clone());

    let session = coordinator
        .create_working_copy(&mut ctx, "/sites/home/index.html")
        .unwrap();

    // The orphan is reused in place, not shadowed by a suffixed sibling.
    assert_eq!(
        session.staging_path(),
        Some("/sites/home/__temp_index.html")
    );
    assert!(matches!(
        store
            .read("/sites/home/__temp_index.html", transient.id)
            .unwrap()
            .lock,
        LockState::Locked { exclusive: true, .. }
    ));
    assert!(store
        .read("/sites/home/__temp_index.html0", transient.id)
        .is_err());
}
