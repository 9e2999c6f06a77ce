//! Save/load boundary: round-trips, version invalidation, opaque extras.

use gridtown::save::{self, SaveGame};
use gridtown::{BuildingKind, Catalog, Goal, GoalTarget, Session, Tuning};
use serde_json::json;

fn played_session() -> Session {
    let mut s = Session::new(20, Catalog::standard(), Tuning::default(), 42);
    s.place(BuildingKind::Park, 5, 5).unwrap();
    s.place(BuildingKind::House, 5, 6).unwrap();
    s.set_goal(Goal::new(0, GoalTarget::Population, 500, 1_000));
    for _ in 0..10 {
        s.tick().unwrap();
    }
    s
}

#[test]
fn save_round_trip_preserves_the_world() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("city.json");
    let session = played_session();

    save::write_save(&path, session.state()).unwrap();
    let restored = save::read_save(&path, 20).unwrap().expect("usable save");

    assert_eq!(restored.grid, session.state().grid);
    assert_eq!(restored.stats, session.state().stats);
    assert_eq!(restored.quests, session.state().quests);
    assert_eq!(restored.goal, session.state().goal);
    let resumed = Session::from_state(restored, Catalog::standard(), Tuning::default(), 42);
    assert_eq!(resumed.stats(), session.stats());
}

#[test]
fn version_mismatch_is_no_usable_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("city.json");
    let session = played_session();
    save::write_save(&path, session.state()).unwrap();

    // A 60-tile world cannot adopt a 20-tile save.
    assert!(save::read_save(&path, 60).unwrap().is_none());
}

#[test]
fn missing_file_is_no_usable_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    assert!(save::read_save(&path, 20).unwrap().is_none());
}

#[test]
fn corrupt_json_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(save::read_save(&path, 20).is_err());
}

#[test]
fn extras_round_trip_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("city.json");
    let session = played_session();
    let extras = json!({
        "news": ["Mayor opens new park", "Housing demand rises"],
        "narrative_seed": 991,
    });
    save::write_save_with_extras(&path, session.state(), extras.clone()).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let reread: SaveGame = serde_json::from_str(&raw).unwrap();
    assert_eq!(reread.extras, extras);
    assert_eq!(reread.version, 20);
}

#[test]
fn snapshot_writer_honors_its_interval() {
    let dir = tempfile::tempdir().unwrap();
    let writer = save::SnapshotWriter::new(dir.path(), 5);
    let mut s = Session::new(8, Catalog::standard(), Tuning::default(), 1);

    let mut written = Vec::new();
    for _ in 0..12 {
        s.tick().unwrap();
        if let Some(path) = writer.maybe_write(s.state()).unwrap() {
            written.push(path);
        }
    }
    // Days 5 and 10 out of 12.
    assert_eq!(written.len(), 2);
    assert!(written[0].ends_with("day_000005.json"));
    assert!(written[1].ends_with("day_000010.json"));
}

#[test]
fn goals_survive_the_save_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("city.json");
    let mut session = played_session();
    session.add_quest(
        Goal::new(0, GoalTarget::BuildCount(BuildingKind::House), 4, 250)
            .with_text("Suburb sprawl", "Build four houses."),
    );
    save::write_save(&path, session.state()).unwrap();

    let restored = save::read_save(&path, 20).unwrap().unwrap();
    assert_eq!(restored.quests.len(), 1);
    assert_eq!(restored.quests[0].title, "Suburb sprawl");
    let goal = restored.goal.as_ref().unwrap();
    assert_eq!(goal.target, GoalTarget::Population);
    assert!(!goal.completed);
}
