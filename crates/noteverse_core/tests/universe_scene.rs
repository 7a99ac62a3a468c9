use noteverse_core::{
    ClickOutcome, FrameLoop, FrameTick, HoverChange, MemorySnapshotBackend, NoteDraft, NotePatch,
    Universe, UniverseConfig, UniverseError,
};
use std::ops::ControlFlow;
use std::time::Duration;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn seeded_universe() -> Universe<MemorySnapshotBackend> {
    let config = UniverseConfig {
        seed: Some(2026),
        ..UniverseConfig::default()
    };
    Universe::open(MemorySnapshotBackend::new(), config, WIDTH, HEIGHT).unwrap()
}

fn tick(frame: u64) -> FrameTick {
    FrameTick {
        frame,
        elapsed: Duration::from_millis(16 * frame),
        delta: Duration::from_millis(16),
    }
}

#[test]
fn opening_empty_storage_renders_only_the_sun() {
    let universe = seeded_universe();

    assert_eq!(universe.notes().len(), 1);
    assert_eq!(universe.instances().len(), 1);
    assert!(universe.instances()[0].emissive);
    assert!(universe.edges().is_empty());
}

#[test]
fn store_changes_trigger_a_single_rebuild() {
    let mut universe = seeded_universe();
    let created = universe.create_note(NoteDraft::new("planet", "")).unwrap();

    let first = universe.tick(tick(0));
    assert!(first.rebuilt);
    assert_eq!(universe.instances().len(), 2);
    assert!(universe
        .edges()
        .iter()
        .any(|edge| edge.connects(1, created.id)));

    let second = universe.tick(tick(1));
    assert!(!second.rebuilt);
    assert!((second.rotation_y - 0.004).abs() < 1e-12);
}

#[test]
fn hovering_the_center_highlights_the_sun() {
    let mut universe = seeded_universe();
    universe
        .pointer_moved(f64::from(WIDTH) / 2.0, f64::from(HEIGHT) / 2.0)
        .unwrap();

    assert_eq!(universe.tick(tick(0)).hover, Some(HoverChange::Entered(1)));
    assert_eq!(universe.tick(tick(1)).hover, None);

    universe.pointer_moved(0.0, 0.0).unwrap();
    assert_eq!(universe.tick(tick(2)).hover, Some(HoverChange::Left(1)));
    assert_eq!(universe.hovered(), None);
}

#[test]
fn click_focuses_a_note_and_empty_space_closes() {
    let mut universe = seeded_universe();

    let outcome = universe
        .clicked(f64::from(WIDTH) / 2.0, f64::from(HEIGHT) / 2.0)
        .unwrap();
    assert_eq!(outcome, ClickOutcome::Focused(1));
    assert_eq!(universe.selected().map(|note| note.id), Some(1));
    assert!(universe.camera().is_focused());

    assert_eq!(universe.clicked(0.0, 0.0).unwrap(), ClickOutcome::Closed);
    assert!(universe.selected().is_none());
    assert!(!universe.camera().is_focused());
}

#[test]
fn update_and_delete_flow_through_to_the_scene() {
    let mut universe = seeded_universe();
    let created = universe.create_note(NoteDraft::new("draft", "")).unwrap();
    universe.tick(tick(0));

    let recolored = universe
        .update_note(
            created.id,
            &NotePatch {
                color: Some("#FF0000".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(recolored.position, created.position);
    universe.tick(tick(1));
    let instance = universe
        .instances()
        .iter()
        .find(|item| item.id == created.id)
        .unwrap();
    assert_eq!(instance.color, "#FF0000");

    assert!(universe.delete_note(created.id));
    assert!(!universe.delete_note(created.id));
    universe.tick(tick(2));
    assert_eq!(universe.instances().len(), 1);
    assert!(universe.edges().is_empty());
}

#[test]
fn resize_rejects_empty_viewport() {
    let mut universe = seeded_universe();
    universe.resized(1920, 1080).unwrap();
    assert!(matches!(
        universe.resized(0, 0),
        Err(UniverseError::Scene(_))
    ));
}

#[test]
fn invalid_config_is_rejected_before_loading() {
    let config = UniverseConfig {
        edge_threshold: -1.0,
        ..UniverseConfig::default()
    };
    let result = Universe::open(MemorySnapshotBackend::new(), config, WIDTH, HEIGHT);
    assert!(matches!(result, Err(UniverseError::Config(_))));
}

#[test]
fn frame_loop_drives_universe_ticks() {
    let mut universe = seeded_universe();
    universe.create_note(NoteDraft::new("a", "")).unwrap();

    let frame_loop = FrameLoop::new(500);
    let mut rebuilt_frames = Vec::new();
    let frames = frame_loop.run(|frame| {
        let report = universe.tick(frame);
        if report.rebuilt {
            rebuilt_frames.push(report.frame);
        }
        if frame.frame == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert_eq!(frames, 3);
    assert_eq!(rebuilt_frames, vec![0]);
    assert!((universe.rotation_y() - 0.006).abs() < 1e-12);
}
