use std::path::PathBuf;

use glam::Vec2;
use instant::Instant;

use devops_loop::clock::TICK_PERIOD;
use devops_loop::component::DevOpsLoop;
use devops_loop::geometry::label_position;
use devops_loop::hover::{HoverEvent, HoverState};
use devops_loop::phase::PhaseName;
use devops_loop::pointer::HoverTracker;
use devops_loop::scene::LoopState;
use devops_loop::tessellate::tessellate;
use devops_loop::viewport::Viewport;
use devops_loop::{LoopError, Settings};

#[test]
fn mount_waits_for_the_first_tick() {
    let start = Instant::now();
    let mut view = DevOpsLoop::new(3);
    view.mount(start);
    let scene = view.render();
    assert!(!view.is_mounted());
    assert_eq!(scene.segment(PhaseName::Plan).unwrap().opacity, 0.0);

    assert!(view.advance(start + TICK_PERIOD));
    assert!(view.is_mounted());
    assert_eq!(view.time().ticks(), 1);
    assert!((view.time().seconds() - 0.1).abs() < 1e-6);
}

#[test]
fn ticks_accumulate_without_drift() {
    let start = Instant::now();
    let mut view = DevOpsLoop::new(3);
    view.mount(start);
    for tick in 1..=100u32 {
        assert!(view.advance(start + TICK_PERIOD * tick));
    }
    assert_eq!(view.time().ticks(), 100);
    assert_eq!(view.time().seconds(), 10.0);
}

#[test]
fn hover_moves_between_phases() {
    let start = Instant::now();
    let mut view = DevOpsLoop::new(3);
    view.mount(start);
    for tick in 1..=80u32 {
        view.advance(start + TICK_PERIOD * tick);
    }

    assert!(view.hover(HoverEvent::Enter(PhaseName::Deploy)));
    let scene = view.render();
    assert_eq!(scene.segment(PhaseName::Deploy).unwrap().width, 16.0);
    assert_eq!(scene.active_legend(), Some(PhaseName::Deploy));

    view.hover(HoverEvent::Leave(PhaseName::Deploy));
    view.hover(HoverEvent::Enter(PhaseName::Monitor));
    let scene = view.render();
    assert_eq!(scene.segment(PhaseName::Deploy).unwrap().width, 12.0);
    assert_eq!(scene.segment(PhaseName::Monitor).unwrap().width, 16.0);
    assert_eq!(scene.active_legend(), Some(PhaseName::Monitor));

    view.hover(HoverEvent::Leave(PhaseName::Monitor));
    assert_eq!(view.hovered(), HoverState::Idle);
    assert_eq!(view.render().active_legend(), None);
}

#[test]
fn unmount_stops_all_mutation() {
    let start = Instant::now();
    let mut view = DevOpsLoop::new(3);
    view.mount(start);
    view.advance(start + TICK_PERIOD);
    view.unmount();
    let frozen = view.state();
    assert_eq!(frozen, LoopState::default());
    for tick in 2..20u32 {
        assert!(!view.advance(start + TICK_PERIOD * tick));
    }
    assert_eq!(view.state(), frozen);
    assert_eq!(view.next_deadline(), None);
}

#[test]
fn mounting_twice_keeps_one_timer() {
    let start = Instant::now();
    let mut view = DevOpsLoop::new(3);
    view.mount(start);
    let deadline = view.next_deadline();
    view.mount(start + TICK_PERIOD / 2);
    assert_eq!(view.next_deadline(), deadline);
    assert!(view.advance(start + TICK_PERIOD));
    assert!(!view.advance(start + TICK_PERIOD));
    assert_eq!(view.time().ticks(), 1);
}

#[test]
fn pointer_over_a_label_hovers_its_phase() {
    let start = Instant::now();
    let mut view = DevOpsLoop::new(3);
    view.mount(start);
    view.advance(start + TICK_PERIOD);
    let scene = view.render();
    let viewport = Viewport::new(scene.bounds, 1000, 900);
    let mut tracker = HoverTracker::default();

    let code = viewport.to_window(label_position(PhaseName::Code.phase().angle).unwrap());
    let under = scene
        .hit_test(viewport.to_scene(code))
        .map(|hit| hit.phase);
    for event in tracker.moved_to(under) {
        view.hover(event);
    }
    assert_eq!(view.hovered(), HoverState::Hovering(PhaseName::Code));

    let outside = scene
        .hit_test(viewport.to_scene(Vec2::new(1.0, 1.0)))
        .map(|hit| hit.phase);
    for event in tracker.moved_to(outside) {
        view.hover(event);
    }
    assert_eq!(view.hovered(), HoverState::Idle);
}

#[test]
fn full_scene_tessellates_and_serializes() {
    let start = Instant::now();
    let mut view = DevOpsLoop::new(11);
    view.mount(start);
    for tick in 1..=70u32 {
        view.advance(start + TICK_PERIOD * tick);
    }
    view.hover(HoverEvent::Enter(PhaseName::Release));
    let scene = view.render();
    let vertices = tessellate(&scene);
    assert!(!vertices.is_empty());
    assert_eq!(vertices.len() % 3, 0);
    assert!(vertices
        .iter()
        .all(|vertex| vertex.position.iter().all(|value| value.is_finite())));

    let json = serde_json::to_value(&scene).unwrap();
    assert_eq!(json["nodes"].as_array().map(Vec::len), Some(scene.nodes.len()));
    assert_eq!(json["legend"].as_array().map(Vec::len), Some(8));
}

#[test]
fn hover_returns_after_remount_under_a_still_cursor() {
    let start = Instant::now();
    let mut view = DevOpsLoop::new(3);
    let mut tracker = HoverTracker::default();
    view.mount(start);
    view.advance(start + TICK_PERIOD);
    for event in tracker.track(Some(PhaseName::Code), view.is_running()) {
        view.hover(event);
    }
    assert_eq!(view.hovered(), HoverState::Hovering(PhaseName::Code));

    view.unmount();
    assert!(tracker.track(Some(PhaseName::Code), view.is_running()).is_empty());
    view.mount(start);
    for event in tracker.track(Some(PhaseName::Code), view.is_running()) {
        view.hover(event);
    }
    assert_eq!(view.hovered(), HoverState::Hovering(PhaseName::Code));
}

#[test]
fn unreadable_font_is_reported() {
    let missing = Settings {
        font: Some(PathBuf::from("no/such/font.ttf")),
        ..Settings::default()
    };
    assert!(matches!(missing.font_bytes(), Err(LoopError::Io(_))));
    assert!(matches!(Settings::default().font_bytes(), Ok(None)));
}
