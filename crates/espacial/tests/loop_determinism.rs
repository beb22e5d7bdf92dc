//! End-to-end checks of the fixed-timestep driver over headless collaborators.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use espacial::{GameLoop, HeadlessWindow, LoopConfig, LoopState, RecordingRenderer, Window};
use espacial_core::systems::movement;
use espacial_core::{Health, Registry, Renderable, Schedule, Transform, Vec2, Velocity};
use espacial_shared::FIXED_STEP;

fn config() -> LoopConfig {
    LoopConfig::default().with_target_fps(0)
}

fn world() -> Registry {
    let mut registry = Registry::new();
    for i in 0..16 {
        let e = registry.create();
        let f = i as f32;
        registry.add(e, Transform::new(Vec2::new(f * 10.0, 0.0))).unwrap();
        registry
            .add(e, Velocity::with(Vec2::new(100.0 - f, f * 2.5), 33.3 * f))
            .unwrap();
        registry.add(e, Renderable::new("sprite")).unwrap();
    }
    registry
}

/// Drives a fresh world through `deltas` and returns (steps, transform bytes).
fn drive(deltas: &[Duration]) -> (u64, Vec<u8>) {
    let mut window = HeadlessWindow::new(800, 600);
    let mut renderer = RecordingRenderer::new();
    let mut registry = world();

    let steps = {
        let mut game_loop = GameLoop::new(config()).unwrap();
        game_loop
            .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
            .unwrap();
        for &delta in deltas {
            game_loop.step_frame(delta).unwrap();
        }
        game_loop.total_steps()
    };

    (steps, registry.component_bytes::<Transform>().to_vec())
}

#[test]
fn test_step_count_independent_of_frame_split() {
    let (split_steps, split_state) = drive(&[Duration::from_millis(10); 10]);
    let (whole_steps, whole_state) = drive(&[Duration::from_millis(100)]);

    assert_eq!(split_steps, 6);
    assert_eq!(whole_steps, 6);
    assert_eq!(split_state, whole_state);
}

#[test]
fn test_uneven_frame_split_matches_whole_frame() {
    let uneven: Vec<Duration> = [7, 33, 1, 16, 17, 26]
        .into_iter()
        .map(Duration::from_millis)
        .collect();
    let (uneven_steps, uneven_state) = drive(&uneven);
    let (whole_steps, whole_state) = drive(&[Duration::from_millis(100)]);

    assert_eq!(uneven_steps, 6);
    assert_eq!(uneven_steps, whole_steps);
    assert_eq!(uneven_state, whole_state);
}

#[test]
fn test_long_stall_is_clamped() {
    let (steps, _) = drive(&[Duration::from_secs(5)]);
    assert_eq!(steps, 15);
}

#[test]
fn test_movement_matches_direct_integration() {
    let (_, driven) = drive(&[Duration::from_millis(100)]);

    let mut direct = world();
    for _ in 0..6 {
        movement::update(&mut direct, FIXED_STEP.as_secs_f32());
    }

    assert_eq!(driven, direct.component_bytes::<Transform>());
}

#[test]
fn test_systems_run_in_order_each_step() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (a, b) = (Rc::clone(&log), Rc::clone(&log));

    let schedule = Schedule::gameplay()
        .with_system("damage", move |registry, _| {
            a.borrow_mut().push("damage");
            if let Some(store) = registry.storage_mut::<Health>() {
                for (_, health) in store.iter_mut() {
                    health.damage(1);
                }
            }
            Ok(())
        })
        .with_system("audit", move |_, _| {
            b.borrow_mut().push("audit");
            Ok(())
        });

    let mut window = HeadlessWindow::new(800, 600);
    let mut renderer = RecordingRenderer::new();
    let mut registry = Registry::new();
    let target = registry.create();
    registry.add(target, Health::new(10)).unwrap();

    {
        let mut game_loop = GameLoop::new(config()).unwrap().with_schedule(schedule);
        game_loop
            .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
            .unwrap();
        assert_eq!(game_loop.step_frame(Duration::from_millis(34)).unwrap(), 2);
    }

    assert_eq!(*log.borrow(), ["damage", "audit", "damage", "audit"]);
    assert_eq!(registry.get::<Health>(target).unwrap().current(), 8);
}

#[test]
fn test_stop_requested_from_a_system() {
    let mut window = HeadlessWindow::new(800, 600);
    let mut renderer = RecordingRenderer::new();
    let mut registry = world();

    let game_loop = GameLoop::new(config()).unwrap();
    let handle = game_loop.stop_handle();
    let mut game_loop = game_loop.with_schedule(Schedule::gameplay().with_system(
        "stopper",
        move |_, _| {
            handle.stop();
            Ok(())
        },
    ));

    game_loop
        .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
        .unwrap();
    game_loop.run().unwrap();

    assert_eq!(game_loop.state(), LoopState::Stopped);
    assert!(game_loop.total_steps() >= 1);
    assert!(game_loop.frame_count() >= 1);
}

#[test]
fn test_run_renders_every_frame() {
    let mut window = HeadlessWindow::new(800, 600).with_frame_budget(5);
    let mut renderer = RecordingRenderer::new();
    let mut registry = world();

    {
        let mut game_loop = GameLoop::new(config()).unwrap();
        game_loop
            .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
            .unwrap();
        game_loop.run().unwrap();
        assert_eq!(game_loop.frame_count(), 5);
    }

    assert_eq!(renderer.frames_presented(), 5);
    assert_eq!(renderer.draws().len(), 16);
    assert_eq!(window.swaps(), 5);
    assert!(!window.is_open());
}
