//! Walking Tests - Tick Scenarios and Lock Lifecycle
//!
//! Drives `WalkingControls` through the public API against small scenes:
//! ground snapping, free fall, sprint, jumping, wall blocking, and the
//! pointer-lock lifecycle with its notifications.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use catacombs_engine::camera::{CameraHandle, CameraPose, shared_camera};
use catacombs_engine::config::WalkingConfig;
use catacombs_engine::error::WalkError;
use catacombs_engine::events::{ChannelNotifier, ControlEvent, ListenerRegistry};
use catacombs_engine::input::{
    DirectionalEvent, KeyCode, KeyboardInput, LockState, MoveKey, PointerLockNotice,
    RecordingPointerLock, ScriptedInput, TouchButton, TouchOverlayInput,
};
use catacombs_engine::physics::RayHit;
use catacombs_engine::player::{WalkingControls, dedup_by_normal};
use catacombs_engine::world::{WalkableGeometry, WalkableMesh, catacomb_demo};
use glam::Vec3;

const GREY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const EPS: f32 = 1e-4;

fn flat_floor() -> WalkableGeometry {
    // Offset so the quad's diagonal seam is not under the origin
    WalkableGeometry::new(vec![WalkableMesh::floor_plane(
        "floor",
        Vec3::new(0.3, 0.0, 0.7),
        10.0,
        GREY,
    )])
}

fn walker_at(position: Vec3) -> (WalkingControls, CameraHandle, RecordingPointerLock) {
    let camera = shared_camera(CameraPose::with_position(position));
    let host = RecordingPointerLock::new();
    let controls = WalkingControls::builder()
        .camera(camera.clone())
        .pointer_lock(Box::new(host.clone()))
        .build()
        .unwrap();
    (controls, camera, host)
}

fn position(camera: &CameraHandle) -> Vec3 {
    camera.borrow().position
}

// ============================================================================
// Hit Unification
// ============================================================================

#[test]
fn test_dedup_by_normal_first_wins() {
    let hit = |normal: Vec3, distance: f32| RayHit {
        distance,
        point: Vec3::ZERO,
        normal,
        mesh_index: 0,
        triangle_index: 0,
    };
    let unified = dedup_by_normal(vec![
        hit(Vec3::new(0.0, 1.0, -0.0), 0.2),
        hit(Vec3::Y, 0.3),
        hit(Vec3::X, 0.4),
    ]);
    assert_eq!(unified.len(), 2);
    assert_eq!(unified[0].distance, 0.2);
    assert_eq!(unified[1].normal, Vec3::X);
}

// ============================================================================
// Vertical Motion
// ============================================================================

#[test]
fn test_snaps_to_floor_and_rests() {
    let geometry = flat_floor();
    let (mut controls, camera, _) = walker_at(Vec3::new(0.0, 0.45, 0.0));

    controls.animate(&geometry);
    let p = position(&camera);
    assert!((p.y - 0.4).abs() < EPS, "y after first tick: {}", p.y);
    assert!(controls.can_jump());

    for _ in 0..10 {
        controls.animate(&geometry);
    }
    let p = position(&camera);
    assert!((p.y - 0.4).abs() < EPS, "y after resting: {}", p.y);
    assert!(p.x.abs() < EPS && p.z.abs() < EPS);
}

#[test]
fn test_free_fall_without_geometry() {
    let geometry = WalkableGeometry::empty();
    let (mut controls, camera, _) = walker_at(Vec3::ZERO);
    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));
    let step = WalkingConfig::default().fixed_step;

    let mut last = position(&camera);
    for tick in 0..10 {
        controls.animate(&geometry);
        let p = position(&camera);
        assert!((p.z - last.z + step).abs() < EPS, "tick {}: dz = {}", tick, p.z - last.z);
        assert!(p.y < last.y, "tick {}: not falling", tick);
        assert!(!controls.can_jump());
        last = p;
    }

    let p = position(&camera);
    assert!((p.y - (-1.0)).abs() < EPS);
    assert!((p.z - (-1.0)).abs() < EPS);
    assert!(p.x.abs() < EPS);
    assert_eq!(controls.below_distance(), None);
    assert!(!controls.can_jump());
}

#[test]
fn test_sprint_scales_horizontal_only() {
    let geometry = WalkableGeometry::empty();
    let (mut controls, camera, _) = walker_at(Vec3::ZERO);
    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));
    controls.handle_input(DirectionalEvent::Press(MoveKey::Sprint));

    controls.animate(&geometry);

    let p = position(&camera);
    assert!((p.z - (-0.35)).abs() < EPS);
    assert!((p.y - (-0.1)).abs() < EPS);
}

#[test]
fn test_opposite_keys_cancel() {
    let geometry = flat_floor();
    let (mut controls, camera, _) = walker_at(Vec3::new(0.0, 0.4, 0.0));
    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));
    controls.handle_input(DirectionalEvent::Press(MoveKey::Backward));
    controls.handle_input(DirectionalEvent::Press(MoveKey::Left));
    controls.handle_input(DirectionalEvent::Press(MoveKey::Right));

    for _ in 0..5 {
        controls.animate(&geometry);
    }

    let p = position(&camera);
    assert!(p.x.abs() < EPS);
    assert!(p.z.abs() < EPS);
}

#[test]
fn test_jump_requires_ground() {
    let geometry = flat_floor();
    let (mut controls, camera, _) = walker_at(Vec3::new(0.0, 0.4, 0.0));

    // Grounded state is only known after the first probe
    controls.handle_input(DirectionalEvent::Press(MoveKey::Jump));
    assert_eq!(controls.jump_remaining(), 0.0);

    controls.animate(&geometry);
    assert!(controls.can_jump());

    controls.handle_input(DirectionalEvent::Press(MoveKey::Jump));
    assert_eq!(controls.jump_remaining(), 2.0);
    assert!(!controls.can_jump());

    for _ in 0..4 {
        controls.animate(&geometry);
    }
    let p = position(&camera);
    assert!((p.y - 0.8).abs() < EPS, "apex: {}", p.y);
    assert_eq!(controls.jump_remaining(), 0.0);

    // No second jump while airborne
    controls.handle_input(DirectionalEvent::Press(MoveKey::Jump));
    assert_eq!(controls.jump_remaining(), 0.0);

    for _ in 0..20 {
        controls.animate(&geometry);
    }
    let p = position(&camera);
    assert!((p.y - 0.4).abs() < EPS, "landed at: {}", p.y);
    assert!(controls.can_jump());
}

// ============================================================================
// Collision
// ============================================================================

#[test]
fn test_end_wall_stops_forward_walk() {
    let mut geometry = catacomb_demo();
    let (mut controls, camera, _) = walker_at(Vec3::new(0.0, 0.4, -19.0));
    controls.start(&mut geometry, Instant::now()).unwrap();
    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));

    for _ in 0..30 {
        controls.animate(&geometry);
    }

    let p = position(&camera);
    assert!(p.z > -19.8, "walked through the end wall: z = {}", p.z);
    assert!(p.z < -19.5, "stopped too early: z = {}", p.z);
    assert!((p.y - 0.4).abs() < EPS);
    assert!(p.x.abs() < EPS);
}

#[test]
fn test_forward_probe_lags_one_tick() {
    let mut geometry = catacomb_demo();
    let (mut controls, camera, _) = walker_at(Vec3::new(0.0, 0.4, -19.75));
    controls.start(&mut geometry, Instant::now()).unwrap();

    controls.animate(&geometry);
    assert!((position(&camera).z - (-19.75)).abs() < EPS);

    // The first step still probes along last tick's downward velocity
    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));
    assert!(controls.final_velocity().z.abs() < EPS);
    controls.animate(&geometry);
    let z = position(&camera).z;
    assert!((z - (-19.85)).abs() < EPS, "first step: z = {}", z);

    // Now the probe faces the end wall
    controls.animate(&geometry);
    let z = position(&camera).z;
    assert!((z - (-19.85)).abs() < EPS, "walked on into the wall: z = {}", z);
}

#[test]
fn test_ossuary_riser_blocks_walker() {
    let mut geometry = catacomb_demo();
    let (mut controls, camera, _) = walker_at(Vec3::new(0.0, 0.4, -12.0));
    controls.start(&mut geometry, Instant::now()).unwrap();
    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));

    for _ in 0..40 {
        controls.animate(&geometry);
    }

    let p = position(&camera);
    assert!(p.z > -13.0, "climbed the step: z = {}", p.z);
    assert!(p.z < -12.6, "stopped too early: z = {}", p.z);
    assert!((p.y - 0.4).abs() < EPS, "y = {}", p.y);
}

#[test]
fn test_walks_along_gallery_floor() {
    let mut geometry = catacomb_demo();
    let (mut controls, camera, _) = walker_at(Vec3::new(0.0, 0.4, -1.0));
    controls.start(&mut geometry, Instant::now()).unwrap();
    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));

    for _ in 0..20 {
        controls.animate(&geometry);
    }

    let p = position(&camera);
    assert!((p.z - (-3.0)).abs() < EPS, "z = {}", p.z);
    assert!((p.y - 0.4).abs() < EPS, "y = {}", p.y);
}

// ============================================================================
// Input Providers
// ============================================================================

#[test]
fn test_keyboard_provider_drives_controls() {
    let (mut controls, _, _) = walker_at(Vec3::ZERO);
    let mut keyboard = KeyboardInput::new();
    assert!(keyboard.handle_key(KeyCode::ArrowUp, true));
    assert!(keyboard.handle_key(KeyCode::ShiftRight, true));
    assert!(!keyboard.handle_key(KeyCode::F, true));

    assert_eq!(controls.pump_input(&mut keyboard), 2);
    assert!(controls.input_state().forward);
    assert!(controls.input_state().sprint);
    assert_eq!(controls.sprint_multiplier(), 3.5);
    assert!((controls.velocity().z - (-1.0)).abs() < EPS);
}

#[test]
fn test_touch_provider_release() {
    let (mut controls, _, _) = walker_at(Vec3::ZERO);
    let mut touch = TouchOverlayInput::new();
    touch.touch_start(TouchButton::Left);
    controls.pump_input(&mut touch);
    assert!(controls.input_state().left);
    assert!((controls.velocity().x - (-1.0)).abs() < EPS);

    touch.touch_end(TouchButton::Left);
    controls.pump_input(&mut touch);
    assert!(!controls.input_state().left);
    assert!(controls.velocity().x.abs() < EPS);
}

#[test]
fn test_scripted_input_changes_on_press_only() {
    let registry_events = Rc::new(RefCell::new(Vec::new()));
    let mut registry = ListenerRegistry::new();
    let sink = registry_events.clone();
    registry.add_listener(move |event| sink.borrow_mut().push(event));

    let mut controls = WalkingControls::builder()
        .camera(shared_camera(CameraPose::default()))
        .pointer_lock(Box::new(RecordingPointerLock::new()))
        .notifier(registry)
        .build()
        .unwrap();

    let mut script = ScriptedInput::new([
        DirectionalEvent::Press(MoveKey::Right),
        DirectionalEvent::Release(MoveKey::Right),
    ]);
    assert_eq!(controls.pump_input(&mut script), 2);
    assert_eq!(*registry_events.borrow(), vec![ControlEvent::Change]);
}

#[test]
fn test_raw_key_down_always_changes() {
    let (notifier, events) = ChannelNotifier::new();
    let mut controls = WalkingControls::builder()
        .camera(shared_camera(CameraPose::default()))
        .pointer_lock(Box::new(RecordingPointerLock::new()))
        .notifier(notifier)
        .build()
        .unwrap();

    controls.on_key_down(KeyCode::F);
    controls.on_key_up(KeyCode::F);
    controls.on_key_down(KeyCode::W);
    controls.on_key_up(KeyCode::W);

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received, vec![ControlEvent::Change, ControlEvent::Change]);
    assert!(!controls.input_state().forward);
}

// ============================================================================
// Lock Lifecycle
// ============================================================================

#[test]
fn test_lock_unlock_round_trip() {
    let exits = Rc::new(Cell::new(0));
    let exit_count = exits.clone();
    let (notifier, events) = ChannelNotifier::new();
    let host = RecordingPointerLock::new();
    let mut controls = WalkingControls::builder()
        .camera(shared_camera(CameraPose::default()))
        .pointer_lock(Box::new(host.clone()))
        .notifier(notifier)
        .exit_callback(move || exit_count.set(exit_count.get() + 1))
        .build()
        .unwrap();

    controls.lock();
    assert_eq!(host.requests(), 1);
    assert!(controls.lighting().flashlight_on());
    // Not locked until the host confirms
    assert_eq!(controls.lock_state(), LockState::Unlocked);

    host.push_notice(PointerLockNotice::Changed(true));
    controls.poll_pointer_lock().unwrap();
    assert!(controls.is_locked());

    controls.on_mouse_move(10.0, 0.0);

    controls.unlock();
    assert_eq!(host.exits(), 1);
    assert!(controls.is_locked());
    assert_eq!(exits.get(), 0);

    host.push_notice(PointerLockNotice::Changed(false));
    host.push_notice(PointerLockNotice::Changed(false));
    controls.poll_pointer_lock().unwrap();
    assert_eq!(controls.lock_state(), LockState::Unlocked);
    assert!(!controls.lighting().flashlight_on());
    assert!(controls.lighting().ambient_visible);
    assert_eq!(exits.get(), 1);

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![ControlEvent::Lock, ControlEvent::Change, ControlEvent::Unlock]
    );
}

#[test]
fn test_unlock_while_unlocked_exits_immediately() {
    let exits = Rc::new(Cell::new(0));
    let exit_count = exits.clone();
    let host = RecordingPointerLock::new();
    let mut controls = WalkingControls::builder()
        .camera(shared_camera(CameraPose::default()))
        .pointer_lock(Box::new(host.clone()))
        .exit_callback(move || exit_count.set(exit_count.get() + 1))
        .build()
        .unwrap();

    controls.unlock();
    assert_eq!(exits.get(), 1);
    assert_eq!(host.exits(), 0);
    assert!(!controls.lighting().flashlight_on());
}

#[test]
fn test_pointer_lock_refused() {
    let (mut controls, _, host) = walker_at(Vec3::ZERO);
    controls.lock();
    host.push_notice(PointerLockNotice::Error("denied by user agent".into()));

    let result = controls.poll_pointer_lock();
    assert!(matches!(result, Err(WalkError::PointerLockDenied(_))));
    assert_eq!(controls.lock_state(), LockState::Unlocked);
}

#[test]
fn test_dispose_ignores_events() {
    let (mut controls, camera, host) = walker_at(Vec3::ZERO);
    controls.dispose();
    assert!(!controls.is_connected());

    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));
    assert!(!controls.input_state().forward);

    host.push_notice(PointerLockNotice::Changed(true));
    controls.poll_pointer_lock().unwrap();
    assert!(!controls.is_locked());

    controls.on_mouse_move(100.0, 100.0);
    assert_eq!(camera.borrow().yaw, 0.0);

    controls.connect();
    controls.handle_input(DirectionalEvent::Press(MoveKey::Forward));
    assert!(controls.input_state().forward);
}

#[test]
fn test_look_respects_polar_limits() {
    let config = WalkingConfig {
        min_polar_angle: std::f32::consts::FRAC_PI_4,
        max_polar_angle: 3.0 * std::f32::consts::FRAC_PI_4,
        ..WalkingConfig::default()
    };
    let host = RecordingPointerLock::new();
    let camera = shared_camera(CameraPose::default());
    let mut controls = WalkingControls::builder()
        .camera(camera.clone())
        .pointer_lock(Box::new(host.clone()))
        .config(config)
        .build()
        .unwrap();
    controls.on_pointer_lock_change(true);

    controls.on_mouse_move(0.0, -10_000.0);
    assert!((camera.borrow().pitch - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
    controls.on_mouse_move(0.0, 20_000.0);
    assert!((camera.borrow().pitch + std::f32::consts::FRAC_PI_4).abs() < 1e-5);
}

// ============================================================================
// Builder and Start
// ============================================================================

#[test]
fn test_builder_requires_camera_and_element() {
    let missing_camera = WalkingControls::builder()
        .pointer_lock(Box::new(RecordingPointerLock::new()))
        .build();
    assert!(matches!(missing_camera, Err(WalkError::MissingCamera)));

    let missing_element = WalkingControls::builder()
        .camera(shared_camera(CameraPose::default()))
        .build();
    assert!(matches!(missing_element, Err(WalkError::MissingInputElement)));

    let bad_config = WalkingControls::builder()
        .camera(shared_camera(CameraPose::default()))
        .pointer_lock(Box::new(RecordingPointerLock::new()))
        .config(WalkingConfig {
            probe_distance: -1.0,
            ..WalkingConfig::default()
        })
        .build();
    assert!(matches!(bad_config, Err(WalkError::InvalidConfig(_))));
}

#[test]
fn test_initial_state() {
    let (controls, _, _) = walker_at(Vec3::ZERO);
    assert_eq!(controls.velocity(), Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(controls.final_velocity(), Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(controls.below_distance(), Some(0.5));
    assert!(!controls.can_jump());
    assert_eq!(controls.sprint_multiplier(), 1.0);
    assert!(controls.is_connected());
    assert!(!controls.is_locked());
}

#[test]
fn test_start_without_geometry() {
    let (mut controls, _, _) = walker_at(Vec3::ZERO);
    let mut geometry = WalkableGeometry::empty();
    let result = controls.start(&mut geometry, Instant::now());
    assert!(matches!(result, Err(WalkError::NoGeometry)));
    assert!(!controls.lighting().flashlight_on());
}

#[test]
fn test_start_builds_trees_and_shows_hint() {
    let (mut controls, _, _) = walker_at(Vec3::ZERO);
    let mut geometry = catacomb_demo();
    let now = Instant::now();
    controls.start(&mut geometry, now).unwrap();

    assert!(geometry.collidables().all(WalkableMesh::has_bounds_tree));
    assert!(controls.lighting().flashlight_on());
    assert!(!controls.lighting().ambient_visible);
    assert!(controls.hint().is_visible(now));
    assert!(controls.hint().is_visible(now + Duration::from_secs(9)));
    assert!(!controls.hint().is_visible(now + Duration::from_secs(11)));
}

#[test]
fn test_start_again_after_mesh_swap() {
    let (mut controls, _, _) = walker_at(Vec3::ZERO);
    let mut geometry = catacomb_demo();
    controls.start(&mut geometry, Instant::now()).unwrap();

    geometry.set_meshes(vec![WalkableMesh::floor_plane("part", Vec3::ZERO, 1.0, GREY)]);
    assert!(!geometry.meshes()[0].has_bounds_tree());

    controls.start(&mut geometry, Instant::now()).unwrap();
    assert!(geometry.meshes()[0].has_bounds_tree());
}
