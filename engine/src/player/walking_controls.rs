//! Walking Controls
//!
//! First-person walking over arbitrary triangulated geometry: gravity,
//! ray-based collision, ground snapping, a simple hop, sprint and mouse
//! look, with a pointer-lock lifecycle around it.
//!
//! # Tick Model
//!
//! Every rendered frame the host calls [`WalkingControls::animate`]. Two
//! bounded rays are cast from the camera: one along the velocity recorded at
//! the end of the previous tick (so collision response lags input by one
//! tick) and one straight down. Hits are deduplicated by face normal, their
//! normals summed, and the desired velocity is cancelled or deflected per
//! axis. Vertical motion is ground-aware: snap to the probed floor, fall when
//! there is none, or rise while a jump lasts.
//!
//! Motion advances by a fixed step per tick, not by elapsed time.
//!
//! # Usage
//!
//! ```rust,ignore
//! use catacombs_engine::camera::{CameraPose, shared_camera};
//! use catacombs_engine::player::WalkingControls;
//!
//! let camera = shared_camera(CameraPose::with_position(spawn));
//! let mut controls = WalkingControls::builder()
//!     .camera(camera.clone())
//!     .pointer_lock(Box::new(host))
//!     .exit_callback(|| switch_to_orbit_mode())
//!     .build()?;
//!
//! controls.start(&mut geometry, Instant::now())?;
//!
//! // Each frame:
//! controls.pump_input(&mut keyboard);
//! controls.poll_pointer_lock()?;
//! controls.animate(&geometry);
//! ```

use std::collections::HashSet;
use std::time::{Duration, Instant};

use glam::Vec3;

use crate::camera::CameraHandle;
use crate::config::WalkingConfig;
use crate::error::WalkError;
use crate::events::{ControlEvent, ControlsNotifier};
use crate::input::{
    DirectionalEvent, DirectionalInputProvider, InputState, KeyCode, LockState, MoveKey,
    PointerLockHost, PointerLockNotice,
};
use crate::physics::{Ray, RayHit};
use crate::world::WalkableGeometry;

use super::hint::HintToast;
use super::lighting::SceneLighting;

/// Result of the downward probe plus jump bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundState {
    /// Distance to the nearest surface below the camera, `None` when the
    /// downward probe found nothing
    pub below_distance: Option<f32>,
    /// True while grounded; a jump press only works then
    pub can_jump: bool,
    /// Jump budget left; the camera rises one step per tick while positive
    pub jump_remaining: f32,
}

/// Cancel or deflect one velocity component.
///
/// A block component stronger than the velocity on that axis stops motion
/// on the axis; a weaker one is added to it.
pub fn block_velocity(value: f32, block: f32) -> f32 {
    if block.abs() > value.abs() { 0.0 } else { value + block }
}

/// Bit pattern of a normal, with `-0.0` folded onto `0.0`.
fn normal_key(normal: Vec3) -> [u32; 3] {
    let n = normal + Vec3::ZERO;
    [n.x.to_bits(), n.y.to_bits(), n.z.to_bits()]
}

/// Keep the first hit for every distinct face normal, preserving order.
pub fn dedup_by_normal(hits: impl IntoIterator<Item = RayHit>) -> Vec<RayHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(normal_key(hit.normal)))
        .collect()
}

/// Builder for [`WalkingControls`]. Camera and pointer-lock host are required.
#[derive(Default)]
pub struct WalkingControlsBuilder {
    camera: Option<CameraHandle>,
    pointer_lock: Option<Box<dyn PointerLockHost>>,
    notifier: Option<Box<dyn ControlsNotifier>>,
    exit_callback: Option<Box<dyn FnMut()>>,
    config: WalkingConfig,
}

impl WalkingControlsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera the controller moves.
    pub fn camera(mut self, camera: CameraHandle) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Input element providing pointer capture.
    pub fn pointer_lock(mut self, host: Box<dyn PointerLockHost>) -> Self {
        self.pointer_lock = Some(host);
        self
    }

    /// Where lock/unlock/change events go. Events are dropped if unset.
    pub fn notifier(mut self, notifier: impl ControlsNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Called once every time walking is left (capture lost or `unlock()` while unlocked).
    pub fn exit_callback(mut self, callback: impl FnMut() + 'static) -> Self {
        self.exit_callback = Some(Box::new(callback));
        self
    }

    pub fn config(mut self, config: WalkingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<WalkingControls, WalkError> {
        let camera = self.camera.ok_or(WalkError::MissingCamera)?;
        let pointer_lock = self.pointer_lock.ok_or(WalkError::MissingInputElement)?;
        self.config.validate()?;

        let config = self.config;
        let initial_velocity = Vec3::new(0.0, -config.initial_fall_speed, 0.0);
        Ok(WalkingControls {
            camera,
            pointer_lock,
            notifier: self
                .notifier
                .unwrap_or_else(|| Box::new(()) as Box<dyn ControlsNotifier>),
            exit_callback: self.exit_callback,
            lock_state: LockState::Unlocked,
            connected: true,
            input: InputState::new(),
            sprint: 1.0,
            velocity: initial_velocity,
            final_velocity: initial_velocity,
            ground: GroundState {
                below_distance: Some(config.probe_distance),
                can_jump: false,
                jump_remaining: 0.0,
            },
            lighting: SceneLighting::new(&config.flashlight),
            hint: HintToast::new(
                config.hint_message.clone(),
                Duration::from_secs_f32(config.hint_duration_secs),
            ),
            config,
        })
    }
}

/// Gravity-and-collision first-person controller.
pub struct WalkingControls {
    config: WalkingConfig,
    camera: CameraHandle,
    pointer_lock: Box<dyn PointerLockHost>,
    notifier: Box<dyn ControlsNotifier>,
    exit_callback: Option<Box<dyn FnMut()>>,

    lock_state: LockState,
    /// Input, pointer-move and lock notifications are ignored while false
    connected: bool,

    input: InputState,
    /// 1.0, or the sprint factor while sprint is held
    sprint: f32,
    /// Desired world velocity from input and facing; y is the constant fall speed
    velocity: Vec3,
    /// Velocity after collision correction; its direction is the next forward probe
    final_velocity: Vec3,
    ground: GroundState,

    lighting: SceneLighting,
    hint: HintToast,
}

impl WalkingControls {
    pub fn builder() -> WalkingControlsBuilder {
        WalkingControlsBuilder::new()
    }

    // ------------------------------------------------------------------
    // Per-tick update
    // ------------------------------------------------------------------

    /// Advance one tick against the current walkable geometry.
    pub fn animate(&mut self, geometry: &WalkableGeometry) {
        let hits = self.raycast(geometry);

        let motion = if hits.is_empty() {
            self.velocity
        } else {
            self.final_velocity = self.calculate_intersected_velocity(&hits);
            self.final_velocity
        };
        self.move_by(motion);

        self.final_velocity = self.velocity;
    }

    /// Cast the forward and downward probes and unify their hits.
    fn raycast(&mut self, geometry: &WalkableGeometry) -> Vec<RayHit> {
        let origin = self.camera.borrow().position;
        let probe = self.config.probe_distance;

        // A zero velocity has no direction to probe along
        let forward = Ray::bounded(origin, self.final_velocity, probe)
            .map(|ray| geometry.raycast(&ray))
            .unwrap_or_default();
        let below = Ray::bounded(origin, Vec3::NEG_Y, probe)
            .map(|ray| geometry.raycast(&ray))
            .unwrap_or_default();

        self.unify_intersections(forward, below)
    }

    /// Merge forward and downward hits, record the ground distance and drop
    /// hits whose face normal was already seen.
    pub fn unify_intersections(&mut self, forward: Vec<RayHit>, below: Vec<RayHit>) -> Vec<RayHit> {
        self.ground.below_distance = below.first().map(|hit| hit.distance);
        dedup_by_normal(forward.into_iter().chain(below))
    }

    /// Desired velocity corrected by the summed normals of `hits`.
    pub fn calculate_intersected_velocity(&self, hits: &[RayHit]) -> Vec3 {
        let blocked: Vec3 = hits.iter().map(|hit| hit.normal).sum();

        let y = if blocked.y > self.config.floor_threshold {
            0.0
        } else {
            self.velocity.y - blocked.y
        };

        Vec3::new(
            block_velocity(self.velocity.x, blocked.x),
            y,
            block_velocity(self.velocity.z, blocked.z),
        )
    }

    /// Vertical displacement for this tick; updates the grounded state.
    pub fn calculate_y(&mut self, velocity: Vec3) -> f32 {
        let step = self.config.fixed_step;

        if !self.ground.can_jump && self.ground.jump_remaining > 0.0 {
            self.ground.jump_remaining =
                (self.ground.jump_remaining - self.config.jump_decrement).max(0.0);
            return step;
        }

        match self.ground.below_distance {
            None => {
                self.ground.can_jump = false;
                velocity.y * step
            }
            Some(below) => {
                self.ground.can_jump = true;
                let probe = self.config.probe_distance;
                if below <= probe {
                    probe - below - self.config.skin_offset
                } else {
                    0.0
                }
            }
        }
    }

    fn move_by(&mut self, velocity: Vec3) {
        let horizontal = self.config.fixed_step * self.sprint;
        let dy = self.calculate_y(velocity);

        let mut camera = self.camera.borrow_mut();
        camera.position.x += velocity.x * horizontal;
        camera.position.y += dy;
        camera.position.z += velocity.z * horizontal;
    }

    /// Recompute the desired horizontal velocity from held keys and facing.
    ///
    /// The vertical component is left alone.
    pub fn calculate_world_velocity(&mut self) {
        let relative = self.input.relative_velocity();
        let (direction, right) = {
            let camera = self.camera.borrow();
            (camera.forward(), camera.right())
        };

        let world = direction * -relative.z + right * relative.x;
        self.velocity.x = world.x;
        self.velocity.z = world.z;
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Pointer moved by `(dx, dy)` pixels. Only rotates while locked.
    pub fn on_mouse_move(&mut self, dx: f32, dy: f32) {
        if !self.connected || self.lock_state != LockState::Locked {
            return;
        }

        let limits = self.config.pitch_limits();
        self.camera
            .borrow_mut()
            .apply_look_delta(dx, dy, self.config.look_sensitivity, limits);

        self.calculate_world_velocity();
        self.changed();
    }

    /// Apply one directional event. Presses emit a change notification.
    pub fn handle_input(&mut self, event: DirectionalEvent) {
        if !self.connected {
            return;
        }
        self.apply_event(event);
        if event.is_press() {
            self.changed();
        }
    }

    /// Drain `provider` and apply every pending event. Returns how many were applied.
    pub fn pump_input(&mut self, provider: &mut dyn DirectionalInputProvider) -> usize {
        let mut applied = 0;
        while let Some(event) = provider.next_event() {
            self.handle_input(event);
            applied += 1;
        }
        applied
    }

    /// Raw key press. Any key press emits a change notification, walking key or not.
    pub fn on_key_down(&mut self, key: KeyCode) {
        if !self.connected {
            return;
        }
        if let Some(move_key) = key.move_key() {
            self.apply_event(DirectionalEvent::Press(move_key));
        }
        self.changed();
    }

    /// Raw key release.
    pub fn on_key_up(&mut self, key: KeyCode) {
        if !self.connected {
            return;
        }
        if let Some(move_key) = key.move_key() {
            self.apply_event(DirectionalEvent::Release(move_key));
        }
    }

    fn apply_event(&mut self, event: DirectionalEvent) {
        let pressed = event.is_press();
        let recompute = match event.key() {
            MoveKey::Sprint => {
                self.input.sprint = pressed;
                self.sprint = if pressed { self.config.sprint_factor } else { 1.0 };
                false
            }
            MoveKey::Jump => {
                if pressed && self.ground.can_jump {
                    self.ground.jump_remaining = self.config.jump_offset;
                    self.ground.can_jump = false;
                    true
                } else {
                    false
                }
            }
            direction => self.input.set_direction(direction, pressed),
        };

        if recompute {
            self.calculate_world_velocity();
        }
    }

    // ------------------------------------------------------------------
    // Lock lifecycle
    // ------------------------------------------------------------------

    /// Turn the flashlight on and ask the host for pointer capture.
    ///
    /// The state only changes to `Locked` once the host confirms.
    pub fn lock(&mut self) {
        self.lighting.switch_flashlight(true);
        log::info!("Requesting pointer lock");
        self.pointer_lock.request_lock();
    }

    /// Leave walking.
    ///
    /// While locked this asks the host to release capture; the confirmed loss
    /// then restores the lights and calls the exit callback. While unlocked
    /// both happen immediately.
    pub fn unlock(&mut self) {
        match self.lock_state {
            LockState::Locked => self.pointer_lock.exit_lock(),
            LockState::Unlocked => self.release(),
        }
    }

    /// Host notification: pointer capture was gained (`true`) or lost (`false`).
    pub fn on_pointer_lock_change(&mut self, captured: bool) {
        if !self.connected {
            return;
        }
        match (captured, self.lock_state) {
            (true, LockState::Unlocked) => self.locked(),
            (false, LockState::Locked) => self.unlocked(),
            _ => log::debug!("Ignoring repeated pointer lock change (captured={})", captured),
        }
    }

    /// Host notification: capture was refused. The state stays unlocked.
    pub fn on_pointer_lock_error(&mut self, reason: impl Into<String>) -> WalkError {
        let reason = reason.into();
        log::error!("Unable to use pointer lock: {}", reason);
        WalkError::PointerLockDenied(reason)
    }

    /// Deliver queued pointer-lock notices from the host.
    ///
    /// Stops at the first refusal and returns it; later notices stay queued.
    pub fn poll_pointer_lock(&mut self) -> Result<(), WalkError> {
        while let Some(notice) = self.pointer_lock.poll_notice() {
            if !self.connected {
                continue;
            }
            match notice {
                PointerLockNotice::Changed(captured) => self.on_pointer_lock_change(captured),
                PointerLockNotice::Error(reason) => return Err(self.on_pointer_lock_error(reason)),
            }
        }
        Ok(())
    }

    fn locked(&mut self) {
        self.lock_state = LockState::Locked;
        log::info!("Pointer locked");
        self.notifier.notify(ControlEvent::Lock);
    }

    fn unlocked(&mut self) {
        self.lock_state = LockState::Unlocked;
        log::info!("Pointer unlocked");
        self.release();
        self.notifier.notify(ControlEvent::Unlock);
    }

    /// Flashlight off and hand control back to the host.
    fn release(&mut self) {
        self.lighting.switch_flashlight(false);
        if let Some(callback) = self.exit_callback.as_mut() {
            log::debug!("Calling walking exit callback");
            callback();
        }
    }

    fn changed(&mut self) {
        self.notifier.notify(ControlEvent::Change);
    }

    /// Enter walking: build collision acceleration structures for every
    /// loaded mesh, switch the flashlight on and show the hint.
    pub fn start(&mut self, geometry: &mut WalkableGeometry, now: Instant) -> Result<(), WalkError> {
        if geometry.is_empty() {
            log::warn!("Walking started without walkable geometry");
            return Err(WalkError::NoGeometry);
        }

        let built = geometry.compute_bounds_trees();
        log::info!(
            "Walking started: {} meshes, {} triangles, {} bounds trees built",
            geometry.meshes().len(),
            geometry.triangle_count(),
            built
        );

        self.lighting.switch_flashlight(true);
        self.hint.show(now);
        Ok(())
    }

    /// Stop reacting to input, pointer-move and lock notifications.
    pub fn dispose(&mut self) {
        self.connected = false;
    }

    /// Resume reacting to events after [`dispose`](Self::dispose).
    pub fn connect(&mut self) {
        self.connected = true;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The camera this controller moves.
    pub fn camera(&self) -> &CameraHandle {
        &self.camera
    }

    pub fn config(&self) -> &WalkingConfig {
        &self.config
    }

    pub fn lock_state(&self) -> LockState {
        self.lock_state
    }

    pub fn is_locked(&self) -> bool {
        self.lock_state == LockState::Locked
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn ground(&self) -> &GroundState {
        &self.ground
    }

    pub fn can_jump(&self) -> bool {
        self.ground.can_jump
    }

    pub fn below_distance(&self) -> Option<f32> {
        self.ground.below_distance
    }

    pub fn jump_remaining(&self) -> f32 {
        self.ground.jump_remaining
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn final_velocity(&self) -> Vec3 {
        self.final_velocity
    }

    pub fn sprint_multiplier(&self) -> f32 {
        self.sprint
    }

    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    pub fn lighting(&self) -> &SceneLighting {
        &self.lighting
    }

    pub fn hint(&self) -> &HintToast {
        &self.hint
    }
}
