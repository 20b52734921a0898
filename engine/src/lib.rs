//! Catacombs Engine Library
//!
//! First-person walking through scanned catacomb geometry: a gravity and
//! ray-collision walking controller, the camera and geometry it works on,
//! and a small wgpu renderer for the native viewer.
//!
//! # Modules
//!
//! - [`player`] - The walking controller, flashlight lighting and start hint
//! - [`camera`] - Shared camera pose (position, yaw/pitch, projection)
//! - [`world`] - Walkable meshes and the demo catacomb scene
//! - [`physics`] - Ray/triangle and ray/box tests, per-mesh BVH
//! - [`input`] - Directional input providers and pointer lock
//! - [`events`] - Lock/unlock/change notifications
//! - [`config`] - Tuning values, JSON load/save
//! - [`render`] - wgpu context and walk mesh pass
//!
//! # Example
//!
//! ```ignore
//! use catacombs_engine::camera::{CameraPose, shared_camera};
//! use catacombs_engine::input::{KeyboardInput, KeyCode, RecordingPointerLock};
//! use catacombs_engine::player::WalkingControls;
//! use catacombs_engine::world::{catacomb_demo, spawn_point};
//!
//! let mut geometry = catacomb_demo();
//! let camera = shared_camera(CameraPose::with_position(spawn_point()));
//! let mut controls = WalkingControls::builder()
//!     .camera(camera.clone())
//!     .pointer_lock(Box::new(RecordingPointerLock::new()))
//!     .build()?;
//! controls.start(&mut geometry, std::time::Instant::now())?;
//!
//! let mut keyboard = KeyboardInput::new();
//! keyboard.handle_key(KeyCode::W, true);
//! controls.pump_input(&mut keyboard);
//! controls.animate(&geometry);
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod physics;
pub mod player;
pub mod render;
pub mod world;

pub use camera::{CameraHandle, CameraPose, shared_camera};
pub use config::{FlashlightConfig, WalkingConfig};
pub use error::WalkError;
pub use events::{ChannelNotifier, ControlEvent, ControlsNotifier, ListenerRegistry};
pub use input::{DirectionalEvent, DirectionalInputProvider, InputState, KeyCode, LockState, MoveKey};
pub use player::{WalkingControls, WalkingControlsBuilder};
pub use world::{WalkableGeometry, WalkableMesh};
