//! Flashlight Lighting
//!
//! Scene light visibility while walking. Switching the flashlight on hides
//! the scene's ambient and spot lights so only the light carried by the
//! camera illuminates the scan; switching it off restores them.

use glam::Vec3;

use crate::camera::CameraPose;
use crate::config::FlashlightConfig;

/// Spot light attached to the camera, aimed a fixed distance ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct Flashlight {
    /// Light colour, linear RGB in `[0, 1]`
    pub color: [f32; 3],
    /// Current intensity (0 while switched off)
    pub intensity: f32,
    /// Intensity used while switched on
    pub on_intensity: f32,
    pub range: f32,
    /// Largest angle from the light direction that is still lit (radians)
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub target_distance: f32,
    pub visible: bool,
}

impl Flashlight {
    /// A switched-off flashlight built from `config`.
    pub fn from_config(config: &FlashlightConfig) -> Self {
        Self {
            color: config.rgb(),
            intensity: 0.0,
            on_intensity: config.intensity,
            range: config.range,
            angle: config.angle,
            penumbra: config.penumbra,
            decay: config.decay,
            target_distance: config.target_distance,
            visible: true,
        }
    }

    pub fn is_on(&self) -> bool {
        self.visible && self.intensity > 0.0
    }

    /// World-space position the light sits at (the camera).
    pub fn position(&self, camera: &CameraPose) -> Vec3 {
        camera.position
    }

    /// World-space point the light is aimed at.
    pub fn target(&self, camera: &CameraPose) -> Vec3 {
        camera.position + camera.forward() * self.target_distance
    }

    /// Normalized direction from the light to its target.
    pub fn direction(&self, camera: &CameraPose) -> Vec3 {
        (self.target(camera) - self.position(camera)).normalize_or(Vec3::NEG_Z)
    }

    /// Cosine of the cone angle; fragments with a smaller cosine are unlit.
    pub fn cone_cos(&self) -> f32 {
        self.angle.cos()
    }

    /// Cosine of the angle where the soft edge starts; equals
    /// [`cone_cos`](Self::cone_cos) for a hard-edged cone.
    pub fn penumbra_cos(&self) -> f32 {
        (self.angle * (1.0 - self.penumbra.clamp(0.0, 1.0))).cos()
    }
}

/// Light visibility of the walked scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLighting {
    /// Ambient lights of the scene
    pub ambient_visible: bool,
    /// Spot lights placed in the scene (not the flashlight)
    pub scene_spots_visible: bool,
    pub flashlight: Flashlight,
}

impl SceneLighting {
    pub fn new(config: &FlashlightConfig) -> Self {
        Self {
            ambient_visible: true,
            scene_spots_visible: true,
            flashlight: Flashlight::from_config(config),
        }
    }

    /// Turn the walking flashlight on (scene lights hidden) or off (scene lights restored).
    pub fn switch_flashlight(&mut self, on: bool) {
        self.ambient_visible = !on;
        self.scene_spots_visible = !on;
        self.flashlight.visible = true;
        self.flashlight.intensity = if on { self.flashlight.on_intensity } else { 0.0 };
    }

    pub fn flashlight_on(&self) -> bool {
        self.flashlight.is_on()
    }
}
