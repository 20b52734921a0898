//! Camera Pose Module
//!
//! The camera state shared between the host render loop and whichever camera
//! controller is active. Orientation is stored as a yaw/pitch pair applied in
//! Y-then-X order, so the camera never rolls.
//!
//! # Coordinate System
//! - +X = right
//! - +Y = up
//! - -Z = forward (OpenGL/Vulkan convention)
//!
//! When yaw=0 and pitch=0, the camera looks toward -Z. Positive yaw turns
//! left (counter-clockwise seen from above); positive pitch looks up.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Camera position, orientation and projection parameters.
///
/// ## Usage
/// ```rust,ignore
/// let mut pose = CameraPose::with_position(Vec3::new(0.0, 0.4, 0.0));
///
/// // Pixel deltas from a captured pointer
/// pose.apply_look_delta(mouse_dx, mouse_dy, 0.002, (-FRAC_PI_2, FRAC_PI_2));
///
/// let forward = pose.forward();
/// let view_proj = pose.view_projection();
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPose {
    /// Camera position in world space
    pub position: Vec3,
    /// Rotation around world Y (radians) - unrestricted, wraps around
    pub yaw: f32,
    /// Rotation around the camera X axis (radians)
    pub pitch: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Viewport width / height
    pub aspect: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.05,
            far: 500.0,
        }
    }
}

impl CameraPose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pose at `position` looking toward -Z.
    pub fn with_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Rotation of the camera as a quaternion (Y then X, no roll).
    #[inline]
    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Set yaw and pitch directly, clamping pitch to `pitch_limits`.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32, pitch_limits: (f32, f32)) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(pitch_limits.0, pitch_limits.1);
    }

    /// Apply a pointer movement delta (pixels) to the orientation.
    ///
    /// Moving the pointer right turns right and moving it down looks down.
    /// Pitch is clamped to `pitch_limits`; the change is immediate.
    pub fn apply_look_delta(&mut self, dx: f32, dy: f32, sensitivity: f32, pitch_limits: (f32, f32)) {
        self.yaw -= dx * sensitivity;
        self.pitch -= dy * sensitivity;
        self.pitch = self.pitch.clamp(pitch_limits.0, pitch_limits.1);
    }

    /// World-space viewing direction (normalized).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// The camera's local up axis in world space.
    ///
    /// Tilts with pitch, so it is only world +Y when looking level.
    #[inline]
    pub fn up(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(sy * sp, cp, cy * sp)
    }

    /// `forward x up`: the camera's right axis (always horizontal).
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}
