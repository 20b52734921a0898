//! Walking Configuration
//!
//! Centralized tuning values for the walking controller. `Default` returns the
//! values the controller was tuned with; a JSON file can override any subset
//! of them (missing fields fall back to the defaults).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WalkError;

/// First-person spot light carried by the camera while walking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashlightConfig {
    /// Light colour as 0xRRGGBB
    pub color: u32,
    /// Intensity while the flashlight is on
    pub intensity: f32,
    /// Maximum range of the light (meters)
    pub range: f32,
    /// Largest angle from the light direction that is still lit (radians)
    pub angle: f32,
    /// Soft edge fraction of the cone (0 = hard edge)
    pub penumbra: f32,
    /// Distance falloff exponent
    pub decay: f32,
    /// Distance in front of the camera the light is aimed at
    pub target_distance: f32,
}

impl Default for FlashlightConfig {
    fn default() -> Self {
        Self {
            color: 0xffa95c,
            intensity: 1.0,
            range: 10.0,
            angle: std::f32::consts::PI * 0.5,
            penumbra: 0.0,
            decay: 1.0,
            target_distance: 3.0,
        }
    }
}

impl FlashlightConfig {
    /// Light colour as linear-ish RGB in `[0, 1]`.
    pub fn rgb(&self) -> [f32; 3] {
        [
            ((self.color >> 16) & 0xff) as f32 / 255.0,
            ((self.color >> 8) & 0xff) as f32 / 255.0,
            (self.color & 0xff) as f32 / 255.0,
        ]
    }
}

/// Tuning for the gravity-and-collision walking controller.
///
/// All distances are in scene units. Motion uses a fixed step per tick, so
/// speeds are per rendered frame rather than per second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkingConfig {
    /// Length of the forward and downward collision probes
    pub probe_distance: f32,
    /// Displacement scale applied every tick
    pub fixed_step: f32,
    /// Subtracted from the resting height to avoid contact jitter
    pub skin_offset: f32,
    /// Jump budget set by a jump press
    pub jump_offset: f32,
    /// Jump budget consumed per airborne tick
    pub jump_decrement: f32,
    /// Horizontal multiplier while sprint is held
    pub sprint_factor: f32,
    /// Accumulated normal y above which a hit counts as floor
    pub floor_threshold: f32,
    /// Look rotation in radians per pixel of pointer motion
    pub look_sensitivity: f32,
    /// Smallest allowed polar angle (0 = straight up)
    pub min_polar_angle: f32,
    /// Largest allowed polar angle (PI = straight down)
    pub max_polar_angle: f32,
    /// Magnitude of the constant downward velocity component
    pub initial_fall_speed: f32,
    /// Lifetime of the on-screen hint shown by `start()` (seconds)
    pub hint_duration_secs: f32,
    /// Text of the on-screen hint
    pub hint_message: String,
    pub flashlight: FlashlightConfig,
}

impl Default for WalkingConfig {
    fn default() -> Self {
        Self {
            probe_distance: 0.5,
            fixed_step: 0.1,
            skin_offset: 0.1,
            jump_offset: 2.0,
            jump_decrement: 0.5,
            sprint_factor: 3.5,
            floor_threshold: 0.2,
            look_sensitivity: 0.002,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::PI,
            initial_fall_speed: 1.0,
            hint_duration_secs: 10.0,
            hint_message: "Click to look around. WASD to walk, Shift to sprint, Space to jump, Esc to leave."
                .to_string(),
            flashlight: FlashlightConfig::default(),
        }
    }
}

impl WalkingConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, WalkError> {
        let config: WalkingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WalkError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded walking config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WalkError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> Result<(), WalkError> {
        if self.probe_distance <= 0.0 {
            return Err(WalkError::InvalidConfig(format!(
                "probe_distance must be positive, got {}",
                self.probe_distance
            )));
        }
        if self.fixed_step <= 0.0 {
            return Err(WalkError::InvalidConfig(format!(
                "fixed_step must be positive, got {}",
                self.fixed_step
            )));
        }
        if self.sprint_factor <= 0.0 {
            return Err(WalkError::InvalidConfig(format!(
                "sprint_factor must be positive, got {}",
                self.sprint_factor
            )));
        }
        if self.jump_decrement <= 0.0 {
            return Err(WalkError::InvalidConfig(format!(
                "jump_decrement must be positive, got {}",
                self.jump_decrement
            )));
        }
        if !(self.hint_duration_secs >= 0.0 && self.hint_duration_secs < 1.0e6) {
            return Err(WalkError::InvalidConfig(format!(
                "hint_duration_secs must be between 0 and 1e6, got {}",
                self.hint_duration_secs
            )));
        }
        if self.min_polar_angle > self.max_polar_angle {
            return Err(WalkError::InvalidConfig(format!(
                "polar range is inverted: {} > {}",
                self.min_polar_angle, self.max_polar_angle
            )));
        }
        Ok(())
    }

    /// Pitch range `(min, max)` in radians derived from the polar angles.
    pub fn pitch_limits(&self) -> (f32, f32) {
        let half_pi = std::f32::consts::FRAC_PI_2;
        (half_pi - self.max_polar_angle, half_pi - self.min_polar_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WalkingConfig::default();
        assert_eq!(config.probe_distance, 0.5);
        assert_eq!(config.fixed_step, 0.1);
        assert_eq!(config.skin_offset, 0.1);
        assert_eq!(config.jump_offset, 2.0);
        assert_eq!(config.sprint_factor, 3.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_pitch_limits_cover_full_vertical_range() {
        let (min, max) = WalkingConfig::default().pitch_limits();
        assert!((min + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((max - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = WalkingConfig::from_json_str(r#"{ "sprint_factor": 2.0 }"#).unwrap();
        assert_eq!(config.sprint_factor, 2.0);
        assert_eq!(config.probe_distance, 0.5);
        assert_eq!(config.flashlight.color, 0xffa95c);
    }

    #[test]
    fn test_invalid_probe_rejected() {
        let result = WalkingConfig::from_json_str(r#"{ "probe_distance": 0.0 }"#);
        assert!(matches!(result, Err(WalkError::InvalidConfig(_))));
    }

    #[test]
    fn test_inverted_polar_range_rejected() {
        let result =
            WalkingConfig::from_json_str(r#"{ "min_polar_angle": 2.0, "max_polar_angle": 1.0 }"#);
        assert!(matches!(result, Err(WalkError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = WalkingConfig::from_json_str("{ probe_distance: }");
        assert!(matches!(result, Err(WalkError::ConfigParse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "catacombs_walking_config_{}.json",
            std::process::id()
        ));
        let mut config = WalkingConfig::default();
        config.look_sensitivity = 0.004;
        config.save(&path).unwrap();

        let loaded = WalkingConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let result = WalkingConfig::load("/nonexistent/catacombs/walking.json");
        assert!(matches!(result, Err(WalkError::ConfigIo(_))));
    }

    #[test]
    fn test_flashlight_rgb() {
        let rgb = FlashlightConfig::default().rgb();
        assert!((rgb[0] - 1.0).abs() < 1e-6);
        assert!((rgb[1] - 169.0 / 255.0).abs() < 1e-6);
        assert!((rgb[2] - 92.0 / 255.0).abs() < 1e-6);
    }
}
