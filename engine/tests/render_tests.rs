//! Render Tests - Shader Validation and Uniform Layout
//!
//! Parses the walk mesh WGSL with naga and checks the CPU-side uniform
//! struct against it, without needing a GPU.

use catacombs_engine::camera::CameraPose;
use catacombs_engine::config::FlashlightConfig;
use catacombs_engine::player::SceneLighting;
use catacombs_engine::render::{WALK_MESH_SHADER, WalkUniforms};
use catacombs_engine::world::Vertex;
use glam::Vec3;

// ============================================================================
// Shader Tests
// ============================================================================

#[test]
fn test_walk_mesh_shader_validates() {
    let module = naga::front::wgsl::parse_str(WALK_MESH_SHADER)
        .unwrap_or_else(|e| panic!("walk_mesh.wgsl failed to parse: {}", e));

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .unwrap_or_else(|e| panic!("walk_mesh.wgsl failed validation: {:?}", e));
}

#[test]
fn test_walk_mesh_shader_entry_points() {
    let module = naga::front::wgsl::parse_str(WALK_MESH_SHADER).unwrap();
    let names: Vec<&str> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_shader_uniform_size_matches_cpu_struct() {
    let module = naga::front::wgsl::parse_str(WALK_MESH_SHADER).unwrap();
    let (_, ty) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("WalkUniforms"))
        .expect("WalkUniforms struct in shader");
    match &ty.inner {
        naga::TypeInner::Struct { span, .. } => {
            assert_eq!(*span as usize, std::mem::size_of::<WalkUniforms>());
        }
        other => panic!("WalkUniforms is not a struct: {:?}", other),
    }
}

// ============================================================================
// Uniform Tests
// ============================================================================

#[test]
fn test_vertex_layout_size() {
    // position (12) + normal (12) + color (16)
    assert_eq!(std::mem::size_of::<Vertex>(), 40);
}

#[test]
fn test_uniforms_follow_camera() {
    let mut camera = CameraPose::with_position(Vec3::new(1.0, 0.4, -2.0));
    camera.yaw = std::f32::consts::FRAC_PI_2;
    let mut lighting = SceneLighting::new(&FlashlightConfig::default());
    lighting.switch_flashlight(true);

    let uniforms = WalkUniforms::from_scene(&camera, &lighting, 0.35);
    assert_eq!(uniforms.camera_pos, [1.0, 0.4, -2.0]);
    // Yaw of +90 degrees looks down -X
    let dir = Vec3::from_array(uniforms.light_dir);
    assert!((dir - Vec3::NEG_X).length() < 1e-5, "got {:?}", dir);
    assert_eq!(uniforms.view_proj, camera.view_projection().to_cols_array_2d());
    assert_eq!(uniforms.ambient, 0.0);
    assert_eq!(uniforms.light_range, 10.0);
}

#[test]
fn test_uniforms_flashlight_off_restores_ambient() {
    let camera = CameraPose::default();
    let mut lighting = SceneLighting::new(&FlashlightConfig::default());
    lighting.switch_flashlight(true);
    lighting.switch_flashlight(false);

    let uniforms = WalkUniforms::from_scene(&camera, &lighting, 0.35);
    assert_eq!(uniforms.ambient, 0.35);
    assert_eq!(uniforms.light_intensity, 0.0);
}
