//! Render Module
//!
//! wgpu rendering for the walk viewer: window surface setup and a single
//! pass drawing the walkable geometry from the walking camera.

pub mod gpu_context;
pub mod walk_mesh_pass;

pub use gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig};
pub use walk_mesh_pass::{MeshBuffer, WALK_MESH_SHADER, WalkMeshPass, WalkUniforms};
