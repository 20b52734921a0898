//! Physics module
//!
//! Ray queries used by the walking controller to find walls and ground in
//! scanned geometry. Built from scratch without an external physics library.
//!
//! # Unit System
//!
//! Scene units throughout (the scans are roughly metric). The walking
//! controller advances by a fixed step per tick, so there are no time units
//! in this module.
//!
//! # Submodules
//!
//! - [`collision`] - Rays, ray-AABB and ray-triangle intersection, hit info
//! - [`bvh`] - Per-mesh bounding-volume hierarchy for fast triangle raycasts

pub mod bvh;
pub mod collision;

// Re-export commonly used types at the physics module level
pub use bvh::MeshBvh;
pub use collision::{Aabb, Ray, RayHit, face_normal, ray_aabb_interval, ray_triangle_intersect};
