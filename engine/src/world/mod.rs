//! World Module
//!
//! Contains the walkable geometry the walking controller collides against,
//! and a procedurally built demo catacomb used when no scan is loaded.

pub mod catacomb;
pub mod geometry;

pub use catacomb::{catacomb_demo, spawn_point};
pub use geometry::{Vertex, WalkableGeometry, WalkableMesh};
