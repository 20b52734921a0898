//! Demo Catacomb Scene
//!
//! A small procedurally built corridor network used by the viewer when no
//! scan is available: a long gallery, a side passage, a raised ossuary step
//! and an open crossing chamber. All surfaces face into the walkable space.

use glam::Vec3;

use super::geometry::{WalkableGeometry, WalkableMesh};

const STONE: [f32; 4] = [0.55, 0.50, 0.44, 1.0];
const DARK_STONE: [f32; 4] = [0.38, 0.34, 0.30, 1.0];
const BONE: [f32; 4] = [0.80, 0.76, 0.64, 1.0];

/// Ceiling height of the galleries above their floor.
pub const GALLERY_HEIGHT: f32 = 2.4;

/// Where the viewer places the camera when walking starts.
pub fn spawn_point() -> Vec3 {
    Vec3::new(0.0, 0.4, -1.0)
}

/// Upward-facing floor over `[x0, x1] x [z0, z1]` at height `y`.
fn floor(x0: f32, x1: f32, z0: f32, z1: f32, y: f32) -> [Vec3; 4] {
    [
        Vec3::new(x0, y, z1),
        Vec3::new(x1, y, z1),
        Vec3::new(x1, y, z0),
        Vec3::new(x0, y, z0),
    ]
}

/// Downward-facing ceiling over `[x0, x1] x [z0, z1]` at height `y`.
fn ceiling(x0: f32, x1: f32, z0: f32, z1: f32, y: f32) -> [Vec3; 4] {
    [
        Vec3::new(x0, y, z0),
        Vec3::new(x1, y, z0),
        Vec3::new(x1, y, z1),
        Vec3::new(x0, y, z1),
    ]
}

/// Wall in the plane `x = x`, spanning `[z0, z1]` and `[y0, y1]`.
///
/// `facing_positive` selects a +X normal, otherwise -X.
fn wall_x(x: f32, z0: f32, z1: f32, y0: f32, y1: f32, facing_positive: bool) -> [Vec3; 4] {
    if facing_positive {
        [
            Vec3::new(x, y0, z1),
            Vec3::new(x, y0, z0),
            Vec3::new(x, y1, z0),
            Vec3::new(x, y1, z1),
        ]
    } else {
        [
            Vec3::new(x, y0, z0),
            Vec3::new(x, y0, z1),
            Vec3::new(x, y1, z1),
            Vec3::new(x, y1, z0),
        ]
    }
}

/// Wall in the plane `z = z`, spanning `[x0, x1]` and `[y0, y1]`.
///
/// `facing_positive` selects a +Z normal, otherwise -Z.
fn wall_z(z: f32, x0: f32, x1: f32, y0: f32, y1: f32, facing_positive: bool) -> [Vec3; 4] {
    if facing_positive {
        [
            Vec3::new(x0, y0, z),
            Vec3::new(x1, y0, z),
            Vec3::new(x1, y1, z),
            Vec3::new(x0, y1, z),
        ]
    } else {
        [
            Vec3::new(x1, y0, z),
            Vec3::new(x0, y0, z),
            Vec3::new(x0, y1, z),
            Vec3::new(x1, y1, z),
        ]
    }
}

/// Gallery running along -Z from the spawn point, closed at the far end.
fn main_gallery() -> WalkableMesh {
    let (x0, x1) = (-1.0, 1.0);
    let (z0, z1) = (-20.0, 1.0);
    WalkableMesh::from_quads(
        "main_gallery",
        &[
            floor(x0, x1, z0, z1, 0.0),
            ceiling(x0, x1, z0, z1, GALLERY_HEIGHT),
            wall_x(x0, z0, z1, 0.0, GALLERY_HEIGHT, true),
            // Right wall leaves an opening for the side passage at z in [-10, -8]
            wall_x(x1, -8.0, z1, 0.0, GALLERY_HEIGHT, false),
            wall_x(x1, z0, -10.0, 0.0, GALLERY_HEIGHT, false),
            wall_z(z0, x0, x1, 0.0, GALLERY_HEIGHT, true),
            wall_z(z1, x0, x1, 0.0, GALLERY_HEIGHT, false),
        ],
        STONE,
    )
}

/// Side passage branching off to +X.
fn side_passage() -> WalkableMesh {
    let (x0, x1) = (1.0, 12.0);
    let (z0, z1) = (-10.0, -8.0);
    WalkableMesh::from_quads(
        "side_passage",
        &[
            floor(x0, x1, z0, z1, 0.0),
            ceiling(x0, x1, z0, z1, GALLERY_HEIGHT),
            wall_z(z0, x0, x1, 0.0, GALLERY_HEIGHT, true),
            wall_z(z1, x0, x1, 0.0, GALLERY_HEIGHT, false),
        ],
        DARK_STONE,
    )
}

/// A low raised platform in the gallery. Its riser stops a walker at the edge.
fn ossuary_step() -> WalkableMesh {
    let (x0, x1) = (-1.0, 1.0);
    let (z0, z1) = (-16.0, -13.0);
    let h = 0.15;
    WalkableMesh::from_quads(
        "ossuary_step",
        &[
            floor(x0, x1, z0, z1, h),
            wall_z(z1, x0, x1, 0.0, h, true),
            wall_z(z0, x0, x1, 0.0, h, false),
        ],
        BONE,
    )
}

/// Open chamber at the end of the side passage (floor only).
fn crossing_chamber() -> WalkableMesh {
    WalkableMesh::floor_plane("crossing_chamber", Vec3::new(16.0, 0.0, -9.0), 4.0, DARK_STONE)
}

/// The full demo network.
pub fn catacomb_demo() -> WalkableGeometry {
    WalkableGeometry::new(vec![
        main_gallery(),
        side_passage(),
        ossuary_step(),
        crossing_chamber(),
    ])
}
