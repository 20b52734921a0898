//! Collision detection module
//!
//! Ray queries against triangulated walkable geometry.
//!
//! # Ray-AABB Intersection
//!
//! The slab method is used for ray-AABB intersection, which finds the
//! intersection interval by computing entry and exit times for each axis.
//! It drives BVH traversal in [`super::bvh`].
//!
//! # Ray-Triangle Intersection
//!
//! Möller-Trumbore, with optional back-face culling. A triangle's front face
//! is the side its counter-clockwise winding `(a, b, c)` faces, and its face
//! normal is `normalize((b - a) x (c - a))`.
//!
//! # Example
//!
//! ```ignore
//! use catacombs_engine::physics::collision::{Ray, ray_triangle_intersect};
//! use glam::Vec3;
//!
//! let ray = Ray::bounded(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 0.5).unwrap();
//! let tri = [Vec3::new(-1.0, 0.8, 1.0), Vec3::new(1.0, 0.8, 1.0), Vec3::new(0.0, 0.8, -1.0)];
//! if let Some(t) = ray_triangle_intersect(&ray, tri, true) {
//!     println!("Hit at distance {}", t);
//! }
//! ```

use glam::Vec3;

/// Smallest determinant treated as a non-parallel ray/triangle pair.
const TRIANGLE_EPSILON: f32 = 1e-8;

/// A bounded ray segment `origin + direction * t` for `t` in `[near, far]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray
    pub origin: Vec3,
    /// Normalized direction
    pub direction: Vec3,
    /// Closest accepted hit distance
    pub near: f32,
    /// Farthest accepted hit distance
    pub far: f32,
}

impl Ray {
    /// Creates a ray of length `far` along `direction`.
    ///
    /// The direction does not need to be normalized. Returns `None` for a
    /// zero (or non-finite) direction, which cannot probe anything.
    pub fn bounded(origin: Vec3, direction: Vec3, far: f32) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self {
            origin,
            direction,
            near: 0.0,
            far,
        })
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether a hit distance falls inside `[near, far]`.
    #[inline]
    pub fn accepts(&self, t: f32) -> bool {
        t >= self.near && t <= self.far
    }
}

/// Information about a ray-mesh collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// World-space position where the collision occurred
    pub point: Vec3,
    /// Face normal of the hit triangle (normalized)
    pub normal: Vec3,
    /// Index of the hit mesh within the collidable set
    pub mesh_index: usize,
    /// Index of the hit triangle within its mesh
    pub triangle_index: usize,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// An inverted box that any `grow` call will replace.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    /// Extends the box to contain `point`.
    #[inline]
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True when no point has been added.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Index (0 = x, 1 = y, 2 = z) of the widest axis.
    pub fn longest_axis(&self) -> usize {
        let extent = self.max - self.min;
        if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        }
    }
}

/// Ray-AABB intersection interval using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb` - Box to test against
///
/// # Returns
///
/// * `Some((t_enter, t_exit))` - Parametric interval inside the box, with
///   `t_enter` clamped to 0 when the ray starts inside
/// * `None` - No intersection or the box is entirely behind the ray origin
pub fn ray_aabb_interval(ray_origin: Vec3, ray_dir: Vec3, aabb: &Aabb) -> Option<(f32, f32)> {
    // Handle near-zero directions by using large values
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb.min - ray_origin) * inv_dir;
    let t2 = (aabb.max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        Some((t_min.max(0.0), t_max))
    } else {
        None
    }
}

/// Face normal of a counter-clockwise triangle.
///
/// Returns `Vec3::ZERO` for degenerate triangles.
pub fn face_normal(tri: [Vec3; 3]) -> Vec3 {
    (tri[1] - tri[0])
        .cross(tri[2] - tri[0])
        .normalize_or_zero()
}

/// Möller-Trumbore ray-triangle intersection.
///
/// # Arguments
///
/// * `ray` - Bounded ray with a normalized direction
/// * `tri` - Triangle corners in counter-clockwise order
/// * `cull_back_faces` - Reject hits on the side the face normal points away from
///
/// # Returns
///
/// Hit distance inside `[ray.near, ray.far]`, or `None`.
pub fn ray_triangle_intersect(ray: &Ray, tri: [Vec3; 3], cull_back_faces: bool) -> Option<f32> {
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);

    // det > 0 means the ray travels against the face normal (front face)
    if cull_back_faces {
        if det < TRIANGLE_EPSILON {
            return None;
        }
    } else if det.abs() < TRIANGLE_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    if ray.accepts(t) { Some(t) } else { None }
}
