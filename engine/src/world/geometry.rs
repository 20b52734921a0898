//! Walkable Geometry
//!
//! Triangulated collision meshes the walking controller probes every tick.
//! The host scene owns these and swaps them wholesale when it reloads or
//! re-simplifies the scan; the controller only reads them (and, on `start()`,
//! builds their acceleration structures).

use glam::Vec3;

use crate::error::WalkError;
use crate::physics::bvh::MeshBvh;
use crate::physics::collision::{Aabb, Ray, RayHit, face_normal, ray_aabb_interval, ray_triangle_intersect};

/// Vertex for walkable meshes (position, normal, color).
///
/// Laid out for direct upload as a GPU vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(Vertex, [u8; 40]);

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// One collidable triangle mesh.
#[derive(Debug, Clone)]
pub struct WalkableMesh {
    /// Display name (used in logs)
    pub name: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    /// Accept hits on back faces too
    pub double_sided: bool,
    bounds: Aabb,
    bvh: Option<MeshBvh>,
}

impl WalkableMesh {
    /// Create a mesh from an indexed triangle list.
    ///
    /// Fails if the index count is not a multiple of three or an index points
    /// past the vertex list.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
    ) -> Result<Self, WalkError> {
        let name = name.into();
        if indices.len() % 3 != 0 {
            return Err(WalkError::InvalidMesh(format!(
                "{}: index count {} is not a multiple of 3",
                name,
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(WalkError::InvalidMesh(format!(
                "{}: index {} out of range for {} vertices",
                name,
                bad,
                vertices.len()
            )));
        }

        let bounds = Aabb::from_points(vertices.iter().map(Vertex::position));
        Ok(Self {
            name,
            vertices,
            indices,
            double_sided: false,
            bounds,
            bvh: None,
        })
    }

    /// Build a flat-shaded mesh from counter-clockwise quads `[a, b, c, d]`.
    pub fn from_quads(name: impl Into<String>, quads: &[[Vec3; 4]], color: [f32; 4]) -> Self {
        let mut vertices = Vec::with_capacity(quads.len() * 4);
        let mut indices = Vec::with_capacity(quads.len() * 6);
        for quad in quads {
            let normal = face_normal([quad[0], quad[1], quad[2]]);
            let base = vertices.len() as u32;
            vertices.extend(quad.iter().map(|&p| Vertex::new(p, normal, color)));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        let bounds = Aabb::from_points(vertices.iter().map(Vertex::position));
        Self {
            name: name.into(),
            vertices,
            indices,
            double_sided: false,
            bounds,
            bvh: None,
        }
    }

    /// An upward-facing square floor centred on `center`.
    pub fn floor_plane(name: impl Into<String>, center: Vec3, half_extent: f32, color: [f32; 4]) -> Self {
        let (x0, x1) = (center.x - half_extent, center.x + half_extent);
        let (z0, z1) = (center.z - half_extent, center.z + half_extent);
        let y = center.y;
        Self::from_quads(
            name,
            &[[
                Vec3::new(x0, y, z1),
                Vec3::new(x1, y, z1),
                Vec3::new(x1, y, z0),
                Vec3::new(x0, y, z0),
            ]],
            color,
        )
    }

    /// Mark the mesh as double-sided (builder style).
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corners of triangle `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let i = index * 3;
        [
            self.vertices[self.indices[i] as usize].position(),
            self.vertices[self.indices[i + 1] as usize].position(),
            self.vertices[self.indices[i + 2] as usize].position(),
        ]
    }

    /// Build the BVH used to accelerate raycasts against this mesh.
    pub fn compute_bounds_tree(&mut self) {
        let triangles: Vec<[Vec3; 3]> = (0..self.triangle_count()).map(|i| self.triangle(i)).collect();
        self.bvh = Some(MeshBvh::build(&triangles));
    }

    /// Drop the BVH (raycasts fall back to brute force).
    pub fn dispose_bounds_tree(&mut self) {
        self.bvh = None;
    }

    pub fn has_bounds_tree(&self) -> bool {
        self.bvh.is_some()
    }

    /// Nearest hit along `ray` as `(distance, triangle_index)`.
    pub fn raycast_nearest(&self, ray: &Ray) -> Option<(f32, usize)> {
        let cull = !self.double_sided;
        if let Some(bvh) = &self.bvh {
            return bvh.raycast_nearest(ray, cull, |t| self.triangle(t));
        }

        match ray_aabb_interval(ray.origin, ray.direction, &self.bounds) {
            Some((t_enter, _)) if t_enter <= ray.far => {}
            _ => return None,
        }

        let mut best: Option<(f32, usize)> = None;
        for tri in 0..self.triangle_count() {
            if let Some(t) = ray_triangle_intersect(ray, self.triangle(tri), cull) {
                if best.is_none_or(|(best_t, _)| t < best_t) {
                    best = Some((t, tri));
                }
            }
        }
        best
    }
}

/// The set of meshes the walking controller collides against.
///
/// Holds the current detail-level meshes plus an optional "part floor" plane
/// that the host adds when viewing a detached part of the scan.
#[derive(Debug, Clone, Default)]
pub struct WalkableGeometry {
    meshes: Vec<WalkableMesh>,
    part_floor: Option<WalkableMesh>,
}

impl WalkableGeometry {
    pub fn new(meshes: Vec<WalkableMesh>) -> Self {
        Self {
            meshes,
            part_floor: None,
        }
    }

    /// An empty set: probes never hit anything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the loaded meshes wholesale (e.g. after a detail-level swap).
    ///
    /// New meshes carry no BVH until the controller is started again.
    pub fn set_meshes(&mut self, meshes: Vec<WalkableMesh>) {
        self.meshes = meshes;
    }

    pub fn set_part_floor(&mut self, part_floor: Option<WalkableMesh>) {
        self.part_floor = part_floor;
    }

    pub fn meshes(&self) -> &[WalkableMesh] {
        &self.meshes
    }

    pub fn part_floor(&self) -> Option<&WalkableMesh> {
        self.part_floor.as_ref()
    }

    /// Loaded meshes followed by the part floor, if any.
    pub fn collidables(&self) -> impl Iterator<Item = &WalkableMesh> {
        self.meshes.iter().chain(self.part_floor.iter())
    }

    /// True when there is nothing to collide with.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.part_floor.is_none()
    }

    pub fn triangle_count(&self) -> usize {
        self.collidables().map(WalkableMesh::triangle_count).sum()
    }

    /// Build a BVH for every collidable mesh. Returns how many were built.
    pub fn compute_bounds_trees(&mut self) -> usize {
        let mut built = 0;
        for mesh in self.meshes.iter_mut().chain(self.part_floor.iter_mut()) {
            mesh.compute_bounds_tree();
            built += 1;
        }
        built
    }

    /// Cast `ray` against every collidable mesh.
    ///
    /// Each mesh reports at most its nearest hit; the result is sorted by
    /// distance, nearest first.
    pub fn raycast(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .collidables()
            .enumerate()
            .filter_map(|(mesh_index, mesh)| {
                let (distance, triangle_index) = mesh.raycast_nearest(ray)?;
                Some(RayHit {
                    distance,
                    point: ray.at(distance),
                    normal: face_normal(mesh.triangle(triangle_index)),
                    mesh_index,
                    triangle_index,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
