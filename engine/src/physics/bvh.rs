//! Triangle BVH
//!
//! A bounding-volume hierarchy over one mesh's triangles, built once when the
//! walking controller starts so the two per-tick probes stay cheap against
//! large scanned meshes. Built with median splits along the widest centroid
//! axis; leaves hold at most [`MAX_LEAF_TRIANGLES`] triangles.

use glam::Vec3;

use super::collision::{Aabb, Ray, ray_aabb_interval, ray_triangle_intersect};

/// Maximum number of triangles stored in a leaf node.
pub const MAX_LEAF_TRIANGLES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
enum BvhNodeKind {
    Leaf { start: u32, count: u32 },
    Interior { left: u32, right: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BvhNode {
    bounds: Aabb,
    kind: BvhNodeKind,
}

/// Bounding-volume hierarchy over a triangle list.
///
/// The BVH stores triangle indices only; triangle corners are fetched from the
/// owning mesh through the `triangle` callback at query time.
#[derive(Debug, Clone, Default)]
pub struct MeshBvh {
    nodes: Vec<BvhNode>,
    /// Triangle indices, permuted so each leaf owns a contiguous range
    triangles: Vec<u32>,
}

impl MeshBvh {
    /// Build a BVH over `triangles`.
    pub fn build(triangles: &[[Vec3; 3]]) -> Self {
        let mut bvh = Self {
            nodes: Vec::with_capacity(triangles.len().max(1) * 2),
            triangles: (0..triangles.len() as u32).collect(),
        };
        if triangles.is_empty() {
            return bvh;
        }

        let bounds: Vec<Aabb> = triangles
            .iter()
            .map(|tri| Aabb::from_points(tri.iter().copied()))
            .collect();
        let centroids: Vec<Vec3> = bounds.iter().map(Aabb::center).collect();

        bvh.build_node(&bounds, &centroids, 0, triangles.len());
        bvh
    }

    /// Recursively build the node covering `triangles[start..end]`, returning its index.
    fn build_node(&mut self, bounds: &[Aabb], centroids: &[Vec3], start: usize, end: usize) -> u32 {
        let node_bounds = self.triangles[start..end]
            .iter()
            .fold(Aabb::empty(), |acc, &tri| acc.union(&bounds[tri as usize]));

        let index = self.nodes.len() as u32;
        self.nodes.push(BvhNode {
            bounds: node_bounds,
            kind: BvhNodeKind::Leaf {
                start: start as u32,
                count: (end - start) as u32,
            },
        });

        if end - start <= MAX_LEAF_TRIANGLES {
            return index;
        }

        let centroid_bounds = Aabb::from_points(
            self.triangles[start..end]
                .iter()
                .map(|&tri| centroids[tri as usize]),
        );
        let axis = centroid_bounds.longest_axis();

        let mid = start + (end - start) / 2;
        self.triangles[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
            centroids[a as usize][axis].total_cmp(&centroids[b as usize][axis])
        });

        let left = self.build_node(bounds, centroids, start, mid);
        let right = self.build_node(bounds, centroids, mid, end);
        self.nodes[index as usize].kind = BvhNodeKind::Interior { left, right };
        index
    }

    /// Number of nodes in the hierarchy.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of triangles indexed by the hierarchy.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounds of the whole hierarchy, if it holds any triangle.
    pub fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(|node| node.bounds)
    }

    /// Nearest hit along `ray`.
    ///
    /// # Arguments
    ///
    /// * `ray` - Bounded query ray
    /// * `cull_back_faces` - Skip triangles whose back face the ray sees
    /// * `triangle` - Returns the corners of a triangle index
    ///
    /// # Returns
    ///
    /// `(distance, triangle_index)` of the closest hit, or `None`.
    pub fn raycast_nearest(
        &self,
        ray: &Ray,
        cull_back_faces: bool,
        triangle: impl Fn(usize) -> [Vec3; 3],
    ) -> Option<(f32, usize)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<(f32, usize)> = None;
        let mut stack: Vec<u32> = Vec::with_capacity(64);
        stack.push(0);

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index as usize];
            let limit = best.map_or(ray.far, |(t, _)| t);
            match ray_aabb_interval(ray.origin, ray.direction, &node.bounds) {
                Some((t_enter, _)) if t_enter <= limit => {}
                _ => continue,
            }

            match node.kind {
                BvhNodeKind::Leaf { start, count } => {
                    let range = start as usize..(start + count) as usize;
                    for &tri in &self.triangles[range] {
                        let tri = tri as usize;
                        if let Some(t) = ray_triangle_intersect(ray, triangle(tri), cull_back_faces)
                        {
                            if best.is_none_or(|(best_t, _)| t < best_t) {
                                best = Some((t, tri));
                            }
                        }
                    }
                }
                BvhNodeKind::Interior { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        best
    }
}
