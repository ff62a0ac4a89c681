//! Evaluation of surface and volume fields at arbitrary query locations.

use std::f32;
use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::convert::{cast_usize, round_to_index};
use crate::error::{ResampleError, Result};
use crate::mesh::topology::{self, VertexToFaceRelation};
use crate::mesh::SurfaceMesh;
use crate::spatial_index::{BuildSpatialIndex, SpatialIndex};
use crate::volume::VoxelGrid;

/// How far outside a triangle (in barycentric units) a ray may pass and still
/// count as a hit. Closes the cracks between adjacent triangles.
const BARYCENTRIC_TOLERANCE: f32 = 1.0e-5;

/// How far (in voxels) a continuous index may fall outside the trilinear
/// domain and still be clamped onto its boundary. Physical coordinates arrive
/// as `f32`, so indices of boundary voxel centers carry round-off.
const GRID_DOMAIN_TOLERANCE: f64 = 1.0e-4;

/// How a field is evaluated between its sample points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InterpolationMode {
    /// Takes the value of the closest sample unmodified. Required for label
    /// data.
    Nearest,
    /// Blends the surrounding samples (barycentric on meshes, trilinear on
    /// grids). Only meaningful for continuous data.
    Linear,
}

impl FromStr for InterpolationMode {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nearest" => Ok(InterpolationMode::Nearest),
            "linear" => Ok(InterpolationMode::Linear),
            other => Err(ResampleError::InvalidInterpolationMode(other.to_string())),
        }
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterpolationMode::Nearest => write!(f, "nearest"),
            InterpolationMode::Linear => write!(f, "linear"),
        }
    }
}

/// Samples a voxel grid at continuous storage indices.
///
/// Indices outside of the grid's domain evaluate to zero.
pub trait GridInterpolator: Sync {
    fn sample(&self, grid: &VoxelGrid<f32>, index: &Point3<f64>) -> f32;

    fn sample_batch(&self, grid: &VoxelGrid<f32>, indices: &[Point3<f64>]) -> Vec<f32> {
        indices
            .par_iter()
            .map(|index| self.sample(grid, index))
            .collect()
    }
}

/// Value of the voxel whose center is closest to the index. The domain on
/// each axis is `[-0.5, d - 0.5)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestGridInterpolator;

impl GridInterpolator for NearestGridInterpolator {
    fn sample(&self, grid: &VoxelGrid<f32>, index: &Point3<f64>) -> f32 {
        let dimensions = grid.dimensions();
        let i = round_to_index(index.x, cast_usize(dimensions.x));
        let j = round_to_index(index.y, cast_usize(dimensions.y));
        let k = round_to_index(index.z, cast_usize(dimensions.z));

        match (i, j, k) {
            (Some(i), Some(j), Some(k)) => grid.value_at_indices(i, j, k),
            _ => 0.0,
        }
    }
}

/// Trilinear interpolation over the eight voxels surrounding the index. The
/// domain on each axis is `[0, d - 1]`, widened by `GRID_DOMAIN_TOLERANCE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrilinearGridInterpolator;

impl GridInterpolator for TrilinearGridInterpolator {
    fn sample(&self, grid: &VoxelGrid<f32>, index: &Point3<f64>) -> f32 {
        let dimensions = grid.dimensions();
        let nx = cast_usize(dimensions.x);
        let ny = cast_usize(dimensions.y);
        let nz = cast_usize(dimensions.z);

        let (x, y, z) = match (
            clamp_to_domain(index.x, nx),
            clamp_to_domain(index.y, ny),
            clamp_to_domain(index.z, nz),
        ) {
            (Some(x), Some(y), Some(z)) => (x, y, z),
            _ => return 0.0,
        };

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let z0 = z.floor() as usize;
        let x1 = (x0 + 1).min(nx - 1);
        let y1 = (y0 + 1).min(ny - 1);
        let z1 = (z0 + 1).min(nz - 1);

        let xd = x - x0 as f64;
        let yd = y - y0 as f64;
        let zd = z - z0 as f64;

        let c = |i: usize, j: usize, k: usize| f64::from(grid.value_at_indices(i, j, k));

        let c00 = c(x0, y0, z0) * (1.0 - xd) + c(x1, y0, z0) * xd;
        let c01 = c(x0, y0, z1) * (1.0 - xd) + c(x1, y0, z1) * xd;
        let c10 = c(x0, y1, z0) * (1.0 - xd) + c(x1, y1, z0) * xd;
        let c11 = c(x0, y1, z1) * (1.0 - xd) + c(x1, y1, z1) * xd;

        let c0 = c00 * (1.0 - yd) + c10 * yd;
        let c1 = c01 * (1.0 - yd) + c11 * yd;

        (c0 * (1.0 - zd) + c1 * zd) as f32
    }
}

/// Clamps a continuous index into `[0, n - 1]`. `None` if it lies further
/// outside than the tolerance, is not finite, or the axis is empty.
fn clamp_to_domain(c: f64, n: usize) -> Option<f64> {
    if n == 0 {
        return None;
    }

    let max = (n - 1) as f64;
    if c >= -GRID_DOMAIN_TOLERANCE && c <= max + GRID_DOMAIN_TOLERANCE {
        Some(c.max(0.0).min(max))
    } else {
        None
    }
}

/// The grid interpolator implementing `mode`.
pub fn grid_interpolator(mode: InterpolationMode) -> &'static dyn GridInterpolator {
    match mode {
        InterpolationMode::Nearest => &NearestGridInterpolator,
        InterpolationMode::Linear => &TrilinearGridInterpolator,
    }
}

/// Evaluates fields defined on the vertices of one surface mesh.
///
/// Nearest mode returns the value of the closest vertex. Linear mode casts a
/// ray from the mesh centroid (the center of a sphere mesh) through the query
/// point and blends the vertex values of the triangle it passes through,
/// searching the triangles around the closest vertex. Queries whose ray
/// misses all of them evaluate to zero.
pub struct SurfaceFieldEvaluator<'a, I> {
    mesh: &'a SurfaceMesh,
    index: I,
    mode: InterpolationMode,
    center: Point3<f32>,
    v2f: Vec<VertexToFaceRelation>,
}

impl<'a, I: BuildSpatialIndex> SurfaceFieldEvaluator<'a, I> {
    pub fn new(mesh: &'a SurfaceMesh, mode: InterpolationMode) -> Self {
        let index = I::build(mesh.vertices());
        Self::with_index(mesh, index, mode)
    }
}

impl<'a, I: SpatialIndex> SurfaceFieldEvaluator<'a, I> {
    /// Creates the evaluator around an index already built over the mesh
    /// vertices.
    pub fn with_index(mesh: &'a SurfaceMesh, index: I, mode: InterpolationMode) -> Self {
        let v2f = match mode {
            InterpolationMode::Nearest => Vec::new(),
            InterpolationMode::Linear => topology::calculate_vertex_to_face_topology(mesh),
        };

        SurfaceFieldEvaluator {
            mesh,
            index,
            mode,
            center: mesh.centroid(),
            v2f,
        }
    }

    /// Evaluates `field` at every query. `None` queries are unmapped and
    /// evaluate to zero.
    pub fn evaluate(&self, field: &[f32], queries: &[Option<Point3<f32>>]) -> Result<Vec<f32>> {
        if field.len() != self.mesh.vertex_count() {
            return Err(ResampleError::GridMismatch {
                expected: self.mesh.vertex_count(),
                actual: field.len(),
            });
        }

        Ok(queries
            .par_iter()
            .map(|query| match query {
                Some(point) => self.evaluate_at(field, point),
                None => 0.0,
            })
            .collect())
    }

    fn evaluate_at(&self, field: &[f32], point: &Point3<f32>) -> f32 {
        let nearest = match self.index.nearest(point) {
            Some(nearest) => nearest,
            None => return 0.0,
        };

        match self.mode {
            InterpolationMode::Nearest => field[nearest],
            InterpolationMode::Linear => self.evaluate_barycentric(field, nearest, point),
        }
    }

    fn evaluate_barycentric(&self, field: &[f32], nearest: usize, point: &Point3<f32>) -> f32 {
        let faces = self.mesh.faces();
        let ray_vector = point - self.center;
        for face_index in topology::face_neighborhood(nearest, faces, &self.v2f) {
            let face = &faces[cast_usize(face_index)];
            let triangle = self.mesh.face_vertices(face);
            if let Some(weights) = ray_triangle_barycentric(&self.center, &ray_vector, triangle) {
                let (v1, v2, v3) = face.vertices;
                return weights.x * field[cast_usize(v1)]
                    + weights.y * field[cast_usize(v2)]
                    + weights.z * field[cast_usize(v3)];
            }
        }

        0.0
    }
}

/// The Möller–Trumbore ray-triangle intersection algorithm is a fast method for
/// calculating the intersection of a ray and a triangle in three dimensions
/// without needing precomputation of the plane equation of the plane containing
/// the triangle.
///
/// Returns the barycentric weights of the intersection point with respect to
/// the three triangle vertices, `None` if the ray misses the triangle or only
/// hits it behind its origin.
///
/// https://en.wikipedia.org/wiki/Möller–Trumbore_intersection_algorithm
pub fn ray_triangle_barycentric(
    ray_origin: &Point3<f32>,
    ray_vector: &Vector3<f32>,
    triangle_vertices: (&Point3<f32>, &Point3<f32>, &Point3<f32>),
) -> Option<Vector3<f32>> {
    let edge_1_vector = triangle_vertices.1 - triangle_vertices.0;
    let edge_2_vector = triangle_vertices.2 - triangle_vertices.0;
    let perpendicular_vector = ray_vector.cross(&edge_2_vector);
    let determinant = edge_1_vector.dot(&perpendicular_vector);
    // This ray is parallel to this triangle.
    if approx::relative_eq!(determinant, 0.0) {
        return None;
    }
    let inverse_determinant = 1.0 / determinant;
    let tangent_vector = ray_origin - triangle_vertices.0;
    let u_parameter = inverse_determinant * tangent_vector.dot(&perpendicular_vector);
    if u_parameter < -BARYCENTRIC_TOLERANCE || u_parameter > 1.0 + BARYCENTRIC_TOLERANCE {
        return None;
    }
    let q_vector = tangent_vector.cross(&edge_1_vector);
    let v_parameter = inverse_determinant * ray_vector.dot(&q_vector);
    if v_parameter < -BARYCENTRIC_TOLERANCE
        || u_parameter + v_parameter > 1.0 + BARYCENTRIC_TOLERANCE
    {
        return None;
    }
    let t_parameter = inverse_determinant * edge_2_vector.dot(&q_vector);
    if t_parameter > f32::EPSILON && t_parameter < 1.0 / f32::EPSILON {
        Some(Vector3::new(
            1.0 - u_parameter - v_parameter,
            u_parameter,
            v_parameter,
        ))
    } else {
        None
    }
}
