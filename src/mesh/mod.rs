use std::fmt;

use nalgebra::Point3;

use crate::convert::{cast_u32, cast_usize};
use crate::error::{ResampleError, Result};

pub mod primitive;
pub mod topology;

/// Vertex count of the coarsest canonical sphere subdivision.
pub const LOW_RESOLUTION_VERTEX_COUNT: usize = 10242;
pub const MEDIUM_RESOLUTION_VERTEX_COUNT: usize = 40962;
/// Vertex count every surface field is brought to before projection.
pub const CANONICAL_VERTEX_COUNT: usize = 163_842;

static_assertions::const_assert!(LOW_RESOLUTION_VERTEX_COUNT < MEDIUM_RESOLUTION_VERTEX_COUNT);
static_assertions::const_assert!(MEDIUM_RESOLUTION_VERTEX_COUNT < CANONICAL_VERTEX_COUNT);

/// One of the two mirror-symmetric halves of the cortical surface. The
/// hemispheres are processed independently and only combined at the very end
/// of a surface to volume projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    pub const BOTH: [Hemisphere; 2] = [Hemisphere::Left, Hemisphere::Right];

    /// The conventional two-letter prefix of hemisphere asset files.
    pub fn prefix(self) -> &'static str {
        match self {
            Hemisphere::Left => "lh",
            Hemisphere::Right => "rh",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Fixed subdivision levels of the same spherical surface topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    Low,
    Medium,
    Canonical,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::Low, Resolution::Medium, Resolution::Canonical];

    pub fn vertex_count(self) -> usize {
        match self {
            Resolution::Low => LOW_RESOLUTION_VERTEX_COUNT,
            Resolution::Medium => MEDIUM_RESOLUTION_VERTEX_COUNT,
            Resolution::Canonical => CANONICAL_VERTEX_COUNT,
        }
    }

    /// Icosahedron subdivision level producing this resolution's vertex
    /// count.
    pub fn subdivision_level(self) -> u32 {
        match self {
            Resolution::Low => 5,
            Resolution::Medium => 6,
            Resolution::Canonical => 7,
        }
    }

    /// Recognizes a resolution from the length of a field or mesh.
    pub fn from_vertex_count(vertex_count: usize) -> Result<Self> {
        Resolution::ALL
            .iter()
            .copied()
            .find(|resolution| resolution.vertex_count() == vertex_count)
            .ok_or(ResampleError::InvalidResolution(vertex_count))
    }

    /// Short tag used in asset names, e.g. `164k`.
    pub fn tag(self) -> &'static str {
        match self {
            Resolution::Low => "10k",
            Resolution::Medium => "41k",
            Resolution::Canonical => "164k",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Which geometric embedding of the surface topology is requested from a mesh
/// provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GeometryVariant {
    Sphere,
    White,
    Pial,
    Midthickness,
}

impl GeometryVariant {
    pub fn name(self) -> &'static str {
        match self {
            GeometryVariant::Sphere => "sphere",
            GeometryVariant::White => "white",
            GeometryVariant::Pial => "pial",
            GeometryVariant::Midthickness => "midthickness",
        }
    }
}

/// A triangular face referencing three vertices of a `SurfaceMesh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TriangleFace {
    pub vertices: (u32, u32, u32),
}

impl TriangleFace {
    /// # Panics
    /// Panics if two of the vertex indices are equal.
    pub fn new(vi1: u32, vi2: u32, vi3: u32) -> TriangleFace {
        assert!(
            vi1 != vi2 && vi1 != vi3 && vi2 != vi3,
            "One or more face edges consists of the same vertex"
        );

        TriangleFace {
            vertices: (vi1, vi2, vi3),
        }
    }
}

impl From<(u32, u32, u32)> for TriangleFace {
    fn from((i1, i2, i3): (u32, u32, u32)) -> TriangleFace {
        TriangleFace::new(i1, i2, i3)
    }
}

/// Triangulated surface of one hemisphere at one resolution.
///
/// Vertex order is significant: surface fields are indexed identically to
/// `vertices()`. Faces are only consulted by linear interpolation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SurfaceMesh {
    faces: Vec<TriangleFace>,
    vertices: Vec<Point3<f32>>,
}

impl SurfaceMesh {
    /// Creates new surface mesh from provided triangle faces and vertices.
    ///
    /// # Panics
    /// Panics if faces refer to out-of-bounds vertices.
    pub fn from_triangle_faces_with_vertices<F, V>(faces: F, vertices: V) -> Self
    where
        F: IntoIterator<Item = (u32, u32, u32)>,
        V: IntoIterator<Item = Point3<f32>>,
    {
        let faces_collection: Vec<TriangleFace> =
            faces.into_iter().map(TriangleFace::from).collect();
        let vertices_collection: Vec<_> = vertices.into_iter().collect();

        let vertices_range = 0..cast_u32(vertices_collection.len());
        for face in &faces_collection {
            let (v1, v2, v3) = face.vertices;
            assert!(
                vertices_range.contains(&v1)
                    && vertices_range.contains(&v2)
                    && vertices_range.contains(&v3),
                "Faces reference out of bounds position data"
            );
        }

        SurfaceMesh {
            faces: faces_collection,
            vertices: vertices_collection,
        }
    }

    pub fn faces(&self) -> &[TriangleFace] {
        &self.faces
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The three vertex positions of a face.
    pub fn face_vertices(&self, face: &TriangleFace) -> (&Point3<f32>, &Point3<f32>, &Point3<f32>) {
        (
            &self.vertices[cast_usize(face.vertices.0)],
            &self.vertices[cast_usize(face.vertices.1)],
            &self.vertices[cast_usize(face.vertices.2)],
        )
    }

    /// Arithmetic mean of all vertex positions. For a sphere mesh this is
    /// its center.
    pub fn centroid(&self) -> Point3<f32> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let mut centroid = Point3::origin();
        for vertex in &self.vertices {
            centroid += vertex - Point3::origin();
        }

        centroid / (self.vertices.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_from_vertex_count_recognizes_all() {
        assert_eq!(Resolution::from_vertex_count(10242), Ok(Resolution::Low));
        assert_eq!(Resolution::from_vertex_count(40962), Ok(Resolution::Medium));
        assert_eq!(
            Resolution::from_vertex_count(163_842),
            Ok(Resolution::Canonical)
        );
    }

    #[test]
    fn test_resolution_from_vertex_count_rejects_other() {
        assert_eq!(
            Resolution::from_vertex_count(2562),
            Err(ResampleError::InvalidResolution(2562))
        );
    }

    #[test]
    fn test_surface_mesh_centroid_of_symmetric_points_is_origin() {
        let mesh = SurfaceMesh::from_triangle_faces_with_vertices(
            Vec::<(u32, u32, u32)>::new(),
            vec![
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(-1.0, 0.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
                Point3::new(0.0, -2.0, 0.0),
            ],
        );

        assert_eq!(mesh.centroid(), Point3::origin());
    }

    #[test]
    #[should_panic(expected = "Faces reference out of bounds position data")]
    fn test_surface_mesh_panics_for_out_of_bounds_face() {
        SurfaceMesh::from_triangle_faces_with_vertices(
            vec![(0, 1, 5)],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
        );
    }
}
