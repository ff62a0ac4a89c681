use smallvec::SmallVec;

use crate::convert::{cast_u32, cast_usize};

use super::{SurfaceMesh, TriangleFace};

// FIXME: @Optimization Icosphere vertices have 5 or 6 incident faces, so 8
// is generous. Measure with meshes from other sources before lowering it.

/// The number of relations/neighbors a `SmallVec` is allowed to
/// contain before it spills into heap. Implementation detail.
const MAX_INLINE_NEIGHBOR_COUNT: usize = 8;

pub type VertexToFaceRelation = SmallVec<[u32; MAX_INLINE_NEIGHBOR_COUNT]>;

/// Calculates topological relations (neighborhood) of mesh vertex -> faces.
/// Returns a list indexed by vertex index, containing the indices of the faces
/// the vertex is a corner of.
pub fn calculate_vertex_to_face_topology(mesh: &SurfaceMesh) -> Vec<VertexToFaceRelation> {
    calculate_vertex_to_face_topology_from_components(mesh.faces(), cast_u32(mesh.vertex_count()))
}

pub fn calculate_vertex_to_face_topology_from_components(
    faces: &[TriangleFace],
    vertex_count: u32,
) -> Vec<VertexToFaceRelation> {
    let mut v2f: Vec<VertexToFaceRelation> = vec![SmallVec::new(); cast_usize(vertex_count)];

    for (face_index, face) in faces.iter().enumerate() {
        let face_index_u32 = cast_u32(face_index);
        let vertices = &face.vertices;

        for from_vertex in &[vertices.0, vertices.1, vertices.2] {
            if !v2f[cast_usize(*from_vertex)].contains(&face_index_u32) {
                v2f[cast_usize(*from_vertex)].push(face_index_u32);
            }
        }
    }

    v2f
}

/// Collects the faces around a vertex: its incident faces (one-ring) followed
/// by the faces incident to any corner of the one-ring (two-ring). Each face
/// appears once, one-ring faces first.
pub fn face_neighborhood(
    vertex_index: usize,
    faces: &[TriangleFace],
    v2f: &[VertexToFaceRelation],
) -> SmallVec<[u32; 32]> {
    let mut neighborhood: SmallVec<[u32; 32]> = SmallVec::new();
    let one_ring = &v2f[vertex_index];
    neighborhood.extend(one_ring.iter().copied());

    for face_index in one_ring {
        let (v1, v2, v3) = faces[cast_usize(*face_index)].vertices;
        for corner in &[v1, v2, v3] {
            for neighbor_face in &v2f[cast_usize(*corner)] {
                if !neighborhood.contains(neighbor_face) {
                    neighborhood.push(*neighbor_face);
                }
            }
        }
    }

    neighborhood
}
