use fxhash::FxHashMap;
use nalgebra::{Point3, Vector3};

use crate::convert::{cast_u32, cast_usize};

use super::{Resolution, SurfaceMesh};

/// Generate an icosphere - an icosahedron with every face recursively split
/// into four, all vertices pushed out onto the sphere surface.
///
/// The vertex count is `10 * 4^subdivisions + 2`, which for subdivision
/// levels 5, 6 and 7 gives the canonical 10242, 40962 and 163842 vertex
/// meshes. Vertices of a coarser level are a prefix of the vertices of every
/// finer level, all faces are wound counter-clockwise when seen from the
/// outside.
pub fn create_icosphere(position: [f32; 3], scale: f32, subdivisions: u32) -> SurfaceMesh {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;

    #[rustfmt::skip]
    let icosahedron_vertices = [
        (-1.0,  t,  0.0), ( 1.0,  t,  0.0), (-1.0, -t,  0.0), ( 1.0, -t,  0.0),
        ( 0.0, -1.0,  t), ( 0.0,  1.0,  t), ( 0.0, -1.0, -t), ( 0.0,  1.0, -t),
        ( t,  0.0, -1.0), ( t,  0.0,  1.0), (-t,  0.0, -1.0), (-t,  0.0,  1.0),
    ];

    #[rustfmt::skip]
    let mut faces: Vec<(u32, u32, u32)> = vec![
        (0, 11, 5), (0, 5, 1), (0, 1, 7), (0, 7, 10), (0, 10, 11),
        (1, 5, 9), (5, 11, 4), (11, 10, 2), (10, 7, 6), (7, 1, 8),
        (3, 9, 4), (3, 4, 2), (3, 2, 6), (3, 6, 8), (3, 8, 9),
        (4, 9, 5), (2, 4, 11), (6, 2, 10), (8, 6, 7), (9, 8, 1),
    ];

    let final_vertex_count = cast_usize(10 * 4u64.pow(subdivisions) + 2);
    let mut unit_vertices: Vec<Vector3<f32>> = Vec::with_capacity(final_vertex_count);
    unit_vertices.extend(
        icosahedron_vertices
            .iter()
            .map(|(x, y, z)| Vector3::new(*x, *y, *z).normalize()),
    );

    for _ in 0..subdivisions {
        // Edges are shared by two faces, the midpoint must only be created
        // once.
        let mut midpoints: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        let mut subdivided_faces = Vec::with_capacity(faces.len() * 4);

        for (v1, v2, v3) in &faces {
            let a = midpoint_index(&mut unit_vertices, &mut midpoints, *v1, *v2);
            let b = midpoint_index(&mut unit_vertices, &mut midpoints, *v2, *v3);
            let c = midpoint_index(&mut unit_vertices, &mut midpoints, *v3, *v1);

            subdivided_faces.push((*v1, a, c));
            subdivided_faces.push((*v2, b, a));
            subdivided_faces.push((*v3, c, b));
            subdivided_faces.push((a, b, c));
        }

        faces = subdivided_faces;
    }

    assert_eq!(unit_vertices.len(), final_vertex_count);

    let vertex_positions = unit_vertices
        .iter()
        .map(|unit| v(unit.x, unit.y, unit.z, position, scale));

    SurfaceMesh::from_triangle_faces_with_vertices(faces, vertex_positions)
}

/// Generate the sphere mesh of a canonical resolution centered at the origin.
pub fn create_canonical_sphere(resolution: Resolution, radius: f32) -> SurfaceMesh {
    create_icosphere([0.0, 0.0, 0.0], radius, resolution.subdivision_level())
}

fn midpoint_index(
    unit_vertices: &mut Vec<Vector3<f32>>,
    midpoints: &mut FxHashMap<(u32, u32), u32>,
    from: u32,
    to: u32,
) -> u32 {
    let key = if from < to { (from, to) } else { (to, from) };

    *midpoints.entry(key).or_insert_with(|| {
        let midpoint =
            (unit_vertices[cast_usize(from)] + unit_vertices[cast_usize(to)]).normalize();
        unit_vertices.push(midpoint);

        cast_u32(unit_vertices.len() - 1)
    })
}

fn v(x: f32, y: f32, z: f32, translation: [f32; 3], scale: f32) -> Point3<f32> {
    Point3::new(
        scale * x + translation[0],
        scale * y + translation[1],
        scale * z + translation[2],
    )
}
