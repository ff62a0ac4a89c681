use cortex_resampler::mesh::primitive;
use cortex_resampler::surface_to_volume;
use cortex_resampler::volume_to_surface;
use cortex_resampler::{
    CorticalMask, GeneratedSphereMeshes, HemisphereMappings, InterpolationMode, MappingTable,
    Resolution, Volume, VoxelGrid,
};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{DMatrix, Matrix4, Point3, Vector3};

const RADIUS: f32 = 100.0;

fn bench_surface_to_volume(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface_to_volume");
    group.sample_size(10);

    let meshes = GeneratedSphereMeshes::new(RADIUS);
    let dimensions = Vector3::new(32, 32, 32);
    let mask = CorticalMask::from_grid(VoxelGrid::filled(&dimensions, true));
    // Every voxel maps to one of the canonical sphere vertices.
    let sphere = primitive::create_canonical_sphere(Resolution::Canonical, RADIUS);
    let coordinates: Vec<Point3<f32>> = sphere
        .vertices()
        .iter()
        .cycle()
        .take(mask.len())
        .copied()
        .collect();
    let mapping = HemisphereMappings {
        left: MappingTable::from_coordinates(coordinates.clone()),
        right: MappingTable::from_coordinates(coordinates),
    };

    for resolution in Resolution::ALL.iter() {
        let field = DMatrix::from_fn(1, resolution.vertex_count(), |_, c| (c % 100) as f32);

        for mode in [InterpolationMode::Nearest, InterpolationMode::Linear].iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("{}", mode), resolution),
                resolution,
                |b, _| {
                    b.iter(|| {
                        surface_to_volume::project_surface_to_volume(
                            black_box(&field),
                            black_box(&field),
                            *mode,
                            &mapping,
                            &mask,
                            &meshes,
                        )
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_volume_to_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("volume_to_surface");

    let dimensions = Vector3::new(91, 109, 91);
    let frames = (0..4)
        .map(|f| VoxelGrid::filled(&dimensions, f as f32))
        .collect();
    let affine = Matrix4::new_translation(&Vector3::new(-90.0, -126.0, -72.0))
        * Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 2.0, 2.0));
    let volume = Volume::new(frames, affine).expect("Frames share dimensions");
    let sphere = primitive::create_canonical_sphere(Resolution::Canonical, 60.0);
    let mapping = MappingTable::from_coordinates(sphere.vertices().to_vec());

    for resolution in Resolution::ALL.iter() {
        for mode in [InterpolationMode::Nearest, InterpolationMode::Linear].iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("{}", mode), resolution),
                resolution,
                |b, resolution| {
                    b.iter(|| {
                        volume_to_surface::project_volume_to_surface(
                            black_box(&volume),
                            *mode,
                            &mapping,
                            &mapping,
                            *resolution,
                        )
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_surface_to_volume, bench_volume_to_surface);
criterion_main!(benches);
