use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Mat4, Vec2, Vec3};
use sla_hollow_gizmo::{Camera, ClippingPlane, MeshCutter, MeshRaycaster, TriangleMesh};
use std::hint::black_box;
use std::sync::Arc;

/// Baut eine UV-Kugel als synthetische Raycast-Last.
fn build_sphere(rings: usize, segments: usize, radius: f32) -> TriangleMesh {
    let mut vertices = Vec::new();
    for ring in 0..=rings {
        let theta = std::f32::consts::PI * ring as f32 / rings as f32;
        for segment in 0..segments {
            let phi = 2.0 * std::f32::consts::PI * segment as f32 / segments as f32;
            vertices.push(Vec3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.sin() * phi.sin(),
                radius * theta.cos(),
            ));
        }
    }

    let mut indices = Vec::new();
    let index = |ring: usize, segment: usize| (ring * segments + segment % segments) as u32;
    for ring in 0..rings {
        for segment in 0..segments {
            indices.push([
                index(ring, segment),
                index(ring, segment + 1),
                index(ring + 1, segment),
            ]);
            indices.push([
                index(ring, segment + 1),
                index(ring + 1, segment + 1),
                index(ring + 1, segment),
            ]);
        }
    }

    TriangleMesh::new(vertices, indices)
}

fn build_query_points(count: usize, viewport: [f32; 2]) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let x = viewport[0] * 0.3 + (i % 64) as f32 * viewport[0] * 0.4 / 64.0;
            let y = viewport[1] * 0.3 + ((i * 7) % 64) as f32 * viewport[1] * 0.4 / 64.0;
            Vec2::new(x, y)
        })
        .collect()
}

fn bench_raycast(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast");
    let viewport = [1280.0, 720.0];
    let camera = Camera::new();
    let queries = build_query_points(256, viewport);

    for &rings in &[16usize, 64usize] {
        let mesh = Arc::new(build_sphere(rings, rings * 2, 20.0));
        let raycaster = MeshRaycaster::new(mesh.clone());

        group.bench_with_input(
            BenchmarkId::new("unproject_batch", mesh.triangle_count()),
            &raycaster,
            |b, rc| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for point in &queries {
                        if rc
                            .unproject_on_mesh(
                                black_box(*point),
                                Mat4::IDENTITY,
                                &camera,
                                viewport,
                                None,
                            )
                            .is_some()
                        {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                })
            },
        );
    }

    group.finish();
}

fn bench_cross_section(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_section");

    for &rings in &[16usize, 64usize] {
        let mesh = Arc::new(build_sphere(rings, rings * 2, 20.0));
        let triangle_count = mesh.triangle_count();

        group.bench_with_input(
            BenchmarkId::new("cut_triangles", triangle_count),
            &mesh,
            |b, mesh| {
                b.iter(|| {
                    let mut cutter = MeshCutter::new(mesh.clone());
                    cutter.set_plane(ClippingPlane::new(Vec3::Z, black_box(0.5)));
                    cutter.set_transform(Mat4::IDENTITY);
                    cutter.refresh();
                    black_box(cutter.triangles().len())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_raycast, bench_cross_section);
criterion_main!(benches);
