// Copyright 2021 Tristam MacDonald
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use criterion::{criterion_group, criterion_main, Criterion};
use isocvf::{
    cvf::{decode, CvfEncoder, CvfOptions},
    implicit::Torus,
    math::{Plane, Vec3},
    Cutoff, MeshAccumulator, MarchingCubes, MarchingSquares, Limits, SurfaceGenerator, SurfaceParams,
    VolumeHeader, VoxelGrid,
};

const SIZE: usize = 128;

fn torus_grid() -> VoxelGrid {
    let header = VolumeHeader::cubic(Vec3::from_scalar(-0.5), 1.0 / (SIZE - 1) as f32, [SIZE; 3])
        .expect("valid lattice");
    VoxelGrid::from_field(header, &Torus::new(0.25, 0.1))
}

fn marching_cubes(grid: &VoxelGrid) {
    let mut sink = MeshAccumulator::new();
    let mut marching_cubes = MarchingCubes::new(Cutoff::new(0.0), Limits::default());
    marching_cubes.extract(grid, &mut sink).expect("extraction succeeds");
}

fn marching_squares(grid: &VoxelGrid) {
    let mut sink = MeshAccumulator::new();
    let mut marching_squares = MarchingSquares::new(Cutoff::new(0.0), Limits::default());
    marching_squares
        .extract(grid, &Plane::new(0.0, 0.0, 1.0, 0.0), &mut sink)
        .expect("extraction succeeds");
}

fn marching_cubes_benchmark(c: &mut Criterion) {
    let grid = torus_grid();
    c.bench_function("marching cubes", |b| b.iter(|| marching_cubes(&grid)));
    c.bench_function("marching squares", |b| b.iter(|| marching_squares(&grid)));
}

fn cvf_benchmark(c: &mut Criterion) {
    let grid = torus_grid();
    let mesh = SurfaceGenerator::new(SurfaceParams {
        cutoff: Cutoff::new(0.0),
        ..SurfaceParams::default()
    })
    .generate(&grid)
    .expect("generation succeeds");

    let encode = || {
        let mut encoder = CvfEncoder::new(CvfOptions::default()).expect("valid options");
        encoder.add_surface(&mesh).expect("surface encodes");
        encoder.finish().expect("stream finishes")
    };
    let stream = encode();

    c.bench_function("cvf encode", |b| b.iter(|| encode()));
    c.bench_function("cvf decode", |b| {
        b.iter(|| decode(stream.as_str()).expect("stream decodes"))
    });
}

criterion_group!(benches, marching_cubes_benchmark, cvf_benchmark);
criterion_main!(benches);
