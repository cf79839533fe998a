use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use vitrine::assets::{AnimationClip, AssetError, AssetLoader, LoadedModel, MeshData, Vertex};
use vitrine::gallery::{Gallery, GalleryCommand, GalleryConfig};
use vitrine::options::Options;
use vitrine::renderer::plan_draws;

/// Returns the same small model for every path without touching disk.
struct QuadLoader;

impl AssetLoader for QuadLoader {
    fn load(&self, _path: &str) -> Result<LoadedModel, AssetError> {
        let vertex = |x: f32, y: f32| Vertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
        };
        Ok(LoadedModel {
            meshes: vec![MeshData {
                vertices: vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(1.0, 1.0), vertex(0.0, 1.0)],
                indices: vec![0, 1, 2, 0, 2, 3],
                ..MeshData::default()
            }],
            clips: vec![AnimationClip {
                name: "spin".into(),
                duration: 2.0,
            }],
        })
    }
}

fn settled_gallery() -> Gallery {
    let mut gallery = Gallery::new(GalleryConfig::default(), Options::default(), Arc::new(QuadLoader))
        .unwrap_or_else(|e| panic!("gallery: {e}"));
    while gallery.is_loading() {
        gallery.tick(1.0 / 60.0);
        std::thread::yield_now();
    }
    gallery
}

fn tick_benchmark(c: &mut Criterion) {
    let mut gallery = settled_gallery();
    c.bench_function("gallery_tick", |b| {
        b.iter(|| gallery.tick(black_box(1.0 / 60.0)));
    });
}

fn transition_benchmark(c: &mut Criterion) {
    let mut gallery = settled_gallery();
    c.bench_function("gallery_fly_in_and_back", |b| {
        b.iter(|| {
            let _ = gallery.execute(GalleryCommand::DoubleClick { portal: 1 });
            for _ in 0..30 {
                gallery.tick(1.0 / 60.0);
            }
            let _ = gallery.execute(GalleryCommand::Back);
            for _ in 0..30 {
                gallery.tick(1.0 / 60.0);
            }
        });
    });
}

fn describe_benchmark(c: &mut Criterion) {
    let mut gallery = settled_gallery();
    let _ = gallery.navigate("/item/02");
    for _ in 0..10 {
        gallery.tick(1.0 / 60.0);
    }
    c.bench_function("gallery_describe", |b| {
        b.iter(|| black_box(gallery.describe()));
    });
    let scene = gallery.describe();
    c.bench_function("plan_draws", |b| {
        b.iter(|| black_box(plan_draws(black_box(&scene), 2.2)));
    });
}

criterion_group!(benches, tick_benchmark, transition_benchmark, describe_benchmark);
criterion_main!(benches);
