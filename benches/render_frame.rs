use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_pacman::core::GameEngine;
use tui_pacman::demo;
use tui_pacman::term::{Atlas, EntityRenderer, FrameBuffer, Layout, PixelBuffer};
use tui_pacman::types::Difficulty;

fn bench_subframe(c: &mut Criterion) {
    let mut engine = demo::engine(Difficulty::Normal, None).unwrap();
    let layout = Layout::with_block_size(engine.width(), engine.height(), 14).unwrap();
    let (w, h) = layout.surface_size();
    let mut px = PixelBuffer::new(w, h);
    let mut renderer = EntityRenderer::new(layout);
    renderer.paint_field(&mut px, engine.field());
    let atlas = Atlas::procedural();

    engine.set_heading("ArrowLeft");
    engine.tick();
    let player = engine.player();
    let pursuers = engine.pursuers().to_vec();

    let mut f = 0u32;
    c.bench_function("render_entities_subframe", |b| {
        b.iter(|| {
            f = f % 4 + 1;
            renderer.render_entities(
                &mut px,
                Some(&atlas),
                engine.field(),
                black_box(&player),
                black_box(&pursuers),
                f as f32 / 4.0,
            )
        })
    });
}

fn bench_paint_field(c: &mut Criterion) {
    let engine = demo::engine(Difficulty::Normal, None).unwrap();
    let layout = Layout::with_block_size(engine.width(), engine.height(), 14).unwrap();
    let (w, h) = layout.surface_size();
    let mut px = PixelBuffer::new(w, h);
    let mut renderer = EntityRenderer::new(layout);

    c.bench_function("paint_field", |b| {
        b.iter(|| renderer.paint_field(&mut px, black_box(engine.field())))
    });
}

fn bench_compose(c: &mut Criterion) {
    let engine = demo::engine(Difficulty::Normal, None).unwrap();
    let layout = Layout::with_block_size(engine.width(), engine.height(), 14).unwrap();
    let (w, h) = layout.surface_size();
    let mut px = PixelBuffer::new(w, h);
    EntityRenderer::new(layout).paint_field(&mut px, engine.field());
    let (cols, rows) = FrameBuffer::size_for(&px);
    let mut fb = FrameBuffer::new(cols, rows);

    c.bench_function("compose_full_frame", |b| {
        b.iter(|| fb.compose(black_box(&px), None))
    });
}

criterion_group!(benches, bench_subframe, bench_paint_field, bench_compose);
criterion_main!(benches);
