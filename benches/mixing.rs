use criterion::{black_box, criterion_group, criterion_main, Criterion};
use usrp_bridge::{constants::*, mix};

pub fn mix_one_flush(c: &mut Criterion) {
    // 20ms of conferencing audio per speaker, as delivered to the transmit path.
    let interleaved = utils::interleave(&utils::make_pcm_sine(LINK_FRAME_SAMPLES), 12);
    let speakers = (0..4)
        .map(|i| utils::make_pcm_sine(LINK_FRAME_SAMPLES * (i + 1)))
        .collect::<Vec<_>>();

    c.bench_function("Downmix interleaved source", |b| {
        b.iter(|| mix::downmix_interleaved(black_box(&interleaved), black_box(12)))
    });

    c.bench_function("Downmix four speakers", |b| {
        b.iter(|| mix::downmix_sources(black_box(&speakers)))
    });
}

criterion_group!(benches, mix_one_flush);
criterion_main!(benches);
