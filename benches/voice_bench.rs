use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use pulsekit::voices::{HitParams, VoiceId, VoiceRenderer};

const SAMPLE_RATE: f32 = 48_000.0;

/// Per-drum render cost. Live mode pays this on every trigger, so the
/// budget is "well under one control-thread tick" (15 ms) per hit.
fn bench_voice_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("voice_render");

    for voice in VoiceId::DRUMS {
        let descriptor = voice.descriptor();
        group.bench_function(voice.name(), |b| {
            let mut renderer = VoiceRenderer::with_seed(SAMPLE_RATE, 7);
            b.iter(|| {
                let samples = renderer.render(black_box(&descriptor), HitParams::default());
                black_box(samples)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_voice_render);
criterion_main!(benches);
