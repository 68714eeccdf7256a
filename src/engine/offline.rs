use crate::engine::scheduler::{LookaheadScheduler, Trigger};
use crate::sequencing::Pattern;
use crate::voices::{HitParams, VoiceRenderer};

/*
Offline Bounce
==============

Renders a pattern straight to a mono buffer with no device and no threads:
the scheduler is driven by a virtual clock stepped in sub-window
increments, and every trigger is synthesized and summed at its exact
sample offset. Humanization and excitement gating run exactly as in live
playback; the bus coloration does not (the bounce is the dry sum).

Deterministic for a given seed, which makes it the backbone of the
end-to-end tests.
*/

/// Virtual tick cadence. Must stay below the scheduler's look-ahead
/// window or steps would be scheduled late.
const TICK: f64 = 0.05;

pub fn bounce(
    pattern: &Pattern,
    bpm: f64,
    excitement: f32,
    duration: f64,
    sample_rate: f32,
    seed: u64,
) -> Vec<f32> {
    let mut scheduler = LookaheadScheduler::new(pattern.clone(), bpm).with_seed(seed);
    scheduler.set_excitement(excitement);
    scheduler.start(0.0);

    let mut triggers: Vec<Trigger> = Vec::new();
    let mut now = 0.0;
    while now < duration {
        scheduler.tick(now, &mut triggers);
        now += TICK;
    }
    scheduler.stop();

    let mut out = vec![0.0f32; (duration * sample_rate as f64).ceil() as usize];
    let mut renderer = VoiceRenderer::with_seed(sample_rate, seed);

    for trigger in triggers {
        if trigger.time >= duration {
            continue;
        }
        let samples = renderer.render(
            &trigger.voice.descriptor(),
            HitParams {
                velocity: trigger.velocity,
                velocity_scale: trigger.velocity_scale,
            },
        );
        let start = (trigger.time * sample_rate as f64) as usize;
        for (i, sample) in samples.iter().enumerate() {
            match out.get_mut(start + i) {
                Some(slot) => *slot += sample,
                None => break,
            }
        }
    }

    out
}
