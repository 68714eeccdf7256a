use std::sync::Arc;

use crate::dsp::filter::SVFilter;
use crate::dsp::noise::{NoiseColor, NoiseTable};
use crate::graph::envelope::EnvNode;
use crate::graph::eq::EqNode;
use crate::graph::extensions::NodeExt;
use crate::graph::filter::FilterNode;
use crate::graph::noise::NoiseNode;
use crate::graph::oscillator::OscNode;
use crate::graph::{GraphNode, RenderCtx};
use crate::voices::descriptor::{Bleed, NoiseFilter, VoiceDescriptor};
use crate::MAX_BLOCK_SIZE;

/*
Voice Renderer
==============

Interprets a `VoiceDescriptor` into a finished mono buffer. Both engine
modes go through here: live playback renders every hit (fresh noise
offsets, so no two are identical), the pre-render cache renders each drum
exactly once.

Per hit:

  1. each tone layer becomes  OscNode (+ramp +wobbles) .amplify(env)
  2. each noise layer becomes NoiseNode .through(filter) .amplify(env)
  3. layers accumulate into the output at their gains
  4. the descriptor's EQ chain runs over the sum
  5. the bleed (if any) mixes a delayed low-passed copy behind the hit
  6. the whole buffer scales by velocity * velocity_scale

Velocity scale also colors the hit slightly: harder hits land a touch
sharp and with a hotter noise transient, softer ones flat and duller,
which keeps humanized grooves from sounding like one sample at many
volumes.
*/

/// Fraction of the velocity-scale excursion applied to tone frequencies.
const FREQ_SHIFT_FRACTION: f32 = 0.04;

/// Fraction of the velocity-scale excursion applied to noise layer gains.
const TRANSIENT_GAIN_FRACTION: f32 = 0.05;

#[derive(Debug, Clone, Copy)]
pub struct HitParams {
    /// Linear amplitude, 0..1.
    pub velocity: f32,
    /// Humanization multiplier around 1.0.
    pub velocity_scale: f32,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            velocity: 1.0,
            velocity_scale: 1.0,
        }
    }
}

pub struct VoiceRenderer {
    sample_rate: f32,
    white: Arc<NoiseTable>,
    pink: Arc<NoiseTable>,
    rng: fastrand::Rng,
}

impl VoiceRenderer {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, fastrand::u64(..))
    }

    /// Deterministic noise tables and hit offsets, for tests and
    /// reproducible bounces.
    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let white = Arc::new(NoiseTable::generate(NoiseColor::White, sample_rate, rng.u64(..)));
        let pink = Arc::new(NoiseTable::generate(NoiseColor::Pink, sample_rate, rng.u64(..)));
        Self {
            sample_rate,
            white,
            pink,
            rng,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Render one hit to a fresh buffer.
    pub fn render(&mut self, descriptor: &VoiceDescriptor, params: HitParams) -> Vec<f32> {
        let ctx = RenderCtx::new(self.sample_rate, params.velocity);

        let excursion = params.velocity_scale - 1.0;
        let freq_factor = 1.0 + excursion * FREQ_SHIFT_FRACTION;
        let noise_factor = 1.0 + excursion * TRANSIENT_GAIN_FRACTION;

        let body_len = ((descriptor.body_duration() * self.sample_rate).ceil() as usize).max(1);
        let mut out = vec![0.0f32; body_len];

        for layer in &descriptor.tones {
            let mut osc = OscNode::new(layer.waveform, layer.frequency * freq_factor);
            if layer.ramp_tau > 0.0 {
                osc = osc.with_pitch_ramp(layer.strike_frequency * freq_factor, layer.ramp_tau);
            }
            for wobble in &layer.wobbles {
                osc = osc.with_wobble(wobble.rate_hz, wobble.depth_cents, wobble.phase);
            }

            let mut chain = osc.amplify(EnvNode::from_envelope(layer.envelope.build()));
            chain.trigger(&ctx);
            accumulate(&mut chain, &mut out, layer.gain, &ctx);
        }

        for layer in &descriptor.noises {
            let table = match layer.color {
                NoiseColor::White => &self.white,
                NoiseColor::Pink => &self.pink,
            };
            // Fresh read offset per hit: successive live hits never replay
            // the same burst
            let start = self.rng.usize(0..table.len());

            let filter = match layer.filter {
                NoiseFilter::Band(center, resonance) => {
                    FilterNode::bandpass(center).with_resonance(resonance)
                }
                NoiseFilter::High(cutoff) => FilterNode::highpass(cutoff),
                NoiseFilter::Low(cutoff) => FilterNode::lowpass(cutoff),
            };
            let envelope = layer.envelope.build_scaled(layer.duration_scale);

            let mut chain = NoiseNode::new(Arc::clone(table), start)
                .through(filter)
                .amplify(EnvNode::from_envelope(envelope));
            chain.trigger(&ctx);
            accumulate(&mut chain, &mut out, layer.gain * noise_factor, &ctx);
        }

        for stage in &descriptor.eq {
            let mut eq = EqNode::from_biquad(stage.build());
            for block in out.chunks_mut(MAX_BLOCK_SIZE) {
                eq.render_block(block, &ctx);
            }
        }

        if let Some(bleed) = &descriptor.bleed {
            apply_bleed(&mut out, bleed, self.sample_rate);
        }

        let amplitude = params.velocity * params.velocity_scale;
        for sample in out.iter_mut() {
            *sample *= amplitude;
        }

        out
    }
}

/// Render a chain to completion, summing into `out` at `gain`. Stops at
/// the buffer end or when the chain's envelope goes idle.
fn accumulate(node: &mut impl GraphNode, out: &mut [f32], gain: f32, ctx: &RenderCtx) {
    let mut scratch = [0.0f32; MAX_BLOCK_SIZE];
    let mut position = 0;

    while position < out.len() && node.is_active() {
        let take = (out.len() - position).min(MAX_BLOCK_SIZE);
        let block = &mut scratch[..take];
        block.fill(0.0);
        node.render_block(block, ctx);

        for (slot, sample) in out[position..position + take].iter_mut().zip(block.iter()) {
            *slot += sample * gain;
        }
        position += take;
    }
}

/// Mix a delayed, low-passed copy of the hit behind itself, extending the
/// buffer by the delay.
fn apply_bleed(out: &mut Vec<f32>, bleed: &Bleed, sample_rate: f32) {
    let delay = (bleed.delay * sample_rate) as usize;

    let mut wet = out.clone();
    let mut lowpass = SVFilter::lowpass(bleed.lowpass_hz);
    lowpass.render(&mut wet, sample_rate);

    out.resize(out.len() + delay, 0.0);
    for (i, sample) in wet.iter().enumerate() {
        out[i + delay] += sample * bleed.gain;
    }
}
