use std::f32::consts::TAU;

use crate::dsp::oscillator::{OscillatorBlock, Waveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Drum Oscillator Node
====================

A pitched source with the two kinds of frequency motion drum recipes need:

Pitch ramp: an exponential drop from a strike frequency down to the settle
frequency, simulating a membrane tightening back after the hit. This is the
kick's "punch" and the tom's "boing":

    freq(t) = settle + (start - settle) * exp(-t / tau)

Detune wobble: summed slow sine LFOs adding cents of detune, used by the
hats to avoid a static synthetic tone. Three stacked wobbles (slow drift,
vibrato, micro-jitter) make the metallic layers breathe:

    cents(t) = sum(depth_i * sin(TAU * rate_i * t + phase_i))
    freq'(t) = freq(t) * 2^(cents(t) / 1200)

Both are part of the node so a recipe stays a single chain:

    OscNode::sine(50.0)
        .with_pitch_ramp(160.0, 0.03)
        .amplify(EnvNode::percussive(0.0, 0.3))
*/

#[derive(Debug, Clone, Copy)]
struct WobbleLfo {
    rate_hz: f32,
    depth_cents: f32,
    phase: f32, // 0..1
}

pub struct OscNode {
    osc: OscillatorBlock,
    settle_freq: f32,
    /// Strike frequency the ramp starts from; equals settle when no ramp.
    start_freq: f32,
    /// Exponential ramp time constant in seconds. Zero disables the ramp.
    ramp_tau: f32,
    wobbles: Vec<WobbleLfo>,
    elapsed_samples: u64,
}

impl OscNode {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            settle_freq: frequency,
            start_freq: frequency,
            ramp_tau: 0.0,
            wobbles: Vec::new(),
            elapsed_samples: 0,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(Waveform::Sine, frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(Waveform::Triangle, frequency)
    }

    pub fn saw(frequency: f32) -> Self {
        Self::new(Waveform::Saw, frequency)
    }

    pub fn square(frequency: f32) -> Self {
        Self::new(Waveform::Square, frequency)
    }

    /// Exponential pitch drop from `start_freq` down to the settle
    /// frequency with time constant `tau` seconds.
    pub fn with_pitch_ramp(mut self, start_freq: f32, tau: f32) -> Self {
        self.start_freq = start_freq;
        self.ramp_tau = tau.max(0.0);
        self
    }

    /// Add a detune wobble LFO. Multiple wobbles sum their cents.
    pub fn with_wobble(mut self, rate_hz: f32, depth_cents: f32, phase: f32) -> Self {
        self.wobbles.push(WobbleLfo {
            rate_hz,
            depth_cents,
            phase: phase.rem_euclid(1.0),
        });
        self
    }

    #[inline]
    fn frequency_at(&self, t: f32) -> f32 {
        let base = if self.ramp_tau > 0.0 {
            self.settle_freq + (self.start_freq - self.settle_freq) * (-t / self.ramp_tau).exp()
        } else {
            self.settle_freq
        };

        if self.wobbles.is_empty() {
            return base;
        }

        let cents: f32 = self
            .wobbles
            .iter()
            .map(|w| w.depth_cents * (TAU * (w.rate_hz * t + w.phase)).sin())
            .sum();
        base * 2.0_f32.powf(cents / 1200.0)
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            let t = self.elapsed_samples as f32 / ctx.sample_rate;
            let frequency = self.frequency_at(t);
            *sample = self.osc.next_sample(frequency, ctx.sample_rate);
            self.elapsed_samples += 1;
        }
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
        self.elapsed_samples = 0;
    }
}
