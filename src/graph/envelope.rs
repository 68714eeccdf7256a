use crate::dsp::envelope::PercEnvelope;
use crate::graph::node::{GraphNode, RenderCtx};

/// Percussive envelope as a graph node. Usually the modulator side of an
/// `.amplify()` - it is what turns an endless source into a hit.
pub struct EnvNode {
    env: PercEnvelope,
}

impl EnvNode {
    pub fn percussive(attack: f32, decay: f32) -> Self {
        Self {
            env: PercEnvelope::percussive(attack, decay),
        }
    }

    pub fn two_stage(attack: f32, stage_level: f32, attack2: f32, decay: f32) -> Self {
        Self {
            env: PercEnvelope::two_stage(attack, stage_level, attack2, decay),
        }
    }

    pub fn from_envelope(env: PercEnvelope) -> Self {
        Self { env }
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx.sample_rate);
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        self.env.trigger();
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
