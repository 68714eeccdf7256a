use crate::dsp::eq::BiquadEq;
use crate::graph::node::{GraphNode, RenderCtx};

/// Biquad EQ stage as a graph node. Voice EQ chains stack several of these
/// after layer summing; see `voices::descriptor::EqStage`.
pub struct EqNode {
    eq: BiquadEq,
}

impl EqNode {
    pub fn low_shelf(frequency: f32, gain_db: f32) -> Self {
        Self {
            eq: BiquadEq::low_shelf(frequency, gain_db),
        }
    }

    pub fn high_shelf(frequency: f32, gain_db: f32) -> Self {
        Self {
            eq: BiquadEq::high_shelf(frequency, gain_db),
        }
    }

    pub fn peaking(frequency: f32, gain_db: f32, q: f32) -> Self {
        Self {
            eq: BiquadEq::peaking(frequency, gain_db, q),
        }
    }

    pub fn from_biquad(eq: BiquadEq) -> Self {
        Self { eq }
    }
}

impl GraphNode for EqNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.eq.render(out, ctx.sample_rate);
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        self.eq.reset();
    }
}
