use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Multiply a signal by a modulator, sample by sample.
///
/// This is how every drum layer gets its contour: the source keeps
/// oscillating (or hissing) forever, and the envelope shapes it into a hit.
/// Activity follows the modulator - once the envelope reaches its floor the
/// whole chain reports inactive and the hit can be released.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        // Slice temp buffer to match output size (RT-safe, no allocation)
        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.modulator.render_block(frames, ctx);

        for (o, m) in out.iter_mut().zip(frames.iter()) {
            *o *= *m;
        }
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.signal.trigger(ctx);
        self.modulator.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        self.modulator.is_active() && self.signal.is_active()
    }
}
