use crate::graph::node::{GraphNode, RenderCtx};

/// Scale a signal by a constant. Used for layer balance inside a recipe.
pub struct Gain<N> {
    source: N,
    amount: f32,
}

impl<N> Gain<N> {
    pub fn new(source: N, amount: f32) -> Self {
        Self { source, amount }
    }
}

impl<N: GraphNode> GraphNode for Gain<N> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        for sample in out.iter_mut() {
            *sample *= self.amount;
        }
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.source.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
