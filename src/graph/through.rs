use crate::graph::node::{GraphNode, RenderCtx};

/// Serial signal chain: render the source, then process it in place.
///
/// The fundamental glue for building recipes - `noise.through(bandpass)`
/// is the snare rattle, `osc.through(lowpass)` the kick body.
pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        self.source.trigger(ctx);
        self.effect.trigger(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, filter::FilterNode, oscillator::OscNode};

    #[test]
    fn filter_processes_source_in_place() {
        let mut node = OscNode::sine(5_000.0).through(FilterNode::lowpass(200.0));
        let ctx = RenderCtx::new(48_000.0, 1.0);
        node.trigger(&ctx);

        let mut buffer = vec![0.0f32; 512];
        node.render_block(&mut buffer, &ctx);

        let peak = buffer[64..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak < 0.3, "filtered chain should attenuate, got {peak}");
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
