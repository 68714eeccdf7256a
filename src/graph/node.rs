/// Context passed to graph nodes during rendering.
///
/// Drums are unpitched one-shots, so unlike a melodic synth graph there is
/// no note frequency here - every oscillator carries its own tuning. The
/// context carries what varies per hit:
/// - `sample_rate`: audio sample rate (e.g. 48000.0)
/// - `velocity`: linear amplitude scale for the hit (1.0 = full)
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub velocity: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            velocity,
        }
    }
}

/// Core trait for audio processing graph nodes.
///
/// Nodes render audio in blocks and respond to a one-shot trigger.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Fired once when the hit starts.
    ///
    /// Default implementation does nothing (passthrough nodes).
    fn trigger(&mut self, _ctx: &RenderCtx) {
        // Default: do nothing
    }

    /// Check if this node is still producing sound.
    ///
    /// Sources (oscillators, noise) report active forever; envelopes report
    /// idle once they reach the floor, which is what ends a hit.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch).
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn trigger(&mut self, ctx: &RenderCtx) {
        (**self).trigger(ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
