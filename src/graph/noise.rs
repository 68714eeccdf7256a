use std::sync::Arc;

use crate::dsp::noise::NoiseTable;
use crate::graph::node::{GraphNode, RenderCtx};

/// Reads from the shared one-second noise table, wrapping at the end.
///
/// Each hit gets its own start offset, so overlapping hits (and successive
/// live hits) draw different stretches of the same raw material. The table
/// itself is built once per renderer and shared via `Arc`.
pub struct NoiseNode {
    table: Arc<NoiseTable>,
    start: usize,
    position: usize,
}

impl NoiseNode {
    pub fn new(table: Arc<NoiseTable>, start: usize) -> Self {
        Self {
            table,
            start,
            position: start,
        }
    }
}

impl GraphNode for NoiseNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.table.at(self.position);
            self.position += 1;
        }
    }

    fn trigger(&mut self, _ctx: &RenderCtx) {
        self.position = self.start;
    }
}
