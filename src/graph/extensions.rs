use crate::graph::{
    amplify::Amplify,
    gain::Gain,
    node::GraphNode,
    through::Through,
};

pub trait NodeExt: GraphNode + Sized {
    /// Multiply this signal by a modulator (usually an envelope).
    fn amplify<M: GraphNode>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    /// Pass this signal through an effect (filter, EQ stage).
    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    /// Scale this signal by a constant.
    fn gain(self, amount: f32) -> Gain<Self> {
        Gain::new(self, amount)
    }
}

impl<T: GraphNode> NodeExt for T {}
