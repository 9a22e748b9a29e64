//! Step observer contract.

use crate::graph::GraphView;
use crate::trace::TraceStep;

/// Receives trace steps synchronously, in order, as the engine emits them.
///
/// # Contract
///
/// - `graph` is the live graph at emission time; it holds exactly
///   `step.known_states` states.
/// - Observers cannot influence the search. Attaching one never changes
///   the resulting trace or outcome.
pub trait TraceObserver {
    fn on_step(&mut self, step: &TraceStep, graph: GraphView<'_>);
}

/// Observer that ignores every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TraceObserver for NoopObserver {
    fn on_step(&mut self, _step: &TraceStep, _graph: GraphView<'_>) {}
}

impl<F> TraceObserver for F
where
    F: FnMut(&TraceStep, GraphView<'_>),
{
    fn on_step(&mut self, step: &TraceStep, graph: GraphView<'_>) {
        self(step, graph);
    }
}
